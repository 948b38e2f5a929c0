// dqi-core/src/infrastructure/mod.rs

pub mod adapters;
pub mod config;
pub mod error;
pub mod fs;
pub mod loader;

pub use adapters::{DuckDBStore, InMemoryStore};
pub use loader::{DatasetKind, LoadedDataset, load_file};
