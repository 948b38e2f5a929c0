// dqi-core/src/domain/mod.rs

pub mod chart;
pub mod error;
pub mod quality;
pub mod snapshot;

// Re-export pour simplifier les imports ailleurs
pub use error::DomainError;
pub use snapshot::Snapshot;
