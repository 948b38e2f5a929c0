// dqi-core/src/infrastructure/config/mod.rs

pub mod project;

pub use project::{
    DqiConfig, ImportConfig, ListingConfig, ReportConfig, load_config_or_default, load_project_config,
};
