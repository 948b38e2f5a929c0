// dqi-core/src/infrastructure/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DatabaseError {
    #[error("DuckDB Engine Error: {0}")]
    #[diagnostic(
        code(dqi::infra::database::duckdb),
        help("An error occurred inside the SQL engine.")
    )]
    DuckDB(#[from] duckdb::Error),
}

#[derive(Error, Debug, Diagnostic)]
pub enum InfrastructureError {
    // --- DATABASE (Abstracted) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Database(#[from] DatabaseError),

    #[error("Record store unavailable: {0}")]
    #[diagnostic(
        code(dqi::infra::store_unavailable),
        help("Another thread panicked while holding the store lock. Reopen the store.")
    )]
    StoreUnavailable(String),

    // --- FILESYSTEM (IO) ---
    #[error("File System Error: {0}")]
    #[diagnostic(
        code(dqi::infra::io),
        help("Check file permissions or path validity.")
    )]
    Io(#[from] std::io::Error),

    // --- UPLOADS ---
    #[error("Unsupported file '{0}'")]
    #[diagnostic(
        code(dqi::infra::unsupported_file),
        help("Upload a .csv or .json export of the data quality tables.")
    )]
    UnsupportedFile(String),

    #[error("Could not recognize the dataset in '{0}'")]
    #[diagnostic(
        code(dqi::infra::unrecognized_dataset),
        help(
            "Test results need a UNIQUE_ID column; chart data needs DATA_QUALITY_CATEGORY and GRAPH_NAME."
        )
    )]
    UnrecognizedDataset(String),

    #[error("JSON Error: {0}")]
    #[diagnostic(
        code(dqi::infra::json),
        help("Uploads must be a JSON array of objects.")
    )]
    Json(#[from] serde_json::Error),

    // --- CONFIG / YAML ---
    #[error("YAML Parsing Error: {0}")]
    #[diagnostic(
        code(dqi::infra::yaml),
        help("Check your YAML syntax (indentation, types).")
    )]
    YamlError(#[from] serde_yaml::Error),

    #[error("Configuration Error: {0}")]
    ConfigError(String),

    #[error("Invalid configuration: {0}")]
    #[diagnostic(code(dqi::infra::config_invalid))]
    InvalidConfig(#[from] validator::ValidationErrors),

    #[error("Project configuration not found at '{0}'")]
    #[diagnostic(code(dqi::infra::config_missing))]
    ConfigNotFound(String),
}

// Manual implementation for shortcuts (e.g. `?` operator on duckdb calls)
impl From<duckdb::Error> for InfrastructureError {
    fn from(err: duckdb::Error) -> Self {
        InfrastructureError::Database(DatabaseError::DuckDB(err))
    }
}
