// dqi-core/src/error.rs

use crate::domain::error::DomainError;
use crate::infrastructure::error::InfrastructureError;
use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic)]
pub enum DqiError {
    // --- ERREURS DU DOMAINE (mart, grade, clé de regroupement inconnus) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Domain(#[from] DomainError),

    // --- ERREURS D'INFRASTRUCTURE (IO, Parsing, DuckDB) ---
    #[error(transparent)]
    #[diagnostic(transparent)]
    Infrastructure(#[from] InfrastructureError),
}

// Manual implementation to avoid duplicate enum variant but keep ergonomics
impl From<std::io::Error> for DqiError {
    fn from(err: std::io::Error) -> Self {
        DqiError::Infrastructure(InfrastructureError::Io(err))
    }
}

impl From<duckdb::Error> for DqiError {
    fn from(err: duckdb::Error) -> Self {
        DqiError::Infrastructure(InfrastructureError::from(err))
    }
}
