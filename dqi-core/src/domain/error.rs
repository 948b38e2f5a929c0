// dqi-core/src/domain/error.rs

use miette::Diagnostic;
use thiserror::Error;

#[derive(Error, Debug, Diagnostic, PartialEq, Eq)]
pub enum DomainError {
    #[error("Unknown data mart: '{0}'")]
    #[diagnostic(
        code(dqi::domain::unknown_mart),
        help(
            "Expected one of: service_categories, ccsr, cms_chronic_conditions, tuva_chronic_conditions, cms_hccs, ed_classification, financial_pmpm, quality_measures, readmission"
        )
    )]
    UnknownMart(String),

    #[error("Unknown grouping key: '{0}'")]
    #[diagnostic(
        code(dqi::domain::unknown_group_key),
        help("Group by 'category' (test_category) or 'dimension' (quality_dimension).")
    )]
    UnknownGroupKey(String),

    #[error("Unknown grade: '{0}'")]
    #[diagnostic(code(dqi::domain::unknown_grade), help("Grades range from A to F."))]
    UnknownGrade(String),
}
