// dqi-core/src/domain/quality/record.rs

use serde::{Deserialize, Serialize};

use super::mart::{Mart, MartFlags};
use super::severity::{RawField, SeverityLevel};

pub const PASS_STATUS: &str = "pass";

/// One executed data-quality test, after normalization.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TestResult {
    pub unique_id: String,

    // Tested object
    pub database_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub column_name: Option<String>,

    // Classification
    pub test_name: Option<String>,
    pub test_original_name: Option<String>,
    pub test_type: Option<String>,
    pub test_sub_type: Option<String>,
    pub test_category: Option<String>,
    pub quality_dimension: Option<String>,

    /// `None` = ungraded (missing or outside 1..=5).
    pub severity_level: Option<SeverityLevel>,
    /// Free text from the test runner ("warn", "ERROR"). Never used for grading.
    pub severity: Option<String>,
    pub status: String,

    // Diagnostics
    pub description: Option<String>,
    pub results_description: Option<String>,
    pub results_query: Option<String>,
    pub result_rows: Option<String>,

    pub mart_flags: MartFlags,
    pub generated_at: Option<String>,
}

impl TestResult {
    pub fn new(unique_id: impl Into<String>, status: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            status: status.into(),
            ..Default::default()
        }
    }

    pub fn with_severity(mut self, level: SeverityLevel) -> Self {
        self.severity_level = Some(level);
        self
    }

    pub fn with_marts(mut self, marts: &[Mart]) -> Self {
        self.mart_flags = MartFlags::of(marts);
        self
    }

    pub fn passed(&self) -> bool {
        self.status == PASS_STATUS
    }

    pub fn is_graded(&self) -> bool {
        self.severity_level.is_some()
    }

    /// Graded and not passing: the only records that move grades and mart statuses.
    pub fn is_failure(&self) -> bool {
        self.is_graded() && !self.passed()
    }

    /// Severity of the failure, if this record is one.
    pub fn failing_severity(&self) -> Option<SeverityLevel> {
        if self.passed() {
            None
        } else {
            self.severity_level
        }
    }

    pub fn affects(&self, mart: Mart) -> bool {
        self.mart_flags.get(mart)
    }
}

/// A test-result row as exported by the warehouse test runner.
/// Column names follow the export headers (`UNIQUE_ID`, `FLAG_CCSR`...);
/// unknown columns are ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE", default)]
pub struct RawTestResult {
    pub unique_id: Option<RawField>,
    pub database_name: Option<String>,
    pub schema_name: Option<String>,
    pub table_name: Option<String>,
    pub test_column_name: Option<String>,
    pub column_name: Option<String>,
    pub test_name: Option<String>,
    pub test_original_name: Option<String>,
    pub test_type: Option<String>,
    pub test_sub_type: Option<String>,
    pub test_category: Option<String>,
    pub quality_dimension: Option<String>,
    pub severity: Option<String>,
    pub severity_level: Option<RawField>,
    pub status: Option<String>,
    pub test_description: Option<String>,
    pub test_results_description: Option<String>,
    pub test_results_query: Option<String>,
    pub failed_row_count: Option<RawField>,
    pub generated_at: Option<String>,

    pub flag_service_categories: Option<RawField>,
    pub flag_ccsr: Option<RawField>,
    pub flag_cms_chronic_conditions: Option<RawField>,
    pub flag_tuva_chronic_conditions: Option<RawField>,
    pub flag_cms_hccs: Option<RawField>,
    pub flag_ed_classification: Option<RawField>,
    pub flag_financial_pmpm: Option<RawField>,
    pub flag_quality_measures: Option<RawField>,
    pub flag_readmission: Option<RawField>,
}

impl RawTestResult {
    pub fn flag(&self, mart: Mart) -> Option<&RawField> {
        match mart {
            Mart::ServiceCategories => self.flag_service_categories.as_ref(),
            Mart::Ccsr => self.flag_ccsr.as_ref(),
            Mart::CmsChronicConditions => self.flag_cms_chronic_conditions.as_ref(),
            Mart::TuvaChronicConditions => self.flag_tuva_chronic_conditions.as_ref(),
            Mart::CmsHccs => self.flag_cms_hccs.as_ref(),
            Mart::EdClassification => self.flag_ed_classification.as_ref(),
            Mart::FinancialPmpm => self.flag_financial_pmpm.as_ref(),
            Mart::QualityMeasures => self.flag_quality_measures.as_ref(),
            Mart::Readmission => self.flag_readmission.as_ref(),
        }
    }

    pub fn mart_flags(&self) -> MartFlags {
        let mut flags = MartFlags::none();
        for mart in Mart::ALL {
            flags.set(mart, self.flag(mart).is_some_and(RawField::as_flag));
        }
        flags
    }
}
