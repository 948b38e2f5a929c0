// dqi-core/src/application/report.rs

use chrono::Utc;
use serde::Serialize;
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use super::engine::{QualityEngine, outstanding_errors};
use crate::domain::quality::{
    self, Grade, GroupKey, GroupSummary, Mart, MartStatus, MartSummaryRow, NO_DATA_LABEL,
    SeverityLevel, TestResult,
};
use crate::error::DqiError;
use crate::infrastructure::fs::write_json;

// --- DTOs ---
// Everything a dashboard refresh shows, computed from one snapshot.

#[derive(Debug, Clone, Serialize)]
pub struct ReportCard {
    pub generated_at: String,
    pub grade: Grade,
    pub grade_description: &'static str,
    pub totals: ReportTotals,
    pub last_test_run: String,
    pub mart_statuses: BTreeMap<Mart, MartStatus>,
    pub mart_summary: Vec<MartSummaryRow>,
    pub category_summary: Vec<GroupSummary>,
    pub dimension_summary: Vec<GroupSummary>,
    pub top_errors: Vec<ErrorLine>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportTotals {
    pub tests_completed: usize,
    pub passing: usize,
    pub failing: usize,
    pub ungraded: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorLine {
    pub unique_id: String,
    pub severity_level: Option<SeverityLevel>,
    pub status: String,
    pub table_name: Option<String>,
    pub column_name: Option<String>,
    pub test_name: Option<String>,
    pub result_rows: Option<String>,
}

impl From<&TestResult> for ErrorLine {
    fn from(record: &TestResult) -> Self {
        Self {
            unique_id: record.unique_id.clone(),
            severity_level: record.severity_level,
            status: record.status.clone(),
            table_name: record.table_name.clone(),
            column_name: record.column_name.clone(),
            test_name: record.test_name.clone(),
            result_rows: record.result_rows.clone(),
        }
    }
}

impl ReportCard {
    pub fn build(records: &[TestResult], top_errors: usize) -> Self {
        let grade = quality::compute_grade(records);
        let passing = records.iter().filter(|r| r.passed()).count();

        Self {
            generated_at: Utc::now().to_rfc3339(),
            grade,
            grade_description: grade.description(),
            totals: ReportTotals {
                tests_completed: records.len(),
                passing,
                failing: records.len() - passing,
                ungraded: records.iter().filter(|r| !r.is_graded()).count(),
            },
            last_test_run: quality::last_run_time(records)
                .unwrap_or_else(|| NO_DATA_LABEL.to_string()),
            mart_statuses: quality::compute_mart_statuses(records),
            mart_summary: quality::mart_test_summary(records),
            category_summary: quality::summarize_by(records, GroupKey::TestCategory),
            dimension_summary: quality::summarize_by(records, GroupKey::QualityDimension),
            top_errors: outstanding_errors(records)
                .iter()
                .take(top_errors)
                .map(ErrorLine::from)
                .collect(),
        }
    }
}

// --- GENERATOR SERVICE ---

impl QualityEngine {
    /// Report card over a single snapshot: every section agrees with the others
    /// even if an import lands while it is being built.
    pub fn report_card(&self, top_errors: usize) -> Result<ReportCard, DqiError> {
        let snapshot = self.snapshot()?;
        Ok(ReportCard::build(&snapshot.test_results, top_errors))
    }

    pub fn write_report_card(
        &self,
        output: &Path,
        top_errors: usize,
    ) -> Result<ReportCard, DqiError> {
        let card = self.report_card(top_errors)?;
        write_json(output, &card)?;
        info!(path = ?output, grade = %card.grade, "Report card written");
        Ok(card)
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::infrastructure::adapters::InMemoryStore;
    use crate::ports::store::RecordStore;
    use anyhow::Result;
    use std::sync::Arc;
    use tempfile::tempdir;

    fn sample() -> Vec<TestResult> {
        let mut crit = TestResult::new("crit", "fail").with_severity(SeverityLevel::Critical);
        crit.test_category = Some("completeness".into());
        crit.generated_at = Some("2025-03-05 20:24:04".into());
        let mut ok = TestResult::new("ok", "pass")
            .with_severity(SeverityLevel::Low)
            .with_marts(&[Mart::Ccsr]);
        ok.test_category = Some("completeness".into());
        ok.quality_dimension = Some("validity".into());
        let low = TestResult::new("low", "fail").with_severity(SeverityLevel::Low);
        vec![crit, ok, low, TestResult::new("ungraded", "warn")]
    }

    #[test]
    fn test_report_card_sections_agree() {
        let card = ReportCard::build(&sample(), 1);
        assert_eq!(card.grade, Grade::F);
        assert_eq!(card.grade_description, Grade::F.description());
        assert_eq!(
            card.totals,
            ReportTotals {
                tests_completed: 4,
                passing: 1,
                failing: 3,
                ungraded: 1,
            }
        );
        assert_eq!(card.last_test_run, "2025-03-05 20:24:04");
        assert!(card.mart_statuses.values().all(|s| *s == MartStatus::NotUsable));
        assert!(card.mart_summary.iter().all(|row| row.status == MartStatus::NotUsable));
        assert_eq!(card.category_summary.len(), 1);
        assert_eq!(card.dimension_summary[0].group_value, "validity");
        assert_eq!(card.top_errors.len(), 1);
        assert_eq!(card.top_errors[0].unique_id, "crit");
    }

    #[test]
    fn test_empty_report_card() {
        let card = ReportCard::build(&[], 10);
        assert_eq!(card.grade, Grade::A);
        assert_eq!(card.last_test_run, NO_DATA_LABEL);
        assert_eq!(card.mart_statuses.len(), Mart::COUNT);
        assert!(card.category_summary.is_empty());
        assert!(card.top_errors.is_empty());
    }

    #[test]
    fn test_write_report_card() -> Result<()> {
        let store = Arc::new(InMemoryStore::new());
        store.replace_test_results(sample())?;
        let engine = QualityEngine::new(store);

        let dir = tempdir()?;
        let output = dir.path().join("target").join("report_card.json");
        engine.write_report_card(&output, 5)?;

        let written: serde_json::Value = serde_json::from_str(&std::fs::read_to_string(&output)?)?;
        assert_eq!(written["grade"], "F");
        assert_eq!(written["totals"]["ungraded"], 1);
        assert_eq!(written["mart_statuses"]["CCSR"], "not_usable");
        assert_eq!(written["top_errors"].as_array().unwrap().len(), 2);
        Ok(())
    }
}
