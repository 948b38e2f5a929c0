// dqi-core/src/application/engine.rs

use serde::Serialize;
use std::cmp::Reverse;
use std::collections::BTreeMap;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, error, instrument};

// Imports Hexagonaux
use crate::domain::Snapshot;
use crate::domain::chart::{self, ChartDescriptor, ChartSeriesPoint};
use crate::domain::quality::{
    self, Grade, GroupKey, GroupSummary, Mart, MartStatus, MartSummaryRow, TestResult,
};
use crate::error::DqiError;
use crate::ports::store::RecordStore;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DataAvailability {
    pub test_results: usize,
    pub ungraded_test_results: usize,
    pub chart_points: usize,
    pub chart_points_per_category: BTreeMap<String, usize>,
}

/// What `dqi grade` prints, computed over one snapshot.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GradeOverview {
    pub grade: Grade,
    pub tests_completed: usize,
    pub ungraded: usize,
    pub last_test_run: Option<String>,
}

/// Read side of the system. Every method loads one snapshot and computes
/// over it; nothing is cached between calls.
#[derive(Clone)]
pub struct QualityEngine {
    store: Arc<dyn RecordStore>,
}

impl QualityEngine {
    pub fn new(store: Arc<dyn RecordStore>) -> Self {
        Self { store }
    }

    pub fn store(&self) -> &Arc<dyn RecordStore> {
        &self.store
    }

    /// Load the current snapshot, logging how long the store took.
    #[instrument(skip(self))]
    pub fn snapshot(&self) -> Result<Arc<Snapshot>, DqiError> {
        let start = Instant::now();
        match self.store.load_snapshot() {
            Ok(snapshot) => {
                debug!(
                    records = snapshot.test_results.len(),
                    "Snapshot ready in {:.2?}",
                    start.elapsed()
                );
                Ok(snapshot)
            }
            Err(e) => {
                error!("Snapshot load failed after {:.2?}: {}", start.elapsed(), e);
                Err(e)
            }
        }
    }

    fn over_records<T>(
        &self,
        pass: &'static str,
        compute: impl FnOnce(&[TestResult]) -> T,
    ) -> Result<T, DqiError> {
        let snapshot = self.snapshot()?;
        let start = Instant::now();
        let value = compute(&snapshot.test_results);
        debug!(pass, "Aggregation finished in {:.2?}", start.elapsed());
        Ok(value)
    }

    pub fn get_all_records(&self) -> Result<Vec<TestResult>, DqiError> {
        self.store.get_all_records()
    }

    #[instrument(skip(self))]
    pub fn compute_grade(&self) -> Result<Grade, DqiError> {
        self.over_records("grade", |records| quality::compute_grade(records))
    }

    /// Grade, completed count and last run without building a full report.
    #[instrument(skip(self))]
    pub fn grade_overview(&self) -> Result<GradeOverview, DqiError> {
        self.over_records("grade_overview", |records| GradeOverview {
            grade: quality::compute_grade(records),
            tests_completed: records.len(),
            ungraded: records.iter().filter(|r| !r.is_graded()).count(),
            last_test_run: quality::last_run_time(records),
        })
    }

    #[instrument(skip(self))]
    pub fn compute_mart_statuses(&self) -> Result<BTreeMap<Mart, MartStatus>, DqiError> {
        self.over_records("mart_statuses", |records| quality::compute_mart_statuses(records))
    }

    #[instrument(skip(self))]
    pub fn get_mart_test_summary(&self) -> Result<Vec<MartSummaryRow>, DqiError> {
        self.over_records("mart_summary", |records| quality::mart_test_summary(records))
    }

    #[instrument(skip(self))]
    pub fn summarize_by_category(&self, key: GroupKey) -> Result<Vec<GroupSummary>, DqiError> {
        self.over_records("group_summary", |records| {
            quality::summarize_by(records, key)
        })
    }

    /// Graded, non-passing records, most severe first.
    #[instrument(skip(self))]
    pub fn get_outstanding_errors(&self) -> Result<Vec<TestResult>, DqiError> {
        self.over_records("outstanding_errors", outstanding_errors)
    }

    /// Every record in the snapshot, graded or not.
    pub fn get_tests_completed_count(&self) -> Result<usize, DqiError> {
        self.over_records("completed_count", <[TestResult]>::len)
    }

    pub fn get_last_test_run_time(&self) -> Result<Option<String>, DqiError> {
        self.over_records("last_run_time", |records| quality::last_run_time(records))
    }

    #[instrument(skip(self))]
    pub fn get_all_tests(&self) -> Result<Vec<TestResult>, DqiError> {
        self.over_records("all_tests", all_tests)
    }

    /// Records flagged for `mart`. With a status, only that status; without
    /// one, everything that did not pass.
    #[instrument(skip(self))]
    pub fn get_mart_tests(
        &self,
        mart: Mart,
        status: Option<&str>,
    ) -> Result<Vec<TestResult>, DqiError> {
        self.over_records("mart_tests", |records| mart_tests(records, mart, status))
    }

    pub fn data_availability(&self) -> Result<DataAvailability, DqiError> {
        let snapshot = self.snapshot()?;
        Ok(DataAvailability {
            test_results: snapshot.test_results.len(),
            ungraded_test_results: snapshot
                .test_results
                .iter()
                .filter(|r| !r.is_graded())
                .count(),
            chart_points: snapshot.chart_points.len(),
            chart_points_per_category: chart::points_per_category(&snapshot.chart_points),
        })
    }

    // --- Charts ---

    pub fn available_charts(&self) -> Result<Vec<ChartDescriptor>, DqiError> {
        Ok(chart::available_charts(&self.snapshot()?.chart_points))
    }

    pub fn chart_points(
        &self,
        graph_name: &str,
        chart_filter: Option<&str>,
    ) -> Result<Vec<ChartSeriesPoint>, DqiError> {
        let snapshot = self.snapshot()?;
        Ok(chart::chart_points(&snapshot.chart_points, graph_name, chart_filter)
            .into_iter()
            .cloned()
            .collect())
    }

    pub fn chart_filter_values(&self, graph_name: &str) -> Result<Vec<String>, DqiError> {
        Ok(chart::chart_filter_values(
            &self.snapshot()?.chart_points,
            graph_name,
        ))
    }
}

pub(crate) fn outstanding_errors(records: &[TestResult]) -> Vec<TestResult> {
    let mut errors: Vec<TestResult> = records.iter().filter(|r| r.is_failure()).cloned().collect();
    errors.sort_by_key(|r| r.severity_level);
    errors
}

fn all_tests(records: &[TestResult]) -> Vec<TestResult> {
    let mut tests = records.to_vec();
    tests.sort_by(|a, b| {
        let key = |r: &TestResult| {
            (
                !r.is_graded(),
                r.severity_level,
                Reverse(r.status.clone()),
                r.table_name.clone(),
            )
        };
        key(a).cmp(&key(b))
    });
    tests
}

fn mart_tests(records: &[TestResult], mart: Mart, status: Option<&str>) -> Vec<TestResult> {
    let mut tests: Vec<TestResult> = records
        .iter()
        .filter(|r| r.affects(mart))
        .filter(|r| match status {
            Some(s) => r.status == s,
            None => !r.passed(),
        })
        .cloned()
        .collect();
    tests.sort_by_key(|r| (!r.is_graded(), r.severity_level));
    tests
}
