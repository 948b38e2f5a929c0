// dqi-core/src/application/import.rs

use serde::Serialize;
use std::path::Path;
use tracing::{info, instrument, warn};

use crate::domain::chart::{RawChartPoint, normalize_chart_points};
use crate::domain::quality::{
    ImportPolicy, NormalizedBatch, RawBatch, RawTestResult, RowRejection, normalize_test_results,
};
use crate::error::DqiError;
use crate::infrastructure::loader::{DatasetKind, LoadedDataset, load_file};
use crate::ports::store::RecordStore;

#[derive(Debug, Clone, Serialize)]
pub struct ImportResult {
    pub kind: &'static str,
    pub accepted_count: usize,
    pub rejected_count: usize,
    /// Accepted rows stored without a usable severity level.
    pub ungraded_count: usize,
    pub rejections: Vec<RowRejection>,
}

impl ImportResult {
    fn from_batch<T>(kind: DatasetKind, batch: &NormalizedBatch<T>) -> Self {
        Self {
            kind: kind.as_str(),
            accepted_count: batch.records.len(),
            rejected_count: batch.rejections.len(),
            ungraded_count: batch.ungraded,
            rejections: batch.rejections.clone(),
        }
    }

    /// One-line account of what was left out, e.g.
    /// `2 rows rejected (1 missing key, 1 duplicate); 3 ungraded`.
    pub fn reason(&self) -> String {
        let mut parts = Vec::new();
        if self.rejected_count > 0 {
            let mut kinds: Vec<(&str, usize)> = Vec::new();
            for rejection in &self.rejections {
                let label = rejection_label(rejection);
                match kinds.iter_mut().find(|(k, _)| *k == label) {
                    Some((_, n)) => *n += 1,
                    None => kinds.push((label, 1)),
                }
            }
            let detail: Vec<String> = kinds.iter().map(|(k, n)| format!("{n} {k}")).collect();
            parts.push(format!(
                "{} rows rejected ({})",
                self.rejected_count,
                detail.join(", ")
            ));
        }
        if self.ungraded_count > 0 {
            parts.push(format!("{} ungraded", self.ungraded_count));
        }
        if parts.is_empty() {
            "all rows accepted".to_string()
        } else {
            parts.join("; ")
        }
    }

    pub fn is_empty(&self) -> bool {
        self.accepted_count == 0
    }
}

fn rejection_label(rejection: &RowRejection) -> &'static str {
    use crate::domain::quality::RejectionReason::*;
    match rejection.reason {
        MissingKey(_) => "missing key",
        DuplicateKey(_) => "duplicate",
        UngradedSeverity(_) => "ungraded severity",
        InvalidValue(_) => "invalid value",
        Malformed(_) => "malformed",
    }
}

/// Normalize the batch and swap it in as the whole test-results table.
/// Rejected rows are reported, the rest is stored.
#[instrument(skip(store, batch), fields(rows = batch.rows.len()))]
pub fn replace_snapshot(
    store: &dyn RecordStore,
    batch: RawBatch<RawTestResult>,
    policy: ImportPolicy,
) -> Result<ImportResult, DqiError> {
    let normalized = normalize_test_results(batch, policy);
    let result = ImportResult::from_batch(DatasetKind::TestResults, &normalized);
    store.replace_test_results(normalized.records)?;
    log_result(&result);
    Ok(result)
}

#[instrument(skip(store, batch), fields(rows = batch.rows.len()))]
pub fn replace_chart_points(
    store: &dyn RecordStore,
    batch: RawBatch<RawChartPoint>,
) -> Result<ImportResult, DqiError> {
    let normalized = normalize_chart_points(batch);
    let result = ImportResult::from_batch(DatasetKind::ChartData, &normalized);
    store.replace_chart_points(normalized.records)?;
    log_result(&result);
    Ok(result)
}

/// Load an export from disk and replace whichever table it belongs to.
pub fn import_file(
    store: &dyn RecordStore,
    path: &Path,
    policy: ImportPolicy,
) -> Result<ImportResult, DqiError> {
    match load_file(path)? {
        LoadedDataset::TestResults(batch) => replace_snapshot(store, batch, policy),
        LoadedDataset::ChartData(batch) => replace_chart_points(store, batch),
    }
}

fn log_result(result: &ImportResult) {
    info!(
        kind = result.kind,
        accepted = result.accepted_count,
        rejected = result.rejected_count,
        ungraded = result.ungraded_count,
        "Import complete"
    );
    if result.ungraded_count > 0 {
        warn!(
            ungraded = result.ungraded_count,
            "Some records have no usable severity level and will not be graded"
        );
    }
}
