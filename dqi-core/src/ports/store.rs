// dqi-core/src/ports/store.rs

// What the engine needs from storage, without knowing where the rows live.
// Adapters: in-memory (tests, one-shot CLI runs) and DuckDB (persistent).

use std::sync::Arc;

use crate::domain::Snapshot;
use crate::domain::chart::ChartSeriesPoint;
use crate::domain::quality::TestResult;
use crate::error::DqiError;

pub trait RecordStore: Send + Sync {
    /// Consistent view of both tables. Never a mix of two imports.
    fn load_snapshot(&self) -> Result<Arc<Snapshot>, DqiError>;

    /// Swap the whole test-results table. Readers see either the old rows or
    /// the new ones.
    fn replace_test_results(&self, records: Vec<TestResult>) -> Result<(), DqiError>;

    fn replace_chart_points(&self, points: Vec<ChartSeriesPoint>) -> Result<(), DqiError>;

    fn get_all_records(&self) -> Result<Vec<TestResult>, DqiError> {
        Ok(self.load_snapshot()?.test_results.clone())
    }
}
