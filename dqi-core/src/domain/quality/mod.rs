// dqi-core/src/domain/quality/mod.rs

pub mod grade;
pub mod mart;
pub mod mart_status;
pub mod normalize;
pub mod record;
pub mod severity;
pub mod summary;
pub mod timestamp;

// Re-exports
pub use grade::{Grade, compute_grade};
pub use mart::{Mart, MartFlags};
pub use mart_status::{MartStatus, MartSummaryRow, MartTally, compute_mart_statuses, mart_test_summary};
pub use normalize::{
    ImportPolicy, NormalizedBatch, RawBatch, RejectionReason, RowRejection, normalize_test_results,
};
pub use record::{PASS_STATUS, RawTestResult, TestResult};
pub use severity::{RawField, SeverityLevel, parse_severity};
pub use summary::{GroupKey, GroupSummary, passing_percentage, summarize_by};
pub use timestamp::{NO_DATA_LABEL, last_run_time};
