// dqi-core/src/domain/quality/normalize.rs
//
// Ingestion boundary. Every downstream aggregator consumes `TestResult`s built
// here, so severity parsing, flag decoding and key validation happen once.

use serde::Serialize;
use std::collections::HashSet;
use thiserror::Error;

use super::record::{RawTestResult, TestResult};
use super::severity::{RawField, parse_severity};

/// Why a row was left out of an import. Rejections are data, not errors:
/// the rest of the batch still goes through.
#[derive(Debug, Clone, PartialEq, Error, Serialize)]
#[serde(tag = "kind", content = "detail", rename_all = "snake_case")]
pub enum RejectionReason {
    #[error("missing required key '{0}'")]
    MissingKey(&'static str),

    #[error("duplicate unique_id '{0}' in batch")]
    DuplicateKey(String),

    #[error("severity level {0:?} is not an integer between 1 and 5")]
    UngradedSeverity(Option<String>),

    #[error("non-numeric value '{0}'")]
    InvalidValue(String),

    #[error("malformed row: {0}")]
    Malformed(String),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowRejection {
    /// 1-based data row (header excluded).
    pub row: usize,
    pub unique_id: Option<String>,
    pub reason: RejectionReason,
}

/// Rows as they came out of a file, numbered, plus the rows that could not even
/// be decoded into `T`.
#[derive(Debug, Clone)]
pub struct RawBatch<T> {
    pub rows: Vec<(usize, T)>,
    pub rejections: Vec<RowRejection>,
}

impl<T> RawBatch<T> {
    pub fn from_rows(rows: Vec<T>) -> Self {
        Self {
            rows: rows.into_iter().enumerate().map(|(i, r)| (i + 1, r)).collect(),
            rejections: Vec::new(),
        }
    }
}

impl<T> Default for RawBatch<T> {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            rejections: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ImportPolicy {
    /// Reject rows whose severity level is unusable instead of storing them ungraded.
    pub reject_ungraded: bool,
}

#[derive(Debug, Clone)]
pub struct NormalizedBatch<T> {
    pub records: Vec<T>,
    pub rejections: Vec<RowRejection>,
    /// Accepted records that will not take part in grading.
    pub ungraded: usize,
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub fn normalize_test_results(
    batch: RawBatch<RawTestResult>,
    policy: ImportPolicy,
) -> NormalizedBatch<TestResult> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut records = Vec::with_capacity(batch.rows.len());
    let mut rejections = batch.rejections;
    let mut ungraded = 0;

    for (row, raw) in batch.rows {
        match normalize_row(raw, &mut seen, policy) {
            Ok(record) => {
                if !record.is_graded() {
                    ungraded += 1;
                }
                records.push(record);
            }
            Err((unique_id, reason)) => rejections.push(RowRejection {
                row,
                unique_id,
                reason,
            }),
        }
    }

    rejections.sort_by_key(|r| r.row);
    NormalizedBatch {
        records,
        rejections,
        ungraded,
    }
}

fn normalize_row(
    raw: RawTestResult,
    seen: &mut HashSet<String>,
    policy: ImportPolicy,
) -> Result<TestResult, (Option<String>, RejectionReason)> {
    let unique_id = raw
        .unique_id
        .as_ref()
        .map(RawField::as_text)
        .and_then(|id| non_empty(Some(id)))
        .ok_or((None, RejectionReason::MissingKey("unique_id")))?;

    let Some(status) = non_empty(raw.status.clone()) else {
        return Err((Some(unique_id), RejectionReason::MissingKey("status")));
    };

    let severity_level = parse_severity(raw.severity_level.as_ref());
    if severity_level.is_none() && policy.reject_ungraded {
        let shown = raw.severity_level.as_ref().map(RawField::as_text);
        return Err((Some(unique_id), RejectionReason::UngradedSeverity(shown)));
    }

    if !seen.insert(unique_id.clone()) {
        return Err((Some(unique_id.clone()), RejectionReason::DuplicateKey(unique_id)));
    }

    let mart_flags = raw.mart_flags();
    Ok(TestResult {
        unique_id,
        database_name: non_empty(raw.database_name),
        schema_name: non_empty(raw.schema_name),
        table_name: non_empty(raw.table_name),
        column_name: non_empty(raw.test_column_name).or_else(|| non_empty(raw.column_name)),
        test_name: non_empty(raw.test_name),
        test_original_name: non_empty(raw.test_original_name),
        test_type: non_empty(raw.test_type),
        test_sub_type: non_empty(raw.test_sub_type),
        test_category: non_empty(raw.test_category),
        quality_dimension: non_empty(raw.quality_dimension),
        severity_level,
        severity: non_empty(raw.severity),
        status,
        description: non_empty(raw.test_description),
        results_description: non_empty(raw.test_results_description),
        results_query: non_empty(raw.test_results_query),
        result_rows: raw.failed_row_count.as_ref().map(RawField::as_text),
        mart_flags,
        generated_at: non_empty(raw.generated_at),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::quality::mart::Mart;
    use crate::domain::quality::severity::SeverityLevel;

    fn raw(id: Option<&str>, status: Option<&str>, severity: Option<RawField>) -> RawTestResult {
        RawTestResult {
            unique_id: id.map(|s| RawField::Text(s.to_string())),
            status: status.map(str::to_string),
            severity_level: severity,
            ..Default::default()
        }
    }

    #[test]
    fn test_valid_rows_are_normalized() {
        let mut row = raw(Some("t1"), Some("fail"), Some(RawField::Text("2.0".into())));
        row.flag_ccsr = Some(RawField::Int(1));
        row.test_column_name = Some(" ".into());
        row.column_name = Some("claim_id".into());
        row.failed_row_count = Some(RawField::Int(12));

        let batch = normalize_test_results(RawBatch::from_rows(vec![row]), ImportPolicy::default());
        assert!(batch.rejections.is_empty());
        assert_eq!(batch.ungraded, 0);
        let record = &batch.records[0];
        assert_eq!(record.severity_level, Some(SeverityLevel::High));
        assert!(record.affects(Mart::Ccsr));
        assert_eq!(record.column_name.as_deref(), Some("claim_id"));
        assert_eq!(record.result_rows.as_deref(), Some("12"));
    }

    #[test]
    fn test_partial_acceptance() {
        let rows = vec![
            raw(Some("a"), Some("pass"), Some(RawField::Int(3))),
            raw(None, Some("fail"), Some(RawField::Int(1))),
            raw(Some("b"), None, Some(RawField::Int(1))),
            raw(Some("a"), Some("fail"), Some(RawField::Int(1))),
            raw(Some("c"), Some("fail"), Some(RawField::Text("n/a".into()))),
        ];
        let batch = normalize_test_results(RawBatch::from_rows(rows), ImportPolicy::default());

        let ids: Vec<&str> = batch.records.iter().map(|r| r.unique_id.as_str()).collect();
        assert_eq!(ids, vec!["a", "c"]);
        assert_eq!(batch.ungraded, 1);
        assert_eq!(
            batch.rejections,
            vec![
                RowRejection {
                    row: 2,
                    unique_id: None,
                    reason: RejectionReason::MissingKey("unique_id"),
                },
                RowRejection {
                    row: 3,
                    unique_id: Some("b".into()),
                    reason: RejectionReason::MissingKey("status"),
                },
                RowRejection {
                    row: 4,
                    unique_id: Some("a".into()),
                    reason: RejectionReason::DuplicateKey("a".into()),
                },
            ]
        );
    }

    #[test]
    fn test_strict_policy_rejects_ungraded() {
        let rows = vec![
            raw(Some("a"), Some("fail"), Some(RawField::Int(7))),
            raw(Some("b"), Some("fail"), None),
            raw(Some("c"), Some("fail"), Some(RawField::Int(5))),
        ];
        let policy = ImportPolicy {
            reject_ungraded: true,
        };
        let batch = normalize_test_results(RawBatch::from_rows(rows), policy);
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.ungraded, 0);
        assert_eq!(
            batch.rejections[0].reason,
            RejectionReason::UngradedSeverity(Some("7".into()))
        );
        assert_eq!(batch.rejections[1].reason, RejectionReason::UngradedSeverity(None));
    }

    #[test]
    fn test_decode_rejections_are_kept_in_row_order() {
        let mut input = RawBatch::from_rows(vec![
            raw(Some("a"), Some("pass"), Some(RawField::Int(1))),
        ]);
        input.rows[0].0 = 2;
        input.rejections.push(RowRejection {
            row: 1,
            unique_id: None,
            reason: RejectionReason::Malformed("invalid type".into()),
        });
        let batch = normalize_test_results(input, ImportPolicy::default());
        assert_eq!(batch.records.len(), 1);
        assert_eq!(batch.rejections.len(), 1);
        assert_eq!(batch.rejections[0].row, 1);
    }
}
