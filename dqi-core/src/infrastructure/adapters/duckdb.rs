// dqi-core/src/infrastructure/adapters/duckdb.rs

use duckdb::{Config, Connection, Row, ToSql, params};
use std::path::Path;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::{debug, instrument};

// Imports Hexagonaux
use crate::domain::Snapshot;
use crate::domain::chart::ChartSeriesPoint;
use crate::domain::quality::{Mart, MartFlags, SeverityLevel, TestResult};
use crate::error::DqiError;
use crate::infrastructure::error::InfrastructureError;
use crate::ports::store::RecordStore;

const TEST_RESULTS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS test_results (
    UNIQUE_ID VARCHAR PRIMARY KEY,
    DATABASE_NAME VARCHAR,
    SCHEMA_NAME VARCHAR,
    TABLE_NAME VARCHAR,
    COLUMN_NAME VARCHAR,
    TEST_NAME VARCHAR,
    TEST_ORIGINAL_NAME VARCHAR,
    TEST_TYPE VARCHAR,
    TEST_SUB_TYPE VARCHAR,
    TEST_CATEGORY VARCHAR,
    QUALITY_DIMENSION VARCHAR,
    SEVERITY_LEVEL BIGINT,
    SEVERITY VARCHAR,
    STATUS VARCHAR NOT NULL,
    TEST_DESCRIPTION VARCHAR,
    TEST_RESULTS_DESCRIPTION VARCHAR,
    TEST_RESULTS_QUERY VARCHAR,
    RESULT_ROWS VARCHAR,
    FLAG_SERVICE_CATEGORIES BOOLEAN NOT NULL DEFAULT FALSE,
    FLAG_CCSR BOOLEAN NOT NULL DEFAULT FALSE,
    FLAG_CMS_CHRONIC_CONDITIONS BOOLEAN NOT NULL DEFAULT FALSE,
    FLAG_TUVA_CHRONIC_CONDITIONS BOOLEAN NOT NULL DEFAULT FALSE,
    FLAG_CMS_HCCS BOOLEAN NOT NULL DEFAULT FALSE,
    FLAG_ED_CLASSIFICATION BOOLEAN NOT NULL DEFAULT FALSE,
    FLAG_FINANCIAL_PMPM BOOLEAN NOT NULL DEFAULT FALSE,
    FLAG_QUALITY_MEASURES BOOLEAN NOT NULL DEFAULT FALSE,
    FLAG_READMISSION BOOLEAN NOT NULL DEFAULT FALSE,
    GENERATED_AT VARCHAR
);
"#;

const CHART_DATA_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS chart_data (
    DATA_QUALITY_CATEGORY VARCHAR,
    GRAPH_NAME VARCHAR NOT NULL,
    LEVEL_OF_DETAIL VARCHAR,
    Y_AXIS_DESCRIPTION VARCHAR,
    X_AXIS_DESCRIPTION VARCHAR,
    FILTER_DESCRIPTION VARCHAR,
    SUM_DESCRIPTION VARCHAR,
    Y_AXIS VARCHAR,
    X_AXIS VARCHAR,
    CHART_FILTER VARCHAR,
    VALUE DOUBLE
);
"#;

// Column order shared by INSERT and SELECT. Flags follow `Mart::ALL`.
const TEST_RESULT_COLUMNS: &str = "UNIQUE_ID, DATABASE_NAME, SCHEMA_NAME, TABLE_NAME, COLUMN_NAME, \
    TEST_NAME, TEST_ORIGINAL_NAME, TEST_TYPE, TEST_SUB_TYPE, TEST_CATEGORY, QUALITY_DIMENSION, \
    SEVERITY_LEVEL, SEVERITY, STATUS, TEST_DESCRIPTION, TEST_RESULTS_DESCRIPTION, TEST_RESULTS_QUERY, \
    RESULT_ROWS, FLAG_SERVICE_CATEGORIES, FLAG_CCSR, FLAG_CMS_CHRONIC_CONDITIONS, \
    FLAG_TUVA_CHRONIC_CONDITIONS, FLAG_CMS_HCCS, FLAG_ED_CLASSIFICATION, FLAG_FINANCIAL_PMPM, \
    FLAG_QUALITY_MEASURES, FLAG_READMISSION, GENERATED_AT";
const TEST_RESULT_ARITY: usize = 28;
const FIRST_FLAG: usize = 18;

const CHART_COLUMNS: &str = "DATA_QUALITY_CATEGORY, GRAPH_NAME, LEVEL_OF_DETAIL, Y_AXIS_DESCRIPTION, \
    X_AXIS_DESCRIPTION, FILTER_DESCRIPTION, SUM_DESCRIPTION, Y_AXIS, X_AXIS, CHART_FILTER, VALUE";

/// Persistent store backed by a DuckDB file. Each replace runs in one
/// transaction, so a reader either sees the previous import or the new one.
pub struct DuckDBStore {
    conn: Arc<Mutex<Connection>>,
}

impl DuckDBStore {
    pub fn open(db_path: &str) -> Result<Self, InfrastructureError> {
        let config = Config::default();

        let conn = if db_path == ":memory:" {
            Connection::open_in_memory_with_flags(config)?
        } else {
            if let Some(parent) = Path::new(db_path).parent() {
                if !parent.as_os_str().is_empty() {
                    std::fs::create_dir_all(parent)?;
                }
            }
            Connection::open_with_flags(db_path, config)?
        };
        conn.execute_batch(TEST_RESULTS_TABLE)?;
        conn.execute_batch(CHART_DATA_TABLE)?;

        Ok(Self {
            conn: Arc::new(Mutex::new(conn)),
        })
    }

    pub fn in_memory() -> Result<Self, InfrastructureError> {
        Self::open(":memory:")
    }

    fn lock(&self) -> Result<MutexGuard<'_, Connection>, DqiError> {
        self.conn.lock().map_err(|_| {
            DqiError::Infrastructure(InfrastructureError::StoreUnavailable(
                "DuckDB Mutex Poisoned".into(),
            ))
        })
    }
}

fn test_result_from_row(row: &Row<'_>) -> duckdb::Result<TestResult> {
    let mut mart_flags = MartFlags::none();
    for (offset, mart) in Mart::ALL.into_iter().enumerate() {
        let flagged: Option<bool> = row.get(FIRST_FLAG + offset)?;
        mart_flags.set(mart, flagged.unwrap_or(false));
    }
    let severity_level: Option<i64> = row.get(11)?;

    Ok(TestResult {
        unique_id: row.get(0)?,
        database_name: row.get(1)?,
        schema_name: row.get(2)?,
        table_name: row.get(3)?,
        column_name: row.get(4)?,
        test_name: row.get(5)?,
        test_original_name: row.get(6)?,
        test_type: row.get(7)?,
        test_sub_type: row.get(8)?,
        test_category: row.get(9)?,
        quality_dimension: row.get(10)?,
        severity_level: severity_level.and_then(SeverityLevel::from_level),
        severity: row.get(12)?,
        status: row.get(13)?,
        description: row.get(14)?,
        results_description: row.get(15)?,
        results_query: row.get(16)?,
        result_rows: row.get(17)?,
        mart_flags,
        generated_at: row.get(FIRST_FLAG + Mart::COUNT)?,
    })
}

fn chart_point_from_row(row: &Row<'_>) -> duckdb::Result<ChartSeriesPoint> {
    Ok(ChartSeriesPoint {
        data_quality_category: row.get(0)?,
        graph_name: row.get(1)?,
        level_of_detail: row.get(2)?,
        y_axis_description: row.get(3)?,
        x_axis_description: row.get(4)?,
        filter_description: row.get(5)?,
        sum_description: row.get(6)?,
        y_axis: row.get(7)?,
        x_axis: row.get(8)?,
        chart_filter: row.get(9)?,
        value: row.get(10)?,
    })
}

impl RecordStore for DuckDBStore {
    #[instrument(skip(self))]
    fn load_snapshot(&self) -> Result<Arc<Snapshot>, DqiError> {
        let conn = self.lock()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {TEST_RESULT_COLUMNS} FROM test_results ORDER BY UNIQUE_ID"
        ))?;
        let test_results = stmt
            .query_map([], test_result_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        let mut stmt = conn.prepare(&format!(
            "SELECT {CHART_COLUMNS} FROM chart_data ORDER BY GRAPH_NAME, X_AXIS, CHART_FILTER"
        ))?;
        let chart_points = stmt
            .query_map([], chart_point_from_row)?
            .collect::<Result<Vec<_>, _>>()?;

        debug!(
            test_results = test_results.len(),
            chart_points = chart_points.len(),
            "Snapshot loaded"
        );
        Ok(Arc::new(Snapshot::new(test_results, chart_points)))
    }

    #[instrument(skip(self, records), fields(rows = records.len()))]
    fn replace_test_results(&self, records: Vec<TestResult>) -> Result<(), DqiError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        // DELETE puis INSERT des mêmes UNIQUE_ID dans une transaction bute sur
        // la contrainte PRIMARY KEY de DuckDB : on recrée la table à la place.
        tx.execute_batch("DROP TABLE IF EXISTS test_results")?;
        tx.execute_batch(TEST_RESULTS_TABLE)?;
        {
            let placeholders = vec!["?"; TEST_RESULT_ARITY].join(", ");
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO test_results ({TEST_RESULT_COLUMNS}) VALUES ({placeholders})"
            ))?;
            for record in &records {
                let severity_level = record.severity_level.map(|s| i64::from(s.level()));
                let flags: Vec<bool> = Mart::ALL
                    .into_iter()
                    .map(|m| record.mart_flags.get(m))
                    .collect();

                let mut values: Vec<&dyn ToSql> = vec![
                    &record.unique_id,
                    &record.database_name,
                    &record.schema_name,
                    &record.table_name,
                    &record.column_name,
                    &record.test_name,
                    &record.test_original_name,
                    &record.test_type,
                    &record.test_sub_type,
                    &record.test_category,
                    &record.quality_dimension,
                    &severity_level,
                    &record.severity,
                    &record.status,
                    &record.description,
                    &record.results_description,
                    &record.results_query,
                    &record.result_rows,
                ];
                values.extend(flags.iter().map(|f| f as &dyn ToSql));
                values.push(&record.generated_at);

                stmt.execute(values.as_slice())?;
            }
        }
        tx.commit()?;
        Ok(())
    }

    #[instrument(skip(self, points), fields(rows = points.len()))]
    fn replace_chart_points(&self, points: Vec<ChartSeriesPoint>) -> Result<(), DqiError> {
        let mut conn = self.lock()?;
        let tx = conn.transaction()?;
        tx.execute("DELETE FROM chart_data", [])?;
        {
            let mut stmt = tx.prepare(&format!(
                "INSERT INTO chart_data ({CHART_COLUMNS}) VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)"
            ))?;
            for p in &points {
                stmt.execute(params![
                    p.data_quality_category,
                    p.graph_name,
                    p.level_of_detail,
                    p.y_axis_description,
                    p.x_axis_description,
                    p.filter_description,
                    p.sum_description,
                    p.y_axis,
                    p.x_axis,
                    p.chart_filter,
                    p.value,
                ])?;
            }
        }
        tx.commit()?;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;
    use anyhow::Result;
    use tempfile::tempdir;

    fn sample() -> TestResult {
        let mut record = TestResult::new("test.tuva.not_null_claim_id", "fail")
            .with_severity(SeverityLevel::High)
            .with_marts(&[Mart::Ccsr, Mart::Readmission]);
        record.table_name = Some("medical_claim".into());
        record.test_category = Some("completeness".into());
        record.result_rows = Some("12".into());
        record.generated_at = Some("2025-03-05 20:24:04".into());
        record
    }

    #[test]
    fn test_duckdb_flow() -> Result<()> {
        let store = DuckDBStore::in_memory()?;
        assert!(store.load_snapshot()?.is_empty());

        store.replace_test_results(vec![sample(), TestResult::new("a.ungraded", "pass")])?;
        let records = store.get_all_records()?;
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].unique_id, "a.ungraded");
        assert_eq!(records[0].severity_level, None);
        assert_eq!(records[1], sample());
        Ok(())
    }

    #[test]
    fn test_replace_discards_previous_rows() -> Result<()> {
        let store = DuckDBStore::in_memory()?;
        store.replace_test_results(vec![sample()])?;
        store.replace_test_results(vec![TestResult::new("other", "pass")])?;

        let records = store.get_all_records()?;
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].unique_id, "other");
        Ok(())
    }

    #[test]
    fn test_reimporting_same_ids_is_idempotent() -> Result<()> {
        let store = DuckDBStore::in_memory()?;
        let batch = vec![sample(), TestResult::new("a.ungraded", "pass")];
        store.replace_test_results(batch.clone())?;
        let first = store.get_all_records()?;

        store.replace_test_results(batch)?;
        assert_eq!(store.get_all_records()?, first);
        assert_eq!(first.len(), 2);
        Ok(())
    }

    #[test]
    fn test_reimporting_same_ids_after_reopen() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("dqi.duckdb");
        let path = path.to_str().expect("utf-8 temp path");
        {
            let store = DuckDBStore::open(path)?;
            store.replace_test_results(vec![sample()])?;
        }
        let store = DuckDBStore::open(path)?;
        store.replace_test_results(vec![sample()])?;
        store.replace_test_results(vec![sample()])?;
        assert_eq!(store.get_all_records()?, vec![sample()]);
        Ok(())
    }

    #[test]
    fn test_chart_points_are_independent_of_test_results() -> Result<()> {
        let store = DuckDBStore::in_memory()?;
        store.replace_test_results(vec![sample()])?;
        store.replace_chart_points(vec![ChartSeriesPoint {
            data_quality_category: Some("Claims".into()),
            graph_name: "paid_vs_end_date".into(),
            x_axis: Some("2017-01-01".into()),
            value: Some(1250.5),
            ..Default::default()
        }])?;

        let snapshot = store.load_snapshot()?;
        assert_eq!(snapshot.test_results.len(), 1);
        assert_eq!(snapshot.chart_points.len(), 1);
        assert_eq!(snapshot.chart_points[0].value, Some(1250.5));
        Ok(())
    }

    #[test]
    fn test_data_survives_reopen() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("nested").join("dqi.duckdb");
        let path = path.to_str().expect("utf-8 temp path");
        {
            let store = DuckDBStore::open(path)?;
            store.replace_test_results(vec![sample()])?;
        }
        let store = DuckDBStore::open(path)?;
        assert_eq!(store.get_all_records()?, vec![sample()]);
        Ok(())
    }
}
