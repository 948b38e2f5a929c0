// dqi-core/src/infrastructure/loader.rs

// Turns an uploaded export (.csv or .json) into numbered raw rows. CSV parsing
// is delegated to DuckDB's `read_csv`, read back as text so that cell typing
// stays in the domain (`RawField`).

use duckdb::Connection;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};
use std::collections::BTreeSet;
use std::fs;
use std::path::Path;
use tracing::{debug, info, instrument};

use crate::domain::chart::RawChartPoint;
use crate::domain::quality::{RawBatch, RawTestResult, RejectionReason, RowRejection};
use crate::infrastructure::error::InfrastructureError;

type RawRow = Map<String, Value>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DatasetKind {
    TestResults,
    ChartData,
}

impl DatasetKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::TestResults => "test_results",
            Self::ChartData => "chart_data",
        }
    }

    /// `UNIQUE_ID` wins over the chart columns when both are present.
    pub fn detect<'a, I>(columns: I) -> Option<Self>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let columns: BTreeSet<&str> = columns.into_iter().collect();
        if columns.contains("UNIQUE_ID") {
            Some(Self::TestResults)
        } else if columns.contains("DATA_QUALITY_CATEGORY") && columns.contains("GRAPH_NAME") {
            Some(Self::ChartData)
        } else {
            None
        }
    }
}

#[derive(Debug)]
pub enum LoadedDataset {
    TestResults(RawBatch<RawTestResult>),
    ChartData(RawBatch<RawChartPoint>),
}

impl LoadedDataset {
    pub fn kind(&self) -> DatasetKind {
        match self {
            Self::TestResults(_) => DatasetKind::TestResults,
            Self::ChartData(_) => DatasetKind::ChartData,
        }
    }
}

#[instrument]
pub fn load_file(path: &Path) -> Result<LoadedDataset, InfrastructureError> {
    let extension = path
        .extension()
        .and_then(|e| e.to_str())
        .map(str::to_lowercase);

    let (columns, rows) = match extension.as_deref() {
        Some("csv") => read_csv(path)?,
        Some("json") => read_json(path)?,
        _ => {
            return Err(InfrastructureError::UnsupportedFile(
                path.display().to_string(),
            ));
        }
    };

    let kind = DatasetKind::detect(columns.iter().map(String::as_str))
        .ok_or_else(|| InfrastructureError::UnrecognizedDataset(path.display().to_string()))?;
    info!(kind = kind.as_str(), rows = rows.len(), "Dataset detected");

    Ok(match kind {
        DatasetKind::TestResults => LoadedDataset::TestResults(decode_rows(rows)),
        DatasetKind::ChartData => LoadedDataset::ChartData(decode_rows(rows)),
    })
}

fn header_key(name: &str) -> String {
    name.trim().to_uppercase()
}

fn read_csv(path: &Path) -> Result<(Vec<String>, Vec<Option<RawRow>>), InfrastructureError> {
    if !path.is_file() {
        return Err(InfrastructureError::Io(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("{} does not exist", path.display()),
        )));
    }

    let conn = Connection::open_in_memory()?;
    let escaped = path.display().to_string().replace('\'', "''");
    let source = format!("read_csv('{escaped}', header = true, all_varchar = true)");

    let mut stmt = conn.prepare(&format!("DESCRIBE SELECT * FROM {source}"))?;
    let raw_columns = stmt
        .query_map([], |row| row.get::<_, String>(0))?
        .collect::<Result<Vec<_>, _>>()?;
    let columns: Vec<String> = raw_columns.iter().map(|c| header_key(c)).collect();
    debug!(?columns, "CSV header");

    let mut stmt = conn.prepare(&format!("SELECT * FROM {source}"))?;
    let mut result = stmt.query([])?;
    let mut rows = Vec::new();
    while let Some(row) = result.next()? {
        let mut object = Map::with_capacity(columns.len());
        for (i, column) in columns.iter().enumerate() {
            let cell: Option<String> = row.get(i)?;
            object.insert(column.clone(), cell.map(Value::String).unwrap_or(Value::Null));
        }
        rows.push(Some(object));
    }

    Ok((columns, rows))
}

fn read_json(path: &Path) -> Result<(Vec<String>, Vec<Option<RawRow>>), InfrastructureError> {
    let content = fs::read_to_string(path)?;
    let items: Vec<Value> = serde_json::from_str(&content)?;

    let mut columns = BTreeSet::new();
    let rows = items
        .into_iter()
        .map(|item| match item {
            Value::Object(object) => {
                let object: RawRow = object
                    .into_iter()
                    .map(|(k, v)| (header_key(&k), v))
                    .collect();
                columns.extend(object.keys().cloned());
                Some(object)
            }
            _ => None,
        })
        .collect();

    Ok((columns.into_iter().collect(), rows))
}

/// Rows that do not fit `T` (wrong JSON types, non-objects) become
/// `Malformed` rejections; the rest keep their 1-based position.
fn decode_rows<T: DeserializeOwned>(rows: Vec<Option<RawRow>>) -> RawBatch<T> {
    let mut batch = RawBatch::default();
    for (index, row) in rows.into_iter().enumerate() {
        let position = index + 1;
        let Some(object) = row else {
            batch.rejections.push(RowRejection {
                row: position,
                unique_id: None,
                reason: RejectionReason::Malformed("row is not an object".into()),
            });
            continue;
        };
        let unique_id = object
            .get("UNIQUE_ID")
            .and_then(Value::as_str)
            .map(str::to_string);
        match serde_json::from_value::<T>(Value::Object(object)) {
            Ok(decoded) => batch.rows.push((position, decoded)),
            Err(e) => batch.rejections.push(RowRejection {
                row: position,
                unique_id,
                reason: RejectionReason::Malformed(e.to_string()),
            }),
        }
    }
    batch
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::domain::quality::RawField;
    use anyhow::Result;
    use tempfile::tempdir;

    #[test]
    fn test_csv_test_results() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("results.csv");
        fs::write(
            &path,
            "unique_id,Status,SEVERITY_LEVEL,FLAG_CCSR,table_name\n\
             t1,pass,1,1,medical_claim\n\
             t2,fail,2.0,0,\n",
        )?;

        let LoadedDataset::TestResults(batch) = load_file(&path)? else {
            anyhow::bail!("expected test results");
        };
        assert!(batch.rejections.is_empty());
        assert_eq!(batch.rows.len(), 2);
        let (row, first) = &batch.rows[0];
        assert_eq!(*row, 1);
        assert_eq!(first.unique_id, Some(RawField::Text("t1".into())));
        assert_eq!(first.table_name.as_deref(), Some("medical_claim"));
        let (_, second) = &batch.rows[1];
        assert_eq!(second.severity_level, Some(RawField::Text("2.0".into())));
        assert_eq!(second.table_name, None);
        Ok(())
    }

    #[test]
    fn test_json_chart_data_with_malformed_row() -> Result<()> {
        let dir = tempdir()?;
        let path = dir.path().join("charts.JSON");
        fs::write(
            &path,
            r#"[
                {"data_quality_category": "Claims", "graph_name": "paid_vs_end_date", "value": 12.5},
                "not an object",
                {"DATA_QUALITY_CATEGORY": "Claims", "GRAPH_NAME": ["x"], "VALUE": 1}
            ]"#,
        )?;

        let dataset = load_file(&path)?;
        assert_eq!(dataset.kind(), DatasetKind::ChartData);
        let LoadedDataset::ChartData(batch) = dataset else {
            anyhow::bail!("expected chart data");
        };
        assert_eq!(batch.rows.len(), 1);
        assert_eq!(batch.rows[0].1.value, Some(RawField::Float(12.5)));
        let rows: Vec<usize> = batch.rejections.iter().map(|r| r.row).collect();
        assert_eq!(rows, vec![2, 3]);
        Ok(())
    }

    #[test]
    fn test_unsupported_and_unrecognized_files() -> Result<()> {
        let dir = tempdir()?;
        let txt = dir.path().join("results.txt");
        fs::write(&txt, "UNIQUE_ID\n")?;
        assert!(matches!(
            load_file(&txt),
            Err(InfrastructureError::UnsupportedFile(_))
        ));

        let csv = dir.path().join("other.csv");
        fs::write(&csv, "a,b\n1,2\n")?;
        assert!(matches!(
            load_file(&csv),
            Err(InfrastructureError::UnrecognizedDataset(_))
        ));

        let missing = dir.path().join("missing.csv");
        assert!(matches!(load_file(&missing), Err(InfrastructureError::Io(_))));
        Ok(())
    }

    #[test]
    fn test_detect_prefers_test_results() {
        assert_eq!(
            DatasetKind::detect(["GRAPH_NAME", "DATA_QUALITY_CATEGORY", "UNIQUE_ID"]),
            Some(DatasetKind::TestResults)
        );
        assert_eq!(DatasetKind::detect(["GRAPH_NAME"]), None);
    }
}
