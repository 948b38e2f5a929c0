// dqi/src/commands/mod.rs

pub mod charts;
pub mod errors;
pub mod grade;
pub mod import;
pub mod marts;
pub mod report;
pub mod status;
pub mod summary;
pub mod tests;

use comfy_table::presets::ASCII_MARKDOWN;
use comfy_table::{Cell, Table};
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tracing::debug;

use dqi_core::application::QualityEngine;
use dqi_core::domain::quality::TestResult;
use dqi_core::infrastructure::DuckDBStore;
use dqi_core::infrastructure::config::{DqiConfig, load_config_or_default};

/// What every command needs: the resolved configuration and an engine
/// wired to the project's DuckDB file.
pub struct Workspace {
    pub project_dir: PathBuf,
    pub config: DqiConfig,
    pub engine: QualityEngine,
}

impl Workspace {
    pub fn open(project_dir: &Path, db_path: Option<&Path>) -> anyhow::Result<Self> {
        let config = load_config_or_default(project_dir)?;
        let db_path = match db_path {
            Some(p) => p.to_path_buf(),
            None => project_dir.join(&config.database_path),
        };
        debug!(db = %db_path.display(), "Opening record store");

        let store = DuckDBStore::open(&db_path.to_string_lossy())?;
        Ok(Self {
            project_dir: project_dir.to_path_buf(),
            config,
            engine: QualityEngine::new(Arc::new(store)),
        })
    }
}

pub(crate) fn table(header: &[&str]) -> Table {
    let mut table = Table::new();
    table.load_preset(ASCII_MARKDOWN).set_header(header.to_vec());
    table
}

pub(crate) fn or_dash(value: Option<&str>) -> Cell {
    Cell::new(value.unwrap_or("-"))
}

/// Listing of test results shared by `errors` and `tests`.
pub(crate) fn test_table(records: &[TestResult]) -> Table {
    let mut table = table(&["Severity", "Status", "Table", "Column", "Test", "Rows", "Unique ID"]);
    for r in records {
        table.add_row(vec![
            Cell::new(
                r.severity_level
                    .map(|s| format!("{} ({})", s.level(), s.as_str()))
                    .unwrap_or_else(|| "ungraded".to_string()),
            ),
            Cell::new(&r.status),
            or_dash(r.table_name.as_deref()),
            or_dash(r.column_name.as_deref()),
            or_dash(r.test_name.as_deref().or(r.test_original_name.as_deref())),
            or_dash(r.result_rows.as_deref()),
            Cell::new(&r.unique_id),
        ]);
    }
    table
}

/// Prints at most `limit` rows, then how many were left out.
pub(crate) fn print_tests(records: &[TestResult], limit: usize, empty: &str) {
    if records.is_empty() {
        println!("{empty}");
        return;
    }
    let shown = &records[..records.len().min(limit)];
    println!("{}", test_table(shown));
    if records.len() > shown.len() {
        println!("... {} more (use --limit)", records.len() - shown.len());
    }
}
