// dqi/src/commands/report.rs
//
// USE CASE: Report card, written to disk and echoed on stdout.

use comfy_table::Cell;
use std::path::PathBuf;

use crate::cli::ReportFormat;

use super::{Workspace, or_dash, table};

pub fn execute(
    ws: &Workspace,
    output: Option<PathBuf>,
    format: ReportFormat,
    top: usize,
) -> anyhow::Result<()> {
    let output = output.unwrap_or_else(|| ws.project_dir.join(&ws.config.report.output_path));
    let card = ws.engine.write_report_card(&output, top)?;

    match format {
        ReportFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&card)?);
        }
        ReportFormat::Table => {
            println!("Grade: {} - {}", card.grade, card.grade_description);
            println!(
                "Tests: {} completed, {} passing, {} failing, {} ungraded",
                card.totals.tests_completed,
                card.totals.passing,
                card.totals.failing,
                card.totals.ungraded
            );
            println!("Last test run: {}", card.last_test_run);

            let mut marts = table(&["Mart", "Status"]);
            for row in &card.mart_summary {
                marts.add_row(vec![Cell::new(row.display_name), Cell::new(row.status_label)]);
            }
            println!("\n{marts}");

            if !card.top_errors.is_empty() {
                let mut errors = table(&["Severity", "Table", "Column", "Unique ID"]);
                for e in &card.top_errors {
                    errors.add_row(vec![
                        or_dash(e.severity_level.map(|s| s.level().to_string()).as_deref()),
                        or_dash(e.table_name.as_deref()),
                        or_dash(e.column_name.as_deref()),
                        Cell::new(&e.unique_id),
                    ]);
                }
                println!("\n{errors}");
            }
        }
    }
    eprintln!("Report card written to {}", output.display());
    Ok(())
}
