// dqi/src/commands/marts.rs
//
// USE CASE: Data mart usability, as badges or as the full reporting table.

use comfy_table::Cell;

use super::{Workspace, table};

pub fn execute(ws: &Workspace, summary: bool) -> anyhow::Result<()> {
    let rows = ws.engine.get_mart_test_summary()?;

    let mut out = if summary {
        table(&[
            "Mart", "Tests", "Passing", "Pass %", "Sev 1", "Sev 2", "Sev 3", "Sev 4", "Sev 5",
            "Status",
        ])
    } else {
        table(&["Mart", "Status"])
    };

    for row in &rows {
        if summary {
            out.add_row(vec![
                Cell::new(row.display_name),
                Cell::new(row.total_tests),
                Cell::new(row.passing_tests),
                Cell::new(format!("{:.1}", row.passing_percentage)),
                Cell::new(row.sev1_fails),
                Cell::new(row.sev2_fails),
                Cell::new(row.sev3_fails),
                Cell::new(row.sev4_fails),
                Cell::new(row.sev5_fails),
                Cell::new(row.status_label),
            ]);
        } else {
            out.add_row(vec![Cell::new(row.display_name), Cell::new(row.status_label)]);
        }
    }

    println!("{out}");
    Ok(())
}
