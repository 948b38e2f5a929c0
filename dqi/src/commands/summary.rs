// dqi/src/commands/summary.rs
//
// USE CASE: Pass rates per test category or quality dimension.

use comfy_table::Cell;

use dqi_core::domain::quality::GroupKey;

use super::{Workspace, table};

pub fn execute(ws: &Workspace, by: GroupKey) -> anyhow::Result<()> {
    let groups = ws.engine.summarize_by_category(by)?;
    if groups.is_empty() {
        println!("No {by} values found.");
        return Ok(());
    }

    let mut out = table(&[by.as_str(), "Tests", "Passing", "Failing", "Pass %"]);
    for g in &groups {
        out.add_row(vec![
            Cell::new(&g.group_value),
            Cell::new(g.total_tests),
            Cell::new(g.passing_tests),
            Cell::new(g.failing_tests),
            Cell::new(format!("{:.1}", g.passing_percentage)),
        ]);
    }
    println!("{out}");
    Ok(())
}
