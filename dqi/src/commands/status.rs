// dqi/src/commands/status.rs
//
// USE CASE: What is loaded, and when the tests last ran.

use dqi_core::domain::quality::NO_DATA_LABEL;

use super::Workspace;

pub fn execute(ws: &Workspace) -> anyhow::Result<()> {
    let availability = ws.engine.data_availability()?;
    let last_run = ws.engine.get_last_test_run_time()?;

    println!("Project: {}", ws.config.name);
    println!(
        "Test results: {} ({} ungraded)",
        availability.test_results, availability.ungraded_test_results
    );
    println!("Chart points: {}", availability.chart_points);
    for (category, count) in &availability.chart_points_per_category {
        println!("  {category}: {count}");
    }
    println!(
        "Last test run: {}",
        last_run.as_deref().unwrap_or(NO_DATA_LABEL)
    );
    Ok(())
}
