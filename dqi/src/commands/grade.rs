// dqi/src/commands/grade.rs
//
// USE CASE: Overall grade, with an optional CI gate.

use dqi_core::domain::quality::{Grade, NO_DATA_LABEL};

use super::Workspace;

pub fn execute(ws: &Workspace, min_grade: Option<Grade>) -> anyhow::Result<()> {
    let overview = ws.engine.grade_overview()?;

    println!("Grade: {}", overview.grade);
    println!("{}", overview.grade.description());
    println!(
        "Tests completed: {} ({} ungraded)",
        overview.tests_completed, overview.ungraded
    );
    match overview.last_test_run.as_deref() {
        Some(last) => println!("Last test run: {last}"),
        None => {
            println!("Last test run: {NO_DATA_LABEL}");
            tracing::warn!("No test results loaded; run `dqi import <file>` first");
        }
    }

    if let Some(min) = min_grade {
        if overview.grade < min {
            anyhow::bail!("Grade {} is below the required minimum {}", overview.grade, min);
        }
    }
    Ok(())
}
