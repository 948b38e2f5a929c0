// dqi/src/commands/errors.rs
//
// USE CASE: Outstanding (graded, non-passing) failures.

use dqi_core::domain::quality::Mart;

use super::{Workspace, print_tests};

pub fn execute(ws: &Workspace, mart: Option<Mart>, limit: Option<usize>) -> anyhow::Result<()> {
    let mut errors = ws.engine.get_outstanding_errors()?;
    if let Some(mart) = mart {
        errors.retain(|r| r.affects(mart));
    }

    let limit = limit.unwrap_or(ws.config.listing.default_limit);
    println!("{} outstanding error(s)", errors.len());
    print_tests(&errors, limit, "Nothing to fix.");
    Ok(())
}
