// dqi/src/commands/tests.rs
//
// USE CASE: Test listing, for one mart or for the whole project.

use dqi_core::domain::quality::Mart;

use super::{Workspace, print_tests};

pub fn execute(
    ws: &Workspace,
    mart: Option<Mart>,
    status: Option<String>,
    limit: Option<usize>,
) -> anyhow::Result<()> {
    let tests = match mart {
        Some(mart) => ws.engine.get_mart_tests(mart, status.as_deref())?,
        None => {
            let mut all = ws.engine.get_all_tests()?;
            if let Some(status) = status.as_deref() {
                all.retain(|r| r.status == status);
            }
            all
        }
    };

    let limit = limit.unwrap_or(ws.config.listing.default_limit);
    print_tests(&tests, limit, "No matching tests.");
    Ok(())
}
