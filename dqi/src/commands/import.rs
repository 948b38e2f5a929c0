// dqi/src/commands/import.rs
//
// USE CASE: Replace the stored test results (or chart data) with an export file.

use std::path::Path;

use dqi_core::application::import_file;
use dqi_core::domain::quality::ImportPolicy;

use super::Workspace;

/// Rejections printed before the list is cut short.
const SHOWN_REJECTIONS: usize = 20;

pub fn execute(ws: &Workspace, file: &Path, reject_ungraded: bool) -> anyhow::Result<()> {
    let policy = ImportPolicy {
        reject_ungraded: reject_ungraded || ws.config.import.reject_ungraded,
    };
    let result = import_file(ws.engine.store().as_ref(), file, policy)?;

    println!(
        "Imported {}: {} accepted, {} rejected, {} ungraded",
        result.kind, result.accepted_count, result.rejected_count, result.ungraded_count
    );
    for rejection in result.rejections.iter().take(SHOWN_REJECTIONS) {
        println!(
            "  row {}{}: {}",
            rejection.row,
            rejection
                .unique_id
                .as_deref()
                .map(|id| format!(" ({id})"))
                .unwrap_or_default(),
            rejection.reason
        );
    }
    if result.rejections.len() > SHOWN_REJECTIONS {
        println!("  ... {} more", result.rejections.len() - SHOWN_REJECTIONS);
    }

    if result.is_empty() {
        anyhow::bail!(
            "No rows accepted from {} ({})",
            file.display(),
            result.reason()
        );
    }
    Ok(())
}
