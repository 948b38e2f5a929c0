// dqi-core/src/application/mod.rs

pub mod engine;
pub mod import;
pub mod report;

// --- RE-EXPORTS (FACADE PATTERN) ---
// Le CLI peut faire `use dqi_core::application::{QualityEngine, import_file};`
// sans connaître la structure interne des fichiers.

pub use engine::{DataAvailability, GradeOverview, QualityEngine};
pub use import::{ImportResult, import_file, replace_chart_points, replace_snapshot};
pub use report::{ErrorLine, ReportCard, ReportTotals};
