// dqi/src/cli.rs
//
// Single source of truth for all CLI definitions (Clap structs).

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use dqi_core::domain::quality::{Grade, GroupKey, Mart};

#[derive(Parser)]
#[command(name = "dqi")]
#[command(about = "Grades warehouse data-quality test results and tells which data marts are usable", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Project directory (holds dqi.yaml and the default database)
    #[arg(long, global = true, env = "DQI_PROJECT_DIR", default_value = ".")]
    pub project_dir: PathBuf,

    /// DuckDB file to use instead of the configured one
    #[arg(long, global = true)]
    pub db_path: Option<PathBuf>,

    /// Debug logging on stderr
    #[arg(long, short, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ReportFormat {
    Json,
    Table,
}

#[derive(Subcommand)]
pub enum Commands {
    /// 📥 Replaces test results or chart data with a .csv / .json export
    Import {
        /// Export file (kind detected from its columns)
        file: PathBuf,

        /// Reject rows without a usable severity level instead of storing them ungraded
        #[arg(long)]
        reject_ungraded: bool,
    },

    /// 🎓 Prints the overall data quality grade
    Grade {
        /// Exit with an error when the grade is worse than this (CI gate)
        #[arg(long)]
        min_grade: Option<Grade>,
    },

    /// 🏪 Shows which data marts are usable
    Marts {
        /// Full reporting table (test counts and failures per severity)
        #[arg(long)]
        summary: bool,
    },

    /// 📊 Pass rates grouped by test category or quality dimension
    Summary {
        /// category | dimension
        #[arg(long, default_value = "category")]
        by: GroupKey,
    },

    /// ❌ Lists outstanding failures, most severe first
    Errors {
        /// Only failures flagged for this mart
        #[arg(long)]
        mart: Option<Mart>,

        /// Maximum rows to print (defaults to listing.default-limit)
        #[arg(long)]
        limit: Option<usize>,
    },

    /// 📋 Lists tests, optionally for one mart and one status
    Tests {
        #[arg(long)]
        mart: Option<Mart>,

        /// Exact status to keep (ex: "pass", "fail", "warn")
        #[arg(long)]
        status: Option<String>,

        #[arg(long)]
        limit: Option<usize>,
    },

    /// 📝 Writes the report card (grade, marts, summaries, top errors)
    Report {
        /// Output file (defaults to report.output-path)
        #[arg(long)]
        output: Option<PathBuf>,

        #[arg(long, value_enum, default_value_t = ReportFormat::Json)]
        format: ReportFormat,

        /// Number of outstanding errors to include
        #[arg(long, default_value = "10")]
        top: usize,
    },

    /// 📈 Lists charts, or the points of one chart
    Charts {
        #[arg(long)]
        graph: Option<String>,

        /// Keep only points with this chart filter value
        #[arg(long, requires = "graph")]
        filter: Option<String>,
    },

    /// 🔍 What data is loaded and when the tests last ran
    Status,
}
