// dqi/src/main.rs

mod cli;
mod commands;

use clap::Parser;
use tracing::Level;

use cli::{Cli, Commands};
use commands::Workspace;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // 1. Setup Logging (Tracing)
    // Logs sur stderr : stdout reste exploitable (JSON, tableaux)
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.verbose { Level::DEBUG } else { Level::WARN })
        .with_target(false)
        .init();

    let ws = Workspace::open(&cli.project_dir, cli.db_path.as_deref())?;

    match cli.command {
        // --- USE CASE: IMPORT ---
        Commands::Import {
            file,
            reject_ungraded,
        } => commands::import::execute(&ws, &file, reject_ungraded),

        // --- USE CASE: GRADE (CI gate) ---
        Commands::Grade { min_grade } => commands::grade::execute(&ws, min_grade),

        // --- USE CASES: READ-ONLY VIEWS ---
        Commands::Marts { summary } => commands::marts::execute(&ws, summary),
        Commands::Summary { by } => commands::summary::execute(&ws, by),
        Commands::Errors { mart, limit } => commands::errors::execute(&ws, mart, limit),
        Commands::Tests {
            mart,
            status,
            limit,
        } => commands::tests::execute(&ws, mart, status, limit),
        Commands::Charts { graph, filter } => commands::charts::execute(&ws, graph, filter),
        Commands::Status => commands::status::execute(&ws),

        // --- USE CASE: REPORT CARD ---
        Commands::Report {
            output,
            format,
            top,
        } => commands::report::execute(&ws, output, format, top),
    }
}
