use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use formbook_migrate::{Outcome, RemoveLegacyColumn, LEGACY_COLUMN};
use formbook_store::DEFAULT_FORM_FILE;

#[derive(Parser)]
#[command(about = "Remove the legacy `General Text Input` column from the form log.")]
struct Args {
    /// Workbook to migrate.
    #[arg(default_value = DEFAULT_FORM_FILE)]
    path: PathBuf,
}

fn main() -> ExitCode {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    match run(Args::parse()) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("error: {err:#}");
            ExitCode::FAILURE
        }
    }
}

fn run(args: Args) -> Result<()> {
    let report = formbook_migrate::run(&args.path, &RemoveLegacyColumn)
        .with_context(|| format!("fixing headers in {}", args.path.display()))?;

    println!("Backup created at {}", report.backup.display());
    match &report.outcome {
        Outcome::ColumnRemoved {
            position,
            headers_before,
            headers_after,
            ..
        } => {
            print_headers("Headers before:", headers_before);
            println!(
                "Removed \"{LEGACY_COLUMN}\" (column {}) from `{}`.",
                position + 1,
                report.sheet
            );
            print_headers("Headers after:", headers_after);
        }
        Outcome::NoLegacyColumn { headers } => {
            println!("No \"{LEGACY_COLUMN}\" column found. Headers are correct.");
            print_headers("Current headers:", headers);
        }
        Outcome::AlreadyMigrated { version, headers } => {
            println!("`{}` is already at schema version {version}. Nothing to do.", report.sheet);
            print_headers("Current headers:", headers);
        }
        Outcome::DatesNormalized { .. } => {}
    }
    Ok(())
}

fn print_headers(title: &str, headers: &[String]) {
    println!("{title}");
    for (idx, name) in headers.iter().enumerate() {
        println!("  {}. {name}", idx + 1);
    }
}
