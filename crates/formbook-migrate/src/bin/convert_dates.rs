use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;
use formbook_migrate::{NormalizeDates, Outcome, Report};
use formbook_store::DEFAULT_FORM_FILE;

#[derive(Parser)]
#[command(about = "Rewrite the `Date` column of the form log as date-only cells (dd-mm-yyyy).")]
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
    let report = formbook_migrate::run(&args.path, &NormalizeDates)
        .with_context(|| format!("converting dates in {}", args.path.display()))?;

    println!("Backup created at {}", report.backup.display());
    println!("{}", summary(&report));
    Ok(())
}

/// Final line of the run. Cells that already held a date-only value are not counted.
fn summary(report: &Report) -> String {
    let updated = match report.outcome {
        Outcome::DatesNormalized { cells_updated } => cells_updated,
        _ => 0,
    };
    let mut line = format!("Conversion complete. {updated} cells updated.");
    if !report.written {
        line.push_str(&format!(
            " Dates were already date-only; {} was left unchanged.",
            report.source.display()
        ));
    }
    line
}

#[cfg(test)]
mod tests {
    use super::*;

    fn report(cells_updated: usize, written: bool) -> Report {
        Report {
            source: PathBuf::from("saved_texts.xlsx"),
            backup: PathBuf::from("saved_texts.backup.1.xlsx"),
            sheet: "User Details".to_string(),
            outcome: Outcome::DatesNormalized { cells_updated },
            written,
        }
    }

    #[test]
    fn summary_counts_rewritten_cells() {
        assert_eq!(
            summary(&report(3, true)),
            "Conversion complete. 3 cells updated."
        );
    }

    #[test]
    fn summary_says_when_nothing_needed_rewriting() {
        assert_eq!(
            summary(&report(0, false)),
            "Conversion complete. 0 cells updated. Dates were already date-only; \
             saved_texts.xlsx was left unchanged."
        );
    }
}
