//! Thin diagnostic command-line wrapper around the diff core.

use clap::Parser;
use sidediff::{DiffOptions, compute_diff, render_report, split_lines};
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;

/// Errors the wrapper can hit before any diff output is produced.
#[derive(Debug, Error)]
pub enum CliError {
    /// A file could not be read.
    #[error("cannot read {}: {source}", path.display())]
    FileRead {
        /// The offending path.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },
}

/// Diff two files and print the diagnostic report.
#[derive(Debug, Parser)]
#[command(name = "sidediff", version)]
pub struct Cli {
    /// Print wall-clock timing after the results.
    #[arg(short = 'b')]
    pub bench: bool,

    /// Computation budget in milliseconds (0 = unlimited; negative values
    /// are treated as 0).
    #[arg(short = 'T', value_name = "ms", allow_hyphen_values = true)]
    pub timeout_ms: Option<i64>,

    /// Original file.
    pub file1: PathBuf,

    /// Modified file.
    pub file2: PathBuf,
}

impl Cli {
    fn options(&self) -> DiffOptions {
        let mut options = DiffOptions::default();
        if let Some(ms) = self.timeout_ms {
            // Negative budgets normalize to unlimited at the boundary.
            options.max_computation_time_ms = u32::try_from(ms.max(0)).unwrap_or(u32::MAX);
        }
        options
    }
}

fn read_file(path: &PathBuf) -> Result<String, CliError> {
    std::fs::read_to_string(path).map_err(|source| CliError::FileRead {
        path: path.clone(),
        source,
    })
}

/// Runs the wrapper: any run that produces a report succeeds, including
/// timed-out ones.
pub fn run(cli: &Cli) -> Result<(), CliError> {
    let original_content = read_file(&cli.file1)?;
    let modified_content = read_file(&cli.file2)?;
    let original = split_lines(&original_content);
    let modified = split_lines(&modified_content);

    let started = Instant::now();
    let diff = compute_diff(&original, &modified, &cli.options());
    let elapsed = started.elapsed();

    print!("{}", render_report(&diff));
    if cli.bench {
        println!("Elapsed: {:.3} ms", elapsed.as_secs_f64() * 1000.0);
    }
    Ok(())
}
