//! Main entry point for the untar CLI application.
//!
//! This binary lists or extracts the regular files of a tar archive on the
//! local filesystem.

use std::io::Write;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::Parser;

use untar::{Cli, LocalFileReader, Outcome};

/// Exit status for any fatal error or unmatched name
const FAILURE: u8 = 2;

/// Application entry point.
///
/// Parses command-line arguments, runs the requested mode and maps the
/// result to an exit status.
fn main() -> ExitCode {
    env_logger::init();

    let cli = Cli::parse();

    match run(&cli) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            // unmatched names were already reported one per line
            let soft = e
                .downcast_ref::<untar::Error>()
                .is_some_and(|e| !e.is_fatal());
            if soft {
                eprintln!("untar: Exiting with failure status due to previous errors");
            } else {
                eprintln!("untar: {e:#}");
            }
            ExitCode::from(FAILURE)
        }
    }
}

/// Open the archive and run the list or extract mode.
///
/// Names go to stdout and diagnostics to stderr. The archive file is closed
/// when the traversal consumes and drops its reader.
fn run(cli: &Cli) -> Result<Outcome> {
    let reader = LocalFileReader::new(&cli.archive)
        .with_context(|| format!("{}: Cannot open", cli.archive.display()))?;
    let config = cli.config();

    let mut stdout = std::io::stdout().lock();
    let mut stderr = std::io::stderr().lock();

    let outcome = if cli.list {
        untar::list(reader, &config, &mut stdout, &mut stderr)
    } else {
        untar::extract(reader, &config, &mut stdout, &mut stderr)
    };

    stdout.flush()?;
    Ok(outcome?.into_result()?)
}
