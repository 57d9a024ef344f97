//! XYZ Primer CLI - Command-line interface
//!
//! Validates the flags, then primes every zoom level from 0 to `--zoom` and
//! prints a summary per level and for the whole run.

mod args;
mod error;
mod progress;

use std::env;
use std::ffi::OsString;
use std::process;
use std::sync::Arc;

use clap::error::ErrorKind;
use clap::Parser;
use tracing::info;
use xyz_primer::logging::init_logging;
use xyz_primer::{Primer, PrimerConfig};

use crate::args::Args;
use crate::error::CliError;
use crate::progress::{bars_hidden, BarProgress};

fn main() {
    process::exit(run_cli(env::args_os()));
}

/// Run the tool on `argv` and return the process exit code.
///
/// Help and version exit 0, as does any run that primed every level,
/// however many tiles failed. Everything else exits 1.
fn run_cli<I, T>(argv: I) -> i32
where
    I: IntoIterator<Item = T>,
    T: Into<OsString> + Clone,
{
    println!("XYZ Tile Cache Primer v{}", xyz_primer::VERSION);

    let args = match Args::try_parse_from(argv) {
        Ok(args) => args,
        Err(e) => {
            let _ = e.print();
            return match e.kind() {
                ErrorKind::DisplayHelp | ErrorKind::DisplayVersion => 0,
                _ => 1,
            };
        }
    };

    match run(args) {
        Ok(()) => 0,
        Err(e) => e.report(),
    }
}

fn run(args: Args) -> Result<(), CliError> {
    // A subscriber that is already installed keeps receiving the events.
    let _logging_guard = match init_logging(args.verbose) {
        Ok(guard) => Some(guard),
        Err(e) => {
            eprintln!("Warning: {}", CliError::LoggingInit(e.to_string()));
            None
        }
    };

    let rust_log = env::var("RUST_LOG").ok();
    let sink = if bars_hidden(args.verbose, rust_log.as_deref()) {
        BarProgress::hidden()
    } else {
        BarProgress::new()
    };

    let config = PrimerConfig::from_raw(args.into_raw())?;
    println!(
        "Config OK. URL: {}, Max zoom: {}, Concurrency: {}\n",
        config.template(),
        config.max_zoom(),
        config.concurrency()
    );
    if config.request_timeout().is_none() {
        info!("No request timeout set; an unresponsive tile server will stall its level");
    }

    let primer = Primer::new(&config)?.with_progress(Arc::new(sink));
    let run = primer.run()?;

    println!("\n{}\n", run);
    Ok(())
}
