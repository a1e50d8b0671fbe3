//! Helper executable for engine subprocesses.
//!
//! The engine relaunches this binary with `--type=<role>`; the argument
//! vector is handed to the engine's subprocess dispatch and its exit code
//! is returned verbatim.

mod engine;

use shoji_bridge::process::{run_subprocess, HelperError};
use tracing_subscriber::EnvFilter;

use crate::engine::StdioEngine;

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")))
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();
    let code = match run_subprocess(&args, &mut StdioEngine) {
        Ok(code) => code,
        Err(e @ HelperError::UnrecognizedRole(_)) => {
            tracing::error!(error = %e, "shoji-helper must be started by the engine");
            1
        }
    };
    std::process::exit(code);
}
