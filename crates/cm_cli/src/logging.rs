//! stderr logging for the `cm` binary.
//!
//! `RUST_LOG` wins when set; otherwise `--verbose` gives `info` and the
//! default is `warn`. `--quiet` turns logging off regardless of `RUST_LOG`.

use std::io::IsTerminal;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

use crate::args::LogFormat;

pub fn init_logging(quiet: bool, verbose: bool, format: LogFormat) {
    let filter = if quiet {
        EnvFilter::new("off")
    } else {
        let level = if verbose { "info" } else { "warn" };
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level))
    };

    // Fails only when a global subscriber is already installed.
    let _ = match format {
        LogFormat::Human => {
            let layer = fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .with_ansi(std::io::stderr().is_terminal())
                .without_time();
            tracing_subscriber::registry().with(filter).with(layer).try_init()
        }
        LogFormat::Json => {
            let layer = fmt::layer().json().with_writer(std::io::stderr).with_current_span(false);
            tracing_subscriber::registry().with(filter).with(layer).try_init()
        }
    };
}
