//! Tracing subscriber setup. Core and the dev server only emit events.
//!
//! `-v` info, `-vv` debug, `-vvv` trace, `-q` errors only. Without flags
//! only warnings show. `RUST_LOG` overrides all of it.

use std::io::IsTerminal as _;

use clap::ArgMatches;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

pub fn init_logging(args: &ArgMatches) -> anyhow::Result<()> {
    let verbose = args.get_count("verbose");
    let quiet = args.get_flag("quiet");
    let level = derive_level(verbose, quiet);

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "stackguide={level},stackguide_core={level},stackguide_dev_server={level}"
        ))
    });

    let fmt_layer = tracing_subscriber::fmt::layer()
        .with_target(false)
        .with_ansi(std::io::stderr().is_terminal())
        .with_writer(std::io::stderr);

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt_layer)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialise tracing: {e}"))?;

    Ok(())
}

fn derive_level(verbose: u8, quiet: bool) -> &'static str {
    if quiet {
        return "error";
    }
    match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    }
}
