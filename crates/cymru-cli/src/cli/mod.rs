//! CLI argument parsing and command dispatch.

pub mod args;
pub mod commands;

use anyhow::Result;
use args::{Cli, Commands};
use clap::Parser;
use std::process::ExitCode;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

use crate::config::Config;

/// Run the CLI application.
///
/// The exit code is a failure when any single lookup failed, even if others
/// succeeded.
pub async fn run() -> Result<ExitCode> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    if cli.no_color {
        colored::control::set_override(false);
    }

    let config = Config::load()?;

    let output_format = cli.output.or(config.output_format).unwrap_or_default();

    // A resolver chosen on the command line replaces the configured one
    // entirely, so --server never meets a configured DoH endpoint.
    let (server, doh) = if cli.server.is_some() || cli.doh.is_some() {
        (cli.server, cli.doh)
    } else {
        (config.server, config.doh)
    };

    let mut exclude = config.exclude;
    exclude.extend(cli.exclude);

    let ctx = commands::Context {
        output_format,
        server,
        doh,
        timeout: cli
            .timeout
            .or(config.timeout)
            .filter(|secs| *secs > 0)
            .map(Duration::from_secs),
        strict: cli.strict || config.strict,
        private_filter: !(cli.no_private_filter || config.no_private_filter),
        exclude,
    };

    match cli.command {
        Commands::Origin(args) => commands::origin::execute(ctx, args).await,
        Commands::Peer(args) => commands::peer::execute(ctx, args).await,
        Commands::Asn(args) => commands::asn::execute(ctx, args).await,
        Commands::Ipset(args) => commands::ipset::execute(ctx, args).await,
        Commands::Config(args) => commands::config::execute(ctx, args),
    }
}

/// Log to stderr, honouring `RUST_LOG` when set.
fn init_tracing(verbose: bool) {
    let default = if verbose {
        "warn,cymru_client=debug,cymru_cli=debug"
    } else {
        "warn"
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default));

    // Fails only if a subscriber is already installed.
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .try_init();
}
