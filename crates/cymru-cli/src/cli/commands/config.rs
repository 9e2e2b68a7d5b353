//! `ipasn config` - CLI configuration management.

use anyhow::{Context as _, Result};
use colored::Colorize;
use cymru::NetworkFilter;
use std::process::ExitCode;

use super::{parse_server, split_inputs, Context};
use crate::cli::args::{ConfigArgs, ConfigCommands};
use crate::config::Config;
use crate::output::OutputFormat;

pub fn execute(ctx: Context, args: ConfigArgs) -> Result<ExitCode> {
    match args.command {
        ConfigCommands::Show => show_config(&ctx)?,
        ConfigCommands::Set { key, value } => set_config(&key, &value)?,
        ConfigCommands::Path => show_path()?,
    }
    Ok(ExitCode::SUCCESS)
}

fn show_config(ctx: &Context) -> Result<()> {
    let config = Config::load()?;

    match ctx.output_format {
        OutputFormat::Json => {
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        OutputFormat::Yaml => {
            print!("{}", serde_yaml::to_string(&config)?);
        }
        OutputFormat::Raw | OutputFormat::Csv => {
            print!("{}", toml::to_string_pretty(&config)?);
        }
        OutputFormat::Pretty => {
            let unset = || "(not set)".dimmed().to_string();

            println!("{}", "Current Configuration:".bold());
            println!();
            println!(
                "  {} {}",
                "output_format:".bold(),
                config.output_format.unwrap_or_default()
            );
            println!(
                "  {} {}",
                "server:".bold(),
                config.server.clone().unwrap_or_else(unset)
            );
            println!(
                "  {} {}",
                "doh:".bold(),
                config.doh.clone().unwrap_or_else(unset)
            );
            println!(
                "  {} {}",
                "timeout:".bold(),
                config
                    .timeout
                    .map_or_else(unset, |secs| format!("{secs}s"))
            );
            println!("  {} {}", "strict:".bold(), config.strict);
            println!(
                "  {} {}",
                "no_private_filter:".bold(),
                config.no_private_filter
            );
            if config.exclude.is_empty() {
                println!("  {} {}", "exclude:".bold(), unset());
            } else {
                println!("  {} {}", "exclude:".bold(), config.exclude.join(", "));
            }
        }
    }

    Ok(())
}

/// Empty values clear optional settings.
fn optional(value: &str) -> Option<String> {
    let value = value.trim();
    (!value.is_empty()).then(|| value.to_string())
}

fn set_config(key: &str, value: &str) -> Result<()> {
    let mut config = Config::load()?;

    match key {
        "output_format" | "output" => {
            config.output_format = optional(value).map(|v| v.parse()).transpose()?;
        }
        "server" | "nameserver" => {
            if let Some(server) = optional(value) {
                parse_server(&server)?;
                config.server = Some(server);
                config.doh = None;
            } else {
                config.server = None;
            }
        }
        "doh" => {
            if let Some(endpoint) = optional(value) {
                if !(endpoint.starts_with("https://") || endpoint.starts_with("http://")) {
                    anyhow::bail!("DoH endpoint must be an http(s) URL: {endpoint}");
                }
                config.doh = Some(endpoint);
                config.server = None;
            } else {
                config.doh = None;
            }
        }
        "timeout" => {
            config.timeout = optional(value)
                .map(|v| v.parse::<u64>())
                .transpose()
                .context("timeout is a whole number of seconds")?;
        }
        "strict" => {
            config.strict = value.parse().context("strict is true or false")?;
        }
        "no_private_filter" => {
            config.no_private_filter = value
                .parse()
                .context("no_private_filter is true or false")?;
        }
        "exclude" => {
            let networks = split_inputs(&[value.to_string()]);
            NetworkFilter::parse_cidrs(&networks)
                .with_context(|| format!("invalid network in {value:?}"))?;
            config.exclude = networks;
        }
        _ => {
            anyhow::bail!(
                "Unknown config key: {key}\n\n\
                 Available keys:\n  \
                 output_format      - Default output format (pretty/json/csv/yaml/raw)\n  \
                 server             - DNS server to query (ip or ip:port)\n  \
                 doh                - DNS-over-HTTPS JSON endpoint\n  \
                 timeout            - Per-lookup timeout in seconds\n  \
                 strict             - Report malformed records (true/false)\n  \
                 no_private_filter  - Look up private addresses (true/false)\n  \
                 exclude            - Extra networks to refuse (comma-separated CIDRs)"
            );
        }
    }

    config.save()?;
    println!("{} {key} updated.", "Success:".green().bold());

    Ok(())
}

fn show_path() -> Result<()> {
    let path = Config::path()?;
    println!("{}", path.display());
    Ok(())
}
