//! Command-line argument definitions using clap.

use clap::{Args, Parser, Subcommand};
use cymru::CLOUDFLARE_DOH;

use crate::output::OutputFormat;

/// Map IP addresses and AS numbers to BGP origin, peers and owner
///
/// Answers come from Team Cymru's IP-to-ASN DNS zone (asn.cymru.com).
/// Private, loopback, multicast and unspecified addresses are refused
/// before any query is sent.
#[derive(Parser, Debug)]
#[command(name = "ipasn")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// DNS server to query instead of the system resolver (ip or ip:port)
    #[arg(short, long, env = "IPASN_SERVER", global = true, conflicts_with = "doh")]
    pub server: Option<String>,

    /// Query over DNS-over-HTTPS (Cloudflare unless --doh=URL names a JSON endpoint)
    #[arg(
        long,
        env = "IPASN_DOH",
        global = true,
        num_args = 0..=1,
        require_equals = true,
        default_missing_value = CLOUDFLARE_DOH,
        value_name = "URL"
    )]
    pub doh: Option<String>,

    /// Give up on each lookup after this many seconds
    #[arg(short, long, global = true, value_name = "SECONDS")]
    pub timeout: Option<u64>,

    /// Report malformed records as errors instead of empty results
    #[arg(long, global = true)]
    pub strict: bool,

    /// Look up private address space too
    #[arg(long, global = true)]
    pub no_private_filter: bool,

    /// Extra networks to refuse, on top of the private ranges
    #[arg(short = 'x', long = "exclude", global = true, value_name = "CIDR")]
    pub exclude: Vec<String>,

    /// Output format
    #[arg(short, long, global = true, value_enum)]
    pub output: Option<OutputFormat>,

    /// Log queries and resolver answers to stderr
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Disable colored output
    #[arg(long, global = true)]
    pub no_color: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Find the AS announcing the prefix that covers each address
    Origin(IpArgs),

    /// Find the BGP peers one hop away from each address's origin
    Peer(IpArgs),

    /// Describe AS numbers (registry, allocation date, owner)
    Asn(AsnArgs),

    /// Print ipset commands blocking the networks behind each address
    Ipset(IpsetArgs),

    /// Manage CLI configuration
    Config(ConfigArgs),
}

// ============================================================================
// Lookup commands
// ============================================================================

#[derive(Args, Debug)]
pub struct IpArgs {
    /// IPv4 or IPv6 addresses (comma-separated or multiple args)
    #[arg(required = true)]
    pub ips: Vec<String>,
}

#[derive(Args, Debug)]
pub struct AsnArgs {
    /// AS numbers, with or without the AS prefix (e.g. 23028, AS13335)
    #[arg(required = true)]
    pub asns: Vec<String>,
}

// ============================================================================
// Ipset command
// ============================================================================

#[derive(Args, Debug)]
pub struct IpsetArgs {
    /// Offending IPv4 or IPv6 addresses
    #[arg(required = true)]
    pub ips: Vec<String>,

    /// Name of the ipset to add networks to
    #[arg(long, default_value = "badnetworks")]
    pub set: String,

    /// Entry timeout in seconds
    #[arg(long, default_value_t = 86_400)]
    pub ttl: u64,
}

// ============================================================================
// Config command
// ============================================================================

#[derive(Args, Debug)]
pub struct ConfigArgs {
    #[command(subcommand)]
    pub command: ConfigCommands,
}

#[derive(Subcommand, Debug)]
pub enum ConfigCommands {
    /// Show current configuration
    Show,

    /// Set a configuration value
    Set {
        /// Configuration key
        key: String,
        /// Value to set
        value: String,
    },

    /// Show configuration file path
    Path,
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn bare_doh_flag_means_cloudflare() {
        let cli = Cli::try_parse_from(["ipasn", "--doh", "origin", "1.1.1.1"]).unwrap();
        assert_eq!(cli.doh.as_deref(), Some(CLOUDFLARE_DOH));
    }

    #[test]
    fn server_and_doh_conflict() {
        let parsed = Cli::try_parse_from([
            "ipasn", "--server", "8.8.8.8", "--doh=https://dns.google/resolve", "asn", "1",
        ]);
        assert!(parsed.is_err());
    }

    #[test]
    fn ipset_defaults() {
        let cli = Cli::try_parse_from(["ipasn", "ipset", "216.90.108.31"]).unwrap();
        let Commands::Ipset(args) = cli.command else {
            panic!("expected ipset command");
        };
        assert_eq!(args.set, "badnetworks");
        assert_eq!(args.ttl, 86_400);
    }

    #[test]
    fn global_flags_after_subcommand() {
        let cli =
            Cli::try_parse_from(["ipasn", "origin", "1.1.1.1", "-x", "203.0.113.0/24", "--strict"])
                .unwrap();
        assert!(cli.strict);
        assert_eq!(cli.exclude, vec!["203.0.113.0/24".to_string()]);
    }
}
