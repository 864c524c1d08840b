use clap::{Parser, Subcommand, ValueEnum};
use log::LevelFilter;

use soliddns_webhook::config::SolidDnsConfig;
use soliddns_webhook::endpoint::Ttl;

macro_rules! env_prefix {
    () => {
        "EIP_"
    };
}

#[derive(Debug, Clone, PartialEq, Eq, Parser)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Set the loglevel of the application
    #[arg(
        value_enum,
        short = 'l',
        long,
        default_value_t = Loglevel::Info,
        value_name = "LEVEL",
        env = "LOG_LEVEL"
    )]
    pub loglevel: Loglevel,

    /// Hostname or address of the SOLIDserver appliance
    #[arg(
        long,
        default_value = "localhost",
        env = concat!(env_prefix!(), "HOST")
    )]
    pub host: String,

    /// API port of the SOLIDserver appliance
    #[arg(
        long,
        default_value_t = 443,
        env = concat!(env_prefix!(), "PORT")
    )]
    pub port: u16,

    /// Username for basic authentication
    #[arg(
        long,
        default_value = "ipmadmin",
        env = concat!(env_prefix!(), "USER")
    )]
    pub username: String,

    /// Password for basic authentication
    #[arg(
        long,
        default_value = "",
        env = concat!(env_prefix!(), "PASSWORD")
    )]
    pub password: String,

    /// API token, used together with --secret instead of username/password
    #[arg(
        long,
        default_value = "",
        env = concat!(env_prefix!(), "TOKEN")
    )]
    pub token: String,

    /// API secret belonging to --token
    #[arg(
        long,
        default_value = "",
        env = concat!(env_prefix!(), "SECRET")
    )]
    pub secret: String,

    /// Name of the DNS SmartArchitecture (or server) whose zones are managed
    #[arg(
        long,
        required = true,
        value_name = "NAME",
        env = concat!(env_prefix!(), "SMART")
    )]
    pub smart: String,

    /// Optional DNS view to scope zone queries to
    #[arg(
        long,
        value_name = "VIEW",
        env = concat!(env_prefix!(), "VIEW")
    )]
    pub view: Option<String>,

    /// Verify the appliance TLS certificate. Pass --ssl-verify=false for
    /// self-signed appliances
    #[arg(
        long,
        default_value_t = true,
        action = clap::ArgAction::Set,
        env = concat!(env_prefix!(), "SSL_VERIFY")
    )]
    pub ssl_verify: bool,

    /// Do not make any changes to the DNS records, only show what would happen
    #[arg(
        long,
        short = 'd',
        action,
        default_value_t = false,
        env = concat!(env_prefix!(), "DRY_RUN")
    )]
    pub dry_run: bool,

    /// Maximum number of rows requested from the appliance list endpoints
    #[arg(
        long,
        default_value_t = 1500,
        env = concat!(env_prefix!(), "MAX_RESULTS")
    )]
    pub max_results: usize,

    /// Mark A records for reverse (PTR) record bookkeeping during adjustment
    #[arg(
        long,
        action,
        default_value_t = false,
        env = concat!(env_prefix!(), "CREATE_PTR")
    )]
    pub create_ptr: bool,

    /// TTL applied to endpoints without a configured TTL
    #[arg(
        long,
        value_name = "TTL",
        default_value_t = 300,
        env = concat!(env_prefix!(), "DEFAULT_TTL")
    )]
    pub default_ttl: Ttl,

    /// Only manage zones matching these domains, as a comma-separated list
    #[arg(
        long,
        value_name = "DOMAIN",
        use_value_delimiter = true,
        value_delimiter = ',',
        env = "DOMAIN_FILTER"
    )]
    pub domain_filter: Vec<String>,

    /// Never manage zones matching these domains, as a comma-separated list
    #[arg(
        long,
        value_name = "DOMAIN",
        use_value_delimiter = true,
        value_delimiter = ',',
        env = "EXCLUDE_DOMAIN_FILTER"
    )]
    pub exclude_domains: Vec<String>,

    /// Only manage zones matching this regex. Takes precedence over the list filters
    #[arg(
        long,
        value_name = "REGEX",
        env = "REGEXP_DOMAIN_FILTER"
    )]
    pub regex_domain_filter: Option<String>,

    /// Never manage zones matching this regex. Only used together with --regex-domain-filter
    #[arg(
        long,
        value_name = "REGEX",
        env = "REGEXP_DOMAIN_FILTER_EXCLUSION"
    )]
    pub regex_domain_exclusion: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// List all endpoints across the zones matching the domain filter
    Records,
    /// List the zones matching the domain filter
    Zones,
}

impl Cli {
    pub fn solid_dns_config(&self) -> SolidDnsConfig {
        SolidDnsConfig {
            host: self.host.clone(),
            port: self.port,
            username: self.username.clone(),
            password: self.password.clone(),
            token: self.token.clone(),
            secret: self.secret.clone(),
            dns_smart: self.smart.clone(),
            dns_view: self.view.clone(),
            ssl_verify: self.ssl_verify,
            dry_run: self.dry_run,
            max_results: self.max_results,
            create_ptr: self.create_ptr,
            default_ttl: self.default_ttl,
        }
    }
}

/// Used to set the applications loglevel
// This is essentially a re-creation of log::Level. However, that enum doesn't derive ValueEnum, so we have to do it manually here
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash, ValueEnum)]
pub enum Loglevel {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}
impl From<Loglevel> for LevelFilter {
    fn from(ll: Loglevel) -> Self {
        match ll {
            Loglevel::Error => LevelFilter::Error,
            Loglevel::Warn => LevelFilter::Warn,
            Loglevel::Info => LevelFilter::Info,
            Loglevel::Debug => LevelFilter::Debug,
            Loglevel::Trace => LevelFilter::Trace,
        }
    }
}
