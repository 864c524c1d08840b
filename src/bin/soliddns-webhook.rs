mod cli;

use std::process::ExitCode;

use clap::Parser;
use env_logger::Builder;
use itertools::Itertools;
use log::{error, info};
use regex::Regex;

use soliddns_webhook::{
    filter::DomainFilter,
    provider::{Provider, ProviderError, SolidDnsProvider},
};

use cli::{Cli, Command};

fn main() -> ExitCode {
    let cli = Cli::parse();

    Builder::new().filter_level(cli.loglevel.into()).init();

    let domain_filter = match build_domain_filter(&cli) {
        Ok(f) => f,
        Err(e) => {
            error!("Invalid domain filter expression: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let config = cli.solid_dns_config();
    if let Err(e) = config.credentials() {
        error!("{}", e);
        return ExitCode::FAILURE;
    }
    if config.dry_run {
        info!("Running in dry-run mode, no changes to the DNS records will be made");
    }

    let provider = match SolidDnsProvider::from_config(&config, domain_filter) {
        Ok(p) => p,
        Err(e) => {
            error!("Unable to create provider: {}", e);
            return ExitCode::FAILURE;
        }
    };

    let result = match cli.command {
        Command::Records => run_records(&provider),
        Command::Zones => run_zones(&provider),
    };
    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn build_domain_filter(cli: &Cli) -> Result<DomainFilter, regex::Error> {
    if let Some(pattern) = &cli.regex_domain_filter {
        let include = Regex::new(pattern)?;
        let exclude = cli
            .regex_domain_exclusion
            .as_deref()
            .map(Regex::new)
            .transpose()?;
        info!("Using regex domain filter: {}", pattern);
        if let Some(exclusion) = &cli.regex_domain_exclusion {
            info!("Using regex domain exclusion: {}", exclusion);
        }
        return Ok(DomainFilter::regex(include, exclude));
    }

    if !cli.domain_filter.is_empty() {
        info!("Using domain filter: {}", cli.domain_filter.iter().join(","));
    }
    if !cli.exclude_domains.is_empty() {
        info!(
            "Using exclude domain filter: {}",
            cli.exclude_domains.iter().join(",")
        );
    }
    if cli.domain_filter.is_empty() && cli.exclude_domains.is_empty() {
        info!("No domain filters configured, managing all zones");
    }
    Ok(DomainFilter::new(
        cli.domain_filter.clone(),
        cli.exclude_domains.clone(),
    ))
}

fn run_records(provider: &SolidDnsProvider) -> Result<(), ProviderError> {
    let endpoints = provider.records()?;
    info!("Retrieved {} endpoints", endpoints.len());
    for ep in &endpoints {
        println!("{}", ep);
    }
    Ok(())
}

fn run_zones(provider: &SolidDnsProvider) -> Result<(), ProviderError> {
    let zones = provider.zones()?;
    info!("Found {} matching zones", zones.len());
    for zone in &zones {
        println!("{}", zone);
    }
    Ok(())
}
