//! Appliance configuration, passed around as an explicit parameter struct.

use thiserror::Error;

use crate::endpoint::Ttl;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ConfigError {
    #[error(
        "missing authentication credentials: username/password or token/secret are required"
    )]
    MissingCredentials,
}

/// All settings needed to talk to a SOLIDserver instance.
///
/// Constructed by the CLI from environment variables and flags; the library
/// itself never reads ambient state.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SolidDnsConfig {
    pub host: String,
    pub port: u16,
    pub username: String,
    pub password: String,
    pub token: String,
    pub secret: String,
    /// Name of the SmartArchitecture (or server) whose zones are managed.
    pub dns_smart: String,
    /// Optional DNS view to scope zone queries to.
    pub dns_view: Option<String>,
    pub ssl_verify: bool,
    /// When set, create/delete calls are logged but not executed.
    pub dry_run: bool,
    /// Row limit passed to the appliance list endpoints.
    pub max_results: usize,
    /// Track A records for reverse-record bookkeeping during adjustment.
    pub create_ptr: bool,
    /// TTL applied to endpoints that arrive without a configured TTL.
    pub default_ttl: Ttl,
}

impl Default for SolidDnsConfig {
    fn default() -> Self {
        SolidDnsConfig {
            host: "localhost".to_string(),
            port: 443,
            username: "ipmadmin".to_string(),
            password: String::new(),
            token: String::new(),
            secret: String::new(),
            dns_smart: String::new(),
            dns_view: None,
            ssl_verify: true,
            dry_run: false,
            max_results: 1500,
            create_ptr: false,
            default_ttl: 300,
        }
    }
}

impl SolidDnsConfig {
    /// Returns the credential pair to authenticate with, preferring API
    /// token/secret over username/password. Fails if neither pair is
    /// complete, which is fatal at startup rather than at request time.
    pub fn credentials(&self) -> Result<(&str, &str), ConfigError> {
        if !self.token.is_empty() && !self.secret.is_empty() {
            return Ok((&self.token, &self.secret));
        }
        if !self.username.is_empty() && !self.password.is_empty() {
            return Ok((&self.username, &self.password));
        }
        Err(ConfigError::MissingCredentials)
    }
}
