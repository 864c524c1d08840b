//! Raw SOLIDserver REST surface, one appliance call per method.

use log::debug;
use reqwest::blocking::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;

use crate::config::SolidDnsConfig;
use crate::endpoint::Ttl;
use crate::provider::ProviderError;

use super::types::{ListResponse, RecordAddInput, ResourceRecord, ZoneAuth};

/// The narrow appliance interface the provider talks through.
///
/// Mutations operate on a single (name, type, value) row; fanning a
/// multi-target endpoint out into row calls is the provider's job.
#[cfg_attr(test, mockall::automock)]
pub trait SolidDnsApi {
    /// List the zones served by the configured smart/view.
    fn zones_list(&self) -> Result<Vec<ZoneAuth>, ProviderError>;
    /// List all rows of one zone, sorted by full name.
    fn record_list(&self, zone: &ZoneAuth) -> Result<Vec<ResourceRecord>, ProviderError>;
    /// Create one row.
    fn record_add(
        &self,
        name: &str,
        rtype: &str,
        ttl: Ttl,
        value: &str,
    ) -> Result<(), ProviderError>;
    /// Delete one row, keyed by name, type and value.
    fn record_delete(&self, name: &str, rtype: &str, value: &str) -> Result<(), ProviderError>;
}

/// [`SolidDnsApi`] implementation against the SOLIDserver REST API.
pub struct HttpSolidDnsApi {
    client: Client,
    base_url: String,
    username: String,
    password: String,
    dns_smart: String,
    dns_view: Option<String>,
    max_results: usize,
}

impl HttpSolidDnsApi {
    pub fn from_config(config: &SolidDnsConfig) -> Result<Self, ProviderError> {
        let (username, password) = config
            .credentials()
            .map_err(|e| ProviderError::InvalidInput(e.to_string()))?;

        let client = Client::builder()
            .danger_accept_invalid_certs(!config.ssl_verify)
            .build()
            .map_err(|e| ProviderError::UpstreamUnavailable(e.to_string()))?;

        Ok(HttpSolidDnsApi {
            client,
            base_url: format!("https://{}:{}", config.host, config.port),
            username: username.to_string(),
            password: password.to_string(),
            dns_smart: config.dns_smart.clone(),
            dns_view: config.dns_view.clone(),
            max_results: config.max_results,
        })
    }

    fn send(&self, request: RequestBuilder) -> Result<Response, ProviderError> {
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .map_err(|e| ProviderError::UpstreamUnavailable(e.to_string()))?;

        let status = response.status();
        if status.as_u16() >= 400 {
            return Err(ProviderError::UpstreamRejected(format!(
                "status {}",
                status
            )));
        }
        Ok(response)
    }

    fn list<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> Result<Vec<T>, ProviderError> {
        let response = self.send(
            self.client
                .get(format!("{}{}", self.base_url, path))
                .query(query),
        )?;

        let envelope: ListResponse<T> = response
            .json()
            .map_err(|e| ProviderError::UpstreamUnavailable(e.to_string()))?;
        if !envelope.success.unwrap_or(false) {
            return Err(ProviderError::UpstreamRejected(
                "response indicated failure".to_string(),
            ));
        }
        Ok(envelope.data)
    }
}

impl SolidDnsApi for HttpSolidDnsApi {
    fn zones_list(&self) -> Result<Vec<ZoneAuth>, ProviderError> {
        let where_clause = zone_where_clause(&self.dns_smart, self.dns_view.as_deref());
        debug!("Listing zones with filter: {}", where_clause);

        self.list(
            "/rest/dns_zone_list",
            &[
                ("WHERE", where_clause),
                ("limit", self.max_results.to_string()),
            ],
        )
    }

    fn record_list(&self, zone: &ZoneAuth) -> Result<Vec<ResourceRecord>, ProviderError> {
        debug!("Listing records for zone id {} ({})", zone.id, zone.name);

        self.list(
            "/rest/dns_rr_list",
            &[
                ("WHERE", format!("zone_id={}", zone.id)),
                // Sorted listing keeps endpoint grouping deterministic
                ("orderby", "rr_full_name".to_string()),
                ("limit", self.max_results.to_string()),
            ],
        )
        .map_err(|e| e.context(format!("failed to list records for zone {}", zone.name)))
    }

    fn record_add(
        &self,
        name: &str,
        rtype: &str,
        ttl: Ttl,
        value: &str,
    ) -> Result<(), ProviderError> {
        debug!("Creating {} record: {} -> {} (TTL: {})", rtype, name, value, ttl);

        let input = RecordAddInput {
            server_name: &self.dns_smart,
            view_name: self.dns_view.as_deref(),
            rr_name: name,
            rr_type: rtype,
            rr_ttl: ttl,
            rr_value1: value,
        };
        self.send(
            self.client
                .post(format!("{}/rest/dns_rr_add", self.base_url))
                .json(&input),
        )
        .map(|_| ())
        .map_err(|e| e.context(format!("failed to create {} record {}", rtype, name)))
    }

    fn record_delete(&self, name: &str, rtype: &str, value: &str) -> Result<(), ProviderError> {
        debug!("Deleting {} record: {} -> {}", rtype, name, value);

        self.send(
            self.client
                .delete(format!("{}/rest/dns_rr_delete", self.base_url))
                .query(&[
                    ("rr_name", name),
                    ("rr_type", rtype),
                    ("rr_value1", value),
                ]),
        )
        .map(|_| ())
        .map_err(|e| e.context(format!("failed to delete {} record {}", rtype, name)))
    }
}

// WHERE clause for zone listing: required smart/server name plus optional view
fn zone_where_clause(dns_smart: &str, dns_view: Option<&str>) -> String {
    let mut clause = format!("server_name='{}'", dns_smart);
    if let Some(view) = dns_view {
        clause.push_str(&format!(" AND view = '{}'", view));
    }
    clause
}
