//! The canonical record model spoken by the external-dns controller.
//!
//! An [`Endpoint`] is one logical (name, type) record carrying one or more
//! target values, while the appliance stores one row per value. The
//! [`crate::provider`] module translates between the two shapes.

use std::{collections::HashMap, fmt::Display};

/// Numeric record TTL in seconds.
pub type Ttl = u32;

pub const RECORD_TYPE_A: &str = "A";
pub const RECORD_TYPE_TXT: &str = "TXT";
pub const RECORD_TYPE_CNAME: &str = "CNAME";

/// A single provider-specific key/value annotation attached to an endpoint.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProviderSpecificProperty {
    pub name: String,
    pub value: String,
}

/// One logical DNS record as seen by the controller.
///
/// A TTL of `None` means "not configured"; the provider substitutes its
/// default TTL during endpoint adjustment.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Endpoint {
    pub dns_name: String,
    pub record_type: String,
    pub record_ttl: Option<Ttl>,
    /// Target values in first-seen order. Multi-valued for grouped A records,
    /// always a single element for TXT and CNAME.
    pub targets: Vec<String>,
    pub labels: HashMap<String, String>,
    pub provider_specific: Vec<ProviderSpecificProperty>,
}

impl Endpoint {
    /// Create an endpoint without a configured TTL.
    pub fn new(dns_name: impl Into<String>, record_type: impl Into<String>, target: impl Into<String>) -> Self {
        Endpoint {
            dns_name: dns_name.into(),
            record_type: record_type.into(),
            targets: vec![target.into()],
            ..Default::default()
        }
    }

    /// Create a single-target endpoint with an explicit TTL.
    pub fn with_ttl(
        dns_name: impl Into<String>,
        record_type: impl Into<String>,
        ttl: Ttl,
        target: impl Into<String>,
    ) -> Self {
        Endpoint {
            record_ttl: Some(ttl),
            ..Endpoint::new(dns_name, record_type, target)
        }
    }

    /// Set a provider-specific annotation, overwriting an existing entry of
    /// the same name in place instead of appending a duplicate.
    pub fn set_provider_specific(&mut self, name: &str, value: &str) {
        match self.provider_specific.iter_mut().find(|p| p.name == name) {
            Some(existing) => existing.value = value.to_string(),
            None => self.provider_specific.push(ProviderSpecificProperty {
                name: name.to_string(),
                value: value.to_string(),
            }),
        }
    }

    pub fn get_provider_specific(&self, name: &str) -> Option<&str> {
        self.provider_specific
            .iter()
            .find(|p| p.name == name)
            .map(|p| p.value.as_str())
    }
}

impl Display for Endpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "{} {} [{}]",
            self.dns_name,
            self.record_type,
            self.targets.join(", ")
        )
    }
}

/// A batch of endpoint changes submitted by the controller.
///
/// `update_old`/`update_new` hold the before/after halves of updates, which
/// are applied as delete-then-create.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Changes {
    pub create: Vec<Endpoint>,
    pub update_old: Vec<Endpoint>,
    pub update_new: Vec<Endpoint>,
    pub delete: Vec<Endpoint>,
}

impl Changes {
    pub fn is_empty(&self) -> bool {
        self.create.is_empty()
            && self.update_old.is_empty()
            && self.update_new.is_empty()
            && self.delete.is_empty()
    }
}
