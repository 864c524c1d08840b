//! Wire types for the SOLIDserver REST API.
//!
//! The appliance serializes every field as a string, including numbers; TTL
//! parsing therefore happens in the translation layer, not here.

use std::fmt::Display;

use serde::{Deserialize, Serialize};

use crate::endpoint::Ttl;

/// An authoritative zone as reported by `dns_zone_list`.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ZoneAuth {
    #[serde(rename = "zone_name")]
    pub name: String,
    #[serde(rename = "zone_type")]
    pub zone_type: String,
    /// Opaque appliance identifier, used as the key for record queries.
    #[serde(rename = "zone_id")]
    pub id: String,
}

impl Display for ZoneAuth {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} ({}, id {})", self.name, self.zone_type, self.id)
    }
}

/// One resource-record row from `dns_rr_list`: a single (name, type, value)
/// tuple. Multi-valued records appear as multiple rows sharing a name.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ResourceRecord {
    #[serde(rename = "rr_full_name")]
    pub full_name: String,
    #[serde(rename = "rr_type")]
    pub rtype: String,
    /// String-encoded and occasionally malformed on real appliances.
    #[serde(rename = "rr_ttl")]
    pub ttl: String,
    #[serde(rename = "rr_all_value")]
    pub value: String,
}

/// Request body for `dns_rr_add`. One call creates exactly one row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RecordAddInput<'a> {
    pub server_name: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub view_name: Option<&'a str>,
    pub rr_name: &'a str,
    pub rr_type: &'a str,
    pub rr_ttl: Ttl,
    pub rr_value1: &'a str,
}

/// Response envelope wrapped around list results.
#[derive(Debug, Deserialize)]
pub struct ListResponse<T> {
    pub success: Option<bool>,
    #[serde(default = "Vec::new")]
    pub data: Vec<T>,
}
