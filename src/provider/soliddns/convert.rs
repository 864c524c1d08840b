//! Translation from appliance resource-record rows to controller endpoints.

use std::collections::HashMap;

use log::{debug, warn};

use crate::endpoint::{Endpoint, Ttl, RECORD_TYPE_A, RECORD_TYPE_CNAME, RECORD_TYPE_TXT};

use super::types::ResourceRecord;

/// TTL substituted when a row carries a value that does not parse as a number.
pub const FALLBACK_TTL: Ttl = 300;

/// Collapse the flat row list of one zone into logical endpoints.
///
/// A rows sharing a full name merge into a single endpoint whose targets keep
/// first-seen row order (the rows arrive sorted by name, so grouping is
/// deterministic). TXT and CNAME rows each become their own endpoint, even
/// when names coincide. Rows of any other type are skipped.
pub fn endpoints_from_records(records: Vec<ResourceRecord>) -> Vec<Endpoint> {
    let mut endpoints: Vec<Endpoint> = Vec::new();
    // Grouped A endpoints live in a separate list with a name index so they
    // come out in insertion order
    let mut hosts: Vec<Endpoint> = Vec::new();
    let mut host_index: HashMap<String, usize> = HashMap::new();

    for rr in records {
        let ttl = parse_ttl(&rr);
        match rr.rtype.as_str() {
            RECORD_TYPE_A => match host_index.get(&rr.full_name).copied() {
                Some(i) => hosts[i].targets.push(rr.value),
                None => {
                    host_index.insert(rr.full_name.clone(), hosts.len());
                    hosts.push(Endpoint::with_ttl(rr.full_name, RECORD_TYPE_A, ttl, rr.value));
                }
            },
            RECORD_TYPE_TXT | RECORD_TYPE_CNAME => {
                let rtype = rr.rtype.clone();
                endpoints.push(Endpoint::with_ttl(rr.full_name, rtype, ttl, rr.value));
            }
            other => {
                debug!(
                    "Skipping unsupported record type {} for {}",
                    other, rr.full_name
                );
            }
        }
    }

    endpoints.extend(hosts);
    endpoints
}

fn parse_ttl(rr: &ResourceRecord) -> Ttl {
    match rr.ttl.parse::<Ttl>() {
        Ok(ttl) => ttl,
        Err(_) => {
            warn!(
                "Invalid TTL '{}' for record {}, using default",
                rr.ttl, rr.full_name
            );
            FALLBACK_TTL
        }
    }
}
