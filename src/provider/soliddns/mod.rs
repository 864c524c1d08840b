//! [`Provider`] implementation for EfficientIP SOLIDserver (SolidDNS).

mod api;
mod convert;
mod types;

// Re-exports for convenience
pub use self::api::{HttpSolidDnsApi, SolidDnsApi};
pub use self::types::{ResourceRecord, ZoneAuth};

use itertools::Itertools;
use log::{debug, info};

use crate::config::SolidDnsConfig;
use crate::endpoint::{Changes, Endpoint, Ttl, RECORD_TYPE_A};
use crate::filter::DomainFilter;
use crate::provider::{Provider, ProviderError};

/// Provider-specific property marking an A record for reverse-record bookkeeping.
pub const PTR_RECORD_PROPERTY: &str = "efficientip-ptr-record-exists";

#[derive(Debug, Clone, Copy)]
enum ChangeKind {
    Delete,
    Create,
}

/// Translates controller operations into SOLIDserver API calls.
///
/// All state is read-only after construction; every operation queries the
/// appliance fresh. To create a provider, use
/// [`SolidDnsProvider::from_config()`].
pub struct SolidDnsProvider {
    api: Box<dyn SolidDnsApi>,
    domain_filter: DomainFilter,
    dry_run: bool,
    create_ptr: bool,
    default_ttl: Ttl,
}

impl SolidDnsProvider {
    pub fn from_config(
        config: &SolidDnsConfig,
        domain_filter: DomainFilter,
    ) -> Result<Self, ProviderError> {
        let api = HttpSolidDnsApi::from_config(config)?;
        Ok(SolidDnsProvider::new(Box::new(api), domain_filter, config))
    }

    /// Build a provider on top of an arbitrary appliance client.
    pub fn new(
        api: Box<dyn SolidDnsApi>,
        domain_filter: DomainFilter,
        config: &SolidDnsConfig,
    ) -> Self {
        SolidDnsProvider {
            api,
            domain_filter,
            dry_run: config.dry_run,
            create_ptr: config.create_ptr,
            default_ttl: config.default_ttl,
        }
    }

    /// Create one appliance row per endpoint target. Calls are sequential
    /// and abort on the first failure; rows created up to that point stay.
    fn create_endpoint(&self, ep: &Endpoint) -> Result<(), ProviderError> {
        if ep.targets.is_empty() {
            return Err(ProviderError::InvalidInput(format!(
                "no targets provided for record {}",
                ep.dns_name
            )));
        }

        let ttl = ep.record_ttl.unwrap_or(self.default_ttl);
        for target in &ep.targets {
            if self.dry_run {
                info!(
                    "[DryRun] Would create {} record '{}' -> '{}' (TTL: {})",
                    ep.record_type, ep.dns_name, target, ttl
                );
                continue;
            }
            self.api
                .record_add(&ep.dns_name, &ep.record_type, ttl, target)?;
            info!(
                "Created {} record '{}' -> '{}' (TTL: {})",
                ep.record_type, ep.dns_name, target, ttl
            );
        }
        Ok(())
    }

    /// Delete one appliance row per endpoint target, with the same fail-fast
    /// no-rollback semantics as [`SolidDnsProvider::create_endpoint`].
    fn delete_endpoint(&self, ep: &Endpoint) -> Result<(), ProviderError> {
        if ep.targets.is_empty() {
            return Err(ProviderError::InvalidInput(format!(
                "no targets provided for record {}",
                ep.dns_name
            )));
        }

        for target in &ep.targets {
            if self.dry_run {
                info!(
                    "[DryRun] Would delete {} record '{}' -> '{}'",
                    ep.record_type, ep.dns_name, target
                );
                continue;
            }
            self.api
                .record_delete(&ep.dns_name, &ep.record_type, target)?;
            info!(
                "Deleted {} record '{}' -> '{}'",
                ep.record_type, ep.dns_name, target
            );
        }
        Ok(())
    }
}

impl Provider for SolidDnsProvider {
    fn records(&self) -> Result<Vec<Endpoint>, ProviderError> {
        debug!("Fetching DNS records from SolidDNS");

        let zones = self.zones()?;
        let mut endpoints = Vec::new();
        for zone in &zones {
            debug!("Fetching DNS records from zone {}", zone.name);
            let rows = self.api.record_list(zone)?;
            endpoints.extend(convert::endpoints_from_records(rows));
        }

        debug!("Fetched {} endpoints from SolidDNS", endpoints.len());
        Ok(endpoints)
    }

    fn zones(&self) -> Result<Vec<ZoneAuth>, ProviderError> {
        let zones = self
            .api
            .zones_list()
            .map_err(|e| e.context("failed to list zones"))?;

        let matching = zones
            .into_iter()
            .filter(|zone| {
                if self.domain_filter.matches(&zone.name) {
                    true
                } else {
                    debug!(
                        "Ignoring zone '{}' (doesn't match domain filter)",
                        zone.name
                    );
                    false
                }
            })
            .collect_vec();

        debug!("Found {} matching zones", matching.len());
        Ok(matching)
    }

    fn apply_changes(&self, changes: &Changes) -> Result<(), ProviderError> {
        if changes.is_empty() {
            debug!("No changes to apply");
            return Ok(());
        }
        info!("Applying DNS changes to SolidDNS");

        // Fixed phase order: old names are vacated before any new name can
        // collide, and updates never reorder into create-then-delete
        let phases: [(ChangeKind, &[Endpoint]); 4] = [
            (ChangeKind::Delete, &changes.delete),
            (ChangeKind::Delete, &changes.update_old),
            (ChangeKind::Create, &changes.create),
            (ChangeKind::Create, &changes.update_new),
        ];

        for (kind, endpoints) in phases {
            for ep in endpoints {
                match kind {
                    ChangeKind::Delete => self.delete_endpoint(ep).map_err(|e| {
                        e.context(format!("failed to delete endpoint {}", ep.dns_name))
                    })?,
                    ChangeKind::Create => self.create_endpoint(ep).map_err(|e| {
                        e.context(format!("failed to create endpoint {}", ep.dns_name))
                    })?,
                }
            }
        }

        info!("Successfully applied all DNS changes to SolidDNS");
        Ok(())
    }

    fn adjust_endpoints(&self, endpoints: Vec<Endpoint>) -> Result<Vec<Endpoint>, ProviderError> {
        let adjusted = endpoints
            .into_iter()
            .map(|mut ep| {
                if ep.record_ttl.is_none() {
                    ep.record_ttl = Some(self.default_ttl);
                }
                if self.create_ptr && ep.record_type == RECORD_TYPE_A {
                    ep.set_provider_specific(PTR_RECORD_PROPERTY, "true");
                }
                ep
            })
            .collect();
        Ok(adjusted)
    }
}

#[cfg(test)]
mod tests {
    use mockall::Sequence;

    use super::api::MockSolidDnsApi;
    use super::*;
    use crate::endpoint::ProviderSpecificProperty;

    fn zone(name: &str, id: &str) -> ZoneAuth {
        ZoneAuth {
            name: name.to_string(),
            zone_type: "master".to_string(),
            id: id.to_string(),
        }
    }

    fn row(name: &str, rtype: &str, ttl: &str, value: &str) -> ResourceRecord {
        ResourceRecord {
            full_name: name.to_string(),
            rtype: rtype.to_string(),
            ttl: ttl.to_string(),
            value: value.to_string(),
        }
    }

    fn endpoint(name: &str, rtype: &str, targets: &[&str]) -> Endpoint {
        Endpoint {
            dns_name: name.to_string(),
            record_type: rtype.to_string(),
            record_ttl: Some(300),
            targets: targets.iter().map(|t| t.to_string()).collect(),
            ..Default::default()
        }
    }

    fn provider(api: MockSolidDnsApi, config: SolidDnsConfig) -> SolidDnsProvider {
        SolidDnsProvider::new(Box::new(api), DomainFilter::default(), &config)
    }

    #[test]
    fn should_return_records_from_matching_zones_only() {
        let mut api = MockSolidDnsApi::new();
        api.expect_zones_list()
            .times(1)
            .returning(|| Ok(vec![zone("a.com", "1"), zone("b.com", "2")]));
        api.expect_record_list()
            .times(1)
            .withf(|z| z.id == "1")
            .returning(|_| {
                Ok(vec![
                    row("a.com", "A", "300", "1.1.1.1"),
                    row("a.com", "A", "300", "2.2.2.2"),
                    row("www.a.com", "CNAME", "600", "a.com"),
                ])
            });

        let provider = SolidDnsProvider::new(
            Box::new(api),
            DomainFilter::new(vec!["a.com".to_string()], vec![]),
            &SolidDnsConfig::default(),
        );

        let endpoints = provider.records().unwrap();
        assert_eq!(endpoints.len(), 2);
        let grouped = endpoints.iter().find(|e| e.record_type == "A").unwrap();
        assert_eq!(grouped.dns_name, "a.com");
        assert_eq!(grouped.targets, vec!["1.1.1.1", "2.2.2.2"]);
    }

    #[test]
    fn should_filter_zones_preserving_order() {
        let mut api = MockSolidDnsApi::new();
        api.expect_zones_list().returning(|| {
            Ok(vec![
                zone("keep1.com", "1"),
                zone("drop.org", "2"),
                zone("keep2.com", "3"),
            ])
        });

        let provider = SolidDnsProvider::new(
            Box::new(api),
            DomainFilter::new(vec!["keep1.com".to_string(), "keep2.com".to_string()], vec![]),
            &SolidDnsConfig::default(),
        );

        let names: Vec<String> = provider.zones().unwrap().into_iter().map(|z| z.name).collect();
        assert_eq!(names, vec!["keep1.com", "keep2.com"]);
    }

    #[test]
    fn should_propagate_zone_listing_failure() {
        let mut api = MockSolidDnsApi::new();
        api.expect_zones_list()
            .returning(|| Err(ProviderError::UpstreamUnavailable("connection refused".to_string())));

        let provider = provider(api, SolidDnsConfig::default());
        let err = provider.records().unwrap_err();
        assert!(matches!(
            err.root_cause(),
            ProviderError::UpstreamUnavailable(_)
        ));
    }

    #[test]
    fn should_issue_one_create_call_per_target() {
        let mut api = MockSolidDnsApi::new();
        api.expect_record_add()
            .times(3)
            .withf(|name, rtype, ttl, _| name == "a.co" && rtype == "A" && *ttl == 300)
            .returning(|_, _, _, _| Ok(()));

        let provider = provider(api, SolidDnsConfig::default());
        let changes = Changes {
            create: vec![endpoint("a.co", "A", &["1.1.1.1", "2.2.2.2", "3.3.3.3"])],
            ..Default::default()
        };
        provider.apply_changes(&changes).unwrap();
    }

    #[test]
    fn should_abort_create_fan_out_on_first_failure() {
        let mut api = MockSolidDnsApi::new();
        // The third target must never be attempted
        api.expect_record_add()
            .times(2)
            .returning(|_, _, _, value| {
                if value == "1.1.1.1" {
                    Ok(())
                } else {
                    Err(ProviderError::UpstreamRejected("status 500".to_string()))
                }
            });

        let provider = provider(api, SolidDnsConfig::default());
        let changes = Changes {
            create: vec![endpoint("a.co", "A", &["1.1.1.1", "2.2.2.2", "3.3.3.3"])],
            ..Default::default()
        };

        let err = provider.apply_changes(&changes).unwrap_err();
        assert!(matches!(err.root_cause(), ProviderError::UpstreamRejected(_)));
        assert_eq!(err.to_string(), "failed to create endpoint a.co");
    }

    #[test]
    fn should_reject_create_without_targets() {
        let api = MockSolidDnsApi::new();
        let provider = provider(api, SolidDnsConfig::default());
        let changes = Changes {
            create: vec![endpoint("a.co", "A", &[])],
            ..Default::default()
        };

        let err = provider.apply_changes(&changes).unwrap_err();
        assert!(matches!(err.root_cause(), ProviderError::InvalidInput(_)));
    }

    #[test]
    fn should_reject_delete_without_targets() {
        let api = MockSolidDnsApi::new();
        let provider = provider(api, SolidDnsConfig::default());
        let changes = Changes {
            delete: vec![endpoint("a.co", "A", &[])],
            ..Default::default()
        };

        let err = provider.apply_changes(&changes).unwrap_err();
        assert!(matches!(err.root_cause(), ProviderError::InvalidInput(_)));
    }

    #[test]
    fn should_delete_before_create() {
        let mut seq = Sequence::new();
        let mut api = MockSolidDnsApi::new();
        api.expect_record_delete()
            .times(1)
            .withf(|name, rtype, value| name == "old.a.co" && rtype == "A" && value == "1.1.1.1")
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        api.expect_record_add()
            .times(1)
            .withf(|name, _, _, value| name == "new.a.co" && value == "2.2.2.2")
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(()));

        let provider = provider(api, SolidDnsConfig::default());
        let changes = Changes {
            delete: vec![endpoint("old.a.co", "A", &["1.1.1.1"])],
            create: vec![endpoint("new.a.co", "A", &["2.2.2.2"])],
            ..Default::default()
        };
        provider.apply_changes(&changes).unwrap();
    }

    #[test]
    fn should_apply_all_four_phases_in_order() {
        let mut seq = Sequence::new();
        let mut api = MockSolidDnsApi::new();
        api.expect_record_delete()
            .times(1)
            .withf(|name, _, value| name == "gone.a.co" && value == "1.1.1.1")
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        api.expect_record_delete()
            .times(1)
            .withf(|name, _, value| name == "renamed.a.co" && value == "2.2.2.2")
            .in_sequence(&mut seq)
            .returning(|_, _, _| Ok(()));
        api.expect_record_add()
            .times(1)
            .withf(|name, _, _, value| name == "fresh.a.co" && value == "3.3.3.3")
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(()));
        api.expect_record_add()
            .times(1)
            .withf(|name, _, _, value| name == "renamed.a.co" && value == "4.4.4.4")
            .in_sequence(&mut seq)
            .returning(|_, _, _, _| Ok(()));

        let provider = provider(api, SolidDnsConfig::default());
        let changes = Changes {
            delete: vec![endpoint("gone.a.co", "A", &["1.1.1.1"])],
            update_old: vec![endpoint("renamed.a.co", "A", &["2.2.2.2"])],
            create: vec![endpoint("fresh.a.co", "A", &["3.3.3.3"])],
            update_new: vec![endpoint("renamed.a.co", "A", &["4.4.4.4"])],
        };
        provider.apply_changes(&changes).unwrap();
    }

    #[test]
    fn should_abort_remaining_phases_after_failure() {
        let mut api = MockSolidDnsApi::new();
        api.expect_record_delete()
            .times(1)
            .returning(|_, _, _| Err(ProviderError::UpstreamRejected("status 500".to_string())));
        // No record_add expectation: the create phase must never run

        let provider = provider(api, SolidDnsConfig::default());
        let changes = Changes {
            delete: vec![endpoint("old.a.co", "A", &["1.1.1.1"])],
            create: vec![endpoint("new.a.co", "A", &["2.2.2.2"])],
            ..Default::default()
        };
        assert!(provider.apply_changes(&changes).is_err());
    }

    #[test]
    fn should_make_no_appliance_calls_in_dry_run() {
        // Any call on the mock would panic
        let api = MockSolidDnsApi::new();
        let config = SolidDnsConfig {
            dry_run: true,
            ..Default::default()
        };

        let provider = provider(api, config);
        let changes = Changes {
            delete: vec![endpoint("old.a.co", "A", &["1.1.1.1"])],
            create: vec![endpoint("new.a.co", "A", &["2.2.2.2", "3.3.3.3"])],
            ..Default::default()
        };
        provider.apply_changes(&changes).unwrap();
    }

    #[test]
    fn should_use_default_ttl_when_creating_unconfigured_endpoints() {
        let mut api = MockSolidDnsApi::new();
        api.expect_record_add()
            .times(1)
            .withf(|name, _, ttl, value| name == "a.co" && *ttl == 1800 && value == "1.1.1.1")
            .returning(|_, _, _, _| Ok(()));

        let config = SolidDnsConfig {
            default_ttl: 1800,
            ..Default::default()
        };
        let provider = provider(api, config);
        let mut ep = endpoint("a.co", "A", &["1.1.1.1"]);
        ep.record_ttl = None;

        let changes = Changes {
            create: vec![ep],
            ..Default::default()
        };
        provider.apply_changes(&changes).unwrap();
    }

    #[test]
    fn should_adjust_unconfigured_ttl_to_default() {
        let config = SolidDnsConfig {
            default_ttl: 600,
            ..Default::default()
        };
        let provider = provider(MockSolidDnsApi::new(), config);

        let mut unconfigured = endpoint("a.co", "A", &["1.1.1.1"]);
        unconfigured.record_ttl = None;
        let configured = Endpoint {
            record_ttl: Some(120),
            ..endpoint("b.co", "A", &["2.2.2.2"])
        };

        let adjusted = provider
            .adjust_endpoints(vec![unconfigured, configured])
            .unwrap();
        assert_eq!(adjusted[0].record_ttl, Some(600));
        assert_eq!(adjusted[1].record_ttl, Some(120));
    }

    #[test]
    fn should_track_ptr_for_a_records_when_enabled() {
        let config = SolidDnsConfig {
            create_ptr: true,
            ..Default::default()
        };
        let provider = provider(MockSolidDnsApi::new(), config);

        let adjusted = provider
            .adjust_endpoints(vec![
                endpoint("a.co", "A", &["1.1.1.1"]),
                endpoint("alias.a.co", "CNAME", &["a.co"]),
            ])
            .unwrap();

        assert_eq!(
            adjusted[0].get_provider_specific(PTR_RECORD_PROPERTY),
            Some("true")
        );
        assert_eq!(adjusted[1].get_provider_specific(PTR_RECORD_PROPERTY), None);
    }

    #[test]
    fn should_update_existing_ptr_property_in_place() {
        let config = SolidDnsConfig {
            create_ptr: true,
            ..Default::default()
        };
        let provider = provider(MockSolidDnsApi::new(), config);

        let mut ep = endpoint("a.co", "A", &["1.1.1.1"]);
        ep.provider_specific.push(ProviderSpecificProperty {
            name: PTR_RECORD_PROPERTY.to_string(),
            value: "false".to_string(),
        });

        let adjusted = provider.adjust_endpoints(vec![ep]).unwrap();
        assert_eq!(adjusted[0].provider_specific.len(), 1);
        assert_eq!(
            adjusted[0].get_provider_specific(PTR_RECORD_PROPERTY),
            Some("true")
        );
    }

    #[test]
    fn should_not_track_ptr_when_disabled() {
        let provider = provider(MockSolidDnsApi::new(), SolidDnsConfig::default());

        let adjusted = provider
            .adjust_endpoints(vec![endpoint("a.co", "A", &["1.1.1.1"])])
            .unwrap();
        assert!(adjusted[0].provider_specific.is_empty());
    }
}
