//! ANAME flattening.
//!
//! Each ANAME value names a target host. The target is looked up upstream
//! for A then AAAA, one query at a time, and every address found becomes a
//! record owned by the ANAME's host with the ANAME's TTL. A failed lookup
//! only loses the addresses of that one query.

use tracing::{info, warn};

use super::upstream::{AddressFamily, Upstream};
use crate::zone::{RRSet, Record, Zone};

/// Fully-qualified lookup name for an ANAME value.
///
/// Values without a trailing dot are relative to the zone.
pub fn target_fqdn(value: &str, zone: &str) -> String {
    if value.ends_with('.') {
        value.to_string()
    } else {
        format!("{value}.{zone}.")
    }
}

/// Resolve every target of an ANAME RRSet into A/AAAA records.
pub async fn resolve_aname(zone: &Zone<'_>, rrset: &RRSet, upstream: &dyn Upstream) -> Vec<Record> {
    let mut records = Vec::new();

    for value in &rrset.values {
        let fqdn = target_fqdn(value, zone.name);

        for family in AddressFamily::ALL {
            let addrs = match upstream.resolve(&fqdn, family).await {
                Ok(addrs) => addrs,
                Err(e) => {
                    warn!(fqdn = %fqdn, rtype = %family.record_type(), error = %e, "ANAME lookup failed");
                    continue;
                }
            };

            for addr in addrs {
                let kind = AddressFamily::of(&addr).kind();
                info!(fqdn = %fqdn, rtype = %kind, addr = %addr, "resolved ANAME");
                records.push(Record {
                    zone: zone.name.to_string(),
                    host: rrset.host.clone(),
                    kind,
                    ttl: rrset.ttl,
                    value: addr.to_string(),
                });
            }
        }
    }

    records
}
