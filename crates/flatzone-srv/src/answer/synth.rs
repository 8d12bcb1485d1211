//! Answer synthesizer: turns matched records into hickory wire records.
//!
//! Each record is rendered as a one-line zone file under `$ORIGIN <zone>.`
//! and read back with hickory's zone-file parser, so any type the parser
//! knows can be served. Names without a trailing dot are relative to the
//! zone and `@` stands for the apex.

use hickory_proto::rr::rdata::SOA;
use hickory_proto::rr::{RData, Record as WireRecord};
use hickory_proto::serialize::txt::Parser;
use std::borrow::Cow;
use tracing::warn;

use super::ttl_policy::{self, effective_ttl};
use crate::zone::{Record, RecordKind};

/// Build the wire record for `record`, or `None` if it cannot be built.
///
/// Failures are logged and the record is left out of the answer. SOA
/// records carry `serial` whatever the database says.
pub fn create_rr(record: &Record, serial: u32) -> Option<WireRecord> {
    match build_rr(record, serial) {
        Ok(rr) => Some(rr),
        Err(e) => {
            warn!(
                zone = %record.zone,
                host = %record.host,
                rtype = %record.kind,
                value = %record.value,
                error = %e,
                "failed to create record"
            );
            None
        }
    }
}

/// Fallible core of [`create_rr`].
pub fn build_rr(record: &Record, serial: u32) -> crate::Result<WireRecord> {
    if record.kind == RecordKind::Aname {
        return Err(crate::SrvError::Record("ANAME records have no wire form".into()));
    }
    // Exactly one zone-file line per record.
    if [&record.zone, &record.host, &record.value]
        .iter()
        .any(|field| field.contains(['\n', '\r']))
    {
        return Err(crate::SrvError::Record("line break in record".into()));
    }

    let ttl = effective_ttl(record.ttl);
    let owner = if record.host.is_empty() { "@" } else { record.host.as_str() };
    let value = expand_apex(record.value.trim(), &record.zone);
    let value = match record.kind {
        RecordKind::Soa => soa_with_default_timers(value),
        _ => value,
    };
    let line = format!("$ORIGIN {}.\n{owner} {ttl} IN {} {value}\n", record.zone, record.kind);

    let (_, rrsets) = Parser::new(line, None, None)
        .parse()
        .map_err(|e| crate::SrvError::Record(format!("invalid {} value '{value}': {e}", record.kind)))?;
    let mut parsed = rrsets.into_values().flatten();
    let (Some(rr), None) = (parsed.next(), parsed.next()) else {
        return Err(crate::SrvError::Record(format!(
            "{} value '{value}' is not exactly one record",
            record.kind
        )));
    };

    let owner = rr.name().clone();
    let rdata = match rr.into_data() {
        RData::SOA(soa) => RData::SOA(with_serial(&soa, serial)),
        rdata => rdata,
    };
    Ok(WireRecord::from_rdata(owner, ttl, rdata))
}

/// Replace bare `@` fields with the zone origin; the parser only accepts
/// `@` as an owner.
fn expand_apex<'a>(value: &'a str, zone: &str) -> Cow<'a, str> {
    if !value.split_whitespace().any(|field| field == "@") {
        return Cow::Borrowed(value);
    }
    let origin = format!("{zone}.");
    let fields: Vec<&str> = value
        .split_whitespace()
        .map(|field| if field == "@" { origin.as_str() } else { field })
        .collect();
    Cow::Owned(fields.join(" "))
}

/// Expand the short `mname rname` SOA form with default timers.
fn soa_with_default_timers(value: Cow<'_, str>) -> Cow<'_, str> {
    if value.split_whitespace().count() != 2 {
        return value;
    }
    Cow::Owned(format!(
        "{value} 0 {} {} {} {}",
        ttl_policy::SOA_REFRESH,
        ttl_policy::SOA_RETRY,
        ttl_policy::SOA_EXPIRE,
        ttl_policy::SOA_MINIMUM_TTL,
    ))
}

fn with_serial(soa: &SOA, serial: u32) -> SOA {
    SOA::new(
        soa.mname().clone(),
        soa.rname().clone(),
        serial,
        soa.refresh(),
        soa.retry(),
        soa.expire(),
        soa.minimum(),
    )
}
