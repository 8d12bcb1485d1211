//! Record matcher: picks the RRSets of a zone that answer a query.
//!
//! For the queried host label, an RRSet is emitted value by value when its
//! type equals the query type, when the query is ANY, or when it is a CNAME.
//! ANAME RRSets are never emitted themselves; they are flattened for A, AAAA
//! and ANY queries.
//! Output order follows the configuration: RRSets in order, then values in
//! order, with flattened ANAME records at the position of their RRSet.

use hickory_proto::rr::RecordType;

use super::locator::Zone;
use super::record::Record;
use crate::resolve::{resolve_aname, Upstream};

impl Zone<'_> {
    /// Host label of `domain` relative to this zone, empty at the apex.
    pub fn host_label<'d>(&self, domain: &'d str) -> &'d str {
        domain
            .strip_suffix(self.name)
            .unwrap_or(domain)
            .trim_end_matches('.')
    }

    /// All records answering (`domain`, `qtype`) in this zone.
    ///
    /// An empty result means the name exists but has no data of that type.
    pub async fn find_records(
        &self,
        domain: &str,
        qtype: RecordType,
        upstream: &dyn Upstream,
    ) -> Vec<Record> {
        let host = self.host_label(domain);
        let mut records = Vec::new();

        for rrset in self.rrsets.iter().filter(|rrset| rrset.host == host) {
            if rrset.kind.answers(qtype) {
                records.extend(rrset.values.iter().map(|value| Record {
                    zone: self.name.to_string(),
                    host: host.to_string(),
                    kind: rrset.kind.clone(),
                    ttl: rrset.ttl,
                    value: value.clone(),
                }));
            }

            if rrset.kind.flattens_for(qtype) {
                records.extend(resolve_aname(self, rrset, upstream).await);
            }
        }

        records
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolve::aname::tests::StubUpstream;
    use crate::zone::{RRSet, RecordKind, ZoneDatabase};

    fn rrset(host: &str, kind: &str, ttl: i64, values: &[&str]) -> RRSet {
        RRSet {
            host: host.into(),
            kind: RecordKind::from(kind.to_string()),
            ttl,
            values: values.iter().map(|v| (*v).to_string()).collect(),
        }
    }

    fn example_db() -> ZoneDatabase {
        let mut db = ZoneDatabase::default();
        db.insert(
            "example.com",
            vec![
                rrset("", "A", 300, &["1.2.3.4"]),
                rrset("", "MX", 3600, &["10 mx1", "20 mx2"]),
                rrset("www", "CNAME", 300, &["example.com."]),
                rrset("mixed", "A", 60, &["192.0.2.1"]),
                rrset("mixed", "ANAME", 90, &["lb.cdn.net."]),
                rrset("mixed", "A", 60, &["192.0.2.2"]),
            ],
        );
        db
    }

    fn find(db: &ZoneDatabase, domain: &str, qtype: RecordType) -> Vec<Record> {
        let upstream = StubUpstream::default().with("lb.cdn.net.", &["198.51.100.7"]);
        let zone = db.find_zone(domain).unwrap();
        tokio_test::block_on(zone.find_records(domain, qtype, &upstream))
    }

    #[test]
    fn test_host_label() {
        let db = example_db();
        let zone = db.find_zone("example.com").unwrap();
        assert_eq!(zone.host_label("example.com"), "");
        assert_eq!(zone.host_label("www.example.com"), "www");
        assert_eq!(zone.host_label("a.b.example.com"), "a.b");
    }

    #[test]
    fn test_apex_a_record() {
        let records = find(&example_db(), "example.com", RecordType::A);
        assert_eq!(
            records,
            vec![Record {
                zone: "example.com".into(),
                host: String::new(),
                kind: RecordKind::A,
                ttl: 300,
                value: "1.2.3.4".into(),
            }]
        );
    }

    #[test]
    fn test_values_flattened_in_order() {
        let records = find(&example_db(), "example.com", RecordType::MX);
        let values: Vec<_> = records.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["10 mx1", "20 mx2"]);
    }

    #[test]
    fn test_cname_returned_for_any_type() {
        for qtype in [RecordType::A, RecordType::AAAA, RecordType::TXT, RecordType::MX] {
            let records = find(&example_db(), "www.example.com", qtype);
            assert_eq!(records.len(), 1, "{qtype}");
            assert_eq!(records[0].kind, RecordKind::Cname);
        }
    }

    #[test]
    fn test_no_matching_type_is_empty() {
        assert!(find(&example_db(), "example.com", RecordType::TXT).is_empty());
        assert!(find(&example_db(), "nohost.example.com", RecordType::A).is_empty());
    }

    #[test]
    fn test_aname_appended_at_rrset_position() {
        let records = find(&example_db(), "mixed.example.com", RecordType::A);
        let values: Vec<_> = records.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["192.0.2.1", "198.51.100.7", "192.0.2.2"]);
        assert_eq!(records[1].ttl, 90);
        assert_eq!(records[1].host, "mixed");
    }

    #[test]
    fn test_any_flattens_aname_without_emitting_it() {
        let records = find(&example_db(), "mixed.example.com", RecordType::ANY);
        let values: Vec<_> = records.iter().map(|r| r.value.as_str()).collect();
        assert_eq!(values, vec!["192.0.2.1", "198.51.100.7", "192.0.2.2"]);
        assert!(records.iter().all(|r| r.kind != RecordKind::Aname));
    }

    #[test]
    fn test_aname_ignored_for_other_types() {
        assert!(find(&example_db(), "mixed.example.com", RecordType::TXT).is_empty());
    }
}
