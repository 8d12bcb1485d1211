//! Record kinds and the flattened per-value record.

use hickory_proto::rr::RecordType;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Record type of an RRSet, parsed from its textual mnemonic.
///
/// `Aname` has no wire representation: it only drives upstream lookups.
/// Mnemonics without a dedicated variant are kept in `Other` so they can
/// still be matched by name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum RecordKind {
    A,
    Aaaa,
    Cname,
    Aname,
    Soa,
    Ns,
    Mx,
    Txt,
    Srv,
    Ptr,
    Other(String),
}

impl RecordKind {
    /// The mnemonic as written in zone files.
    pub fn as_str(&self) -> &str {
        match self {
            Self::A => "A",
            Self::Aaaa => "AAAA",
            Self::Cname => "CNAME",
            Self::Aname => "ANAME",
            Self::Soa => "SOA",
            Self::Ns => "NS",
            Self::Mx => "MX",
            Self::Txt => "TXT",
            Self::Srv => "SRV",
            Self::Ptr => "PTR",
            Self::Other(name) => name,
        }
    }

    /// The wire record type, if this kind has one.
    pub fn record_type(&self) -> Option<RecordType> {
        match self {
            Self::A => Some(RecordType::A),
            Self::Aaaa => Some(RecordType::AAAA),
            Self::Cname => Some(RecordType::CNAME),
            Self::Soa => Some(RecordType::SOA),
            Self::Ns => Some(RecordType::NS),
            Self::Mx => Some(RecordType::MX),
            Self::Txt => Some(RecordType::TXT),
            Self::Srv => Some(RecordType::SRV),
            Self::Ptr => Some(RecordType::PTR),
            Self::Aname => None,
            Self::Other(name) => RecordType::from_str(name).ok(),
        }
    }

    /// Whether an RRSet of this kind answers a query of `qtype` directly.
    ///
    /// CNAME answers every query type; ANY is answered by every kind except
    /// ANAME, which is only ever answered through flattening.
    pub fn answers(&self, qtype: RecordType) -> bool {
        if *self == Self::Aname {
            return false;
        }
        qtype == RecordType::ANY
            || *self == Self::Cname
            || self.record_type() == Some(qtype)
    }

    /// Whether an RRSet of this kind must be flattened for `qtype`.
    pub fn flattens_for(&self, qtype: RecordType) -> bool {
        *self == Self::Aname
            && matches!(qtype, RecordType::ANY | RecordType::A | RecordType::AAAA)
    }
}

impl From<String> for RecordKind {
    fn from(name: String) -> Self {
        match name.to_ascii_uppercase().as_str() {
            "A" => Self::A,
            "AAAA" => Self::Aaaa,
            "CNAME" => Self::Cname,
            "ANAME" => Self::Aname,
            "SOA" => Self::Soa,
            "NS" => Self::Ns,
            "MX" => Self::Mx,
            "TXT" => Self::Txt,
            "SRV" => Self::Srv,
            "PTR" => Self::Ptr,
            other => Self::Other(other.to_string()),
        }
    }
}

impl From<RecordKind> for String {
    fn from(kind: RecordKind) -> Self {
        kind.as_str().to_string()
    }
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One answer value, flattened out of an RRSet (or synthesized from an ANAME).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Record {
    /// Name of the zone the record belongs to.
    pub zone: String,
    /// Zone-relative host label, empty for the apex.
    pub host: String,
    pub kind: RecordKind,
    /// TTL as configured; non-positive values are replaced at synthesis.
    pub ttl: i64,
    pub value: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_from_mnemonic() {
        assert_eq!(RecordKind::from("a".to_string()), RecordKind::A);
        assert_eq!(RecordKind::from("ANAME".to_string()), RecordKind::Aname);
        assert_eq!(
            RecordKind::from("caa".to_string()),
            RecordKind::Other("CAA".into())
        );
    }

    #[test]
    fn test_cname_answers_any_type() {
        assert!(RecordKind::Cname.answers(RecordType::A));
        assert!(RecordKind::Cname.answers(RecordType::MX));
        assert!(!RecordKind::Txt.answers(RecordType::A));
        assert!(RecordKind::Txt.answers(RecordType::ANY));
    }

    #[test]
    fn test_other_kind_matches_by_name() {
        let caa = RecordKind::from("CAA".to_string());
        assert!(caa.answers(RecordType::CAA));
        assert!(!RecordKind::Other("BOGUS".into()).answers(RecordType::A));
    }

    #[test]
    fn test_aname_flattening_types() {
        assert!(RecordKind::Aname.flattens_for(RecordType::A));
        assert!(RecordKind::Aname.flattens_for(RecordType::AAAA));
        assert!(RecordKind::Aname.flattens_for(RecordType::ANY));
        assert!(!RecordKind::Aname.flattens_for(RecordType::MX));
        assert!(!RecordKind::A.flattens_for(RecordType::A));
    }

    #[test]
    fn test_aname_never_answers_directly() {
        assert!(!RecordKind::Aname.answers(RecordType::ANY));
        assert!(!RecordKind::Aname.answers(RecordType::A));
    }
}
