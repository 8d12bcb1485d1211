//! Query engine: one database load and lookup per query.

use hickory_proto::op::ResponseCode;
use hickory_proto::rr::{Record as WireRecord, RecordType};
use std::sync::Arc;
use tracing::{debug, error};

use crate::answer::{create_rr, soa_serial};
use crate::config::ServerConfig;
use crate::resolve::{HickoryUpstream, Upstream};
use crate::zone::database::normalize_name;
use crate::zone::{RecordKind, ZoneDatabase};

/// Answers queries from the zone database named in the configuration.
///
/// Holds only static state; the database itself is read from disk on every
/// query, so edits take effect immediately.
pub struct ZoneEngine {
    config: ServerConfig,
    upstream: Arc<dyn Upstream>,
}

impl ZoneEngine {
    /// Engine flattening ANAMEs through the configured upstream server.
    pub fn new(config: ServerConfig) -> Self {
        let upstream = Arc::new(HickoryUpstream::new(config.upstream));
        Self::with_upstream(config, upstream)
    }

    pub fn with_upstream(config: ServerConfig, upstream: Arc<dyn Upstream>) -> Self {
        Self { config, upstream }
    }

    pub const fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// Answer records and response code for (`domain`, `qtype`).
    ///
    /// SERVFAIL when the database cannot be loaded, NXDOMAIN when no zone
    /// owns `domain`, NOERROR otherwise, even with no answers.
    pub async fn get_zone_rrset(&self, domain: &str, qtype: RecordType) -> (Vec<WireRecord>, ResponseCode) {
        let db = match self.load_database().await {
            Ok(db) => db,
            Err(e) => {
                error!(path = %self.config.database.display(), error = %e, "failed to load database");
                return (Vec::new(), ResponseCode::ServFail);
            }
        };

        let domain = normalize_name(domain);
        let Some(zone) = db.find_zone(&domain) else {
            return (Vec::new(), ResponseCode::NXDomain);
        };

        let records = zone.find_records(&domain, qtype, self.upstream.as_ref()).await;

        let serial = if records.iter().any(|record| record.kind == RecordKind::Soa) {
            soa_serial(&self.config.database).await
        } else {
            0
        };

        let answers: Vec<WireRecord> = records
            .iter()
            .filter_map(|record| create_rr(record, serial))
            .inspect(|rr| debug!(rtype = %qtype, rr = %rr, "zone RR for query"))
            .collect();

        (answers, ResponseCode::NoError)
    }

    async fn load_database(&self) -> crate::Result<ZoneDatabase> {
        let content = tokio::fs::read_to_string(&self.config.database).await?;
        ZoneDatabase::from_yaml(&content)
    }
}
