//! Upstream transport: A/AAAA lookups against one configured server.
//!
//! Lookups go out once over UDP, are not cached, and are bounded by
//! [`UPSTREAM_TIMEOUT`]. Any CNAME chain behind the target is the upstream
//! server's business; only the final A/AAAA answers are kept.

use async_trait::async_trait;
use hickory_proto::rr::{Name, RData, RecordType};
use hickory_proto::xfer::Protocol;
use hickory_resolver::config::{NameServerConfig, ResolverConfig, ResolverOpts};
use hickory_resolver::name_server::TokioConnectionProvider;
use hickory_resolver::TokioResolver;
use std::net::{IpAddr, SocketAddr};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

use crate::zone::RecordKind;

/// Timeout for one upstream query.
pub const UPSTREAM_TIMEOUT: Duration = Duration::from_secs(10);

/// Address family requested from the upstream.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressFamily {
    V4,
    V6,
}

impl AddressFamily {
    /// Lookup order used for ANAME targets.
    pub const ALL: [Self; 2] = [Self::V4, Self::V6];

    pub const fn record_type(self) -> RecordType {
        match self {
            Self::V4 => RecordType::A,
            Self::V6 => RecordType::AAAA,
        }
    }

    /// Kind of the record synthesized from an address of this family.
    pub const fn kind(self) -> RecordKind {
        match self {
            Self::V4 => RecordKind::A,
            Self::V6 => RecordKind::Aaaa,
        }
    }

    pub const fn of(addr: &IpAddr) -> Self {
        match addr {
            IpAddr::V4(_) => Self::V4,
            IpAddr::V6(_) => Self::V6,
        }
    }
}

/// Resolves a fully-qualified name to addresses of one family.
#[async_trait]
pub trait Upstream: Send + Sync {
    async fn resolve(&self, fqdn: &str, family: AddressFamily) -> crate::Result<Vec<IpAddr>>;
}

/// [`Upstream`] backed by a hickory resolver with a single name server.
pub struct HickoryUpstream {
    server: SocketAddr,
    timeout: Duration,
    resolver: TokioResolver,
}

impl HickoryUpstream {
    /// Create an upstream that queries `server` over UDP.
    pub fn new(server: SocketAddr) -> Self {
        Self::with_timeout(server, UPSTREAM_TIMEOUT)
    }

    pub fn with_timeout(server: SocketAddr, timeout: Duration) -> Self {
        // UDP only: a TCP fallback would restart the clock.
        let name_servers = vec![NameServerConfig::new(server, Protocol::Udp)];
        let config = ResolverConfig::from_parts(None, Vec::new(), name_servers);

        let mut opts = ResolverOpts::default();
        opts.timeout = timeout;
        opts.attempts = 1;
        opts.cache_size = 0;
        opts.recursion_desired = true;

        let resolver = TokioResolver::builder_with_config(config, TokioConnectionProvider::default())
            .with_options(opts)
            .build();

        Self {
            server,
            timeout,
            resolver,
        }
    }
}

#[async_trait]
impl Upstream for HickoryUpstream {
    async fn resolve(&self, fqdn: &str, family: AddressFamily) -> crate::Result<Vec<IpAddr>> {
        let name = Name::from_str(fqdn)
            .map_err(|e| crate::SrvError::Upstream(format!("invalid name {fqdn}: {e}")))?;

        debug!(name = %name, rtype = %family.record_type(), upstream = %self.server, "upstream lookup");

        let lookup = tokio::time::timeout(self.timeout, self.resolver.lookup(name, family.record_type()))
            .await
            .map_err(|_| crate::SrvError::Upstream(format!("{fqdn}: timed out after {:?}", self.timeout)))?
            .map_err(|e| crate::SrvError::Upstream(e.to_string()))?;

        Ok(lookup
            .record_iter()
            .filter_map(|record| rdata_ip_addr(record.data()))
            .filter(|addr| AddressFamily::of(addr) == family)
            .collect())
    }
}

fn rdata_ip_addr(data: &RData) -> Option<IpAddr> {
    match data {
        RData::A(a) => Some(IpAddr::V4(a.0)),
        RData::AAAA(a) => Some(IpAddr::V6(a.0)),
        _ => None,
    }
}
