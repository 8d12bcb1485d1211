//! flatzone-srv: authoritative DNS zone engine with ANAME flattening.
//!
//! Answers queries from a static YAML zone database that is reloaded on
//! every query. ANAME records are resolved against an upstream server at
//! answer time and returned as plain A/AAAA records, so an alias can live
//! at a zone apex.
//!
//! # Architecture
//!
//! A query flows through these stages:
//! - [`zone::locator`] - longest-suffix search for the owning zone
//! - [`zone::matcher`] - RRSet selection by host label and type (CNAME/ANY rules)
//! - [`resolve::aname`] - upstream A/AAAA lookups for ANAME targets
//! - [`answer::synth`] - wire records, default TTLs and the SOA serial
//!
//! [`engine::ZoneEngine`] ties the stages together and [`server`] serves it
//! over UDP and TCP with hickory.

pub mod answer;
pub mod config;
pub mod engine;
pub mod error;
pub mod resolve;
pub mod server;
pub mod zone;

// Re-exports for convenience.
pub use config::ServerConfig;
pub use engine::ZoneEngine;
pub use error::SrvError;

/// Result type for flatzone-srv operations.
pub type Result<T> = std::result::Result<T, SrvError>;
