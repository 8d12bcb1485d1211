//! Answer synthesis: wire records from matched zone records.
//!
//! TTL defaults live in [`ttl_policy`]; SOA serials come from the database
//! file's mtime ([`serial`]).

pub mod serial;
pub mod synth;
pub mod ttl_policy;

pub use serial::soa_serial;
pub use synth::create_rr;
