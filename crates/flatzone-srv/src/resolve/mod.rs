//! Upstream resolution for ANAME flattening.
//!
//! - **Upstream**: the transport seam, a single configured resolver.
//! - **ANAME**: turns ANAME RRSets into A/AAAA records at answer time.

pub mod aname;
pub mod upstream;

pub use aname::resolve_aname;
pub use upstream::{AddressFamily, HickoryUpstream, Upstream};
