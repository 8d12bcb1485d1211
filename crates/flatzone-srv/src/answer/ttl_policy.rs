//! TTL and SOA timer defaults.

/// TTL used when an RRSet has no positive TTL.
pub const DEFAULT_TTL: u32 = 60;

/// SOA refresh interval (Hickory uses i32 for SOA fields).
pub const SOA_REFRESH: i32 = 3600;

/// SOA retry interval.
pub const SOA_RETRY: i32 = 900;

/// SOA expire interval.
pub const SOA_EXPIRE: i32 = 604_800;

/// SOA minimum TTL (negative caching).
pub const SOA_MINIMUM_TTL: u32 = 300;

/// TTL to emit for a configured TTL.
pub fn effective_ttl(ttl: i64) -> u32 {
    if ttl <= 0 {
        DEFAULT_TTL
    } else {
        u32::try_from(ttl).unwrap_or(u32::MAX)
    }
}
