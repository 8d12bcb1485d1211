//! Zone data and lookup.
//!
//! The database maps zone names to ordered RRSets. A query first finds the
//! owning zone by longest suffix, then selects the RRSets for its host label.

pub mod database;
pub mod locator;
pub mod matcher;
pub mod record;

pub use database::{RRSet, ZoneDatabase};
pub use locator::Zone;
pub use record::{Record, RecordKind};
