//! Zone locator: longest-suffix search over the database.

use super::database::{RRSet, ZoneDatabase};

/// A zone found for a query: its name and RRSets in configuration order.
#[derive(Debug, Clone, Copy)]
pub struct Zone<'a> {
    pub name: &'a str,
    pub rrsets: &'a [RRSet],
}

/// Candidate zone names for `domain`, most specific first.
///
/// `a.b.c` yields `a.b.c`, `b.c`, `c`.
pub fn search_names(domain: &str) -> Vec<&str> {
    let mut names = vec![domain];
    let mut rest = domain;
    while let Some((_, parent)) = rest.split_once('.') {
        names.push(parent);
        rest = parent;
    }
    names
}

impl ZoneDatabase {
    /// Find the zone with the longest name that is a suffix of `domain`.
    ///
    /// `domain` must already be lowercase without a trailing dot.
    pub fn find_zone(&self, domain: &str) -> Option<Zone<'_>> {
        search_names(domain)
            .into_iter()
            .find_map(|candidate| self.entry(candidate))
            .map(|(name, rrsets)| Zone { name, rrsets })
    }
}
