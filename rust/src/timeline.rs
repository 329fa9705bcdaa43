//! Resource availability tracking for the forward pass.

use chrono::NaiveDate;
use rustc_hash::FxHashMap;

/// Tracks the date from which each lane is free again.
///
/// A lane is a resource id, or the single shared lane for unassigned work.
/// Lanes start free at the plan start and only move forward.
#[derive(Clone, Debug)]
pub struct Timelines<'a> {
    origin: NaiveDate,
    unassigned: NaiveDate,
    resources: FxHashMap<&'a str, NaiveDate>,
}

impl<'a> Timelines<'a> {
    pub fn new(origin: NaiveDate) -> Self {
        Self {
            origin,
            unassigned: origin,
            resources: FxHashMap::default(),
        }
    }

    pub fn available_from(&self, lane: Option<&str>) -> NaiveDate {
        match lane {
            Some(resource) => self.resources.get(resource).copied().unwrap_or(self.origin),
            None => self.unassigned,
        }
    }

    /// Mark the lane busy until `until`. Never moves a lane backward.
    pub fn advance(&mut self, lane: Option<&'a str>, until: NaiveDate) {
        let slot = match lane {
            Some(resource) => self.resources.entry(resource).or_insert(self.origin),
            None => &mut self.unassigned,
        };
        if until > *slot {
            *slot = until;
        }
    }
}
