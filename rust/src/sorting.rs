//! Ordering of ready activities in the forward pass.
//!
//! Higher priority goes first. Equal priorities fall back to the configured
//! tie-break and finally to plan order, which keeps the result reproducible.

use std::cmp::Ordering;

use crate::config::TieBreak;
use crate::interner::ActivityIdx;

/// Sort key for one ready activity (lower sorts first).
#[derive(Debug, Clone, PartialEq)]
pub struct ReadyKey<'a> {
    pub priority: f64,
    pub id: &'a str,
    pub position: ActivityIdx,
}

/// Total order over f64 so a stray NaN cannot break the sort.
fn cmp_f64(a: f64, b: f64) -> Ordering {
    a.total_cmp(&b)
}

impl ReadyKey<'_> {
    pub fn compare(&self, other: &Self, tie_break: TieBreak) -> Ordering {
        let by_priority = cmp_f64(other.priority, self.priority);
        let by_tie_break = match tie_break {
            TieBreak::InputOrder => Ordering::Equal,
            TieBreak::IdAscending => self.id.cmp(other.id),
        };
        by_priority
            .then(by_tie_break)
            .then(self.position.cmp(&other.position))
    }
}

/// Sort ready keys into scheduling order.
pub fn sort_ready(keys: &mut [ReadyKey<'_>], tie_break: TieBreak) {
    keys.sort_by(|a, b| a.compare(b, tie_break));
}
