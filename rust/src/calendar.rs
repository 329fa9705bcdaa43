//! Working-time calendar.
//!
//! Capacity of a day is the week pattern value for its weekday, forced to zero
//! on plan holidays and on the resource's own days off, then scaled by the
//! resource allocation. The forward and backward passes both walk the calendar
//! through this one evaluator so their results stay symmetric.

use chrono::{Datelike, NaiveDate};
use rustc_hash::{FxHashMap, FxHashSet};

use crate::models::Plan;

/// Slack allowed when comparing accumulated progress against required effort.
const PROGRESS_EPSILON: f64 = 1e-9;

/// Parse an ISO `YYYY-MM-DD` date. A trailing time component is ignored.
pub fn parse_iso_date(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    let date_part = value.split_once('T').map_or(value, |(date, _)| date);
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

pub fn format_iso_date(date: NaiveDate) -> String {
    date.format("%Y-%m-%d").to_string()
}

/// Convert a plan's `workWeek` into a fixed Sunday..Saturday array.
///
/// Returns `None` unless there are exactly seven entries. Entries are clamped
/// to [0, 1]; non-numbers count as zero.
pub fn work_week_from_slice(values: &[f64]) -> Option<[f64; 7]> {
    let values: [f64; 7] = values.try_into().ok()?;
    Some(values.map(|v| if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 }))
}

/// Per-resource calendar data.
#[derive(Clone, Debug, PartialEq)]
pub struct ResourceCalendar {
    allocation: f64,
    days_off: FxHashSet<NaiveDate>,
}

impl ResourceCalendar {
    pub fn new(allocation: f64) -> Self {
        Self {
            allocation,
            days_off: FxHashSet::default(),
        }
    }

    pub fn with_day_off(mut self, date: NaiveDate) -> Self {
        self.days_off.insert(date);
        self
    }

    pub fn allocation(&self) -> f64 {
        self.allocation
    }

    pub fn is_day_off(&self, date: NaiveDate) -> bool {
        self.days_off.contains(&date)
    }
}

/// Calendar shared by every resource in a plan.
#[derive(Clone, Debug)]
pub struct WorkCalendar {
    work_week: [f64; 7],
    holidays: FxHashSet<NaiveDate>,
    resources: FxHashMap<String, ResourceCalendar>,
}

impl WorkCalendar {
    pub fn new(work_week: [f64; 7]) -> Self {
        Self {
            work_week,
            holidays: FxHashSet::default(),
            resources: FxHashMap::default(),
        }
    }

    /// Build the calendar for a plan.
    ///
    /// Unparsable holiday and day-off entries are skipped; validation reports
    /// them. Returns `None` when the week pattern is malformed.
    pub fn from_plan(plan: &Plan) -> Option<Self> {
        let mut calendar = Self::new(work_week_from_slice(&plan.work_week)?);
        calendar
            .holidays
            .extend(plan.holidays.iter().filter_map(|h| parse_iso_date(h)));

        for resource in &plan.resources {
            // First definition wins for duplicated ids, like activity lookups.
            if calendar.resources.contains_key(&resource.id) {
                continue;
            }
            let mut entry = ResourceCalendar::new(resource.effective_allocation());
            entry
                .days_off
                .extend(resource.days_off.iter().filter_map(|d| parse_iso_date(d)));
            calendar.resources.insert(resource.id.clone(), entry);
        }
        Some(calendar)
    }

    pub fn with_holiday(mut self, date: NaiveDate) -> Self {
        self.holidays.insert(date);
        self
    }

    pub fn with_resource(mut self, id: impl Into<String>, resource: ResourceCalendar) -> Self {
        self.resources.insert(id.into(), resource);
        self
    }

    pub fn resource(&self, id: &str) -> Option<&ResourceCalendar> {
        self.resources.get(id)
    }

    /// Week pattern with holidays applied, independent of any resource.
    pub fn plan_capacity(&self, date: NaiveDate) -> f64 {
        if self.holidays.contains(&date) {
            return 0.0;
        }
        self.work_week[date.weekday().num_days_from_sunday() as usize]
    }

    /// Effective daily progress rate for `resource` (or the unassigned lane).
    pub fn capacity(&self, date: NaiveDate, resource: Option<&ResourceCalendar>) -> f64 {
        let available = self.plan_capacity(date);
        match resource {
            Some(r) if r.is_day_off(date) => 0.0,
            Some(r) => available * r.allocation,
            None => available,
        }
    }

    /// Sum of plan capacity over `[from, to)`. Resource days off are ignored.
    pub fn working_days_between(&self, from: NaiveDate, to: NaiveDate) -> f64 {
        from.iter_days()
            .take_while(|day| *day < to)
            .map(|day| self.plan_capacity(day))
            .sum()
    }

    /// First day at or after `date` with nonzero plan capacity.
    fn next_working_day(&self, date: NaiveDate, horizon: u32) -> Option<NaiveDate> {
        date.iter_days()
            .take(horizon as usize)
            .find(|day| self.plan_capacity(*day) > 0.0)
    }

    /// First day at or after `date` on which `resource` (or the unassigned
    /// lane) makes progress. This is where an activity's work begins.
    pub fn first_available_day(
        &self,
        date: NaiveDate,
        resource: Option<&ResourceCalendar>,
        horizon: u32,
    ) -> Option<NaiveDate> {
        date.iter_days()
            .take(horizon as usize)
            .find(|day| self.capacity(*day, resource) > 0.0)
    }

    /// Consume `effort` starting at `start` and return the end date.
    ///
    /// The end is the day after the last day that contributed progress, moved
    /// forward past days with no plan capacity, so work that finishes on a
    /// Friday ends on the following Monday. Returns `None` if the effort cannot
    /// be met within `horizon` days.
    pub fn consume_forward(
        &self,
        start: NaiveDate,
        effort: f64,
        resource: Option<&ResourceCalendar>,
        horizon: u32,
    ) -> Option<NaiveDate> {
        let mut accumulated = 0.0;
        for day in start.iter_days().take(horizon as usize) {
            accumulated += self.capacity(day, resource);
            if accumulated >= effort - PROGRESS_EPSILON {
                return self.next_working_day(day.succ_opt()?, horizon);
            }
        }
        None
    }

    /// Consume `effort` backward from the exclusive `finish` and return the
    /// latest start date, i.e. the earliest day the walk had to reach.
    pub fn consume_backward(
        &self,
        finish: NaiveDate,
        effort: f64,
        resource: Option<&ResourceCalendar>,
        horizon: u32,
    ) -> Option<NaiveDate> {
        let mut accumulated = 0.0;
        let mut day = finish;
        for _ in 0..horizon {
            day = day.pred_opt()?;
            accumulated += self.capacity(day, resource);
            if accumulated >= effort - PROGRESS_EPSILON {
                return Some(day);
            }
        }
        None
    }
}
