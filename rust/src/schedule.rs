//! Shared inputs and results of the scheduling passes.

use chrono::NaiveDate;

use crate::calendar::{ResourceCalendar, WorkCalendar};
use crate::config::ScheduleConfig;
use crate::graph::ActivityGraph;
use crate::interner::ActivityIdx;
use crate::models::Activity;
use crate::validation::PlanIssue;

/// A `[start, finish)` date span.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Window {
    pub start: NaiveDate,
    pub finish: NaiveDate,
}

/// Everything the passes read, resolved once per calculation.
pub(crate) struct PlanContext<'a> {
    pub activities: &'a [Activity],
    pub graph: ActivityGraph,
    pub calendar: WorkCalendar,
    pub project_start: NaiveDate,
    pub config: &'a ScheduleConfig,
}

impl<'a> PlanContext<'a> {
    pub fn len(&self) -> usize {
        self.activities.len()
    }

    pub fn activity(&self, idx: ActivityIdx) -> &'a Activity {
        &self.activities[idx as usize]
    }

    /// Required effort with the duration floor applied.
    pub fn effort(&self, idx: ActivityIdx) -> f64 {
        self.config
            .effective_duration(self.activity(idx).duration_days)
    }

    /// Timeline lane: the resource id, or `None` for the unassigned lane.
    pub fn lane(&self, idx: ActivityIdx) -> Option<&'a str> {
        self.activity(idx).assigned_resource()
    }

    /// Calendar of the assigned resource. Unknown resources get none, which
    /// means full allocation and no days off.
    pub fn resource_calendar(&self, idx: ActivityIdx) -> Option<&ResourceCalendar> {
        self.lane(idx).and_then(|id| self.calendar.resource(id))
    }
}

/// Computed timing for one activity.
#[derive(Clone, Debug, PartialEq)]
pub struct ActivityTiming {
    pub id: String,
    pub early_start: Option<NaiveDate>,
    pub early_finish: Option<NaiveDate>,
    pub late_start: Option<NaiveDate>,
    pub late_finish: Option<NaiveDate>,
    /// Working days of slack.
    pub float: f64,
    pub critical: bool,
}

impl ActivityTiming {
    pub fn is_scheduled(&self) -> bool {
        self.early_start.is_some()
    }
}

/// Outcome of a `calculate` call.
#[derive(Clone, Debug, PartialEq)]
pub struct ScheduleReport {
    pub project_start: NaiveDate,
    /// Latest end date, or the project start when nothing was scheduled.
    pub project_end: NaiveDate,
    /// One entry per activity, in plan order.
    pub timings: Vec<ActivityTiming>,
    /// Critical activity ids ordered by early start.
    pub critical_chain: Vec<String>,
    /// Activities the forward pass could not reach.
    pub unscheduled: Vec<String>,
    /// Issues tolerated under lenient validation.
    pub issues: Vec<PlanIssue>,
}

impl ScheduleReport {
    pub fn timing(&self, id: &str) -> Option<&ActivityTiming> {
        self.timings.iter().find(|t| t.id == id)
    }

    pub fn is_complete(&self) -> bool {
        self.unscheduled.is_empty()
    }
}
