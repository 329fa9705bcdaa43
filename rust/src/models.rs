//! Plan document types.
//!
//! These mirror the JSON plan document edited by the host application. Dates stay
//! ISO strings at this layer; the engine parses them when it builds its calendar,
//! so a malformed date is reported as a plan issue instead of a decode failure.
//!
//! Keys the engine does not know about are kept in `extra` and written back
//! untouched.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// Sunday..Saturday capacities used when a plan omits `workWeek`.
pub const DEFAULT_WORK_WEEK: [f64; 7] = [0.0, 1.0, 1.0, 1.0, 1.0, 1.0, 0.0];

fn default_work_week() -> Vec<f64> {
    DEFAULT_WORK_WEEK.to_vec()
}

/// A worker or unit of capacity.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Resource {
    pub id: String,
    #[serde(default)]
    pub name: String,
    /// Fraction of a calendar day this resource contributes. 0 means unset.
    #[serde(default)]
    pub allocation: f64,
    #[serde(default)]
    pub days_off: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Resource {
    pub fn new(id: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            ..Default::default()
        }
    }

    /// Allocation actually applied to progress.
    ///
    /// Zero (or anything non-positive) falls back to a full day; values above 1
    /// are capped at a full day.
    pub fn effective_allocation(&self) -> f64 {
        if self.allocation.is_finite() && self.allocation > 0.0 {
            self.allocation.min(1.0)
        } else {
            1.0
        }
    }
}

/// A unit of work in the plan.
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Activity {
    pub id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_id: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub resource_name: Option<String>,
    /// Effort in working-day units.
    #[serde(default)]
    pub duration_days: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub end_date: Option<String>,
    #[serde(default)]
    pub depends_on: Vec<String>,
    #[serde(default)]
    pub priority: f64,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Working days of slack (computed).
    #[serde(default)]
    pub float: f64,
    /// Zero-slack membership (computed).
    #[serde(default)]
    pub critical_path: bool,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Activity {
    pub fn new(id: impl Into<String>, duration_days: f64) -> Self {
        Self {
            id: id.into(),
            duration_days,
            ..Default::default()
        }
    }

    pub fn with_resource(mut self, resource_id: impl Into<String>) -> Self {
        self.resource_id = Some(resource_id.into());
        self
    }

    pub fn with_dependency(mut self, activity_id: impl Into<String>) -> Self {
        self.depends_on.push(activity_id.into());
        self
    }

    pub fn with_priority(mut self, priority: f64) -> Self {
        self.priority = priority;
        self
    }

    /// Priority used for ordering; non-finite values count as 0.
    pub fn effective_priority(&self) -> f64 {
        if self.priority.is_finite() {
            self.priority
        } else {
            0.0
        }
    }

    /// The assigned resource id, treating an empty string as unassigned.
    pub fn assigned_resource(&self) -> Option<&str> {
        self.resource_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

/// The aggregate root handed to the engine.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Plan {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub start_date: Option<String>,
    #[serde(default)]
    pub resources: Vec<Resource>,
    #[serde(default)]
    pub activities: Vec<Activity>,
    #[serde(default = "default_work_week")]
    pub work_week: Vec<f64>,
    #[serde(default)]
    pub holidays: Vec<String>,
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Default for Plan {
    fn default() -> Self {
        Self {
            start_date: None,
            resources: Vec::new(),
            activities: Vec::new(),
            work_week: default_work_week(),
            holidays: Vec::new(),
            extra: Map::new(),
        }
    }
}

impl Plan {
    pub fn new(start_date: impl Into<String>) -> Self {
        Self {
            start_date: Some(start_date.into()),
            ..Default::default()
        }
    }

    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    pub fn activity(&self, id: &str) -> Option<&Activity> {
        self.activities.iter().find(|a| a.id == id)
    }
}
