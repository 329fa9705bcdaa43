//! Calendar-aware critical path scheduling for project plans.
//!
//! Given activities with dependencies, durations and resource assignments plus
//! a working-time calendar, [`calculate`] fills in every activity's start and
//! end date, its float and its critical-path flag, and returns a typed
//! [`ScheduleReport`].
//!
//! Each call runs one pipeline over the whole plan:
//! 1. Validate the plan and build the dependency graph
//! 2. Forward pass: earliest dates under dependencies and resource lanes
//! 3. Backward pass: latest dates that keep the project end
//! 4. Finalize: float in working days and critical-path membership

mod backward_pass;
pub mod calendar;
mod config;
mod engine;
mod finalize;
mod forward_pass;
pub mod graph;
mod interner;
pub mod logging;
mod models;
mod schedule;
pub mod sorting;
mod timeline;
mod validation;

#[cfg(feature = "python")]
mod python;

pub use calendar::{ResourceCalendar, WorkCalendar};
pub use config::{ScheduleConfig, TieBreak, ValidationMode};
pub use engine::{calculate, calculate_json, ScheduleError};
pub use interner::{ActivityIdx, ActivityIndex};
pub use models::{Activity, Plan, Resource, DEFAULT_WORK_WEEK};
pub use schedule::{ActivityTiming, ScheduleReport, Window};
pub use validation::{validate, PlanIssue};
