//! The `calculate` pipeline: validate, forward, backward, finalize, merge.

use thiserror::Error;

use crate::backward_pass::backward_pass;
use crate::calendar::{format_iso_date, parse_iso_date, WorkCalendar};
use crate::config::{ScheduleConfig, ValidationMode};
use crate::finalize::{critical_chain, finalize};
use crate::forward_pass::forward_pass;
use crate::graph::ActivityGraph;
use crate::log_changes;
use crate::models::Plan;
use crate::schedule::{ActivityTiming, PlanContext, ScheduleReport};
use crate::validation::{collect_issues, PlanIssue};

/// Errors that can occur while scheduling a plan.
#[derive(Error, Debug)]
pub enum ScheduleError {
    #[error("invalid plan: {}", join_issues(.0))]
    InvalidPlan(Vec<PlanIssue>),
    #[error("activity {activity:?} could not be completed within {days} calendar days")]
    HorizonExceeded { activity: String, days: u32 },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
    #[error("plan document error: {0}")]
    Json(#[from] serde_json::Error),
}

fn join_issues(issues: &[PlanIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

impl ScheduleError {
    /// Validation issues carried by this error, if any.
    pub fn issues(&self) -> &[PlanIssue] {
        match self {
            Self::InvalidPlan(issues) => issues,
            _ => &[],
        }
    }
}

/// Schedule `plan` in place and return the typed report.
///
/// Every call recomputes the whole plan from its inputs; previously computed
/// dates, float and critical flags are overwritten. In lenient mode the
/// activities that cannot be reached keep no dates, zero float and are not
/// critical.
pub fn calculate(plan: &mut Plan, config: &ScheduleConfig) -> Result<ScheduleReport, ScheduleError> {
    config.check()?;
    let verbosity = config.verbosity;

    let graph = ActivityGraph::build(&plan.activities);
    let issues = collect_issues(plan, &graph);
    let rejected = match config.validation {
        ValidationMode::Strict => !issues.is_empty(),
        ValidationMode::Lenient => issues.iter().any(PlanIssue::is_fatal),
    };
    if rejected {
        log_changes!(verbosity, "Plan rejected with {} issues", issues.len());
        return Err(ScheduleError::InvalidPlan(issues));
    }
    for issue in &issues {
        log_changes!(verbosity, "Tolerating plan issue: {}", issue);
    }

    // Both are guaranteed by the fatal checks above
    let project_start = plan
        .start_date
        .as_deref()
        .and_then(parse_iso_date)
        .ok_or_else(|| ScheduleError::InvalidPlan(vec![PlanIssue::MissingStartDate]))?;
    let calendar = WorkCalendar::from_plan(plan).ok_or_else(|| {
        ScheduleError::InvalidPlan(vec![PlanIssue::WorkWeekLength(plan.work_week.len())])
    })?;

    let (timings, project_end) = {
        let ctx = PlanContext {
            activities: &plan.activities,
            graph,
            calendar,
            project_start,
            config,
        };
        let forward = forward_pass(&ctx)?;
        let late = backward_pass(&ctx, &forward)?;
        (finalize(&ctx, &forward, &late), forward.project_end)
    };

    merge_into_plan(plan, &timings);

    let unscheduled: Vec<String> = timings
        .iter()
        .filter(|t| !t.is_scheduled())
        .map(|t| t.id.clone())
        .collect();
    let critical_chain = critical_chain(&timings);
    log_changes!(
        verbosity,
        "Project {} -> {}: {} scheduled, {} unscheduled, {} critical",
        project_start,
        project_end,
        timings.len() - unscheduled.len(),
        unscheduled.len(),
        critical_chain.len()
    );

    Ok(ScheduleReport {
        project_start,
        project_end,
        timings,
        critical_chain,
        unscheduled,
        issues,
    })
}

/// Write computed fields back onto the plan's activities.
fn merge_into_plan(plan: &mut Plan, timings: &[ActivityTiming]) {
    let Plan {
        resources,
        activities,
        ..
    } = plan;

    for (activity, timing) in activities.iter_mut().zip(timings) {
        activity.start_date = timing.early_start.map(format_iso_date);
        activity.end_date = timing.early_finish.map(format_iso_date);
        activity.float = timing.float;
        activity.critical_path = timing.critical;

        if let Some(resource) = activity
            .assigned_resource()
            .and_then(|id| resources.iter().find(|r| r.id == id))
        {
            activity.resource_name = Some(resource.name.clone());
        }
    }
}

/// Decode a plan document, schedule it and encode the result.
pub fn calculate_json(json: &str, config: &ScheduleConfig) -> Result<String, ScheduleError> {
    let mut plan = Plan::from_json(json)?;
    calculate(&mut plan, config)?;
    Ok(plan.to_json()?)
}
