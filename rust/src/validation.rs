//! Structural checks run before scheduling.
//!
//! All issues are collected rather than stopping at the first one, so an
//! editor can show everything that is wrong with a plan at once.

use rustc_hash::FxHashSet;
use thiserror::Error;

use crate::calendar::{parse_iso_date, work_week_from_slice};
use crate::graph::ActivityGraph;
use crate::models::Plan;

/// A problem found in a plan.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum PlanIssue {
    #[error("plan start date is missing")]
    MissingStartDate,
    #[error("plan start date {0:?} is not a valid YYYY-MM-DD date")]
    InvalidStartDate(String),
    #[error("work week must have 7 entries, found {0}")]
    WorkWeekLength(usize),
    #[error("work week has no working capacity on any day")]
    EmptyWorkWeek,
    #[error("duplicate activity id {0:?}")]
    DuplicateActivityId(String),
    #[error("duplicate resource id {0:?}")]
    DuplicateResourceId(String),
    #[error("activity {activity:?} depends on unknown activity {missing:?}")]
    DanglingDependency { activity: String, missing: String },
    #[error("activity {activity:?} is assigned to unknown resource {resource:?}")]
    DanglingResource { activity: String, resource: String },
    #[error("{context} has invalid date {value:?}")]
    InvalidDate { context: String, value: String },
    #[error("dependency cycle among activities: {}", .ids.join(", "))]
    CycleDetected { ids: Vec<String> },
}

impl PlanIssue {
    /// Fatal issues make scheduling impossible in any validation mode.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Self::MissingStartDate
                | Self::InvalidStartDate(_)
                | Self::WorkWeekLength(_)
                | Self::EmptyWorkWeek
        )
    }
}

/// Check a plan and return every issue found.
pub fn validate(plan: &Plan) -> Vec<PlanIssue> {
    let graph = ActivityGraph::build(&plan.activities);
    collect_issues(plan, &graph)
}

pub(crate) fn collect_issues(plan: &Plan, graph: &ActivityGraph) -> Vec<PlanIssue> {
    let mut issues = Vec::new();

    match plan.start_date.as_deref() {
        None => issues.push(PlanIssue::MissingStartDate),
        Some(raw) if parse_iso_date(raw).is_none() => {
            issues.push(PlanIssue::InvalidStartDate(raw.to_string()))
        }
        Some(_) => {}
    }

    match work_week_from_slice(&plan.work_week) {
        None => issues.push(PlanIssue::WorkWeekLength(plan.work_week.len())),
        Some(week) if week.iter().all(|&c| c <= 0.0) => issues.push(PlanIssue::EmptyWorkWeek),
        Some(_) => {}
    }

    for &idx in graph.duplicates() {
        issues.push(PlanIssue::DuplicateActivityId(graph.id(idx).to_string()));
    }

    let mut resource_ids: FxHashSet<&str> = FxHashSet::default();
    for resource in &plan.resources {
        if !resource_ids.insert(resource.id.as_str()) {
            issues.push(PlanIssue::DuplicateResourceId(resource.id.clone()));
        }
    }

    for (pos, activity) in plan.activities.iter().enumerate() {
        for missing in graph.dangling(pos as u32) {
            issues.push(PlanIssue::DanglingDependency {
                activity: activity.id.clone(),
                missing: missing.clone(),
            });
        }
        if let Some(resource) = activity.assigned_resource() {
            if !resource_ids.contains(resource) {
                issues.push(PlanIssue::DanglingResource {
                    activity: activity.id.clone(),
                    resource: resource.to_string(),
                });
            }
        }
    }

    for holiday in &plan.holidays {
        if parse_iso_date(holiday).is_none() {
            issues.push(PlanIssue::InvalidDate {
                context: "holidays".to_string(),
                value: holiday.clone(),
            });
        }
    }
    for resource in &plan.resources {
        for day in &resource.days_off {
            if parse_iso_date(day).is_none() {
                issues.push(PlanIssue::InvalidDate {
                    context: format!("resource {:?} days off", resource.id),
                    value: day.clone(),
                });
            }
        }
    }

    if let Err(ids) = graph.topological_order() {
        issues.push(PlanIssue::CycleDetected { ids });
    }

    issues
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::{Activity, Resource};

    fn valid_plan() -> Plan {
        let mut plan = Plan::new("2024-01-01");
        plan.resources.push(Resource::new("r1"));
        plan.activities.push(Activity::new("a", 1.0).with_resource("r1"));
        plan.activities.push(Activity::new("b", 2.0).with_dependency("a"));
        plan
    }

    #[test]
    fn test_valid_plan_has_no_issues() {
        assert!(validate(&valid_plan()).is_empty());
    }

    #[test]
    fn test_start_date_issues() {
        let mut plan = valid_plan();
        plan.start_date = None;
        assert_eq!(validate(&plan), vec![PlanIssue::MissingStartDate]);

        plan.start_date = Some("01/02/2024".to_string());
        let issues = validate(&plan);
        assert_eq!(issues, vec![PlanIssue::InvalidStartDate("01/02/2024".to_string())]);
        assert!(issues[0].is_fatal());
    }

    #[test]
    fn test_work_week_issues() {
        let mut plan = valid_plan();
        plan.work_week = vec![1.0; 5];
        assert_eq!(validate(&plan), vec![PlanIssue::WorkWeekLength(5)]);

        plan.work_week = vec![0.0; 7];
        assert_eq!(validate(&plan), vec![PlanIssue::EmptyWorkWeek]);
    }

    #[test]
    fn test_reference_issues_are_not_fatal() {
        let mut plan = valid_plan();
        plan.activities.push(Activity::new("a", 1.0));
        plan.activities.push(Activity::new("c", 1.0).with_dependency("nope").with_resource("r9"));
        plan.resources.push(Resource::new("r1"));

        let issues = validate(&plan);
        assert_eq!(
            issues,
            vec![
                PlanIssue::DuplicateActivityId("a".to_string()),
                PlanIssue::DuplicateResourceId("r1".to_string()),
                PlanIssue::DanglingDependency {
                    activity: "c".to_string(),
                    missing: "nope".to_string(),
                },
                PlanIssue::DanglingResource {
                    activity: "c".to_string(),
                    resource: "r9".to_string(),
                },
            ]
        );
        assert!(issues.iter().all(|i| !i.is_fatal()));
    }

    #[test]
    fn test_invalid_calendar_dates() {
        let mut plan = valid_plan();
        plan.holidays.push("2024-13-01".to_string());
        plan.resources[0].days_off.push("soon".to_string());

        let issues = validate(&plan);
        assert_eq!(issues.len(), 2);
        assert_eq!(
            issues[1].to_string(),
            "resource \"r1\" days off has invalid date \"soon\""
        );
    }

    #[test]
    fn test_cycle_detected() {
        let mut plan = valid_plan();
        plan.activities[0].depends_on.push("b".to_string());

        let issues = validate(&plan);
        assert_eq!(
            issues,
            vec![PlanIssue::CycleDetected {
                ids: vec!["a".to_string(), "b".to_string()]
            }]
        );
        assert_eq!(
            issues[0].to_string(),
            "dependency cycle among activities: a, b"
        );
    }
}
