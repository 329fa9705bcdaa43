//! Backward pass: latest dates that still meet the project end.

use crate::engine::ScheduleError;
use crate::forward_pass::ForwardSchedule;
use crate::interner::ActivityIdx;
use crate::schedule::{PlanContext, Window};
use crate::{log_changes, log_checks, log_debug};

/// Successors that take part in the backward pass. Activities the forward
/// pass never reached are ignored.
fn live_successors<'c>(
    ctx: &'c PlanContext<'_>,
    forward: &'c ForwardSchedule,
    idx: ActivityIdx,
) -> impl Iterator<Item = ActivityIdx> + 'c {
    ctx.graph
        .successors(idx)
        .iter()
        .copied()
        .filter(move |&s| forward.is_scheduled(s))
}

/// Run the backward pass over the successor relation.
///
/// An activity is resolved once all of its successors have a late start. Its
/// late finish is the earliest successor late start, or the project end when
/// it has none; effort is then consumed backward through the same calendar the
/// forward pass used. Lanes are not modelled here.
pub(crate) fn backward_pass(
    ctx: &PlanContext<'_>,
    forward: &ForwardSchedule,
) -> Result<Vec<Option<Window>>, ScheduleError> {
    let n = ctx.len();
    let verbosity = ctx.config.verbosity;
    let horizon = ctx.config.max_horizon_days;
    let mut late: Vec<Option<Window>> = vec![None; n];
    let mut remaining = (0..n as ActivityIdx)
        .filter(|&idx| forward.is_scheduled(idx))
        .count();

    while remaining > 0 {
        let ready: Vec<ActivityIdx> = (0..n as ActivityIdx)
            .filter(|&idx| {
                forward.is_scheduled(idx)
                    && late[idx as usize].is_none()
                    && live_successors(ctx, forward, idx).all(|s| late[s as usize].is_some())
            })
            .collect();

        if ready.is_empty() {
            log_changes!(
                verbosity,
                "Backward pass stalled with {} activities unresolved",
                remaining
            );
            break;
        }
        log_checks!(verbosity, "Backward ready: {} activities", ready.len());

        for idx in ready {
            let finish = live_successors(ctx, forward, idx)
                .filter_map(|s| late[s as usize].map(|w| w.start))
                .min()
                .unwrap_or(forward.project_end);

            let start = ctx
                .calendar
                .consume_backward(
                    finish,
                    ctx.effort(idx),
                    ctx.resource_calendar(idx),
                    horizon,
                )
                .ok_or_else(|| ScheduleError::HorizonExceeded {
                    activity: ctx.graph.id(idx).to_string(),
                    days: horizon,
                })?;

            log_debug!(
                verbosity,
                "  {}: late start {} late finish {}",
                ctx.graph.id(idx),
                start,
                finish
            );
            late[idx as usize] = Some(Window { start, finish });
            remaining -= 1;
        }
    }

    Ok(late)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    use crate::calendar::WorkCalendar;
    use crate::config::ScheduleConfig;
    use crate::forward_pass::forward_pass;
    use crate::graph::ActivityGraph;
    use crate::models::{Activity, Plan, Resource};

    fn d(year: i32, month: u32, day: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(year, month, day).unwrap()
    }

    fn run(plan: &Plan) -> (ForwardSchedule, Vec<Option<Window>>) {
        let config = ScheduleConfig::default();
        let ctx = PlanContext {
            activities: &plan.activities,
            graph: ActivityGraph::build(&plan.activities),
            calendar: WorkCalendar::from_plan(plan).unwrap(),
            project_start: d(2024, 1, 1),
            config: &config,
        };
        let forward = forward_pass(&ctx).unwrap();
        let late = backward_pass(&ctx, &forward).unwrap();
        (forward, late)
    }

    #[test]
    fn test_chain_has_no_slack() {
        let mut plan = Plan::new("2024-01-01");
        plan.activities.push(Activity::new("a", 1.0));
        plan.activities.push(Activity::new("b", 1.0).with_dependency("a"));

        let (forward, late) = run(&plan);
        assert_eq!(late[0], forward.windows[0]);
        assert_eq!(late[1], forward.windows[1]);
    }

    #[test]
    fn test_short_branch_gets_slack() {
        // a (5d) and b (1d) both feed c; b can start as late as Friday
        let mut plan = Plan::new("2024-01-01");
        plan.resources.push(Resource::new("r1"));
        plan.resources.push(Resource::new("r2"));
        plan.activities.push(Activity::new("a", 5.0).with_resource("r1"));
        plan.activities.push(Activity::new("b", 1.0).with_resource("r2"));
        plan.activities.push(
            Activity::new("c", 1.0)
                .with_dependency("a")
                .with_dependency("b"),
        );

        let (forward, late) = run(&plan);
        assert_eq!(forward.project_end, d(2024, 1, 9));
        assert_eq!(
            late[2],
            Some(Window {
                start: d(2024, 1, 8),
                finish: d(2024, 1, 9)
            })
        );
        assert_eq!(
            late[1],
            Some(Window {
                start: d(2024, 1, 5),
                finish: d(2024, 1, 8)
            })
        );
        assert_eq!(late[0].map(|w| w.start), Some(d(2024, 1, 1)));
    }

    #[test]
    fn test_unscheduled_successor_is_ignored() {
        let mut plan = Plan::new("2024-01-01");
        plan.activities.push(Activity::new("a", 1.0));
        plan.activities.push(
            Activity::new("b", 1.0)
                .with_dependency("a")
                .with_dependency("ghost"),
        );

        let (forward, late) = run(&plan);
        assert!(!forward.is_scheduled(1));
        assert_eq!(late[1], None);
        // a is a sink as far as the backward pass is concerned
        assert_eq!(late[0].map(|w| w.finish), Some(forward.project_end));
    }
}
