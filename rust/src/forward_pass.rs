//! Forward pass: earliest dates under dependencies, resource lanes and the
//! working calendar.

use chrono::NaiveDate;

use crate::engine::ScheduleError;
use crate::interner::ActivityIdx;
use crate::schedule::{PlanContext, Window};
use crate::sorting::{sort_ready, ReadyKey};
use crate::timeline::Timelines;
use crate::{log_changes, log_checks, log_debug};

/// Result of the forward pass.
#[derive(Debug, Clone)]
pub(crate) struct ForwardSchedule {
    /// Early `[start, finish)` per activity; `None` if never reached.
    pub windows: Vec<Option<Window>>,
    /// Latest early finish, never before the plan start.
    pub project_end: NaiveDate,
}

impl ForwardSchedule {
    pub fn window(&self, idx: ActivityIdx) -> Option<Window> {
        self.windows[idx as usize]
    }

    pub fn is_scheduled(&self, idx: ActivityIdx) -> bool {
        self.windows[idx as usize].is_some()
    }
}

/// An activity becomes ready once every predecessor has dates. Activities with
/// dangling dependencies never become ready.
fn is_ready(ctx: &PlanContext<'_>, windows: &[Option<Window>], idx: ActivityIdx) -> bool {
    windows[idx as usize].is_none()
        && ctx.graph.dangling(idx).is_empty()
        && ctx
            .graph
            .predecessors(idx)
            .iter()
            .all(|&p| windows[p as usize].is_some())
}

/// Run the forward pass.
///
/// Each round collects the ready set, orders it by priority and gives every
/// member its dates in turn, so activities sharing a lane queue up behind each
/// other. The pass stops when a round finds nothing ready.
pub(crate) fn forward_pass(ctx: &PlanContext<'_>) -> Result<ForwardSchedule, ScheduleError> {
    let n = ctx.len();
    let verbosity = ctx.config.verbosity;
    let horizon = ctx.config.max_horizon_days;
    let mut windows: Vec<Option<Window>> = vec![None; n];
    let mut timelines = Timelines::new(ctx.project_start);
    let mut remaining = n;
    let mut round = 0usize;

    while remaining > 0 {
        let mut ready: Vec<ReadyKey<'_>> = (0..n as ActivityIdx)
            .filter(|&idx| is_ready(ctx, &windows, idx))
            .map(|idx| ReadyKey {
                priority: ctx.activity(idx).effective_priority(),
                id: ctx.graph.id(idx),
                position: idx,
            })
            .collect();

        if ready.is_empty() {
            log_changes!(
                verbosity,
                "Forward pass stalled with {} activities unscheduled",
                remaining
            );
            break;
        }

        sort_ready(&mut ready, ctx.config.tie_break);
        round += 1;
        log_checks!(
            verbosity,
            "Round {}: ready {:?}",
            round,
            ready.iter().map(|k| k.id).collect::<Vec<_>>()
        );

        for key in &ready {
            let idx = key.position;
            let earliest = ctx
                .graph
                .predecessors(idx)
                .iter()
                .filter_map(|&p| windows[p as usize].map(|w| w.finish))
                .fold(ctx.project_start, NaiveDate::max);

            let lane = ctx.lane(idx);
            let resource = ctx.resource_calendar(idx);
            let free = earliest.max(timelines.available_from(lane));
            let effort = ctx.effort(idx);
            let horizon_exceeded = || ScheduleError::HorizonExceeded {
                activity: key.id.to_string(),
                days: horizon,
            };

            // Work begins on the first day the lane can make progress
            let start = ctx
                .calendar
                .first_available_day(free, resource, horizon)
                .ok_or_else(horizon_exceeded)?;
            log_debug!(
                verbosity,
                "  {}: earliest={} lane={:?} free={} start={} effort={}",
                key.id,
                earliest,
                lane,
                free,
                start,
                effort
            );

            let finish = ctx
                .calendar
                .consume_forward(start, effort, resource, horizon)
                .ok_or_else(horizon_exceeded)?;

            timelines.advance(lane, finish);
            windows[idx as usize] = Some(Window { start, finish });
            remaining -= 1;

            log_changes!(
                verbosity,
                "  Scheduled {} on {} from {} to {}",
                key.id,
                lane.unwrap_or("<unassigned>"),
                start,
                finish
            );
        }
    }

    let project_end = windows
        .iter()
        .flatten()
        .map(|w| w.finish)
        .fold(ctx.project_start, NaiveDate::max);

    Ok(ForwardSchedule {
        windows,
        project_end,
    })
}
