//! Float and critical-path derivation from the two passes.

use crate::forward_pass::ForwardSchedule;
use crate::interner::ActivityIdx;
use crate::schedule::{ActivityTiming, PlanContext, Window};

/// Combine early and late windows into per-activity timings.
///
/// Float is counted in plan working days between early and late start, so a
/// resource's personal days off do not add slack. Activities without a late
/// start get zero float and are not critical.
pub(crate) fn finalize(
    ctx: &PlanContext<'_>,
    forward: &ForwardSchedule,
    late: &[Option<Window>],
) -> Vec<ActivityTiming> {
    (0..ctx.len() as ActivityIdx)
        .map(|idx| {
            let early = forward.window(idx);
            let latest = late[idx as usize];
            let (float, critical) = match (early, latest) {
                (Some(e), Some(l)) => {
                    let float = ctx.calendar.working_days_between(e.start, l.start);
                    (float, float <= ctx.config.critical_epsilon)
                }
                _ => (0.0, false),
            };
            ActivityTiming {
                id: ctx.graph.id(idx).to_string(),
                early_start: early.map(|w| w.start),
                early_finish: early.map(|w| w.finish),
                late_start: latest.map(|w| w.start),
                late_finish: latest.map(|w| w.finish),
                float,
                critical,
            }
        })
        .collect()
}

/// Critical activity ids ordered by early start, then plan order.
pub(crate) fn critical_chain(timings: &[ActivityTiming]) -> Vec<String> {
    let mut chain: Vec<(usize, &ActivityTiming)> = timings
        .iter()
        .enumerate()
        .filter(|(_, t)| t.critical)
        .collect();
    chain.sort_by_key(|(pos, t)| (t.early_start, *pos));
    chain.into_iter().map(|(_, t)| t.id.clone()).collect()
}
