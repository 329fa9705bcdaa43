//! Dependency graph over plan activities.

use std::collections::VecDeque;

use rustc_hash::FxHashSet;

use crate::interner::{ActivityIdx, ActivityIndex};
use crate::models::Activity;

/// Predecessor/successor adjacency for a plan's activities.
///
/// Edges to ids that do not exist are dropped from the adjacency and kept in
/// `dangling` so callers can report them and refuse to schedule the activity.
#[derive(Debug, Clone)]
pub struct ActivityGraph {
    index: ActivityIndex,
    predecessors: Vec<Vec<ActivityIdx>>,
    successors: Vec<Vec<ActivityIdx>>,
    dangling: Vec<Vec<String>>,
    duplicates: Vec<ActivityIdx>,
}

impl ActivityGraph {
    pub fn build(activities: &[Activity]) -> Self {
        let n = activities.len();
        let mut index = ActivityIndex::with_capacity(n);
        let mut duplicates = Vec::new();
        for activity in activities {
            let (idx, fresh) = index.push(&activity.id);
            if !fresh {
                duplicates.push(idx);
            }
        }

        let mut predecessors: Vec<Vec<ActivityIdx>> = vec![Vec::new(); n];
        let mut successors: Vec<Vec<ActivityIdx>> = vec![Vec::new(); n];
        let mut dangling: Vec<Vec<String>> = vec![Vec::new(); n];

        for (pos, activity) in activities.iter().enumerate() {
            let idx = pos as ActivityIdx;
            let mut seen: FxHashSet<&str> = FxHashSet::default();
            for dep_id in &activity.depends_on {
                if !seen.insert(dep_id.as_str()) {
                    continue;
                }
                match index.get(dep_id) {
                    Some(dep) => {
                        predecessors[pos].push(dep);
                        successors[dep as usize].push(idx);
                    }
                    None => dangling[pos].push(dep_id.clone()),
                }
            }
        }

        Self {
            index,
            predecessors,
            successors,
            dangling,
            duplicates,
        }
    }

    pub fn len(&self) -> usize {
        self.index.len()
    }

    pub fn is_empty(&self) -> bool {
        self.index.is_empty()
    }

    /// Id of the activity at `idx`. Indices come from this graph, so the
    /// lookup only misses for foreign indices.
    pub fn id(&self, idx: ActivityIdx) -> &str {
        self.index.resolve(idx).unwrap_or_default()
    }

    pub fn predecessors(&self, idx: ActivityIdx) -> &[ActivityIdx] {
        &self.predecessors[idx as usize]
    }

    pub fn successors(&self, idx: ActivityIdx) -> &[ActivityIdx] {
        &self.successors[idx as usize]
    }

    /// Dependency ids of `idx` that name no activity.
    pub fn dangling(&self, idx: ActivityIdx) -> &[String] {
        &self.dangling[idx as usize]
    }

    /// Indices of activities whose id already appeared earlier in the plan.
    pub fn duplicates(&self) -> &[ActivityIdx] {
        &self.duplicates
    }

    /// Topological order using Kahn's algorithm, seeded in plan order.
    ///
    /// On failure returns the ids of activities that sit on a cycle (or between
    /// two cycles), sorted. Activities merely downstream of a cycle are not
    /// included.
    pub fn topological_order(&self) -> Result<Vec<ActivityIdx>, Vec<String>> {
        let n = self.len();
        let mut in_degree: Vec<usize> = self.predecessors.iter().map(Vec::len).collect();
        let mut queue: VecDeque<ActivityIdx> = (0..n as ActivityIdx)
            .filter(|&i| in_degree[i as usize] == 0)
            .collect();
        let mut order = Vec::with_capacity(n);

        while let Some(idx) = queue.pop_front() {
            order.push(idx);
            for &succ in self.successors(idx) {
                let degree = &mut in_degree[succ as usize];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(succ);
                }
            }
        }

        if order.len() == n {
            return Ok(order);
        }

        Err(self.cycle_members(&order))
    }

    /// Peel leftover nodes that have no leftover successors until only nodes
    /// that can reach a cycle through other leftovers remain.
    fn cycle_members(&self, ordered: &[ActivityIdx]) -> Vec<String> {
        let n = self.len();
        let mut leftover = vec![true; n];
        for &idx in ordered {
            leftover[idx as usize] = false;
        }

        let mut out_degree: Vec<usize> = (0..n)
            .map(|i| {
                self.successors[i]
                    .iter()
                    .filter(|&&s| leftover[s as usize])
                    .count()
            })
            .collect();
        let mut queue: VecDeque<ActivityIdx> = (0..n as ActivityIdx)
            .filter(|&i| leftover[i as usize] && out_degree[i as usize] == 0)
            .collect();

        while let Some(idx) = queue.pop_front() {
            leftover[idx as usize] = false;
            for &pred in self.predecessors(idx) {
                if !leftover[pred as usize] {
                    continue;
                }
                let degree = &mut out_degree[pred as usize];
                *degree -= 1;
                if *degree == 0 {
                    queue.push_back(pred);
                }
            }
        }

        let mut ids: Vec<String> = (0..n as ActivityIdx)
            .filter(|&i| leftover[i as usize])
            .map(|i| self.id(i).to_string())
            .collect();
        ids.sort();
        ids.dedup();
        ids
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn activity(id: &str, deps: &[&str]) -> Activity {
        deps.iter()
            .fold(Activity::new(id, 1.0), |a, dep| a.with_dependency(*dep))
    }

    #[test]
    fn test_adjacency() {
        let activities = vec![
            activity("a", &[]),
            activity("b", &["a"]),
            activity("c", &["a", "b", "a"]),
        ];
        let graph = ActivityGraph::build(&activities);

        assert_eq!(graph.len(), 3);
        assert_eq!(graph.predecessors(2), &[0, 1]);
        assert_eq!(graph.successors(0), &[1, 2]);
        assert_eq!(graph.id(1), "b");
        assert!(graph.duplicates().is_empty());
    }

    #[test]
    fn test_dangling_dependency_recorded() {
        let activities = vec![activity("a", &["ghost"]), activity("b", &["a"])];
        let graph = ActivityGraph::build(&activities);

        assert_eq!(graph.dangling(0), &["ghost".to_string()]);
        assert!(graph.predecessors(0).is_empty());
        assert!(graph.dangling(1).is_empty());
    }

    #[test]
    fn test_duplicate_ids() {
        let activities = vec![activity("a", &[]), activity("a", &[]), activity("b", &["a"])];
        let graph = ActivityGraph::build(&activities);

        assert_eq!(graph.duplicates(), &[1]);
        // References resolve to the first "a"
        assert_eq!(graph.predecessors(2), &[0]);
    }

    #[test]
    fn test_topological_order_diamond() {
        let activities = vec![
            activity("d", &["b", "c"]),
            activity("b", &["a"]),
            activity("c", &["a"]),
            activity("a", &[]),
        ];
        let graph = ActivityGraph::build(&activities);
        let order = graph.topological_order().unwrap();

        let pos = |id: &str| {
            order
                .iter()
                .position(|&i| graph.id(i) == id)
                .unwrap()
        };
        assert!(pos("a") < pos("b"));
        assert!(pos("a") < pos("c"));
        assert!(pos("b") < pos("d"));
        assert!(pos("c") < pos("d"));
    }

    #[test]
    fn test_cycle_reports_members_only() {
        // x -> y -> z -> x is a cycle; w hangs off it; v is independent
        let activities = vec![
            activity("v", &[]),
            activity("x", &["z"]),
            activity("y", &["x"]),
            activity("z", &["y"]),
            activity("w", &["z"]),
        ];
        let graph = ActivityGraph::build(&activities);

        assert_eq!(
            graph.topological_order(),
            Err(vec!["x".to_string(), "y".to_string(), "z".to_string()])
        );
    }

    #[test]
    fn test_self_dependency_is_cycle() {
        let activities = vec![activity("a", &["a"])];
        let graph = ActivityGraph::build(&activities);
        assert_eq!(graph.topological_order(), Err(vec!["a".to_string()]));
    }
}
