//! Dependency graph derived from exposure records.
//!
//! Nodes are record ids; edges point from a record to each id in its `needs.deps`.
//! Records sharing an id merge their dependency sets. Edges to ids no record declares are kept
//! and surface as undefined dependencies.

use selfexpose_types::ExposureRecord;
use std::collections::{BTreeMap, BTreeSet, btree_set};

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct DependencyGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

impl DependencyGraph {
    pub fn from_records(records: &[ExposureRecord]) -> Self {
        let mut edges: BTreeMap<String, BTreeSet<String>> = BTreeMap::new();
        for record in records {
            edges
                .entry(record.id.clone())
                .or_default()
                .extend(record.dependencies().iter().cloned());
        }
        Self { edges }
    }

    pub fn node_count(&self) -> usize {
        self.edges.len()
    }

    pub fn nodes(&self) -> impl Iterator<Item = &str> {
        self.edges.keys().map(String::as_str)
    }

    pub fn contains(&self, id: &str) -> bool {
        self.edges.contains_key(id)
    }

    pub fn dependencies_of(&self, id: &str) -> Option<&BTreeSet<String>> {
        self.edges.get(id)
    }

    /// True if any dependency cycle exists. Stops at the first back edge.
    pub fn has_cycle(&self) -> bool {
        !self.back_edge_cycles(true).is_empty()
    }

    /// Every distinct cycle closed by a depth-first back edge.
    ///
    /// Each cycle lists its members once, starting at its smallest id; `a -> b -> a` is
    /// returned as `["a", "b"]`. The list is sorted.
    pub fn cycles(&self) -> Vec<Vec<String>> {
        self.back_edge_cycles(false).into_iter().collect()
    }

    /// `(dependent, missing)` pairs for dependencies no record declares, sorted.
    pub fn undefined_dependencies(&self) -> Vec<(String, String)> {
        let mut out = Vec::new();
        for (id, deps) in &self.edges {
            for dep in deps {
                if !self.edges.contains_key(dep) {
                    out.push((id.clone(), dep.clone()));
                }
            }
        }
        out
    }

    /// Longest dependency chain, in edges, starting at each node.
    ///
    /// Undeclared targets are leaves. An edge back into the current descent contributes 0, so
    /// cyclic graphs terminate.
    pub fn depths(&self) -> BTreeMap<String, u32> {
        let mut finished: BTreeMap<&str, u32> = BTreeMap::new();
        let mut on_stack: BTreeSet<&str> = BTreeSet::new();

        for (start, start_deps) in &self.edges {
            if finished.contains_key(start.as_str()) {
                continue;
            }
            let mut frames: Vec<(&str, btree_set::Iter<'_, String>, u32)> =
                vec![(start.as_str(), start_deps.iter(), 0)];
            on_stack.insert(start.as_str());

            loop {
                let Some((_, pending, _)) = frames.last_mut() else {
                    break;
                };
                match pending.next() {
                    Some(next) => {
                        let next = next.as_str();
                        let contribution = if let Some(depth) = finished.get(next) {
                            Some(depth + 1)
                        } else if on_stack.contains(next) {
                            Some(0)
                        } else {
                            match self.edges.get(next) {
                                Some(deps) => {
                                    on_stack.insert(next);
                                    frames.push((next, deps.iter(), 0));
                                    None
                                }
                                None => Some(1),
                            }
                        };
                        if let (Some(value), Some(top)) = (contribution, frames.last_mut()) {
                            top.2 = top.2.max(value);
                        }
                    }
                    None => {
                        if let Some((node, _, best)) = frames.pop() {
                            on_stack.remove(node);
                            finished.insert(node, best);
                            if let Some(parent) = frames.last_mut() {
                                parent.2 = parent.2.max(best + 1);
                            }
                        }
                    }
                }
            }
        }

        finished
            .into_iter()
            .map(|(id, depth)| (id.to_string(), depth))
            .collect()
    }

    pub fn max_depth(&self) -> u32 {
        self.depths().into_values().max().unwrap_or(0)
    }

    fn back_edge_cycles(&self, first_only: bool) -> BTreeSet<Vec<String>> {
        let mut marks: BTreeMap<&str, Mark> = self
            .edges
            .keys()
            .map(|id| (id.as_str(), Mark::Unvisited))
            .collect();
        let mut found = BTreeSet::new();

        for (start, start_deps) in &self.edges {
            if marks.get(start.as_str()) != Some(&Mark::Unvisited) {
                continue;
            }
            let mut path: Vec<&str> = vec![start.as_str()];
            let mut frames: Vec<btree_set::Iter<'_, String>> = vec![start_deps.iter()];
            marks.insert(start.as_str(), Mark::OnStack);

            loop {
                let Some(pending) = frames.last_mut() else {
                    break;
                };
                match pending.next() {
                    Some(next) => {
                        let next = next.as_str();
                        match marks.get(next).copied() {
                            Some(Mark::OnStack) => {
                                if let Some(pos) = path.iter().position(|n| *n == next) {
                                    found.insert(canonical_cycle(&path[pos..]));
                                    if first_only {
                                        return found;
                                    }
                                }
                            }
                            Some(Mark::Unvisited) => {
                                if let Some(deps) = self.edges.get(next) {
                                    marks.insert(next, Mark::OnStack);
                                    path.push(next);
                                    frames.push(deps.iter());
                                }
                            }
                            Some(Mark::Done) | None => {}
                        }
                    }
                    None => {
                        frames.pop();
                        if let Some(done) = path.pop() {
                            marks.insert(done, Mark::Done);
                        }
                    }
                }
            }
        }

        found
    }
}

/// Rotate a cycle so it starts at its smallest member.
fn canonical_cycle(members: &[&str]) -> Vec<String> {
    let start = members
        .iter()
        .enumerate()
        .min_by_key(|(_, id)| **id)
        .map(|(i, _)| i)
        .unwrap_or(0);
    members[start..]
        .iter()
        .chain(members[..start].iter())
        .map(|id| id.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::record_with_deps;

    fn graph(edges: &[(&str, &[&str])]) -> DependencyGraph {
        let records: Vec<_> = edges
            .iter()
            .map(|(id, deps)| record_with_deps(id, deps))
            .collect();
        DependencyGraph::from_records(&records)
    }

    #[test]
    fn two_node_cycle_is_detected() {
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        assert!(g.has_cycle());
        assert_eq!(g.cycles(), vec![vec!["a".to_string(), "b".to_string()]]);
    }

    #[test]
    fn acyclic_graph_of_same_size_has_no_cycle() {
        let g = graph(&[("a", &["b"]), ("b", &[])]);
        assert!(!g.has_cycle());
        assert!(g.cycles().is_empty());
    }

    #[test]
    fn self_loop_is_a_cycle() {
        let g = graph(&[("a", &["a"])]);
        assert!(g.has_cycle());
        assert_eq!(g.cycles(), vec![vec!["a".to_string()]]);
    }

    #[test]
    fn cycles_are_rotated_to_smallest_id() {
        let g = graph(&[("c", &["a"]), ("b", &["c"]), ("a", &["b"])]);
        assert_eq!(
            g.cycles(),
            vec![vec!["a".to_string(), "b".to_string(), "c".to_string()]]
        );
    }

    #[test]
    fn undefined_dependencies_are_sorted_pairs() {
        let g = graph(&[("b", &["zeta", "a"]), ("a", &["missing"])]);
        assert_eq!(
            g.undefined_dependencies(),
            vec![
                ("a".to_string(), "missing".to_string()),
                ("b".to_string(), "zeta".to_string()),
            ]
        );
    }

    #[test]
    fn duplicate_ids_merge_dependency_sets() {
        let g = graph(&[("a", &["b"]), ("a", &["c"]), ("b", &[]), ("c", &[])]);
        assert_eq!(g.node_count(), 3);
        let deps: Vec<_> = g
            .dependencies_of("a")
            .map(|d| d.iter().cloned().collect())
            .unwrap_or_default();
        assert_eq!(deps, vec!["b".to_string(), "c".to_string()]);
    }

    #[test]
    fn depths_count_edges_of_longest_chain() {
        let g = graph(&[("a", &["b", "d"]), ("b", &["c"]), ("c", &[]), ("d", &[])]);
        let depths = g.depths();
        assert_eq!(depths["a"], 2);
        assert_eq!(depths["b"], 1);
        assert_eq!(depths["c"], 0);
        assert_eq!(g.max_depth(), 2);
    }

    #[test]
    fn undeclared_targets_are_leaves() {
        let g = graph(&[("a", &["ghost"])]);
        assert_eq!(g.depths()["a"], 1);
    }

    #[test]
    fn depths_terminate_on_cycles() {
        let g = graph(&[("a", &["b"]), ("b", &["a"])]);
        let depths = g.depths();
        assert_eq!(depths.len(), 2);
        assert_eq!(depths["b"], 0);
        assert_eq!(depths["a"], 1);
    }

    #[test]
    fn empty_graph() {
        let g = DependencyGraph::from_records(&[]);
        assert!(!g.has_cycle());
        assert_eq!(g.max_depth(), 0);
        assert!(g.undefined_dependencies().is_empty());
    }
}
