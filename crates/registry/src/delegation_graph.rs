//! DelegationGraph - Declared hand-off edges and the depth-bounded cycle test
//!
//! This is the only implementation of the cycle search. The registry uses it
//! to refuse registrations and the validator uses it over a whole
//! configuration, so both always agree.

use shared::AgentDefinition;
use std::collections::{BTreeMap, BTreeSet, HashSet};

/// Adjacency list of "X may hand off to Y" edges
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DelegationGraph {
    edges: BTreeMap<String, BTreeSet<String>>,
}

impl DelegationGraph {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a graph from every definition's declared edges
    pub fn from_definitions<'a, I>(definitions: I) -> Self
    where
        I: IntoIterator<Item = (&'a String, &'a AgentDefinition)>,
    {
        let mut graph = Self::new();
        for (name, definition) in definitions {
            graph.add_definition(name, definition);
        }
        graph
    }

    /// Add one edge; duplicates collapse
    pub fn add_edge(&mut self, from: impl Into<String>, to: impl Into<String>) {
        self.edges.entry(from.into()).or_default().insert(to.into());
    }

    /// Add edges from `delegates_to` and every rule target
    pub fn add_definition(&mut self, name: &str, definition: &AgentDefinition) {
        for target in definition.delegation_targets() {
            self.add_edge(name, target);
        }
    }

    /// Drop every outgoing edge of `name`
    pub fn remove_agent(&mut self, name: &str) {
        self.edges.remove(name);
    }

    /// Direct delegates of `name`, in name order
    pub fn delegates_of(&self, name: &str) -> Vec<&str> {
        self.edges
            .get(name)
            .map(|targets| targets.iter().map(String::as_str).collect())
            .unwrap_or_default()
    }

    /// All edges in deterministic (from, to) order
    pub fn edges(&self) -> Vec<(&str, &str)> {
        self.edges
            .iter()
            .flat_map(|(from, targets)| targets.iter().map(move |to| (from.as_str(), to.as_str())))
            .collect()
    }

    pub fn edge_count(&self) -> usize {
        self.edges.values().map(BTreeSet::len).sum()
    }

    /// Depth-bounded search from `from`.
    ///
    /// True when `target` is reached within `max_depth` hops, or when a node
    /// repeats on the current branch before the depth bound is exhausted.
    /// Exhausting the bound without either is false.
    pub fn reachable_within_cycle(&self, from: &str, target: &str, max_depth: usize) -> bool {
        let mut branch = HashSet::new();
        self.search(from, target, 0, max_depth, &mut branch)
    }

    fn search<'a>(
        &'a self,
        current: &'a str,
        target: &str,
        depth: usize,
        max_depth: usize,
        branch: &mut HashSet<&'a str>,
    ) -> bool {
        if current == target {
            return true;
        }
        if depth >= max_depth {
            return false;
        }
        if !branch.insert(current) {
            // Loop on this branch that does not pass through target
            return true;
        }

        let found = self
            .edges
            .get(current)
            .into_iter()
            .flatten()
            .any(|next| self.search(next, target, depth + 1, max_depth, branch));

        branch.remove(current);
        found
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::{Matcher, RoutingRule};

    fn graph(edges: &[(&str, &str)]) -> DelegationGraph {
        let mut g = DelegationGraph::new();
        for (from, to) in edges {
            g.add_edge(*from, *to);
        }
        g
    }

    #[test]
    fn test_direct_back_edge() {
        let g = graph(&[("a", "b"), ("b", "a")]);
        assert!(g.reachable_within_cycle("b", "a", 3));
        assert!(g.reachable_within_cycle("a", "b", 3));
    }

    #[test]
    fn test_self_reference() {
        let g = graph(&[("a", "a")]);
        assert!(g.reachable_within_cycle("a", "a", 3));
    }

    #[test]
    fn test_acyclic_chain() {
        let g = graph(&[("a", "b"), ("b", "c"), ("c", "d")]);
        assert!(!g.reachable_within_cycle("b", "a", 3));
        assert!(g.reachable_within_cycle("a", "d", 3));
    }

    #[test]
    fn test_depth_bound() {
        // a -> b -> c -> d -> e -> a : the way back to a is 4 hops from b
        let g = graph(&[("a", "b"), ("b", "c"), ("c", "d"), ("d", "e"), ("e", "a")]);
        assert!(!g.reachable_within_cycle("b", "a", 3));
        assert!(g.reachable_within_cycle("b", "a", 4));
    }

    #[test]
    fn test_repeat_on_branch_short_circuits() {
        // b <-> c loop that never reaches a
        let g = graph(&[("a", "b"), ("b", "c"), ("c", "b")]);
        assert!(g.reachable_within_cycle("b", "a", 3));
        // Depth exhausted before the repeat is seen
        assert!(!g.reachable_within_cycle("b", "a", 2));
    }

    #[test]
    fn test_diamond_is_not_a_cycle() {
        // Shared descendants on different branches are not repeats
        let g = graph(&[("a", "b"), ("a", "c"), ("b", "d"), ("c", "d")]);
        assert!(!g.reachable_within_cycle("a", "x", 5));
    }

    #[test]
    fn test_unknown_nodes() {
        let g = DelegationGraph::new();
        assert!(!g.reachable_within_cycle("x", "y", 3));
        assert!(g.delegates_of("x").is_empty());
    }

    #[test]
    fn test_definition_edges_deduplicated() {
        let def = AgentDefinition::new("m")
            .with_delegates(["b", "c"])
            .with_rule(RoutingRule::new(Matcher::Always, "b"));
        let mut g = DelegationGraph::new();
        g.add_definition("a", &def);

        assert_eq!(g.delegates_of("a"), vec!["b", "c"]);
        assert_eq!(g.edge_count(), 2);
        assert_eq!(g.edges(), vec![("a", "b"), ("a", "c")]);

        g.remove_agent("a");
        assert_eq!(g.edge_count(), 0);
    }
}
