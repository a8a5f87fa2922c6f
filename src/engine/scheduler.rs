//! Topological scheduling of validated dependency graphs.
//!
//! Uses Kahn's algorithm: compute the in-degree of every node (its number
//! of dependencies), seed a ready queue with the zero-in-degree nodes, and
//! repeatedly emit a ready node while decrementing the in-degree of its
//! dependents. Validation guarantees acyclicity, so the loop always
//! terminates having emitted every node exactly once.
//!
//! Tie-breaking among simultaneously-ready nodes follows queue insertion
//! order and is explicitly not a guarantee; callers must not depend on the
//! relative order of independent nodes.

use std::collections::{HashMap, HashSet, VecDeque};

use crate::config::DependencyGraph;

/// Return node names in topological order: dependencies before dependents.
pub fn topological_sort(deps: &DependencyGraph) -> Vec<String> {
    // Reverse map: who depends on each node
    let mut dependents: HashMap<&String, Vec<&String>> =
        deps.keys().map(|node| (node, Vec::new())).collect();
    let mut in_degree: HashMap<&String, usize> = HashMap::with_capacity(deps.len());

    for node in deps.keys() {
        // Edges to nodes outside the graph were rejected by validation;
        // ignoring them here keeps the sort total for raw inputs too.
        let node_deps: HashSet<&String> = deps
            .dependencies_of(node)
            .into_iter()
            .flatten()
            .filter(|dep| deps.dependencies_of(dep.as_str()).is_some())
            .collect();
        in_degree.insert(node, node_deps.len());
        for dep in node_deps {
            if let Some(entry) = dependents.get_mut(dep) {
                entry.push(node);
            }
        }
    }

    let mut queue: VecDeque<&String> = in_degree
        .iter()
        .filter(|(_, degree)| **degree == 0)
        .map(|(node, _)| *node)
        .collect();
    let mut result = Vec::with_capacity(deps.len());

    while let Some(node) = queue.pop_front() {
        result.push(node.clone());
        if let Some(children) = dependents.get(node) {
            for dependent in children {
                if let Some(degree) = in_degree.get_mut(*dependent) {
                    *degree -= 1;
                    if *degree == 0 {
                        queue.push_back(*dependent);
                    }
                }
            }
        }
    }

    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::{HashMap, HashSet};

    fn deps(pairs: &[(&str, &[&str])]) -> DependencyGraph {
        let map: HashMap<String, HashSet<String>> = pairs
            .iter()
            .map(|(node, ds)| {
                (
                    node.to_string(),
                    ds.iter().map(|d| d.to_string()).collect(),
                )
            })
            .collect();
        DependencyGraph::from(map)
    }

    #[test]
    fn orders_a_simple_chain() {
        let graph = deps(&[("c", &["b"]), ("b", &["a"]), ("a", &[])]);
        let order = topological_sort(&graph);

        assert_eq!(order.len(), 3);
        let pos = |n: &str| order.iter().position(|x| x == n).unwrap();
        assert!(pos("a") < pos("b"));
        assert!(pos("b") < pos("c"));
    }

    #[test]
    fn independent_nodes_both_precede_their_merge() {
        let graph = deps(&[("merge", &["a", "b"]), ("a", &[]), ("b", &[])]);
        let order = topological_sort(&graph);

        assert_eq!(order.len(), 3);
        let pos = |n: &str| order.iter().position(|x| x == n).unwrap();
        assert!(pos("a") < pos("merge"));
        assert!(pos("b") < pos("merge"));
    }

    #[test]
    fn emits_every_node_exactly_once() {
        let graph = deps(&[
            ("a", &[]),
            ("b", &["a"]),
            ("c", &["a"]),
            ("d", &["b", "c"]),
            ("e", &["d", "a"]),
        ]);
        let order = topological_sort(&graph);

        assert_eq!(order.len(), 5);
        let unique: HashSet<&String> = order.iter().collect();
        assert_eq!(unique.len(), 5);

        let pos = |n: &str| order.iter().position(|x| x == n).unwrap();
        for (node, ds) in [
            ("b", vec!["a"]),
            ("c", vec!["a"]),
            ("d", vec!["b", "c"]),
            ("e", vec!["d", "a"]),
        ] {
            for dep in ds {
                assert!(pos(dep) < pos(node), "{dep} must precede {node}");
            }
        }
    }

    #[test]
    fn empty_graph_yields_empty_order() {
        assert!(topological_sort(&DependencyGraph::new()).is_empty());
    }
}
