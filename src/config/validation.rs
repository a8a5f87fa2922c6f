//! Static validation of graph definitions against a transformer registry.
//!
//! Validation is the gate between a declarative graph document and the
//! executor: it rejects malformed graphs before any transformer runs. The
//! checks run in a fixed order so error messages stay predictable:
//!
//! 1. **Uniqueness**: node names are unique within the graph
//! 2. **Binding resolution**: every node's transformer exists in the registry
//! 3. **Reference resolution**: every `$node.output` reference points at an
//!    existing node whose transformer declares that output
//! 4. **Cycle detection**: the derived dependency graph is acyclic
//!
//! Cycle detection uses depth-first search with the three-color visitation
//! scheme (white = unvisited, gray = in the current path, black = done);
//! reaching a gray node means the path from that node back to itself is a
//! cycle, and the reported path is exactly that cycle closed with its start
//! node.
//!
//! Validation is pure and side-effect-free. The executor runs it once at
//! construction time and the CLI runs it again ahead of a dry-run.

use std::collections::{HashMap, HashSet};

use crate::config::dependency_graph::DependencyGraph;
use crate::config::graph::{GraphDefinition, Reference};
use crate::config::registry::TransformerRegistry;
use crate::errors::ValidationError;

/// Validate a graph definition against a transformer registry.
///
/// Returns on the first failing check with an error identifying the
/// offending node (and, for cycles, the full cycle path).
pub fn validate_graph(
    graph: &GraphDefinition,
    registry: &TransformerRegistry,
) -> Result<(), ValidationError> {
    validate_unique_node_names(graph)?;

    let nodes: HashMap<&str, &str> = graph
        .nodes
        .iter()
        .map(|n| (n.name.as_str(), n.transformer.as_str()))
        .collect();

    for node in &graph.nodes {
        // Check the transformer binding resolves
        if !registry.contains(&node.transformer) {
            return Err(ValidationError::UnknownTransformer {
                node: node.name.clone(),
                transformer: node.transformer.clone(),
            });
        }

        // Check input wiring
        for (input_key, reference) in &node.inputs {
            let (source_node, source_output) = match reference {
                Reference::Node { node, output } => (node, output),
                // Literals pass through; config references are resolved
                // against the run configuration at execution time.
                _ => continue,
            };

            let source_transformer_name = match nodes.get(source_node.as_str()) {
                Some(name) => *name,
                None => {
                    return Err(ValidationError::UnknownNodeReference {
                        node: node.name.clone(),
                        input: input_key.clone(),
                        missing_node: source_node.clone(),
                    });
                }
            };

            // The source node's own binding may still be unchecked at this
            // point; an unknown transformer there surfaces as its own error
            // when the loop reaches it.
            let source_transformer = match registry.get(source_transformer_name) {
                Ok(t) => t,
                Err(_) => continue,
            };

            if !source_transformer.outputs().contains(&source_output.as_str()) {
                return Err(ValidationError::UnknownOutputReference {
                    node: node.name.clone(),
                    input: input_key.clone(),
                    output: source_output.clone(),
                    source_transformer: source_transformer_name.to_string(),
                    declared_outputs: source_transformer
                        .outputs()
                        .iter()
                        .map(|s| s.to_string())
                        .collect(),
                });
            }
        }
    }

    // Check for circular dependencies
    let deps = DependencyGraph::from_graph(graph);
    if let Some(cycle) = detect_cycle(&deps) {
        return Err(ValidationError::CyclicDependency { cycle });
    }

    Ok(())
}

fn validate_unique_node_names(graph: &GraphDefinition) -> Result<(), ValidationError> {
    let mut seen = HashSet::new();
    for node in &graph.nodes {
        if !seen.insert(node.name.as_str()) {
            return Err(ValidationError::DuplicateNodeName {
                node: node.name.clone(),
            });
        }
    }
    Ok(())
}

/// Detect a cycle in the dependency graph.
///
/// Returns the cycle path (closed with the repeated start node) if one
/// exists. Edges followed are dependency edges, so the reported path reads
/// `a -> b -> a` for "a depends on b depends on a".
fn detect_cycle(deps: &DependencyGraph) -> Option<Vec<String>> {
    let mut visited = HashSet::new();
    let mut in_progress = HashSet::new();
    let mut path = Vec::new();

    let mut roots: Vec<&String> = deps.keys().collect();
    roots.sort();

    for node in roots {
        if !visited.contains(node.as_str()) {
            if let Some(cycle) = dfs(node, deps, &mut visited, &mut in_progress, &mut path) {
                return Some(cycle);
            }
        }
    }
    None
}

fn dfs(
    node: &str,
    deps: &DependencyGraph,
    visited: &mut HashSet<String>,
    in_progress: &mut HashSet<String>,
    path: &mut Vec<String>,
) -> Option<Vec<String>> {
    visited.insert(node.to_string());
    in_progress.insert(node.to_string());
    path.push(node.to_string());

    if let Some(neighbors) = deps.dependencies_of(node) {
        for neighbor in neighbors {
            // References to nodes outside the graph were rejected earlier
            if deps.dependencies_of(neighbor).is_none() {
                continue;
            }
            if in_progress.contains(neighbor.as_str()) {
                // Found a back edge; the cycle is the path segment from the
                // in-progress node to here, closed with that node.
                let start = path.iter().position(|n| n == neighbor)?;
                let mut cycle = path[start..].to_vec();
                cycle.push(neighbor.clone());
                return Some(cycle);
            }
            if !visited.contains(neighbor.as_str()) {
                if let Some(cycle) = dfs(neighbor, deps, visited, in_progress, path) {
                    return Some(cycle);
                }
            }
        }
    }

    in_progress.remove(node);
    path.pop();
    None
}
