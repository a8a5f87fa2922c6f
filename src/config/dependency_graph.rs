use std::collections::{HashMap, HashSet};

use crate::config::graph::{GraphDefinition, Reference};

/// Newtype wrapper mapping each node to the set of nodes it depends on.
///
/// Derived from node-output references only; config references never
/// contribute edges. Built fresh per execution and never persisted.
#[derive(Debug, Clone, Default)]
pub struct DependencyGraph(pub HashMap<String, HashSet<String>>);

impl DependencyGraph {
    /// Create a new empty dependency graph
    pub fn new() -> Self {
        Self(HashMap::new())
    }

    /// Derive the dependency graph from a graph definition.
    pub fn from_graph(graph: &GraphDefinition) -> Self {
        let mut deps: HashMap<String, HashSet<String>> = HashMap::new();
        for node in &graph.nodes {
            let entry = deps.entry(node.name.clone()).or_default();
            for reference in node.inputs.values() {
                if let Reference::Node { node: source, .. } = reference {
                    entry.insert(source.clone());
                }
            }
        }
        Self(deps)
    }

    /// Get the dependencies of a node
    pub fn dependencies_of(&self, node: &str) -> Option<&HashSet<String>> {
        self.0.get(node)
    }

    /// Get all node names in the graph
    pub fn keys(&self) -> impl Iterator<Item = &String> {
        self.0.keys()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl From<HashMap<String, HashSet<String>>> for DependencyGraph {
    fn from(deps: HashMap<String, HashSet<String>>) -> Self {
        Self(deps)
    }
}

impl From<DependencyGraph> for HashMap<String, HashSet<String>> {
    fn from(graph: DependencyGraph) -> Self {
        graph.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn node_references_become_edges_config_references_do_not() {
        let yaml = r#"
name: deps
nodes:
  - name: gather
    transformer: news-fetcher
    inputs:
      topics: "$config.news_topics"
  - name: plan
    transformer: brief-planner
    inputs:
      gathered_data: "$gather.gathered_data"
"#;
        let graph = GraphDefinition::from_yaml_str(yaml).unwrap();
        let deps = DependencyGraph::from_graph(&graph);

        assert_eq!(deps.len(), 2);
        assert!(deps.dependencies_of("gather").unwrap().is_empty());
        let plan_deps = deps.dependencies_of("plan").unwrap();
        assert_eq!(plan_deps.len(), 1);
        assert!(plan_deps.contains("gather"));
    }

    #[test]
    fn duplicate_references_collapse_to_one_edge() {
        let yaml = r#"
name: deps
nodes:
  - name: gather
    transformer: news-fetcher
    inputs: {}
  - name: generate
    transformer: script-generator
    inputs:
      plan: "$gather.gathered_data"
      gathered_data: "$gather.gathered_data"
"#;
        let graph = GraphDefinition::from_yaml_str(yaml).unwrap();
        let deps = DependencyGraph::from_graph(&graph);
        assert_eq!(deps.dependencies_of("generate").unwrap().len(), 1);
    }
}
