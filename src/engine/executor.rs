// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! The graph executor: drives a validated graph through its topological
//! order, resolving each node's inputs, invoking its transformer, and
//! persisting outputs for caching and replay.
//!
//! Execution is strictly serial: one node at a time, each transformer
//! invocation awaited to completion before the next node starts. No node
//! begins before all of its dependencies have recorded their outputs, which
//! is what makes node-output references always resolvable by construction.
//!
//! Failure semantics: any transformer error aborts the run immediately with
//! no retry. An unresolvable config or node reference is not a failure; it
//! resolves to `Value::Null` and the downstream transformer decides whether
//! a missing input matters.

use std::collections::{HashMap, HashSet};
use std::path::PathBuf;

use serde_json::Value;

use crate::config::{
    validate_graph, DependencyGraph, GraphDefinition, NodeSpec, Reference, TransformerRegistry,
};
use crate::engine::artifacts::ArtifactStore;
use crate::engine::scheduler::topological_sort;
use crate::errors::{ExecutionError, ValidationError};
use crate::observability::messages::engine::{
    ArtifactPersisted, GraphValidated, NodeCacheHit, NodeCacheMiss, NodeFailed, NodeStarted,
};
use crate::observability::messages::StructuredLog;
use crate::traits::TransformerIO;

/// Options for constructing a [`GraphExecutor`].
#[derive(Debug, Default)]
pub struct ExecutorOptions {
    /// Where node output bags are persisted. `None` disables persistence
    /// (and with it, caching) without failing.
    pub artifact_dir: Option<PathBuf>,
    /// Nodes that prefer loading a prior artifact over re-invoking their
    /// transformer.
    pub cached_nodes: Vec<String>,
    /// Run identifier; derived from the current local time when absent.
    pub run_id: Option<String>,
}

/// Aggregate result of one run: every node's output bag plus the merged
/// file artifacts the transformers produced.
#[derive(Debug, Default)]
pub struct PipelineResult {
    pub data: HashMap<String, HashMap<String, Value>>,
    pub artifacts: HashMap<String, PathBuf>,
}

/// Executes a validated graph definition against a run configuration.
#[derive(Debug)]
pub struct GraphExecutor {
    graph: GraphDefinition,
    registry: TransformerRegistry,
    order: Vec<String>,
    store: Option<ArtifactStore>,
    cached_nodes: HashSet<String>,
    run_id: String,
}

impl GraphExecutor {
    /// Construct an executor, validating the graph immediately.
    ///
    /// Validation failures abort construction before any transformer can
    /// run; the derived execution order is fixed for the executor's
    /// lifetime.
    pub fn new(
        graph: GraphDefinition,
        registry: TransformerRegistry,
        options: ExecutorOptions,
    ) -> Result<Self, ValidationError> {
        validate_graph(&graph, &registry)?;

        let deps = DependencyGraph::from_graph(&graph);
        let order = topological_sort(&deps);

        GraphValidated {
            graph: &graph.name,
            node_count: order.len(),
        }
        .log();

        let run_id = options
            .run_id
            .unwrap_or_else(|| chrono::Local::now().format("%Y%m%d_%H%M%S").to_string());

        Ok(Self {
            graph,
            registry,
            order,
            store: options.artifact_dir.map(ArtifactStore::new),
            cached_nodes: options.cached_nodes.into_iter().collect(),
            run_id,
        })
    }

    /// The run identifier artifacts are keyed under.
    pub fn run_id(&self) -> &str {
        &self.run_id
    }

    /// The derived execution order.
    pub fn order(&self) -> &[String] {
        &self.order
    }

    /// Execute every node in topological order.
    pub async fn execute(
        &self,
        config: &HashMap<String, Value>,
    ) -> Result<PipelineResult, ExecutionError> {
        let mut result = PipelineResult::default();

        for node_name in &self.order {
            // The order is derived from the graph's own nodes, so the
            // lookup always succeeds for a constructed executor.
            let node = match self.graph.node(node_name) {
                Some(node) => node,
                None => continue,
            };

            if self.cached_nodes.contains(node_name) {
                if let Some(bag) = self.load_cached(node_name)? {
                    NodeCacheHit {
                        node: node_name,
                        run_id: &self.run_id,
                    }
                    .log();
                    result.data.insert(node_name.clone(), bag);
                    continue;
                }
                NodeCacheMiss {
                    node: node_name,
                    run_id: &self.run_id,
                }
                .log();
            }

            let transformer = self.registry.get(&node.transformer)?;
            let inputs = resolve_inputs(node, transformer.inputs(), config, &result.data);

            NodeStarted {
                node: node_name,
                transformer: transformer.name(),
            }
            .log();

            let output = transformer
                .process(TransformerIO::with_data(inputs))
                .await
                .map_err(|source| {
                    NodeFailed {
                        node: node_name,
                        error: &source,
                    }
                    .log();
                    ExecutionError::NodeFailed {
                        node: node_name.clone(),
                        source,
                    }
                })?;

            // Later nodes may overwrite a same-named artifact; last writer
            // wins.
            result.artifacts.extend(output.artifacts);

            if let Some(store) = &self.store {
                let path = store
                    .save(&self.run_id, node_name, &output.data)
                    .map_err(|source| ExecutionError::Artifact {
                        node: node_name.clone(),
                        source,
                    })?;
                ArtifactPersisted {
                    node: node_name,
                    path: &path,
                }
                .log();
            }

            result.data.insert(node_name.clone(), output.data);
        }

        Ok(result)
    }

    fn load_cached(
        &self,
        node: &str,
    ) -> Result<Option<HashMap<String, Value>>, ExecutionError> {
        let store = match &self.store {
            Some(store) => store,
            None => return Ok(None),
        };
        store
            .load(&self.run_id, node)
            .map_err(|source| ExecutionError::Artifact {
                node: node.to_string(),
                source,
            })
    }
}

/// Resolve a node's input bag.
///
/// The bag holds exactly the transformer's declared input keys: literals
/// pass through, config references look up the run configuration, and node
/// references look up upstream output bags. Anything unresolvable becomes
/// `Value::Null` rather than an error.
fn resolve_inputs(
    node: &NodeSpec,
    declared: &[&str],
    config: &HashMap<String, Value>,
    outputs: &HashMap<String, HashMap<String, Value>>,
) -> HashMap<String, Value> {
    let mut bag = HashMap::with_capacity(declared.len());
    for key in declared {
        let value = match node.inputs.get(*key) {
            Some(Reference::Literal(v)) => v.clone(),
            Some(Reference::Config(config_key)) => {
                config.get(config_key).cloned().unwrap_or(Value::Null)
            }
            Some(Reference::Node {
                node: source,
                output,
            }) => outputs
                .get(source)
                .and_then(|bag| bag.get(output))
                .cloned()
                .unwrap_or(Value::Null),
            None => Value::Null,
        };
        bag.insert(key.to_string(), value);
    }
    bag
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn resolve_inputs_covers_exactly_the_declared_keys() {
        let graph = GraphDefinition::from_yaml_str(
            r#"
name: wiring
nodes:
  - name: n
    transformer: t
    inputs:
      literal: 7
      from_config: "$config.style"
      from_node: "$up.data"
      extra_wiring: "ignored"
"#,
        )
        .unwrap();
        let node = graph.node("n").unwrap();

        let mut config = HashMap::new();
        config.insert("style".to_string(), json!("warm"));
        let mut outputs = HashMap::new();
        let mut up = HashMap::new();
        up.insert("data".to_string(), json!([1, 2]));
        outputs.insert("up".to_string(), up);

        let declared = ["literal", "from_config", "from_node", "unwired"];
        let bag = resolve_inputs(node, &declared, &config, &outputs);

        assert_eq!(bag.len(), 4);
        assert_eq!(bag["literal"], json!(7));
        assert_eq!(bag["from_config"], json!("warm"));
        assert_eq!(bag["from_node"], json!([1, 2]));
        assert_eq!(bag["unwired"], Value::Null);
        // The wired-but-undeclared key never reaches the transformer.
        assert!(!bag.contains_key("extra_wiring"));
    }

    #[test]
    fn absent_config_and_upstream_keys_resolve_to_null() {
        let graph = GraphDefinition::from_yaml_str(
            r#"
name: wiring
nodes:
  - name: n
    transformer: t
    inputs:
      a: "$config.missing"
      b: "$up.missing"
"#,
        )
        .unwrap();
        let node = graph.node("n").unwrap();

        let mut outputs = HashMap::new();
        outputs.insert("up".to_string(), HashMap::new());

        let bag = resolve_inputs(node, &["a", "b"], &HashMap::new(), &outputs);
        assert_eq!(bag["a"], Value::Null);
        assert_eq!(bag["b"], Value::Null);
    }
}
