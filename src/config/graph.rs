//! Graph definition model: nodes, transformer bindings, and input wiring.
//!
//! A graph definition is a declarative YAML document naming a set of nodes,
//! each bound to a registered transformer and wired through [`Reference`]s.
//! Reference strings use a `$`-prefixed sigil: `$config.<key>` resolves
//! against the run configuration, `$<node>.<output>` against another node's
//! output bag; every other value is a literal passed through untouched.
//!
//! The sigil strings are parsed exactly once, here, into a closed variant
//! type. Nothing downstream re-parses wiring strings.

use std::collections::HashMap;

use serde::Deserialize;
use serde_json::Value;

use crate::errors::ValidationError;

/// A typed pointer from a node's input key to its value source.
#[derive(Debug, Clone, PartialEq)]
pub enum Reference {
    /// An opaque value passed through untouched.
    Literal(Value),
    /// `$config.<key>`: resolved against the run configuration mapping,
    /// independent of node ordering.
    Config(String),
    /// `$<node>.<output>`: resolved against an upstream node's output bag.
    Node { node: String, output: String },
}

/// One step in a graph definition: a unique name, a bound transformer, and
/// an input wiring.
#[derive(Debug, Clone)]
pub struct NodeSpec {
    pub name: String,
    pub transformer: String,
    pub inputs: HashMap<String, Reference>,
}

/// A declarative pipeline: an ordered sequence of node specifications.
///
/// Node order in the definition carries no semantic meaning; execution order
/// is derived from the dependency graph.
#[derive(Debug, Clone)]
pub struct GraphDefinition {
    pub name: String,
    pub nodes: Vec<NodeSpec>,
}

#[derive(Debug, Deserialize)]
struct RawGraph {
    name: String,
    #[serde(default)]
    nodes: Vec<RawNode>,
}

#[derive(Debug, Deserialize)]
struct RawNode {
    name: String,
    transformer: String,
    #[serde(default)]
    inputs: HashMap<String, serde_yaml::Value>,
}

impl GraphDefinition {
    /// Parse a graph definition from its YAML text.
    ///
    /// YAML shape errors surface as `serde_yaml` errors; malformed reference
    /// strings surface as [`ValidationError::InvalidReference`].
    pub fn from_yaml_str(text: &str) -> Result<Self, Box<dyn std::error::Error>> {
        let raw: RawGraph = serde_yaml::from_str(text)?;
        Ok(Self::from_raw(raw)?)
    }

    fn from_raw(raw: RawGraph) -> Result<Self, ValidationError> {
        let mut nodes = Vec::with_capacity(raw.nodes.len());
        for node in raw.nodes {
            let mut inputs = HashMap::with_capacity(node.inputs.len());
            for (key, value) in node.inputs {
                let reference = parse_reference(&node.name, &key, value)?;
                inputs.insert(key, reference);
            }
            nodes.push(NodeSpec {
                name: node.name,
                transformer: node.transformer,
                inputs,
            });
        }
        Ok(Self {
            name: raw.name,
            nodes,
        })
    }

    /// Look up a node by name.
    pub fn node(&self, name: &str) -> Option<&NodeSpec> {
        self.nodes.iter().find(|n| n.name == name)
    }
}

/// Parse one input wiring value into its reference variant.
///
/// Only strings carrying the `$` sigil become references; everything else,
/// including non-string YAML values, is a literal.
fn parse_reference(
    node: &str,
    input: &str,
    value: serde_yaml::Value,
) -> Result<Reference, ValidationError> {
    let text = match value.as_str() {
        Some(s) if s.starts_with('$') => s.to_string(),
        _ => {
            let literal =
                serde_json::to_value(&value).map_err(|_| ValidationError::InvalidReference {
                    node: node.to_string(),
                    input: input.to_string(),
                    reference: format!("{:?}", value),
                })?;
            return Ok(Reference::Literal(literal));
        }
    };

    if let Some(key) = text.strip_prefix("$config.") {
        if key.is_empty() {
            return Err(ValidationError::InvalidReference {
                node: node.to_string(),
                input: input.to_string(),
                reference: text,
            });
        }
        return Ok(Reference::Config(key.to_string()));
    }

    // $<node>.<output>; the output key may itself contain dots.
    match text[1..].split_once('.') {
        Some((source, output)) if !source.is_empty() && !output.is_empty() => {
            Ok(Reference::Node {
                node: source.to_string(),
                output: output.to_string(),
            })
        }
        _ => Err(ValidationError::InvalidReference {
            node: node.to_string(),
            input: input.to_string(),
            reference: text,
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_literal_config_and_node_references() {
        let yaml = r#"
name: simple-test
nodes:
  - name: echo
    transformer: echo
    inputs:
      message: "$config.greeting"
      upstream: "$gather.gathered_data"
      count: 3
      label: plain text
"#;
        let graph = GraphDefinition::from_yaml_str(yaml).unwrap();
        assert_eq!(graph.name, "simple-test");
        let node = graph.node("echo").unwrap();
        assert_eq!(node.transformer, "echo");
        assert_eq!(
            node.inputs["message"],
            Reference::Config("greeting".to_string())
        );
        assert_eq!(
            node.inputs["upstream"],
            Reference::Node {
                node: "gather".to_string(),
                output: "gathered_data".to_string(),
            }
        );
        assert_eq!(node.inputs["count"], Reference::Literal(Value::from(3)));
        assert_eq!(
            node.inputs["label"],
            Reference::Literal(Value::String("plain text".to_string()))
        );
    }

    #[test]
    fn dollar_string_without_dot_is_rejected() {
        let yaml = r#"
name: bad
nodes:
  - name: a
    transformer: echo
    inputs:
      message: "$nodot"
"#;
        let err = GraphDefinition::from_yaml_str(yaml).unwrap_err();
        assert!(err.to_string().contains("invalid reference format"));
        assert!(err.to_string().contains("$nodot"));
    }

    #[test]
    fn bare_config_prefix_is_rejected() {
        let yaml = r#"
name: bad
nodes:
  - name: a
    transformer: echo
    inputs:
      message: "$config."
"#;
        assert!(GraphDefinition::from_yaml_str(yaml).is_err());
    }

    #[test]
    fn output_key_may_contain_dots() {
        let yaml = r#"
name: dotted
nodes:
  - name: a
    transformer: echo
    inputs:
      message: "$gather.items.first"
"#;
        let graph = GraphDefinition::from_yaml_str(yaml).unwrap();
        assert_eq!(
            graph.node("a").unwrap().inputs["message"],
            Reference::Node {
                node: "gather".to_string(),
                output: "items.first".to_string(),
            }
        );
    }

    #[test]
    fn nodes_default_to_empty() {
        let graph = GraphDefinition::from_yaml_str("name: empty\n").unwrap();
        assert!(graph.nodes.is_empty());
        assert!(graph.node("anything").is_none());
    }
}
