// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Loading of graph definitions, profiles, and run configuration from YAML.
//!
//! A profile selects a graph and supplies the run-scoped configuration
//! mapping. The engine itself never reads these files; everything loaded
//! here is passed explicitly into [`GraphDefinition`], the registry, or the
//! executor's configuration mapping.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use serde::Deserialize;
use serde_json::Value;

use crate::config::graph::GraphDefinition;

/// A profile: which graph to run and the configuration to run it with.
#[derive(Debug, Deserialize)]
pub struct Profile {
    /// Graph name, resolved under `<config_dir>/graphs/<name>.yaml`.
    #[serde(default = "default_graph")]
    pub graph: String,
    /// Run configuration mapping, resolved against `$config.<key>`
    /// references at execution time.
    #[serde(default)]
    pub config: HashMap<String, serde_yaml::Value>,
}

fn default_graph() -> String {
    "full".to_string()
}

/// Load a graph definition from a YAML file.
pub fn load_graph<P: AsRef<Path>>(path: P) -> Result<GraphDefinition, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    GraphDefinition::from_yaml_str(&content)
}

/// Load a profile from a YAML file.
pub fn load_profile<P: AsRef<Path>>(path: P) -> Result<Profile, Box<dyn std::error::Error>> {
    let content = fs::read_to_string(path)?;
    let profile: Profile = serde_yaml::from_str(&content)?;
    Ok(profile)
}

/// Resolve a profile's configuration mapping into JSON values.
///
/// Handles the `news_topics_file` indirection (a second YAML document under
/// `config_dir` whose `topics` list lands under the `news_topics` key) and
/// defaults `output_dir` to `output`.
pub fn resolve_config(
    profile: &Profile,
    config_dir: &Path,
) -> Result<HashMap<String, Value>, Box<dyn std::error::Error>> {
    let mut config = HashMap::with_capacity(profile.config.len());
    for (key, value) in &profile.config {
        config.insert(key.clone(), serde_json::to_value(value)?);
    }

    if let Some(Value::String(topics_file)) = config.get("news_topics_file").cloned() {
        let content = fs::read_to_string(config_dir.join(&topics_file))?;
        let doc: serde_yaml::Value = serde_yaml::from_str(&content)?;
        let topics = doc
            .get("topics")
            .map(serde_json::to_value)
            .transpose()?
            .unwrap_or(Value::Array(Vec::new()));
        config.insert("news_topics".to_string(), topics);
    }

    config
        .entry("output_dir".to_string())
        .or_insert_with(|| Value::String("output".to_string()));

    Ok(config)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn profile_defaults() {
        let profile: Profile = serde_yaml::from_str("{}").unwrap();
        assert_eq!(profile.graph, "full");
        assert!(profile.config.is_empty());
    }

    #[test]
    fn resolve_config_applies_output_dir_default() {
        let profile: Profile = serde_yaml::from_str(
            r#"
graph: full
config:
  narrator_style: warm-professional
  target_duration: 5
"#,
        )
        .unwrap();

        let config = resolve_config(&profile, Path::new(".")).unwrap();
        assert_eq!(config["narrator_style"], Value::String("warm-professional".into()));
        assert_eq!(config["target_duration"], Value::from(5));
        assert_eq!(config["output_dir"], Value::String("output".into()));
    }

    #[test]
    fn resolve_config_loads_referenced_topics_file() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("topics.yaml"),
            "topics:\n  - name: AI\n    query: AI news\n    priority: high\n",
        )
        .unwrap();

        let profile: Profile = serde_yaml::from_str(
            r#"
config:
  news_topics_file: topics.yaml
"#,
        )
        .unwrap();

        let config = resolve_config(&profile, dir.path()).unwrap();
        let topics = config["news_topics"].as_array().unwrap();
        assert_eq!(topics.len(), 1);
        assert_eq!(topics[0]["name"], Value::String("AI".into()));
    }

    #[test]
    fn load_graph_from_yaml_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("simple.yaml");
        fs::write(
            &path,
            r#"
name: simple-test
nodes:
  - name: echo
    transformer: echo
    inputs:
      message: "$config.greeting"
"#,
        )
        .unwrap();

        let graph = load_graph(&path).unwrap();
        assert_eq!(graph.name, "simple-test");
        assert_eq!(graph.nodes.len(), 1);
        assert_eq!(graph.nodes[0].transformer, "echo");
    }
}
