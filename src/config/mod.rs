// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod dependency_graph;
mod graph;
mod loader;
mod registry;
mod validation;

pub use dependency_graph::DependencyGraph;
pub use graph::{GraphDefinition, NodeSpec, Reference};
pub use loader::{load_graph, load_profile, resolve_config, Profile};
pub use registry::TransformerRegistry;
pub use validation::validate_graph;
