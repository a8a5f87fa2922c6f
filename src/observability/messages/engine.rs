// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Message types for graph execution lifecycle events.

use std::fmt::{Display, Formatter};
use std::path::Path;

use crate::observability::messages::StructuredLog;

/// A graph definition passed validation and an execution order was derived.
pub struct GraphValidated<'a> {
    pub graph: &'a str,
    pub node_count: usize,
}

impl Display for GraphValidated<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Graph '{}' validated: {} nodes",
            self.graph, self.node_count
        )
    }
}

impl StructuredLog for GraphValidated<'_> {
    fn log(&self) {
        tracing::info!(graph = self.graph, node_count = self.node_count, "{}", self);
    }
}

/// A node is about to invoke its transformer.
pub struct NodeStarted<'a> {
    pub node: &'a str,
    pub transformer: &'a str,
}

impl Display for NodeStarted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Executing node '{}' with transformer '{}'",
            self.node, self.transformer
        )
    }
}

impl StructuredLog for NodeStarted<'_> {
    fn log(&self) {
        tracing::info!(node = self.node, transformer = self.transformer, "{}", self);
    }
}

/// A cached node's prior artifact was adopted instead of invoking its
/// transformer.
pub struct NodeCacheHit<'a> {
    pub node: &'a str,
    pub run_id: &'a str,
}

impl Display for NodeCacheHit<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' loaded from cache (run '{}')",
            self.node, self.run_id
        )
    }
}

impl StructuredLog for NodeCacheHit<'_> {
    fn log(&self) {
        tracing::info!(node = self.node, run_id = self.run_id, "{}", self);
    }
}

/// A cached node had no prior artifact; execution falls through.
pub struct NodeCacheMiss<'a> {
    pub node: &'a str,
    pub run_id: &'a str,
}

impl Display for NodeCacheMiss<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Node '{}' has no cached artifact for run '{}', executing",
            self.node, self.run_id
        )
    }
}

impl StructuredLog for NodeCacheMiss<'_> {
    fn log(&self) {
        tracing::debug!(node = self.node, run_id = self.run_id, "{}", self);
    }
}

/// A node's output bag was persisted to the artifact store.
pub struct ArtifactPersisted<'a> {
    pub node: &'a str,
    pub path: &'a Path,
}

impl Display for ArtifactPersisted<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(
            f,
            "Persisted output of node '{}' to {}",
            self.node,
            self.path.display()
        )
    }
}

impl StructuredLog for ArtifactPersisted<'_> {
    fn log(&self) {
        tracing::debug!(node = self.node, path = %self.path.display(), "{}", self);
    }
}

/// A transformer invocation failed; the run aborts at this node.
pub struct NodeFailed<'a> {
    pub node: &'a str,
    pub error: &'a dyn std::error::Error,
}

impl Display for NodeFailed<'_> {
    fn fmt(&self, f: &mut Formatter) -> std::fmt::Result {
        write!(f, "Node '{}' failed: {}", self.node, self.error)
    }
}

impl StructuredLog for NodeFailed<'_> {
    fn log(&self) {
        tracing::error!(node = self.node, error = %self.error, "{}", self);
    }
}
