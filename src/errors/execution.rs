// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Error types for run-time pipeline execution.
//!
//! Validation problems are reported before any transformer runs (see
//! [`crate::errors::ValidationError`]); everything in this module can only
//! surface once a run is underway. All errors implement `std::error::Error`
//! via the `thiserror` crate.

use std::time::Duration;

use thiserror::Error;

use crate::errors::RegistryError;

/// Error raised by a transformer's processing operation.
///
/// The engine never retries or suppresses these; any variant aborts the
/// remaining schedule when it propagates out of a node.
#[derive(Error, Debug)]
pub enum TransformerError {
    /// A required input was absent or had an unusable type.
    #[error("missing or invalid required input '{0}'")]
    MissingInput(String),

    /// The claude CLI exited non-zero or could not be spawned.
    #[error("claude invocation failed: {0}")]
    Claude(String),

    /// Audio synthesis subprocess failed.
    #[error("piper synthesis failed: {0}")]
    Synthesis(String),

    /// An external invocation exceeded its timeout.
    #[error("invocation timed out after {0:?}")]
    Timeout(Duration),

    /// A model response could not be decoded as the expected JSON shape.
    #[error("malformed response: {0}")]
    MalformedResponse(#[from] serde_json::Error),

    /// File I/O error while reading templates or writing outputs.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The story history document could not be read or written.
    #[error("story history error: {0}")]
    History(#[from] HistoryError),
}

/// Errors from reading or writing the story history document.
#[derive(Error, Debug)]
pub enum HistoryError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A history file exists but does not decode as a story map.
    #[error("malformed history document: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors from reading or writing persisted artifact records.
#[derive(Error, Debug)]
pub enum ArtifactError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A persisted record exists but does not decode as an output bag.
    #[error("malformed artifact record: {0}")]
    Decode(#[from] serde_json::Error),
}

/// Errors that abort a pipeline run.
#[derive(Error, Debug)]
pub enum ExecutionError {
    /// A transformer invocation failed; the run stops at this node.
    #[error("node '{node}' failed: {source}")]
    NodeFailed {
        node: String,
        #[source]
        source: TransformerError,
    },

    /// A cached artifact could not be loaded, or a fresh one persisted.
    #[error("artifact error for node '{node}': {source}")]
    Artifact {
        node: String,
        #[source]
        source: ArtifactError,
    },

    /// A node's bound transformer vanished from the registry.
    ///
    /// Construction-time validation makes this unreachable in practice, but
    /// the lookup still propagates rather than panicking.
    #[error(transparent)]
    Registry(#[from] RegistryError),
}
