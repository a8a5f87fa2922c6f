// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

mod execution;
mod graph;
mod registry;

pub use execution::{ArtifactError, ExecutionError, HistoryError, TransformerError};
pub use graph::ValidationError;
pub use registry::RegistryError;
