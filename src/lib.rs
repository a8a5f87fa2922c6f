// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod backends;      // external process collaborators
pub mod config;        // graph model + registry + validation
pub mod engine;        // scheduler, artifact store, executor
pub mod errors;        // error handling
pub mod history;       // reported-story continuity model
pub mod observability; // structured log messages
pub mod traits;        // transformer abstraction
pub mod transformers;  // concrete processing units
