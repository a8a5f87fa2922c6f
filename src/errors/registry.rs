// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during transformer registry lookups
#[derive(Debug, Clone, PartialEq)]
pub enum RegistryError {
    /// No transformer is registered under the requested name
    UnknownTransformer {
        /// The name that failed to resolve
        name: String,
    },
}

impl fmt::Display for RegistryError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RegistryError::UnknownTransformer { name } => {
                write!(f, "Unknown transformer: '{}'", name)
            }
        }
    }
}

impl std::error::Error for RegistryError {}
