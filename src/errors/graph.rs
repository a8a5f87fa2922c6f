// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::fmt;

/// Errors that can occur during graph definition validation
#[derive(Debug, Clone, PartialEq)]
pub enum ValidationError {
    /// A node is bound to a transformer that is not registered
    UnknownTransformer {
        /// The node with the unresolvable binding
        node: String,
        /// The transformer name that could not be resolved
        transformer: String,
    },
    /// Two nodes in the same graph share a name
    DuplicateNodeName {
        /// The duplicated node name
        node: String,
    },
    /// A `$`-prefixed input wiring string fits neither reference shape
    InvalidReference {
        /// The node whose input carries the malformed reference
        node: String,
        /// The input key the reference was wired to
        input: String,
        /// The raw reference string as written
        reference: String,
    },
    /// An input references a node that does not exist in the graph
    UnknownNodeReference {
        node: String,
        input: String,
        /// The referenced node that is missing from the graph
        missing_node: String,
    },
    /// An input references an output the source transformer does not declare
    UnknownOutputReference {
        node: String,
        input: String,
        /// The output key that was referenced
        output: String,
        /// The transformer bound to the referenced node
        source_transformer: String,
        /// The outputs that transformer actually declares
        declared_outputs: Vec<String>,
    },
    /// A circular dependency was detected in the node graph
    CyclicDependency {
        /// The cycle path, closed with the repeated start node
        cycle: Vec<String>,
    },
}

impl fmt::Display for ValidationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ValidationError::UnknownTransformer { node, transformer } => {
                write!(f, "Node '{}': Unknown transformer: '{}'", node, transformer)
            }
            ValidationError::DuplicateNodeName { node } => {
                write!(f, "Duplicate node name: '{}'", node)
            }
            ValidationError::InvalidReference {
                node,
                input,
                reference,
            } => {
                write!(
                    f,
                    "Node '{}': Input '{}' has invalid reference format: '{}'",
                    node, input, reference
                )
            }
            ValidationError::UnknownNodeReference {
                node,
                input,
                missing_node,
            } => {
                write!(
                    f,
                    "Node '{}': Input '{}' references unknown node '{}'",
                    node, input, missing_node
                )
            }
            ValidationError::UnknownOutputReference {
                node,
                input,
                output,
                source_transformer,
                declared_outputs,
            } => {
                write!(
                    f,
                    "Node '{}': Input '{}' references output '{}' but transformer '{}' only outputs: [{}]",
                    node,
                    input,
                    output,
                    source_transformer,
                    declared_outputs.join(", ")
                )
            }
            ValidationError::CyclicDependency { cycle } => {
                write!(f, "Circular dependency detected: {}", cycle.join(" -> "))
            }
        }
    }
}

impl std::error::Error for ValidationError {}
