// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod transformer;

pub use transformer::{Effect, Transformer, TransformerIO};
