// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

pub mod engine;

/// A log message that knows how to emit itself with structured fields.
pub trait StructuredLog: std::fmt::Display {
    fn log(&self);
}
