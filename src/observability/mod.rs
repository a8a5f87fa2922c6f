// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Structured logging message types.
//!
//! Diagnostic messages are struct-per-event types with a `Display`
//! implementation, emitted through `tracing`. This keeps operational
//! strings out of engine code and gives every event a stable set of
//! structured fields.

pub mod messages;
