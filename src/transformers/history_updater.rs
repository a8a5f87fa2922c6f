// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::Path;

use async_trait::async_trait;
use chrono::Local;
use serde_json::{json, Value};

use crate::errors::TransformerError;
use crate::history::{ReportedStory, StoryHistory};
use crate::traits::{Effect, Transformer, TransformerIO};

const DEFAULT_HISTORY_PATH: &str = "data/history.json";

/// Writes the deduplicator's report entries back into the story history
/// after a briefing is generated, so the next run sees today's stories as
/// prior coverage.
#[derive(Default)]
pub struct HistoryUpdater;

impl HistoryUpdater {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Transformer for HistoryUpdater {
    fn name(&self) -> &'static str {
        "history-updater"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["items_to_report", "history_path"]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &["updated_count"]
    }

    fn output_effects(&self) -> Vec<Effect> {
        vec![Effect::Filesystem]
    }

    async fn process(&self, input: TransformerIO) -> Result<TransformerIO, TransformerError> {
        let entries = match input.data.get("items_to_report") {
            Some(Value::Array(entries)) => entries.clone(),
            _ => Vec::new(),
        };
        let history_path = input
            .data
            .get("history_path")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_HISTORY_PATH);
        let history_path = Path::new(history_path);

        let mut history = StoryHistory::load(history_path)?;
        let now = Local::now();

        let mut new_count = 0;
        let mut development_count = 0;

        for entry in &entries {
            let item = entry.get("item").cloned().unwrap_or(Value::Null);
            let story_key = entry
                .get("story_key")
                .and_then(Value::as_str)
                .unwrap_or_default();
            let action = entry.get("action").and_then(Value::as_str).unwrap_or("");

            match action {
                "new" => {
                    let field =
                        |key: &str| item.get(key).and_then(Value::as_str).unwrap_or_default();
                    history.add(ReportedStory::new(
                        uuid::Uuid::new_v4().to_string(),
                        item.get("url").and_then(Value::as_str).map(String::from),
                        field("headline"),
                        field("summary"),
                        field("topic"),
                        story_key,
                        now,
                    ));
                    new_count += 1;
                }
                "development" => {
                    if let Some(existing) = history.get_mut(story_key) {
                        let note = entry
                            .get("note")
                            .and_then(Value::as_str)
                            .or_else(|| item.get("headline").and_then(Value::as_str))
                            .unwrap_or_default();
                        existing.add_development(note, now);
                        development_count += 1;
                    }
                }
                _ => {}
            }
        }

        history.save(history_path)?;

        let mut output = TransformerIO::new();
        output.data.insert(
            "updated_count".to_string(),
            json!({ "new": new_count, "developments": development_count }),
        );
        Ok(output)
    }
}
