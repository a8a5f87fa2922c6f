// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::{Path, PathBuf};

use async_trait::async_trait;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::backends::claude::{run_claude, DEFAULT_TIMEOUT};
use crate::errors::TransformerError;
use crate::history::StoryHistory;
use crate::traits::{Effect, Transformer, TransformerIO};

use super::extract_json;

const DEFAULT_HISTORY_PATH: &str = "data/history.json";

/// Filters incoming news items against the story history so the briefing
/// never repeats a story it already covered, while letting genuine
/// developments of known stories through with a continuity note.
pub struct StoryDeduplicator {
    prompt_path: PathBuf,
}

impl StoryDeduplicator {
    pub fn new(prompt_path: impl Into<PathBuf>) -> Self {
        Self {
            prompt_path: prompt_path.into(),
        }
    }
}

/// One model verdict about one candidate item.
#[derive(Debug, Deserialize)]
struct Decision {
    candidate_index: usize,
    story_key: String,
    action: String,
    #[serde(default)]
    reason: Option<String>,
    #[serde(default)]
    development_note: Option<String>,
}

#[derive(Debug, Deserialize)]
struct DecisionList {
    #[serde(default)]
    items: Vec<Decision>,
}

/// The deduplicator's three output values.
struct Filtered {
    filtered_news: Value,
    story_context: Value,
    items_to_report: Value,
}

/// Apply model verdicts to the candidate items.
///
/// `skip` drops the item; `include_as_new` and `include_as_development`
/// keep it, recording context and a report entry. An item the model gave
/// no verdict for, or an unrecognized action, passes through as a new
/// story under a key derived from its headline: losing a briefing item to
/// a malformed verdict is worse than a rare repeat.
fn apply_decisions(news_items: &Value, decisions: &DecisionList) -> Filtered {
    let items = news_items
        .get("items")
        .and_then(Value::as_array)
        .cloned()
        .unwrap_or_default();

    let mut kept = Vec::new();
    let mut story_context = Vec::new();
    let mut items_to_report = Vec::new();

    for (index, item) in items.iter().enumerate() {
        let decision = decisions
            .items
            .iter()
            .find(|d| d.candidate_index == index);

        let (story_key, action, note) = match decision {
            Some(d) if d.action == "skip" => continue,
            Some(d) if d.action == "include_as_development" => (
                d.story_key.clone(),
                "development",
                d.development_note.clone().or_else(|| d.reason.clone()),
            ),
            Some(d) if d.action == "include_as_new" => (d.story_key.clone(), "new", None),
            _ => (
                headline_key(item),
                "new",
                None,
            ),
        };

        kept.push(item.clone());

        let mut context = json!({ "story_key": story_key, "type": action });
        let mut report = json!({ "item": item, "story_key": story_key, "action": action });
        if let Some(note) = note {
            let note = json!(note);
            context["note"] = note.clone();
            report["note"] = note;
        }
        story_context.push(context);
        items_to_report.push(report);
    }

    // Keep the surrounding shape (gathered_at and friends) intact.
    let mut filtered_news = news_items.clone();
    if !filtered_news.is_object() {
        filtered_news = json!({});
    }
    filtered_news["items"] = Value::Array(kept);

    Filtered {
        filtered_news,
        story_context: Value::Array(story_context),
        items_to_report: Value::Array(items_to_report),
    }
}

/// Derive a story key from an item's headline.
fn headline_key(item: &Value) -> String {
    let headline = item
        .get("headline")
        .and_then(Value::as_str)
        .unwrap_or("untitled");
    let mut key = String::with_capacity(headline.len());
    let mut last_dash = true;
    for c in headline.chars() {
        if c.is_ascii_alphanumeric() {
            key.push(c.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            key.push('-');
            last_dash = true;
        }
    }
    key.trim_end_matches('-').to_string()
}

fn format_prior_stories(history: &StoryHistory) -> String {
    if history.is_empty() {
        return "(No prior coverage)".to_string();
    }
    let mut keys: Vec<&String> = history.stories.keys().collect();
    keys.sort();
    keys.iter()
        .filter_map(|key| history.get(key))
        .map(|story| {
            format!(
                "- `{}`: {} (topic: {}, mentions: {})\n",
                story.story_key, story.title, story.topic, story.mention_count
            )
        })
        .collect()
}

#[async_trait]
impl Transformer for StoryDeduplicator {
    fn name(&self) -> &'static str {
        "story-deduplicator"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["news_items", "history_path"]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &["filtered_news", "story_context", "items_to_report"]
    }

    fn input_effects(&self) -> Vec<Effect> {
        vec![Effect::LanguageModel, Effect::Filesystem]
    }

    async fn process(&self, input: TransformerIO) -> Result<TransformerIO, TransformerError> {
        let news_items = input.data.get("news_items").cloned().unwrap_or(Value::Null);
        let history_path = input
            .data
            .get("history_path")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_HISTORY_PATH);

        let history = StoryHistory::load(Path::new(history_path))?;

        let items = news_items
            .get("items")
            .and_then(Value::as_array)
            .cloned()
            .unwrap_or_default();

        // Nothing gathered, or no prior coverage to compare against: every
        // item passes through as new without a model call.
        let decisions = if items.is_empty() || history.is_empty() {
            DecisionList { items: Vec::new() }
        } else {
            let template = tokio::fs::read_to_string(&self.prompt_path).await?;
            let prompt = template
                .replace("{{prior_stories}}", &format_prior_stories(&history))
                .replace(
                    "{{candidate_items}}",
                    &serde_json::to_string_pretty(&items)?,
                );

            let response = run_claude(&prompt, &[], None, DEFAULT_TIMEOUT).await?;
            serde_json::from_str(extract_json(&response))?
        };

        let filtered = apply_decisions(&news_items, &decisions);

        let mut output = TransformerIO::new();
        output
            .data
            .insert("filtered_news".to_string(), filtered.filtered_news);
        output
            .data
            .insert("story_context".to_string(), filtered.story_context);
        output
            .data
            .insert("items_to_report".to_string(), filtered.items_to_report);
        Ok(output)
    }
}
