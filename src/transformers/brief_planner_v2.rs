// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::backends::claude::{run_claude, DEFAULT_TIMEOUT};
use crate::errors::TransformerError;
use crate::traits::{Effect, Transformer, TransformerIO};

use super::extract_json;

/// Plans the narrative structure with story continuity awareness: the
/// prompt carries the deduplicator's story context so developments are
/// framed as updates, plus optional workplace chat highlights.
pub struct BriefPlannerV2 {
    prompt_path: PathBuf,
}

impl BriefPlannerV2 {
    pub fn new(prompt_path: impl Into<PathBuf>) -> Self {
        Self {
            prompt_path: prompt_path.into(),
        }
    }
}

fn format_story_context(story_context: &Value) -> String {
    let entries = match story_context.as_array() {
        Some(entries) if !entries.is_empty() => entries,
        _ => return "(All items are new - no prior coverage)".to_string(),
    };

    entries
        .iter()
        .map(|ctx| {
            let story_key = ctx
                .get("story_key")
                .and_then(Value::as_str)
                .unwrap_or("unknown");
            match ctx.get("type").and_then(Value::as_str) {
                Some("development") => {
                    let note = ctx.get("note").and_then(Value::as_str).unwrap_or("");
                    format!("- `{}`: **DEVELOPMENT** - {}\n", story_key, note)
                }
                _ => format!("- `{}`: New story\n", story_key),
            }
        })
        .collect()
}

fn format_slack_data(slack_data: &Value) -> String {
    let data = match slack_data.as_object() {
        Some(data) if !data.is_empty() => data,
        _ => return "(No Slack data)".to_string(),
    };

    let mut lines: Vec<String> = Vec::new();

    if let Some(summary) = data.get("summary").and_then(Value::as_str) {
        lines.push(format!("**Summary:** {}", summary));
        lines.push(String::new());
    }

    let messages = data
        .get("messages")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if !messages.is_empty() {
        lines.push("**Key Messages:**".to_string());
        for msg in messages.iter().take(5) {
            let text = msg.get("text").and_then(Value::as_str).unwrap_or("");
            let author = msg.get("author").and_then(Value::as_str).unwrap_or("Unknown");
            let channel = msg.get("channel_name").and_then(Value::as_str).unwrap_or("");
            let importance = msg
                .get("importance")
                .and_then(Value::as_str)
                .unwrap_or("medium");
            lines.push(format!(
                "- [{}] #{} - {}: {}",
                importance,
                channel,
                author,
                truncate(text, 200)
            ));
        }
    }

    let mentions = data
        .get("mentions")
        .and_then(Value::as_array)
        .map(Vec::as_slice)
        .unwrap_or_default();
    if !mentions.is_empty() {
        lines.push(String::new());
        lines.push("**Project Mentions:**".to_string());
        for mention in mentions.iter().take(3) {
            let author = mention
                .get("author")
                .and_then(Value::as_str)
                .unwrap_or("Unknown");
            let text = mention.get("text").and_then(Value::as_str).unwrap_or("");
            lines.push(format!("- {}: {}", author, truncate(text, 150)));
        }
    }

    if lines.is_empty() {
        "(No significant Slack activity)".to_string()
    } else {
        lines.join("\n")
    }
}

fn truncate(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((index, _)) => &text[..index],
        None => text,
    }
}

#[async_trait]
impl Transformer for BriefPlannerV2 {
    fn name(&self) -> &'static str {
        "brief-planner-v2"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["gathered_data", "story_context", "slack_data"]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &["plan"]
    }

    fn input_effects(&self) -> Vec<Effect> {
        vec![Effect::LanguageModel]
    }

    async fn process(&self, input: TransformerIO) -> Result<TransformerIO, TransformerError> {
        let gathered_data = input
            .data
            .get("gathered_data")
            .cloned()
            .unwrap_or(Value::Null);
        let story_context = input
            .data
            .get("story_context")
            .cloned()
            .unwrap_or(Value::Null);
        let slack_data = input.data.get("slack_data").cloned().unwrap_or(Value::Null);

        let slack_text = if slack_data.is_null() {
            "(No Slack data available)".to_string()
        } else {
            format_slack_data(&slack_data)
        };

        let template = tokio::fs::read_to_string(&self.prompt_path).await?;
        let prompt = template
            .replace("{{story_context}}", &format_story_context(&story_context))
            .replace(
                "{{gathered_data}}",
                &serde_json::to_string_pretty(&gathered_data)?,
            )
            .replace("{{slack_highlights}}", &slack_text);

        let response = run_claude(&prompt, &[], None, DEFAULT_TIMEOUT).await?;
        let plan: Value = serde_json::from_str(extract_json(&response))?;

        let mut output = TransformerIO::new();
        output.data.insert("plan".to_string(), plan);
        Ok(output)
    }
}
