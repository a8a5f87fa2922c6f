// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Concrete transformers: the processing units the engine composes.
//!
//! Each transformer is opaque to the engine; it declares its input and
//! output keys plus effect tags, and maps a resolved input bag to an
//! output bag. Prompt template and model paths are injected at
//! construction time, never read from ambient globals.

mod brief_planner;
mod brief_planner_v2;
mod history_updater;
mod news_fetcher;
mod piper_synthesizer;
mod script_generator;
mod story_deduplicator;

pub use brief_planner::BriefPlanner;
pub use brief_planner_v2::BriefPlannerV2;
pub use history_updater::HistoryUpdater;
pub use news_fetcher::NewsFetcher;
pub use piper_synthesizer::PiperSynthesizer;
pub use script_generator::ScriptGenerator;
pub use story_deduplicator::StoryDeduplicator;

/// Extract JSON from text, tolerating a markdown code fence around it.
pub(crate) fn extract_json(text: &str) -> &str {
    let trimmed = text.trim();
    let Some(fence_start) = trimmed.find("```") else {
        return trimmed;
    };
    let after_fence = &trimmed[fence_start + 3..];
    // Skip an optional language tag on the fence line.
    let body_start = after_fence.find('\n').map(|i| i + 1).unwrap_or(0);
    let body = &after_fence[body_start..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => trimmed,
    }
}

#[cfg(test)]
mod tests {
    use super::extract_json;

    #[test]
    fn extracts_json_from_fenced_block() {
        let text = "Here you go:\n```json\n{\"items\": []}\n```\nDone.";
        assert_eq!(extract_json(text), "{\"items\": []}");
    }

    #[test]
    fn extracts_json_from_untagged_fence() {
        let text = "```\n{\"a\": 1}\n```";
        assert_eq!(extract_json(text), "{\"a\": 1}");
    }

    #[test]
    fn bare_json_passes_through_trimmed() {
        assert_eq!(extract_json("  {\"a\": 1}\n"), "{\"a\": 1}");
    }

    #[test]
    fn unterminated_fence_falls_back_to_whole_text() {
        let text = "```json\n{\"a\": 1}";
        assert_eq!(extract_json(text), text.trim());
    }
}
