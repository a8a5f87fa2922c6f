// Copyright (c) 2025 Steve Wagner (ciroque@live.com)
// SPDX-License-Identifier: MIT

//! Story history: what has already been reported, keyed by story key.
//!
//! The history is a JSON document on disk mapping stable story keys to
//! [`ReportedStory`] records. The deduplicator reads it to decide which
//! incoming items are repeats or developments; the history updater writes
//! it back after a briefing is generated. A missing file is an empty
//! history, never an error.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use chrono::{DateTime, Local};
use serde::{Deserialize, Serialize};

use crate::errors::HistoryError;

/// A story that was previously reported.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ReportedStory {
    pub id: String,
    pub url: Option<String>,
    pub title: String,
    pub summary: String,
    pub topic: String,
    pub story_key: String,
    pub reported_at: DateTime<Local>,
    pub last_mentioned_at: DateTime<Local>,
    pub mention_count: u32,
    #[serde(default)]
    pub developments: Vec<String>,
}

impl ReportedStory {
    /// Create a first-mention record; `last_mentioned_at` starts equal to
    /// `reported_at`.
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        id: impl Into<String>,
        url: Option<String>,
        title: impl Into<String>,
        summary: impl Into<String>,
        topic: impl Into<String>,
        story_key: impl Into<String>,
        reported_at: DateTime<Local>,
    ) -> Self {
        Self {
            id: id.into(),
            url,
            title: title.into(),
            summary: summary.into(),
            topic: topic.into(),
            story_key: story_key.into(),
            reported_at,
            last_mentioned_at: reported_at,
            mention_count: 1,
            developments: Vec::new(),
        }
    }

    /// Record a development of an already-reported story.
    pub fn add_development(&mut self, note: impl Into<String>, at: DateTime<Local>) {
        self.developments.push(note.into());
        self.last_mentioned_at = at;
        self.mention_count += 1;
    }
}

/// File-backed collection of reported stories, keyed by story key.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct StoryHistory {
    #[serde(default)]
    pub stories: HashMap<String, ReportedStory>,
}

impl StoryHistory {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load the history document; a missing file is an empty history.
    pub fn load(path: &Path) -> Result<Self, HistoryError> {
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Self::new()),
            Err(e) => return Err(e.into()),
        };
        Ok(serde_json::from_str(&content)?)
    }

    /// Persist the history document, creating parent directories as needed.
    pub fn save(&self, path: &Path) -> Result<(), HistoryError> {
        if let Some(parent) = path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        fs::write(path, serde_json::to_string_pretty(self)?)?;
        Ok(())
    }

    pub fn add(&mut self, story: ReportedStory) {
        self.stories.insert(story.story_key.clone(), story);
    }

    pub fn get(&self, story_key: &str) -> Option<&ReportedStory> {
        self.stories.get(story_key)
    }

    pub fn get_mut(&mut self, story_key: &str) -> Option<&mut ReportedStory> {
        self.stories.get_mut(story_key)
    }

    pub fn len(&self) -> usize {
        self.stories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stories.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn story(key: &str) -> ReportedStory {
        ReportedStory::new(
            "abc123",
            Some("https://example.com/article".to_string()),
            "Hurricane Milton Makes Landfall",
            "Hurricane Milton made landfall in Florida on Tuesday.",
            "Weather",
            key,
            Local::now(),
        )
    }

    #[test]
    fn first_mention_defaults() {
        let s = story("hurricane-milton-florida-2024");
        assert_eq!(s.mention_count, 1);
        assert!(s.developments.is_empty());
        assert_eq!(s.last_mentioned_at, s.reported_at);
    }

    #[test]
    fn development_bumps_mention_count_and_timestamp() {
        let mut s = story("hurricane-milton-florida-2024");
        let later = s.reported_at + chrono::Duration::hours(6);
        s.add_development("Storm weakened to category 2", later);

        assert_eq!(s.mention_count, 2);
        assert_eq!(s.developments, vec!["Storm weakened to category 2"]);
        assert_eq!(s.last_mentioned_at, later);
        assert_ne!(s.last_mentioned_at, s.reported_at);
    }

    #[test]
    fn missing_file_is_an_empty_history() {
        let dir = tempfile::tempdir().unwrap();
        let history = StoryHistory::load(&dir.path().join("nope.json")).unwrap();
        assert!(history.is_empty());
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("history.json");

        let mut history = StoryHistory::new();
        history.add(story("hurricane-milton-florida-2024"));
        history.save(&path).unwrap();

        let loaded = StoryHistory::load(&path).unwrap();
        assert_eq!(loaded.len(), 1);
        assert_eq!(
            loaded.get("hurricane-milton-florida-2024").unwrap().title,
            "Hurricane Milton Makes Landfall"
        );
    }

    #[test]
    fn corrupt_file_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("history.json");
        fs::write(&path, "not json").unwrap();

        assert!(matches!(
            StoryHistory::load(&path),
            Err(HistoryError::Decode(_))
        ));
    }
}
