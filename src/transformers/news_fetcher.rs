use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::backends::claude::{run_claude, DEFAULT_TIMEOUT};
use crate::errors::TransformerError;
use crate::traits::{Effect, Transformer, TransformerIO};

use super::extract_json;

/// Fetches news for the configured topics using the model's web search.
pub struct NewsFetcher {
    prompt_path: PathBuf,
}

impl NewsFetcher {
    pub fn new(prompt_path: impl Into<PathBuf>) -> Self {
        Self {
            prompt_path: prompt_path.into(),
        }
    }
}

#[async_trait]
impl Transformer for NewsFetcher {
    fn name(&self) -> &'static str {
        "news-fetcher"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["topics"]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &["gathered_data"]
    }

    fn input_effects(&self) -> Vec<Effect> {
        vec![Effect::LanguageModel]
    }

    async fn process(&self, input: TransformerIO) -> Result<TransformerIO, TransformerError> {
        let topics = match input.data.get("topics") {
            Some(Value::Array(topics)) => topics.clone(),
            _ => Vec::new(),
        };

        let topics_text: String = topics
            .iter()
            .map(|t| {
                let name = t.get("name").and_then(Value::as_str).unwrap_or("");
                let query = t.get("query").and_then(Value::as_str).unwrap_or("");
                let priority = t
                    .get("priority")
                    .and_then(Value::as_str)
                    .unwrap_or("medium");
                format!("- **{}** (priority: {}): {}\n", name, priority, query)
            })
            .collect();

        let template = tokio::fs::read_to_string(&self.prompt_path).await?;
        let prompt = template.replace("{{topics}}", &topics_text);

        let response = run_claude(&prompt, &["WebSearch"], None, DEFAULT_TIMEOUT).await?;

        let gathered_data: Value = serde_json::from_str(extract_json(&response))?;

        let mut output = TransformerIO::new();
        output
            .data
            .insert("gathered_data".to_string(), gathered_data);
        Ok(output)
    }
}
