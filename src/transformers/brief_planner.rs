use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::backends::claude::{run_claude, DEFAULT_TIMEOUT};
use crate::errors::TransformerError;
use crate::traits::{Effect, Transformer, TransformerIO};

/// Plans the narrative structure of a briefing from gathered data.
pub struct BriefPlanner {
    prompt_path: PathBuf,
}

impl BriefPlanner {
    pub fn new(prompt_path: impl Into<PathBuf>) -> Self {
        Self {
            prompt_path: prompt_path.into(),
        }
    }
}

#[async_trait]
impl Transformer for BriefPlanner {
    fn name(&self) -> &'static str {
        "brief-planner"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["gathered_data"]
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
        let gathered_text = serde_json::to_string_pretty(&gathered_data)?;

        let template = tokio::fs::read_to_string(&self.prompt_path).await?;
        let prompt = template.replace("{{gathered_data}}", &gathered_text);

        // No tools needed for planning
        let response = run_claude(&prompt, &[], None, DEFAULT_TIMEOUT).await?;
        let plan: Value = serde_json::from_str(response.trim())?;

        let mut output = TransformerIO::new();
        output.data.insert("plan".to_string(), plan);
        Ok(output)
    }
}
