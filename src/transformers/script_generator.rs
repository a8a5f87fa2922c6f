use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::backends::claude::{run_claude, DEFAULT_TIMEOUT};
use crate::errors::TransformerError;
use crate::traits::{Effect, Transformer, TransformerIO};

const DEFAULT_STYLE: &str = "warm-professional";
const DEFAULT_DURATION_MINUTES: i64 = 5;

/// Generates a TTS-ready narration script from a briefing plan.
pub struct ScriptGenerator {
    prompt_path: PathBuf,
}

impl ScriptGenerator {
    pub fn new(prompt_path: impl Into<PathBuf>) -> Self {
        Self {
            prompt_path: prompt_path.into(),
        }
    }
}

const NARRATOR_STYLES: &[(&str, &str)] = &[(
    "warm-professional",
    "\nYou are a warm but professional assistant, like an NPR morning host.\n\
     - Friendly and approachable, but not overly casual\n\
     - Clear and informative without being dry\n\
     - Occasionally show personality through word choice\n\
     - Use \"you\" to address the listener directly\n",
)];

/// Look up a narrator style description, falling back to the default style
/// for unknown names.
fn narrator_style(name: &str) -> &'static str {
    NARRATOR_STYLES
        .iter()
        .find(|(style, _)| *style == name)
        .or_else(|| NARRATOR_STYLES.first())
        .map(|(_, text)| *text)
        .unwrap_or_default()
}

#[async_trait]
impl Transformer for ScriptGenerator {
    fn name(&self) -> &'static str {
        "script-generator"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["plan", "gathered_data", "narrator_style", "target_duration"]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &["script"]
    }

    fn input_effects(&self) -> Vec<Effect> {
        vec![Effect::LanguageModel]
    }

    async fn process(&self, input: TransformerIO) -> Result<TransformerIO, TransformerError> {
        let plan = input.data.get("plan").cloned().unwrap_or(Value::Null);
        let gathered_data = input
            .data
            .get("gathered_data")
            .cloned()
            .unwrap_or(Value::Null);
        let style_name = input
            .data
            .get("narrator_style")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_STYLE);
        let target_duration = input
            .data
            .get("target_duration")
            .and_then(Value::as_i64)
            .unwrap_or(DEFAULT_DURATION_MINUTES);

        let template = tokio::fs::read_to_string(&self.prompt_path).await?;
        let prompt = template
            .replace("{{narrator_style}}", narrator_style(style_name))
            .replace("{{plan}}", &serde_json::to_string_pretty(&plan)?)
            .replace(
                "{{gathered_data}}",
                &serde_json::to_string_pretty(&gathered_data)?,
            )
            .replace("{{target_duration}}", &target_duration.to_string());

        let response = run_claude(&prompt, &[], None, DEFAULT_TIMEOUT).await?;

        let mut output = TransformerIO::new();
        output.data.insert(
            "script".to_string(),
            Value::String(response.trim().to_string()),
        );
        Ok(output)
    }
}
