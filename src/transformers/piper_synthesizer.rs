use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::backends::piper::synthesize_with_piper;
use crate::errors::TransformerError;
use crate::traits::{Effect, Transformer, TransformerIO};

const DEFAULT_MODEL: &str = "en_US-libritts_r-medium";
const DEFAULT_SENTENCE_SILENCE: f64 = 0.3;

/// Synthesizes the narration script to audio using piper.
pub struct PiperSynthesizer {
    /// Directory holding `<model>.onnx` voice models.
    models_dir: PathBuf,
}

impl PiperSynthesizer {
    pub fn new(models_dir: impl Into<PathBuf>) -> Self {
        Self {
            models_dir: models_dir.into(),
        }
    }
}

#[async_trait]
impl Transformer for PiperSynthesizer {
    fn name(&self) -> &'static str {
        "piper-synthesizer"
    }

    fn inputs(&self) -> &'static [&'static str] {
        &["script", "piper_model", "output_dir", "sentence_silence"]
    }

    fn outputs(&self) -> &'static [&'static str] {
        &["audio"]
    }

    fn output_effects(&self) -> Vec<Effect> {
        vec![Effect::AudioSynthesis, Effect::Filesystem]
    }

    async fn process(&self, input: TransformerIO) -> Result<TransformerIO, TransformerError> {
        let script = input
            .data
            .get("script")
            .and_then(Value::as_str)
            .ok_or_else(|| TransformerError::MissingInput("script".to_string()))?;
        let model = input
            .data
            .get("piper_model")
            .and_then(Value::as_str)
            .unwrap_or(DEFAULT_MODEL);
        let output_dir = PathBuf::from(
            input
                .data
                .get("output_dir")
                .and_then(Value::as_str)
                .unwrap_or("output"),
        );
        let sentence_silence = input
            .data
            .get("sentence_silence")
            .and_then(Value::as_f64)
            .unwrap_or(DEFAULT_SENTENCE_SILENCE);

        let model_path = self.models_dir.join(format!("{}.onnx", model));
        let audio_path =
            synthesize_with_piper(script, &model_path, &output_dir, sentence_silence).await?;

        // Keep a stable `latest.wav` name pointing at the newest briefing.
        #[cfg(unix)]
        if let Some(file_name) = audio_path.file_name() {
            let latest = output_dir.join("latest.wav");
            match tokio::fs::symlink_metadata(&latest).await {
                Ok(_) => tokio::fs::remove_file(&latest).await?,
                Err(e) if e.kind() == std::io::ErrorKind::NotFound => {}
                Err(e) => return Err(e.into()),
            }
            tokio::fs::symlink(file_name, &latest).await?;
        }

        let mut output = TransformerIO::new();
        output.data.insert(
            "audio".to_string(),
            Value::String(audio_path.display().to_string()),
        );
        output.artifacts.insert("audio".to_string(), audio_path);
        Ok(output)
    }
}
