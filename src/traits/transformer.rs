use std::collections::HashMap;
use std::path::PathBuf;

use async_trait::async_trait;
use serde_json::Value;

use crate::errors::TransformerError;

/// External capability a transformer consumes or produces.
///
/// Effect tags are declarative metadata: the engine never interprets them,
/// but callers can inspect them to understand what a graph will touch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Calls a language model.
    LanguageModel,
    /// Shells out to a named external tool.
    ExternalTool(String),
    /// Reads or writes filesystem paths.
    Filesystem,
    /// Produces synthesized audio.
    AudioSynthesis,
}

/// Universal I/O container for all transformers.
///
/// `data` is the keyed value bag; `artifacts` maps artifact names to files
/// the transformer produced on disk.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TransformerIO {
    pub data: HashMap<String, Value>,
    pub artifacts: HashMap<String, PathBuf>,
}

impl TransformerIO {
    /// Create an empty container
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a container holding only a data bag
    pub fn with_data(data: HashMap<String, Value>) -> Self {
        Self {
            data,
            artifacts: HashMap::new(),
        }
    }
}

/// A named, pure processing step with declared input/output keys.
///
/// Implementations are constructed once, registered behind an
/// `Arc<dyn Transformer>`, and treated as immutable for the process
/// lifetime. `process` receives a bag containing exactly the keys named by
/// `inputs()`; keys whose references could not be resolved arrive as
/// `Value::Null`, and it is the transformer's decision whether that is an
/// error.
#[async_trait]
pub trait Transformer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Input keys this transformer expects in its resolved bag.
    fn inputs(&self) -> &'static [&'static str];

    /// Output keys this transformer produces.
    fn outputs(&self) -> &'static [&'static str];

    /// External capabilities consumed while processing.
    fn input_effects(&self) -> Vec<Effect> {
        Vec::new()
    }

    /// External capabilities exercised by the outputs.
    fn output_effects(&self) -> Vec<Effect> {
        Vec::new()
    }

    async fn process(&self, input: TransformerIO) -> Result<TransformerIO, TransformerError>;
}

impl std::fmt::Debug for dyn Transformer {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Transformer")
            .field("name", &self.name())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transformer_io_defaults_are_empty() {
        let io = TransformerIO::new();
        assert!(io.data.is_empty());
        assert!(io.artifacts.is_empty());
    }

    #[test]
    fn transformer_io_carries_data_and_artifacts() {
        let mut data = HashMap::new();
        data.insert("key".to_string(), Value::String("value".to_string()));
        let mut io = TransformerIO::with_data(data);
        io.artifacts
            .insert("audio".to_string(), PathBuf::from("/tmp/test.wav"));

        assert_eq!(io.data["key"], Value::String("value".to_string()));
        assert_eq!(io.artifacts["audio"], PathBuf::from("/tmp/test.wav"));
    }
}
