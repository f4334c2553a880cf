use std::time::Duration;

use async_trait::async_trait;
use awful_aj::{api::ask, config::AwfulJadeConfig, template::ChatTemplate};
use tracing::{debug, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PromptKind {
    Selection,
    Narrative,
}

#[derive(Debug, thiserror::Error)]
pub enum GenerationError {
    #[error("generation service error: {0}")]
    Service(String),
    #[error("generation timed out after {0:?}")]
    Timeout(Duration),
    #[error("generation service returned an empty response")]
    EmptyResponse,
}

/// Request/response text completion. Output is untrusted free text.
///
/// Futures are not required to be `Send`: awful_aj surfaces
/// `Box<dyn Error>` and the pipeline never spawns generation calls.
#[async_trait(?Send)]
pub trait TextGenerator {
    async fn generate(&self, kind: PromptKind, prompt: &str) -> Result<String, GenerationError>;
}

pub struct AwfulJadeGenerator {
    cfg: AwfulJadeConfig,
    tpl_select: ChatTemplate,
    tpl_narrative: ChatTemplate,
    timeout: Option<Duration>,
}

impl AwfulJadeGenerator {
    pub fn new(
        cfg: AwfulJadeConfig,
        tpl_select: ChatTemplate,
        tpl_narrative: ChatTemplate,
        timeout: Option<Duration>,
    ) -> Self {
        Self { cfg, tpl_select, tpl_narrative, timeout }
    }

    fn template(&self, kind: PromptKind) -> &ChatTemplate {
        match kind {
            PromptKind::Selection => &self.tpl_select,
            PromptKind::Narrative => &self.tpl_narrative,
        }
    }
}

#[async_trait(?Send)]
impl TextGenerator for AwfulJadeGenerator {
    async fn generate(&self, kind: PromptKind, prompt: &str) -> Result<String, GenerationError> {
        let start = std::time::Instant::now();

        debug!("LLM call starting - kind={:?}, prompt_length={} chars", kind, prompt.len());

        let call = async {
            ask(&self.cfg, prompt.to_string(), self.template(kind), None, None, false)
                .await
                .map_err(|e| GenerationError::Service(e.to_string()))
        };

        let answer = match self.timeout {
            Some(limit) => tokio::time::timeout(limit, call)
                .await
                .map_err(|_| GenerationError::Timeout(limit))??,
            None => call.await?,
        };

        if answer.trim().is_empty() {
            return Err(GenerationError::EmptyResponse);
        }

        let elapsed = start.elapsed();
        info!(
            "LLM API call completed - kind={:?}, duration={:.2}s, response_length={} chars",
            kind,
            elapsed.as_secs_f32(),
            answer.len()
        );

        Ok(answer)
    }
}

#[cfg(test)]
pub mod testing {
    use std::collections::VecDeque;
    use std::sync::Mutex;

    use super::*;

    /// Scripted generator: pops one canned outcome per call and records prompts.
    pub struct MockGenerator {
        script: Mutex<VecDeque<Result<String, String>>>,
        prompts: Mutex<Vec<(PromptKind, String)>>,
    }

    impl MockGenerator {
        pub fn new() -> Self {
            Self {
                script: Mutex::new(VecDeque::new()),
                prompts: Mutex::new(Vec::new()),
            }
        }

        pub fn reply(self, text: impl Into<String>) -> Self {
            self.script.lock().unwrap().push_back(Ok(text.into()));
            self
        }

        pub fn fail(self, reason: impl Into<String>) -> Self {
            self.script.lock().unwrap().push_back(Err(reason.into()));
            self
        }

        pub fn prompts(&self) -> Vec<(PromptKind, String)> {
            self.prompts.lock().unwrap().clone()
        }
    }

    #[async_trait(?Send)]
    impl TextGenerator for MockGenerator {
        async fn generate(&self, kind: PromptKind, prompt: &str) -> Result<String, GenerationError> {
            self.prompts.lock().unwrap().push((kind, prompt.to_string()));
            match self.script.lock().unwrap().pop_front() {
                Some(Ok(text)) => Ok(text),
                Some(Err(reason)) => Err(GenerationError::Service(reason)),
                None => Err(GenerationError::Service("script exhausted".to_string())),
            }
        }
    }
}
