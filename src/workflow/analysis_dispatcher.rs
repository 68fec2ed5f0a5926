//! Analysis dispatcher - workflow layer
//!
//! Picks the prompt of a mode from the lookup table and sends the whole
//! document set with it. One call per mode; nothing is shared between modes.

use tracing::info;

use crate::error::AppResult;
use crate::models::{Document, Mode, PromptTable};
use crate::services::InferenceService;

pub struct AnalysisDispatcher {
    prompts: PromptTable,
    inference: Box<dyn InferenceService>,
}

impl AnalysisDispatcher {
    pub fn new(prompts: PromptTable, inference: Box<dyn InferenceService>) -> Self {
        Self { prompts, inference }
    }

    /// Run the analysis of `mode` over `documents`
    pub async fn analyze(&self, documents: &[Document], mode: Mode) -> AppResult<String> {
        let template = self.prompts.template(mode)?;
        info!(
            "Running analysis mode {} over {} documents",
            mode,
            documents.len()
        );
        self.inference.run_prompt(template, documents).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AppError;
    use crate::models::FileGroup;
    use async_trait::async_trait;
    use std::sync::{Arc, Mutex};

    #[derive(Default, Clone)]
    struct EchoInference {
        calls: Arc<Mutex<Vec<(String, usize)>>>,
    }

    #[async_trait]
    impl InferenceService for EchoInference {
        async fn run_prompt(&self, template: &str, documents: &[Document]) -> AppResult<String> {
            self.calls
                .lock()
                .unwrap()
                .push((template.to_string(), documents.len()));
            Ok(format!("answer to {}", template))
        }
    }

    struct FailingInference;

    #[async_trait]
    impl InferenceService for FailingInference {
        async fn run_prompt(&self, _template: &str, _documents: &[Document]) -> AppResult<String> {
            Err(AppError::inference("test-model", "quota exceeded"))
        }
    }

    fn prompts() -> PromptTable {
        PromptTable::new(Mode::ALL.map(|m| (m, format!("prompt {}", m)))).unwrap()
    }

    fn documents() -> Vec<Document> {
        vec![
            Document::labeled(FileGroup::Justification, "obgr.pdf", "J"),
            Document::labeled(FileGroup::Contract, "dogovir.pdf", "C"),
        ]
    }

    #[tokio::test]
    async fn test_mode_selects_template() {
        let inference = EchoInference::default();
        let dispatcher = AnalysisDispatcher::new(prompts(), Box::new(inference.clone()));

        let answer = dispatcher
            .analyze(&documents(), Mode::try_from(2).unwrap())
            .await
            .unwrap();
        assert_eq!(answer, "answer to prompt 2");
        assert_eq!(
            *inference.calls.lock().unwrap(),
            vec![("prompt 2".to_string(), 2)]
        );
    }

    #[tokio::test]
    async fn test_each_mode_resends_all_documents() {
        let inference = EchoInference::default();
        let dispatcher = AnalysisDispatcher::new(prompts(), Box::new(inference.clone()));
        let docs = documents();

        for mode in Mode::ALL {
            dispatcher.analyze(&docs, mode).await.unwrap();
        }

        let calls = inference.calls.lock().unwrap();
        assert_eq!(calls.len(), 4);
        assert!(calls.iter().all(|(_, count)| *count == 2));
    }

    #[tokio::test]
    async fn test_inference_error_propagates() {
        let dispatcher = AnalysisDispatcher::new(prompts(), Box::new(FailingInference));
        let result = dispatcher.analyze(&documents(), Mode::ALL[0]).await;
        assert!(matches!(result, Err(AppError::Inference { .. })));
    }
}
