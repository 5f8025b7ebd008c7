use std::sync::Arc;

use thiserror::Error;

use crate::extraction::events::{parse_events, EventList};
use crate::llm::prompts::{document_block, SOF_EXTRACTION_PROMPT};
use crate::llm::CompletionModel;

/// Why a structured extraction produced no events.
///
/// The `Display` text is shown to the user as-is.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
    #[error("Document text is empty or could not be read.")]
    EmptyText,

    #[error("Failed to extract structured data from the document. AI model error: {0}")]
    Model(String),
}

/// Sends document text to the model and validates the events it returns.
#[derive(Clone)]
pub struct EventExtractor {
    model: Arc<dyn CompletionModel>,
}

impl EventExtractor {
    pub fn new(model: Arc<dyn CompletionModel>) -> Self {
        Self { model }
    }

    /// Extract events from plain document text.
    ///
    /// Blank text short-circuits without contacting the model. Transport
    /// failures, non-JSON bodies and schema mismatches all come back as
    /// [`ExtractionError::Model`] carrying the underlying detail.
    pub async fn extract(&self, text: &str) -> Result<EventList, ExtractionError> {
        if text.trim().is_empty() {
            return Err(ExtractionError::EmptyText);
        }

        let body = self
            .model
            .complete_json(SOF_EXTRACTION_PROMPT, &document_block(text))
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Error during AI data extraction");
                ExtractionError::Model(e.to_string())
            })?;

        let events = parse_events(&body).map_err(|e| {
            tracing::error!(
                response_len = body.len(),
                response_preview = %body.chars().take(100).collect::<String>(),
                error = %e,
                "Model response did not match the events schema"
            );
            ExtractionError::Model(format!("Invalid events JSON: {e}"))
        })?;

        tracing::info!(event_count = events.len(), "Extracted events from document");
        Ok(events)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Result, SofError};
    use crate::extraction::ExtractedEvent;
    use crate::llm::prompts::DOCUMENT_TEXT_MARKER;
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    struct ScriptedModel {
        reply: std::result::Result<String, String>,
        calls: AtomicUsize,
        last_prompt: Mutex<Option<(String, String)>>,
    }

    impl ScriptedModel {
        fn replying(body: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Ok(body.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }

        fn failing(message: &str) -> Arc<Self> {
            Arc::new(Self {
                reply: Err(message.to_string()),
                calls: AtomicUsize::new(0),
                last_prompt: Mutex::new(None),
            })
        }

        fn calls(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl CompletionModel for ScriptedModel {
        async fn complete_json(&self, system_prompt: &str, prompt: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            *self.last_prompt.lock().unwrap() = Some((system_prompt.to_string(), prompt.to_string()));
            self.reply.clone().map_err(SofError::Llm)
        }
    }

    #[tokio::test]
    async fn test_empty_text_skips_model() {
        let model = ScriptedModel::replying(r#"{"events": []}"#);
        let extractor = EventExtractor::new(model.clone());

        let result = extractor.extract("").await;
        assert_eq!(result, Err(ExtractionError::EmptyText));
        assert_eq!(
            result.unwrap_err().to_string(),
            "Document text is empty or could not be read."
        );
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_whitespace_text_skips_model() {
        let model = ScriptedModel::replying(r#"{"events": []}"#);
        let extractor = EventExtractor::new(model.clone());

        assert_eq!(
            extractor.extract(" \n\t ").await,
            Err(ExtractionError::EmptyText)
        );
        assert_eq!(model.calls(), 0);
    }

    #[tokio::test]
    async fn test_success_passes_events_through() {
        let model = ScriptedModel::replying(
            r#"{"events": [{"event": "Arrived", "start_time": "2024-08-20 10:00", "end_time": null}]}"#,
        );
        let extractor = EventExtractor::new(model.clone());

        let events = extractor
            .extract("Vessel arrived 20/08/2024 1000")
            .await
            .expect("extraction should succeed");

        assert_eq!(
            events,
            vec![ExtractedEvent::new("Arrived", Some("2024-08-20 10:00"), None)]
        );
        assert_eq!(model.calls(), 1);

        let (system_prompt, prompt) = model.last_prompt.lock().unwrap().clone().unwrap();
        assert_eq!(system_prompt, SOF_EXTRACTION_PROMPT);
        assert_eq!(
            prompt,
            format!("{DOCUMENT_TEXT_MARKER}\nVessel arrived 20/08/2024 1000")
        );
    }

    #[tokio::test]
    async fn test_non_json_reply_becomes_model_error() {
        let model = ScriptedModel::replying("I could not find any events, sorry.");
        let extractor = EventExtractor::new(model.clone());

        let error = extractor.extract("some text").await.unwrap_err();
        match &error {
            ExtractionError::Model(detail) => assert!(!detail.is_empty()),
            other => panic!("expected model error, got {other:?}"),
        }
        assert!(error
            .to_string()
            .starts_with("Failed to extract structured data from the document. AI model error:"));
    }

    #[tokio::test]
    async fn test_schema_mismatch_becomes_model_error() {
        let model = ScriptedModel::replying(r#"{"events": [{"event": "Arrived"}]}"#);
        let extractor = EventExtractor::new(model);

        let error = extractor.extract("some text").await.unwrap_err();
        assert!(matches!(error, ExtractionError::Model(_)));
    }

    #[tokio::test]
    async fn test_transport_failure_is_reported_once() {
        let model = ScriptedModel::failing("connection reset by peer");
        let extractor = EventExtractor::new(model.clone());

        let error = extractor.extract("some text").await.unwrap_err();
        assert!(error.to_string().contains("connection reset by peer"));
        assert_eq!(model.calls(), 1);
    }
}
