//! Generation pipeline: sanitize, validate, format, encode with retries,
//! record in history.

use crate::encode::{EncodeOptions, QrEncoder};
use crate::error::GenerateError;
use crate::retry::{with_retry, RetryPolicy};
use qrkit_content::{ContentClass, QrTemplate, ValidationOptions};
use qrkit_history::{HistoryEntry, HistoryStore};
use std::sync::Arc;
use std::time::Duration;

/// A successfully generated code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Generated {
    /// Template payload that was encoded
    pub payload: String,
    /// Rendered image as a data URI
    pub image: String,
    /// History record written for this code
    pub entry: HistoryEntry,
}

/// Drives one generation end to end.
#[derive(Clone)]
pub struct Generator {
    encoder: Arc<dyn QrEncoder>,
    history: HistoryStore,
    policy: RetryPolicy,
}

impl std::fmt::Debug for Generator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Generator")
            .field("policy", &self.policy)
            .finish_non_exhaustive()
    }
}

impl Generator {
    /// Create a generator with the default retry policy.
    pub fn new(encoder: Arc<dyn QrEncoder>, history: HistoryStore) -> Self {
        Self {
            encoder,
            history,
            policy: RetryPolicy::default(),
        }
    }

    /// Build from the generator section of the app config.
    pub fn from_config(
        encoder: Arc<dyn QrEncoder>,
        history: HistoryStore,
        config: &qrkit_core::GeneratorConfig,
    ) -> Self {
        Self::new(encoder, history).with_policy(RetryPolicy::new(
            config.max_attempts,
            Duration::from_millis(config.base_delay_ms),
        ))
    }

    /// Replace the retry policy.
    #[must_use]
    pub fn with_policy(mut self, policy: RetryPolicy) -> Self {
        self.policy = policy;
        self
    }

    /// History this generator records into.
    #[must_use]
    pub fn history(&self) -> &HistoryStore {
        &self.history
    }

    /// Generate a code for `input` using the template of `class`.
    ///
    /// Input is required. Nothing is encoded or recorded when validation
    /// fails, and history is only written after a successful encode.
    pub async fn generate(
        &self,
        class: ContentClass,
        input: &str,
        options: &EncodeOptions,
    ) -> Result<Generated, GenerateError> {
        let template = QrTemplate::for_class(class);
        let value = class
            .validate(input, &ValidationOptions::new().required(true))
            .into_result()
            .map_err(GenerateError::Validation)?;
        let payload = template.format(&value);

        tracing::debug!(template = template.name, len = payload.len(), "Encoding payload");

        let encoder = &self.encoder;
        let encoded = payload.as_str();
        let image = with_retry(self.policy, || async move { encoder.encode(encoded, options) })
            .await
            .map_err(GenerateError::Encode)?;

        let entry = HistoryEntry::new(value, template.name, image.clone());
        self.history.add(entry.clone());
        tracing::info!(id = %entry.id, template = template.name, "QR code generated");

        Ok(Generated {
            payload,
            image,
            entry,
        })
    }
}
