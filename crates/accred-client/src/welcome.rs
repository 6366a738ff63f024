//! Welcome message production with failure absorption.

use std::sync::Arc;

use accred_core::WelcomeRequest;

use crate::genai::TextGenerator;

/// Produces the welcome message attached at registration.
///
/// Generator errors and empty output are logged and replaced by
/// [`WelcomeRequest::fallback`], so [`WelcomeWriter::write`] never fails and
/// never returns an empty string.
#[derive(Clone, Default)]
pub struct WelcomeWriter {
    generator: Option<Arc<dyn TextGenerator>>,
}

impl std::fmt::Debug for WelcomeWriter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("WelcomeWriter")
            .field("generator", &self.generator.is_some())
            .finish()
    }
}

impl WelcomeWriter {
    /// Use `generator` for welcome messages.
    pub fn new(generator: Arc<dyn TextGenerator>) -> Self {
        Self {
            generator: Some(generator),
        }
    }

    /// Always use the templated fallback.
    pub fn fallback_only() -> Self {
        Self { generator: None }
    }

    /// Produce the message for `request`.
    pub async fn write(&self, request: &WelcomeRequest) -> String {
        let Some(generator) = &self.generator else {
            return request.fallback();
        };
        match generator.generate(&request.prompt()).await {
            Ok(text) if !text.trim().is_empty() => text,
            Ok(_) => {
                tracing::warn!("text generator returned blank output, using fallback welcome");
                request.fallback()
            }
            Err(e) => {
                tracing::warn!(error = %e, "text generation failed, using fallback welcome");
                request.fallback()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GenAiError;
    use accred_core::Salutation;
    use async_trait::async_trait;

    struct Fixed(&'static str);

    #[async_trait]
    impl TextGenerator for Fixed {
        async fn generate(&self, _prompt: &str) -> Result<String, GenAiError> {
            Ok(self.0.to_string())
        }
    }

    struct Broken;

    #[async_trait]
    impl TextGenerator for Broken {
        async fn generate(&self, _prompt: &str) -> Result<String, GenAiError> {
            Err(GenAiError::Empty)
        }
    }

    fn request() -> WelcomeRequest {
        WelcomeRequest {
            salutation: Salutation::Madame,
            full_name: "Awa Diop".into(),
            organization: "Sonatel".into(),
        }
    }

    #[tokio::test]
    async fn uses_generated_text() {
        let writer = WelcomeWriter::new(Arc::new(Fixed("Bienvenue Madame Diop.")));
        assert_eq!(writer.write(&request()).await, "Bienvenue Madame Diop.");
    }

    #[tokio::test]
    async fn failures_and_blank_output_fall_back() {
        for writer in [
            WelcomeWriter::new(Arc::new(Broken)),
            WelcomeWriter::new(Arc::new(Fixed("  "))),
            WelcomeWriter::fallback_only(),
        ] {
            let text = writer.write(&request()).await;
            assert_eq!(text, request().fallback());
            assert!(!text.is_empty());
        }
    }
}
