//! OCR Service
//!
//! Holds the configured providers and picks the one an OCR run will use.

use std::sync::Arc;

use super::{
    provider::{OcrProviderTrait, OllamaProvider, TesseractProvider},
    types::{OcrError, OcrProvider},
};

/// OCR service configuration
#[derive(Debug, Clone)]
pub struct OcrServiceConfig {
    /// Preferred provider order
    pub providers: Vec<OcrProvider>,
    /// Tesseract binary
    pub tesseract_command: String,
    /// Ollama base URL
    pub ollama_url: String,
    /// Ollama model name
    pub ollama_model: String,
    /// Default OCR language
    pub default_language: String,
}

impl Default for OcrServiceConfig {
    fn default() -> Self {
        Self {
            providers: vec![OcrProvider::Tesseract],
            tesseract_command: "tesseract".to_string(),
            ollama_url: "http://localhost:11434".to_string(),
            ollama_model: "llava".to_string(),
            default_language: "eng".to_string(),
        }
    }
}

/// OCR service for recognizing zone crops
pub struct OcrService {
    default_language: String,
    providers: Vec<Arc<dyn OcrProviderTrait>>,
}

impl OcrService {
    /// Create a new OCR service
    pub fn new(config: OcrServiceConfig) -> Self {
        let providers = config
            .providers
            .iter()
            .map(|kind| -> Arc<dyn OcrProviderTrait> {
                match kind {
                    OcrProvider::Tesseract => Arc::new(TesseractProvider::new(
                        &config.tesseract_command,
                        &config.default_language,
                    )),
                    OcrProvider::Ollama => {
                        Arc::new(OllamaProvider::new(&config.ollama_url, &config.ollama_model))
                    }
                }
            })
            .collect();

        Self {
            default_language: config.default_language,
            providers,
        }
    }

    /// Create a service over explicit provider instances
    pub fn with_providers(default_language: &str, providers: Vec<Arc<dyn OcrProviderTrait>>) -> Self {
        Self {
            default_language: default_language.to_string(),
            providers,
        }
    }

    pub fn default_language(&self) -> &str {
        &self.default_language
    }

    /// Get available providers
    pub async fn available_providers(&self) -> Vec<OcrProvider> {
        let mut available = Vec::new();
        for provider in &self.providers {
            if provider.is_available().await {
                available.push(provider.provider_type());
            }
        }
        available
    }

    /// Pick the provider for a run
    ///
    /// A preferred provider must be configured and reachable; otherwise the
    /// first reachable provider in configured order is used.
    pub async fn select_provider(
        &self,
        preferred: Option<OcrProvider>,
    ) -> Result<Arc<dyn OcrProviderTrait>, OcrError> {
        if let Some(preferred) = preferred {
            let provider = self
                .providers
                .iter()
                .find(|p| p.provider_type() == preferred)
                .ok_or_else(|| {
                    OcrError::ProviderNotAvailable(format!(
                        "{:?} provider is not configured",
                        preferred
                    ))
                })?;

            if !provider.is_available().await {
                return Err(OcrError::ProviderNotAvailable(format!(
                    "{:?} provider is not available",
                    preferred
                )));
            }
            return Ok(Arc::clone(provider));
        }

        for provider in &self.providers {
            if provider.is_available().await {
                return Ok(Arc::clone(provider));
            }
            tracing::warn!(
                "OCR provider {:?} is not available, trying next",
                provider.provider_type()
            );
        }

        Err(OcrError::ProviderNotAvailable(
            "No OCR providers available".to_string(),
        ))
    }
}
