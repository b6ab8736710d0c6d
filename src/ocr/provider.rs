//! OCR Providers
//!
//! Defines the provider trait and implementations for different OCR backends.
//! Every provider is asked to treat its input as a single uniform block of
//! text: zones are already cropped, so no page layout analysis is wanted.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use super::types::{OcrError, OcrProvider, OcrResult};

/// Tesseract page segmentation mode: assume a single uniform block of text
pub const SINGLE_BLOCK_PSM: u32 = 6;

/// OCR provider trait
#[async_trait]
pub trait OcrProviderTrait: Send + Sync {
    /// Get the provider type
    fn provider_type(&self) -> OcrProvider;

    /// Check if the provider is available
    async fn is_available(&self) -> bool;

    /// Perform OCR on a PNG-encoded image
    async fn recognize(&self, image_data: &[u8], language: Option<&str>) -> Result<OcrResult, OcrError>;
}

/// Tesseract OCR provider, driven through the `tesseract` CLI
pub struct TesseractProvider {
    /// Binary to invoke
    command: String,
    /// Default language
    default_language: String,
}

impl TesseractProvider {
    pub fn new(command: &str, default_language: &str) -> Self {
        Self {
            command: command.to_string(),
            default_language: default_language.to_string(),
        }
    }
}

#[async_trait]
impl OcrProviderTrait for TesseractProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Tesseract
    }

    async fn is_available(&self) -> bool {
        tokio::process::Command::new(&self.command)
            .arg("--version")
            .output()
            .await
            .map(|output| output.status.success())
            .unwrap_or(false)
    }

    async fn recognize(&self, image_data: &[u8], language: Option<&str>) -> Result<OcrResult, OcrError> {
        use std::io::Write;

        let lang = language.unwrap_or(&self.default_language);

        let mut input = tempfile::Builder::new()
            .prefix("zone_ocr_")
            .suffix(".png")
            .tempfile()
            .map_err(|e| OcrError::ProcessingError(format!("Failed to create temp file: {}", e)))?;
        input
            .write_all(image_data)
            .and_then(|_| input.flush())
            .map_err(|e| OcrError::ProcessingError(format!("Failed to write temp file: {}", e)))?;

        let output = tokio::process::Command::new(&self.command)
            .arg(input.path())
            .arg("stdout")
            .arg("-l")
            .arg(lang)
            .arg("--psm")
            .arg(SINGLE_BLOCK_PSM.to_string())
            .output()
            .await
            .map_err(|e| OcrError::ProcessingError(format!("Failed to run tesseract: {}", e)))?;

        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(OcrError::ProcessingError(format!(
                "Tesseract failed: {}",
                stderr.trim()
            )));
        }

        Ok(OcrResult {
            text: String::from_utf8_lossy(&output.stdout).into_owned(),
            provider: OcrProvider::Tesseract,
        })
    }
}

/// Ollama vision model provider
///
/// Sends each zone crop to `/api/generate` with a transcription prompt.
pub struct OllamaProvider {
    /// Ollama API URL
    base_url: String,
    /// Vision model name (e.g., "llava")
    model: String,
    client: reqwest::Client,
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: String,
    images: [String; 1],
    stream: bool,
    options: GenerateOptions,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: String,
}

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<ModelTag>,
}

#[derive(Debug, Deserialize)]
struct ModelTag {
    name: String,
}

impl OllamaProvider {
    pub fn new(base_url: &str, model: &str) -> Self {
        Self {
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            client: reqwest::Client::new(),
        }
    }

    /// Whether an installed model tag refers to the configured model
    fn is_configured_model(&self, tag: &str) -> bool {
        tag == self.model || tag.split(':').next() == Some(self.model.as_str())
    }
}

/// English name for a Tesseract language code such as `deu` or `eng+fra`
fn language_name(code: &str) -> String {
    code.split('+')
        .map(|part| match part {
            "eng" => "English",
            "deu" => "German",
            "fra" => "French",
            "spa" => "Spanish",
            "ita" => "Italian",
            "por" => "Portuguese",
            "nld" => "Dutch",
            "pol" => "Polish",
            "rus" => "Russian",
            "jpn" => "Japanese",
            "kor" => "Korean",
            "chi_sim" => "Simplified Chinese",
            "chi_tra" => "Traditional Chinese",
            other => other,
        })
        .collect::<Vec<_>>()
        .join(" or ")
}

fn transcription_prompt(language: Option<&str>) -> String {
    let mut prompt = String::from(
        "The image is a single block of text cropped from a scanned document. \
         Transcribe it exactly as written, keeping the line breaks. \
         Return only the text, with no commentary.",
    );
    if let Some(code) = language {
        prompt.push_str(&format!(" The text is in {}.", language_name(code)));
    }
    prompt
}

#[async_trait]
impl OcrProviderTrait for OllamaProvider {
    fn provider_type(&self) -> OcrProvider {
        OcrProvider::Ollama
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);

        let tags = match self.client.get(&url).send().await {
            Ok(response) if response.status().is_success() => {
                response.json::<TagsResponse>().await
            }
            Ok(response) => {
                tracing::debug!(status = %response.status(), "Ollama tag listing failed");
                return false;
            }
            Err(e) => {
                tracing::debug!("Ollama not reachable at {}: {}", self.base_url, e);
                return false;
            }
        };

        match tags {
            Ok(tags) => {
                let installed = tags.models.iter().any(|m| self.is_configured_model(&m.name));
                if !installed {
                    tracing::warn!(model = %self.model, "Ollama is running but the model is not installed");
                }
                installed
            }
            Err(e) => {
                tracing::debug!("Unexpected Ollama tag listing: {}", e);
                false
            }
        }
    }

    async fn recognize(&self, image_data: &[u8], language: Option<&str>) -> Result<OcrResult, OcrError> {
        use base64::Engine;

        let url = format!("{}/api/generate", self.base_url);
        let request = GenerateRequest {
            model: &self.model,
            prompt: transcription_prompt(language),
            images: [base64::engine::general_purpose::STANDARD.encode(image_data)],
            stream: false,
            options: GenerateOptions { temperature: 0.0 },
        };

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to call Ollama: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(OcrError::ApiError(format!(
                "Ollama returned {}: {}",
                status,
                body.trim()
            )));
        }

        let generated: GenerateResponse = response
            .json()
            .await
            .map_err(|e| OcrError::ApiError(format!("Failed to parse Ollama response: {}", e)))?;

        Ok(OcrResult {
            text: generated.response,
            provider: OcrProvider::Ollama,
        })
    }
}


#[cfg(test)]
mod tests {
    use std::path::PathBuf;
    use std::sync::Arc;

    use axum::{extract::State, http::StatusCode, routing::{get, post}, Json, Router};
    use parking_lot::Mutex;
    use serde_json::{json, Value};
    use tempfile::TempDir;

    use super::*;

    /// Write an executable shell script standing in for the tesseract binary
    #[cfg(unix)]
    fn fake_tesseract(dir: &TempDir, body: &str) -> PathBuf {
        use std::os::unix::fs::PermissionsExt;

        let path = dir.path().join("tesseract");
        std::fs::write(&path, format!("#!/bin/sh\n{}\n", body)).unwrap();
        std::fs::set_permissions(&path, std::fs::Permissions::from_mode(0o755)).unwrap();
        path
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tesseract_arguments() {
        let dir = TempDir::new().unwrap();
        let script = fake_tesseract(&dir, "printf '%s\\n' \"$@\"");
        let provider = TesseractProvider::new(script.to_str().unwrap(), "eng");

        let result = provider.recognize(b"png", Some("deu")).await.unwrap();
        let args: Vec<&str> = result.text.lines().collect();

        assert_eq!(args.len(), 6);
        assert!(args[0].ends_with(".png"), "input path: {}", args[0]);
        assert_eq!(&args[1..], ["stdout", "-l", "deu", "--psm", "6"]);
        assert_eq!(result.provider, OcrProvider::Tesseract);

        // The temporary input is removed once recognition finishes
        assert!(!std::path::Path::new(args[0]).exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tesseract_default_language() {
        let dir = TempDir::new().unwrap();
        let script = fake_tesseract(&dir, "printf '%s\\n' \"$@\"");
        let provider = TesseractProvider::new(script.to_str().unwrap(), "fra");

        let result = provider.recognize(b"png", None).await.unwrap();
        assert_eq!(result.text.lines().nth(3), Some("fra"));
        assert!(provider.is_available().await);
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_tesseract_failure() {
        let dir = TempDir::new().unwrap();
        let script = fake_tesseract(&dir, "echo 'Error opening data file' >&2\nexit 1");
        let provider = TesseractProvider::new(script.to_str().unwrap(), "eng");

        let err = provider.recognize(b"png", None).await.unwrap_err();
        match err {
            OcrError::ProcessingError(message) => {
                assert!(message.contains("Error opening data file"), "{}", message)
            }
            other => panic!("unexpected error: {other:?}"),
        }
        assert!(!provider.is_available().await);
    }

    #[tokio::test]
    async fn test_tesseract_missing_binary() {
        let dir = TempDir::new().unwrap();
        let missing = dir.path().join("no-such-tesseract");
        let provider = TesseractProvider::new(missing.to_str().unwrap(), "eng");

        assert!(!provider.is_available().await);
        assert!(matches!(
            provider.recognize(b"png", None).await,
            Err(OcrError::ProcessingError(_))
        ));
    }

    /// In-process stand-in for the Ollama HTTP API
    #[derive(Clone)]
    struct MockOllama {
        models: Vec<String>,
        reply: Result<String, (StatusCode, String)>,
        last_request: Arc<Mutex<Option<Value>>>,
    }

    async fn tags(State(mock): State<MockOllama>) -> Json<Value> {
        let models: Vec<Value> = mock.models.iter().map(|name| json!({ "name": name })).collect();
        Json(json!({ "models": models }))
    }

    async fn generate(
        State(mock): State<MockOllama>,
        Json(body): Json<Value>,
    ) -> std::result::Result<Json<Value>, (StatusCode, String)> {
        *mock.last_request.lock() = Some(body);
        match mock.reply {
            Ok(text) => Ok(Json(json!({ "model": "llava", "response": text, "done": true }))),
            Err(failure) => Err(failure),
        }
    }

    /// Serve `mock` on an ephemeral port, returning its base URL
    async fn serve(mock: MockOllama) -> String {
        let app = Router::new()
            .route("/api/tags", get(tags))
            .route("/api/generate", post(generate))
            .with_state(mock);

        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });

        format!("http://{}/", addr)
    }

    fn mock(models: &[&str], reply: Result<&str, (StatusCode, &str)>) -> MockOllama {
        MockOllama {
            models: models.iter().map(|m| m.to_string()).collect(),
            reply: reply
                .map(str::to_string)
                .map_err(|(status, body)| (status, body.to_string())),
            last_request: Arc::new(Mutex::new(None)),
        }
    }

    #[test]
    fn test_language_names() {
        assert_eq!(language_name("eng"), "English");
        assert_eq!(language_name("deu+fra"), "German or French");
        assert_eq!(language_name("chi_sim"), "Simplified Chinese");
        assert_eq!(language_name("tha"), "tha");
    }

    #[tokio::test]
    async fn test_ollama_request_and_response() {
        let server = mock(&["llava:latest"], Ok("Invoice 42\nTotal 10.00"));
        let last_request = Arc::clone(&server.last_request);
        let provider = OllamaProvider::new(&serve(server).await, "llava");

        assert!(provider.is_available().await);

        let result = provider.recognize(b"png-bytes", Some("deu")).await.unwrap();
        assert_eq!(result.text, "Invoice 42\nTotal 10.00");
        assert_eq!(result.provider, OcrProvider::Ollama);

        let request = last_request.lock().take().unwrap();
        assert_eq!(request["model"], "llava");
        assert_eq!(request["stream"], false);
        assert_eq!(request["options"]["temperature"], 0.0);
        assert_eq!(request["images"], json!(["cG5nLWJ5dGVz"]));

        let prompt = request["prompt"].as_str().unwrap();
        assert!(prompt.contains("single block of text"), "{}", prompt);
        assert!(prompt.ends_with("The text is in German."), "{}", prompt);
    }

    #[tokio::test]
    async fn test_ollama_without_language_hint() {
        let server = mock(&["llava"], Ok("x"));
        let last_request = Arc::clone(&server.last_request);
        let provider = OllamaProvider::new(&serve(server).await, "llava");

        provider.recognize(b"png", None).await.unwrap();

        let request = last_request.lock().take().unwrap();
        assert!(!request["prompt"].as_str().unwrap().contains("The text is in"));
    }

    #[tokio::test]
    async fn test_ollama_model_not_installed() {
        let provider = OllamaProvider::new(&serve(mock(&["llama3:8b"], Ok("x"))).await, "llava");
        assert!(!provider.is_available().await);
    }

    #[tokio::test]
    async fn test_ollama_error_status() {
        let server = mock(
            &["llava"],
            Err((StatusCode::NOT_FOUND, "model 'llava' not found")),
        );
        let provider = OllamaProvider::new(&serve(server).await, "llava");

        match provider.recognize(b"png", None).await {
            Err(OcrError::ApiError(message)) => {
                assert!(message.contains("404"), "{}", message);
                assert!(message.contains("model 'llava' not found"), "{}", message);
            }
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_ollama_unreachable() {
        let listener = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let addr = listener.local_addr().unwrap();
        drop(listener);

        let provider = OllamaProvider::new(&format!("http://{}", addr), "llava");
        assert!(!provider.is_available().await);
        assert!(matches!(
            provider.recognize(b"png", None).await,
            Err(OcrError::ApiError(_))
        ));
    }
}
