//! Comment Suggestions
//!
//! Asks a text-generation service for a short comment describing a
//! contribution. Suggestions never fail outright: every outcome is a string
//! the form can show.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::config::{BackendConfig, ServiceStatus};

pub const GEMINI_MODEL_NAME: &str = "gemini-2.5-flash-preview-04-17";
pub const GEMINI_ENDPOINT: &str = "https://generativelanguage.googleapis.com/v1beta/models";

pub const UNAVAILABLE_PREFIX: &str = "AI suggestions unavailable.";
pub const FAILURE_PREFIX: &str = "Could not generate suggestion";

#[async_trait(?Send)]
pub trait CommentSuggester {
    async fn suggest(&self, amount: f64, contributor_name: &str) -> String;

    fn status(&self) -> ServiceStatus;
}

/// True for texts that describe a failed or unavailable suggestion
pub fn is_failure_text(text: &str) -> bool {
    text.starts_with(UNAVAILABLE_PREFIX) || text.starts_with(FAILURE_PREFIX)
}

pub fn build_prompt(amount: f64, contributor_name: &str) -> String {
    format!(
        "Generate a concise, positive, and contextually relevant comment for a financial contribution.\n\
         Contributor: {contributor_name}\n\
         Amount: ${amount:.2}\n\
         Comment should be suitable for an internal capital investment tracker. Avoid generic phrases like \"Thank you\". \
         Focus on the nature of the investment or a positive acknowledgement.\n\
         Examples: \"Strategic capital injection.\", \"Funding for Q3 growth initiatives.\", \
         \"Investment towards project Alpha.\", \"Additional capital allocation.\"\n\n\
         Generated comment (1-2 short sentences):"
    )
}

/// Maps a service error message to the text shown to the user
pub fn failure_text(error_message: &str) -> String {
    if error_message.contains("API key not valid") {
        format!("{FAILURE_PREFIX}: The provided Gemini API Key is invalid. Please check it in Settings.")
    } else if error_message.contains("Quota exceeded") {
        format!("{FAILURE_PREFIX}: Gemini API quota exceeded. Please check your Google Cloud console.")
    } else {
        format!("{FAILURE_PREFIX} at this time. Check console for details.")
    }
}

/// Suggester used when no API key is configured
pub struct UnavailableSuggester;

#[async_trait(?Send)]
impl CommentSuggester for UnavailableSuggester {
    async fn suggest(&self, _amount: f64, _contributor_name: &str) -> String {
        format!("{UNAVAILABLE_PREFIX} {}", self.status().message)
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::gemini(false, false)
    }
}

// Wire types for the generateContent call

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateRequest<'a> {
    contents: [Content<'a>; 1],
    generation_config: GenerationConfig,
}

#[derive(Serialize)]
struct Content<'a> {
    parts: [Part<'a>; 1],
}

#[derive(Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerationConfig {
    temperature: f32,
    top_k: u32,
    top_p: f32,
}

#[derive(Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Deserialize)]
struct CandidatePart {
    #[serde(default)]
    text: String,
}

#[derive(Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

/// Gemini REST client
pub struct GeminiClient {
    http: reqwest::Client,
    api_key: String,
    model: String,
}

impl GeminiClient {
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.into(),
            model: GEMINI_MODEL_NAME.to_string(),
        }
    }

    fn request_body(prompt: &str) -> GenerateRequest<'_> {
        GenerateRequest {
            contents: [Content { parts: [Part { text: prompt }] }],
            generation_config: GenerationConfig {
                temperature: 0.7,
                top_k: 40,
                top_p: 0.95,
            },
        }
    }

    async fn generate(&self, prompt: &str) -> Result<String, String> {
        let url = format!("{GEMINI_ENDPOINT}/{}:generateContent", self.model);
        let response = self
            .http
            .post(url)
            .query(&[("key", self.api_key.as_str())])
            .json(&Self::request_body(prompt))
            .send()
            .await
            .map_err(|e| e.to_string())?;
        let status = response.status();
        let body = response.text().await.map_err(|e| e.to_string())?;
        if !status.is_success() {
            return Err(serde_json::from_str::<ErrorEnvelope>(&body)
                .map(|envelope| envelope.error.message)
                .unwrap_or(body));
        }
        extract_text(&body)
    }
}

fn extract_text(body: &str) -> Result<String, String> {
    let parsed: GenerateResponse = serde_json::from_str(body).map_err(|e| e.to_string())?;
    let text: String = parsed
        .candidates
        .into_iter()
        .next()
        .and_then(|c| c.content)
        .map(|content| content.parts.into_iter().map(|p| p.text).collect())
        .unwrap_or_default();
    let text = text.trim();
    if text.is_empty() {
        Err("empty response".to_string())
    } else {
        Ok(text.to_string())
    }
}

#[async_trait(?Send)]
impl CommentSuggester for GeminiClient {
    async fn suggest(&self, amount: f64, contributor_name: &str) -> String {
        match self.generate(&build_prompt(amount, contributor_name)).await {
            Ok(text) => text,
            Err(message) => {
                log::error!("Error generating comment suggestion: {}", message);
                failure_text(&message)
            }
        }
    }

    fn status(&self) -> ServiceStatus {
        ServiceStatus::gemini(true, true)
    }
}

/// Suggester for the configured key, or the unavailable stand-in
pub fn suggester_from_config(config: &BackendConfig) -> Box<dyn CommentSuggester> {
    match config.gemini_key() {
        Some(key) => {
            log::info!("Gemini AI Service initialized successfully.");
            Box::new(GeminiClient::new(key))
        }
        None => Box::new(UnavailableSuggester),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_mentions_inputs() {
        let prompt = build_prompt(6000.0, "Juliane");
        assert!(prompt.contains("Contributor: Juliane"));
        assert!(prompt.contains("Amount: $6000.00"));
    }

    #[test]
    fn test_request_body_shape() {
        let body = serde_json::to_value(GeminiClient::request_body("hi")).unwrap();
        assert_eq!(body["contents"][0]["parts"][0]["text"], "hi");
        assert_eq!(body["generationConfig"]["topK"], 40);
    }

    #[test]
    fn test_extract_text() {
        let body = r#"{"candidates":[{"content":{"parts":[{"text":"  Strategic capital injection. \n"}]}}]}"#;
        assert_eq!(extract_text(body).unwrap(), "Strategic capital injection.");
        assert!(extract_text(r#"{"candidates":[]}"#).is_err());
    }

    #[test]
    fn test_failure_texts() {
        assert!(failure_text("API key not valid. Please pass a valid API key.").contains("invalid"));
        assert!(failure_text("Quota exceeded for metric").contains("quota exceeded"));
        let generic = failure_text("connection reset");
        assert!(is_failure_text(&generic));
    }

    #[tokio::test]
    async fn test_unavailable_suggester() {
        let suggester = suggester_from_config(&BackendConfig::default());
        let text = suggester.suggest(50.0, "Ann").await;
        assert!(text.starts_with(UNAVAILABLE_PREFIX));
        assert!(is_failure_text(&text));
        assert!(!suggester.status().is_success());
    }
}
