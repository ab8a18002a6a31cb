//! Request/response wrapper around the hosted language-model endpoint that
//! powers the AI tutor.

use async_trait::async_trait;
use regex::Regex;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use shared::domain::Language;

use crate::config::Settings;

/// Fixed advisory shown when no tutor credential is configured.
pub const CREDENTIAL_MISSING_MESSAGE: &str = "AI assistance is currently unavailable because \
     the API key is missing. Please check your configuration.";

/// Fixed advisory shown when the tutor service cannot be reached.
pub const TUTOR_UNAVAILABLE_MESSAGE: &str = "Sorry, I'm having trouble connecting to the AI \
     tutor right now. Please check your connection.";

const EMPTY_COMPLETION_MESSAGE: &str = "I couldn't generate a response at this time.";

#[derive(Debug, Error)]
pub enum TutorError {
    #[error("tutor credential is not configured")]
    CredentialMissing,
    #[error("tutor service unavailable: {0}")]
    ServiceUnavailable(#[from] reqwest::Error),
}

/// Seam for the tutor endpoint so the session controller can be exercised
/// with test doubles.
#[async_trait]
pub trait TutorApi: Send + Sync {
    /// Sends the learner's current code plus lesson/project context and
    /// returns markdown-formatted feedback. The caller is responsible for
    /// safe rendering of that markdown, and for refusing to call while
    /// offline.
    async fn ask(&self, code: &str, context: &str, language: Language)
        -> Result<String, TutorError>;
}

pub struct TutorClient {
    http: Client,
    base_url: String,
    model: String,
    api_key: Option<String>,
    system_instruction: Option<String>,
    tag_pattern: Regex,
}

#[derive(Debug, Serialize)]
struct GenerateContentRequest {
    system_instruction: ContentBlock,
    contents: Vec<ContentBlock>,
}

#[derive(Debug, Serialize, Deserialize)]
struct ContentBlock {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<TextPart>,
}

#[derive(Debug, Serialize, Deserialize)]
struct TextPart {
    text: String,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<ContentBlock>,
}

impl TutorClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: Client::new(),
            base_url: settings.tutor_base_url.trim_end_matches('/').to_string(),
            model: settings.tutor_model.clone(),
            api_key: settings.tutor_api_key.clone(),
            system_instruction: settings.tutor_system_instruction.clone(),
            tag_pattern: Regex::new("<[^>]*>").expect("static tag pattern compiles"),
        }
    }

    fn request_url(&self) -> String {
        format!(
            "{}/v1beta/models/{}:generateContent",
            self.base_url, self.model
        )
    }

    fn system_instruction_for(&self, language: Language) -> String {
        if let Some(instruction) = &self.system_instruction {
            return instruction.clone();
        }
        format!(
            "You are a friendly and encouraging coding tutor for the softvibe platform. \
             Your student is learning {language}. \
             Analyze the provided code and the lesson context. \
             If the user asks for help, provide a hint, not the full solution immediately. \
             If the code has errors, explain them simply. \
             Keep responses concise (under 150 words) and formatted with Markdown."
        )
    }

    /// Lesson content arrives as HTML; the model gets plain text.
    fn strip_markup(&self, text: &str) -> String {
        self.tag_pattern.replace_all(text, "").trim().to_string()
    }

    fn build_prompt(&self, code: &str, context: &str, language: Language) -> String {
        format!(
            "Context/Lesson: {}\n\nStudent's Current Code:\n```{}\n{}\n```\n\nPlease analyze \
             the code and provide helpful feedback or a hint to move forward.",
            self.strip_markup(context),
            language.wire_tag(),
            code
        )
    }
}

#[async_trait]
impl TutorApi for TutorClient {
    async fn ask(
        &self,
        code: &str,
        context: &str,
        language: Language,
    ) -> Result<String, TutorError> {
        let Some(api_key) = &self.api_key else {
            return Err(TutorError::CredentialMissing);
        };

        let request = GenerateContentRequest {
            system_instruction: ContentBlock {
                role: None,
                parts: vec![TextPart {
                    text: self.system_instruction_for(language),
                }],
            },
            contents: vec![ContentBlock {
                role: Some("user".to_string()),
                parts: vec![TextPart {
                    text: self.build_prompt(code, context, language),
                }],
            }],
        };

        let response = self
            .http
            .post(self.request_url())
            .query(&[("key", api_key.as_str())])
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<GenerateContentResponse>()
            .await?;

        let text: String = response
            .candidates
            .into_iter()
            .filter_map(|candidate| candidate.content)
            .flat_map(|content| content.parts)
            .map(|part| part.text)
            .collect();

        if text.trim().is_empty() {
            Ok(EMPTY_COMPLETION_MESSAGE.to_string())
        } else {
            Ok(text)
        }
    }
}

#[cfg(test)]
#[path = "tests/tutor_tests.rs"]
mod tests;
