//! Request/response wrapper around the hosted code-execution sandbox
//! (Judge0-style submissions API).

use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use reqwest::Client;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::config::Settings;

/// Fixed text surfaced when a run produced no output of any kind.
pub const NO_OUTPUT_MESSAGE: &str = "Execution finished with no output.";

/// Fixed advisory shown when the sandbox cannot be reached.
pub const SANDBOX_UNREACHABLE_MESSAGE: &str = "Failed to connect to the execution sandbox.";

#[derive(Debug, Error)]
pub enum SandboxError {
    #[error("unsupported language for sandbox execution: {0}")]
    UnsupportedLanguage(String),
    #[error("failed to reach the execution sandbox: {0}")]
    Unreachable(#[from] reqwest::Error),
    #[error("sandbox returned an undecodable field: {0}")]
    MalformedResponse(#[from] base64::DecodeError),
}

/// Maps a source-language tag to the sandbox's numeric language id. The
/// table is closed; anything outside it is unsupported.
pub fn sandbox_language_id(tag: &str) -> Option<u32> {
    match tag.to_ascii_lowercase().as_str() {
        "python" => Some(71), // Python (3.8.1)
        "java" => Some(62),   // Java (OpenJDK 13.0.1)
        "c" => Some(50),      // C (GCC 9.2.0)
        _ => None,
    }
}

/// Seam for the execution endpoint so the session controller can be
/// exercised with test doubles.
#[async_trait]
pub trait SandboxApi: Send + Sync {
    /// Submits code with optional stdin and awaits synchronous completion.
    /// Unsupported tags fail before any network I/O. The caller is
    /// responsible for refusing to call while offline.
    async fn execute(
        &self,
        code: &str,
        language_tag: &str,
        stdin: &str,
    ) -> Result<String, SandboxError>;
}

pub struct SandboxClient {
    http: Client,
    base_url: String,
}

#[derive(Debug, Serialize, Deserialize)]
struct SubmissionRequest {
    source_code: String,
    language_id: u32,
    stdin: String,
}

#[derive(Debug, Default, Deserialize)]
struct SubmissionResponse {
    stdout: Option<String>,
    stderr: Option<String>,
    compile_output: Option<String>,
    message: Option<String>,
    status: Option<SubmissionStatus>,
}

#[derive(Debug, Deserialize)]
struct SubmissionStatus {
    description: Option<String>,
}

impl SubmissionResponse {
    /// Collapses the response into the single text the output terminal
    /// shows. Precedence: stdout, stderr, compiler diagnostics, system
    /// message, status description, fixed no-output text.
    fn into_display_output(self) -> Result<String, SandboxError> {
        if let Some(stdout) = decode_field(self.stdout)? {
            return Ok(stdout);
        }
        if let Some(stderr) = decode_field(self.stderr)? {
            return Ok(format!("Error: {stderr}"));
        }
        if let Some(compile_output) = decode_field(self.compile_output)? {
            return Ok(format!("Compilation Error:\n{compile_output}"));
        }
        if let Some(message) = decode_field(self.message)? {
            return Ok(format!("System Message: {message}"));
        }
        if let Some(description) = self.status.and_then(|status| status.description) {
            return Ok(description);
        }
        Ok(NO_OUTPUT_MESSAGE.to_string())
    }
}

/// Decodes a base64 response field. Absent and empty fields are both "not
/// present" for precedence purposes.
fn decode_field(field: Option<String>) -> Result<Option<String>, SandboxError> {
    let Some(raw) = field else {
        return Ok(None);
    };
    if raw.is_empty() {
        return Ok(None);
    }
    let bytes = STANDARD.decode(raw.trim_end_matches('\n'))?;
    Ok(Some(String::from_utf8_lossy(&bytes).into_owned()))
}

impl SandboxClient {
    pub fn new(settings: &Settings) -> Self {
        Self {
            http: Client::new(),
            base_url: settings.sandbox_base_url.trim_end_matches('/').to_string(),
        }
    }
}

#[async_trait]
impl SandboxApi for SandboxClient {
    async fn execute(
        &self,
        code: &str,
        language_tag: &str,
        stdin: &str,
    ) -> Result<String, SandboxError> {
        let language_id = sandbox_language_id(language_tag)
            .ok_or_else(|| SandboxError::UnsupportedLanguage(language_tag.to_string()))?;

        let request = SubmissionRequest {
            source_code: STANDARD.encode(code),
            language_id,
            stdin: STANDARD.encode(stdin),
        };

        // wait=true trades throughput for the synchronous behavior the
        // simple output terminal expects.
        let response = self
            .http
            .post(format!("{}/submissions", self.base_url))
            .query(&[("base64_encoded", "true"), ("wait", "true")])
            .json(&request)
            .send()
            .await?
            .error_for_status()?
            .json::<SubmissionResponse>()
            .await?;

        response.into_display_output()
    }
}

#[cfg(test)]
#[path = "tests/sandbox_tests.rs"]
mod tests;
