//! Settings for the client core: storage location and the two remote
//! service endpoints. Defaults, then `softvibe.toml`, then environment.

use std::{collections::HashMap, fs};

use serde::Deserialize;

#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub database_url: String,
    pub tutor_base_url: String,
    pub tutor_model: String,
    /// Credential for the tutor endpoint. Its absence is a detectable,
    /// user-facing condition, never a crash.
    pub tutor_api_key: Option<String>,
    /// Operator override for the tutor system instruction. When unset the
    /// built-in instruction template is used.
    pub tutor_system_instruction: Option<String>,
    pub sandbox_base_url: String,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: "sqlite://./data/softvibe.db".into(),
            tutor_base_url: "https://generativelanguage.googleapis.com".into(),
            tutor_model: "gemini-2.5-flash".into(),
            tutor_api_key: None,
            tutor_system_instruction: None,
            sandbox_base_url: "https://ce.judge0.com".into(),
        }
    }
}

pub fn load_settings() -> Settings {
    let mut settings = Settings::default();

    if let Ok(raw) = fs::read_to_string("softvibe.toml") {
        if let Ok(file_cfg) = toml::from_str::<HashMap<String, String>>(&raw) {
            apply_file_settings(&mut settings, &file_cfg);
        }
    }

    if let Ok(v) = std::env::var("DATABASE_URL") {
        settings.database_url = v;
    }
    if let Ok(v) = std::env::var("SOFTVIBE_DATABASE_URL") {
        settings.database_url = v;
    }

    if let Ok(v) = std::env::var("SOFTVIBE_TUTOR_URL") {
        settings.tutor_base_url = v;
    }
    if let Ok(v) = std::env::var("SOFTVIBE_TUTOR_MODEL") {
        settings.tutor_model = v;
    }

    // The legacy deployment supplied the credential as API_KEY; the
    // prefixed name wins when both are set.
    if let Ok(v) = std::env::var("API_KEY") {
        settings.tutor_api_key = Some(v);
    }
    if let Ok(v) = std::env::var("SOFTVIBE_TUTOR_API_KEY") {
        settings.tutor_api_key = Some(v);
    }

    if let Ok(v) = std::env::var("SOFTVIBE_TUTOR_SYSTEM_INSTRUCTION") {
        settings.tutor_system_instruction = Some(v);
    }

    if let Ok(v) = std::env::var("SOFTVIBE_SANDBOX_URL") {
        settings.sandbox_base_url = v;
    }

    settings
}

fn apply_file_settings(settings: &mut Settings, file_cfg: &HashMap<String, String>) {
    if let Some(v) = file_cfg.get("database_url") {
        settings.database_url = v.clone();
    }
    if let Some(v) = file_cfg.get("tutor_base_url") {
        settings.tutor_base_url = v.clone();
    }
    if let Some(v) = file_cfg.get("tutor_model") {
        settings.tutor_model = v.clone();
    }
    if let Some(v) = file_cfg.get("tutor_api_key") {
        settings.tutor_api_key = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("tutor_system_instruction") {
        settings.tutor_system_instruction = Some(v.clone());
    }
    if let Some(v) = file_cfg.get("sandbox_base_url") {
        settings.sandbox_base_url = v.clone();
    }
}
