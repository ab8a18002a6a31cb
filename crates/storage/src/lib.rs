use anyhow::{Context, Result};
use sqlx::{
    sqlite::{SqliteConnectOptions, SqlitePoolOptions},
    Pool, Row, Sqlite,
};
use std::{
    fs,
    path::{Path, PathBuf},
    str::FromStr,
};
use tracing::warn;

use shared::domain::{LessonId, ProjectId, Theme, UserProgress};

/// Key holding the JSON-serialized [`UserProgress`] record.
pub const PROGRESS_KEY: &str = "softvibe_progress";
/// Key holding the literal theme value ("dark" or "light").
pub const THEME_KEY: &str = "softvibe_theme";

const DRAFT_KEY_PREFIX: &str = "softvibe_draft_";

/// Durable key→text store backing learner progress, per-project drafts, and
/// the theme preference. Every mutation writes through immediately; there is
/// no batching or coalescing.
#[derive(Clone)]
pub struct Storage {
    pool: Pool<Sqlite>,
}

impl Storage {
    pub async fn new(database_url: &str) -> Result<Self> {
        ensure_sqlite_parent_dir_exists(database_url)?;

        let connect_options = SqliteConnectOptions::from_str(database_url)?.create_if_missing(true);
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(connect_options)
            .await?;
        let storage = Self { pool };
        storage.ensure_kv_table().await?;
        Ok(storage)
    }

    pub async fn health_check(&self) -> Result<()> {
        let _: i64 = sqlx::query_scalar("SELECT 1")
            .fetch_one(&self.pool)
            .await
            .context("sqlite ping failed")?;
        Ok(())
    }

    async fn ensure_kv_table(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS app_kv (
                key   TEXT PRIMARY KEY,
                value TEXT NOT NULL
            )
            "#,
        )
        .execute(&self.pool)
        .await
        .context("failed to ensure app_kv table exists")?;
        Ok(())
    }

    pub async fn get(&self, key: &str) -> Result<Option<String>> {
        let row = sqlx::query("SELECT value FROM app_kv WHERE key = ?")
            .bind(key)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(|r| r.get::<String, _>(0)))
    }

    pub async fn put(&self, key: &str, value: &str) -> Result<()> {
        sqlx::query(
            "INSERT INTO app_kv (key, value) VALUES (?, ?)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value",
        )
        .bind(key)
        .bind(value)
        .execute(&self.pool)
        .await?;
        Ok(())
    }

    pub async fn remove(&self, key: &str) -> Result<()> {
        sqlx::query("DELETE FROM app_kv WHERE key = ?")
            .bind(key)
            .execute(&self.pool)
            .await?;
        Ok(())
    }

    /// Reads the persisted progress record. Absence, read failure, and
    /// malformed JSON all yield the zero-value default; the caller never
    /// sees an error.
    pub async fn load_progress(&self) -> UserProgress {
        let raw = match self.get(PROGRESS_KEY).await {
            Ok(raw) => raw,
            Err(err) => {
                warn!(error = %err, "failed to read persisted progress, using defaults");
                return UserProgress::default();
            }
        };
        let Some(raw) = raw else {
            return UserProgress::default();
        };
        match serde_json::from_str(&raw) {
            Ok(progress) => progress,
            Err(err) => {
                warn!(error = %err, "persisted progress is malformed, using defaults");
                UserProgress::default()
            }
        }
    }

    pub async fn save_progress(&self, progress: &UserProgress) -> Result<()> {
        let json = serde_json::to_string(progress).context("failed to serialize progress")?;
        self.put(PROGRESS_KEY, &json).await
    }

    /// Records a lesson completion. No-op when the lesson is already in the
    /// completed set; otherwise the full record is re-serialized to durable
    /// storage immediately. Returns whether anything changed.
    pub async fn record_lesson_completion(
        &self,
        progress: &mut UserProgress,
        lesson_id: &LessonId,
    ) -> Result<bool> {
        if !progress.record_lesson(lesson_id) {
            return Ok(false);
        }
        self.save_progress(progress).await?;
        Ok(true)
    }

    /// Idempotent analogue of [`Self::record_lesson_completion`].
    pub async fn record_project_completion(
        &self,
        progress: &mut UserProgress,
        project_id: &ProjectId,
    ) -> Result<bool> {
        if !progress.record_project(project_id) {
            return Ok(false);
        }
        self.save_progress(progress).await?;
        Ok(true)
    }

    /// Unconditional overwrite of the in-progress code for a project.
    pub async fn save_draft(&self, project_id: &ProjectId, code: &str) -> Result<()> {
        self.put(&draft_key(project_id), code).await
    }

    pub async fn load_draft(&self, project_id: &ProjectId) -> Result<Option<String>> {
        self.get(&draft_key(project_id)).await
    }

    /// Removes a draft. Called exactly once, on project submission.
    pub async fn clear_draft(&self, project_id: &ProjectId) -> Result<()> {
        self.remove(&draft_key(project_id)).await
    }

    /// Reads the theme preference, defaulting on absence or an unknown value.
    pub async fn load_theme(&self) -> Theme {
        match self.get(THEME_KEY).await {
            Ok(Some(raw)) => Theme::from_storage_value(&raw).unwrap_or_default(),
            Ok(None) => Theme::default(),
            Err(err) => {
                warn!(error = %err, "failed to read theme preference, using default");
                Theme::default()
            }
        }
    }

    pub async fn save_theme(&self, theme: Theme) -> Result<()> {
        self.put(THEME_KEY, theme.storage_value()).await
    }
}

fn draft_key(project_id: &ProjectId) -> String {
    format!("{DRAFT_KEY_PREFIX}{project_id}")
}

fn ensure_sqlite_parent_dir_exists(database_url: &str) -> Result<()> {
    let Some(path) = sqlite_path(database_url) else {
        return Ok(());
    };

    let Some(parent) = path.parent() else {
        return Ok(());
    };

    fs::create_dir_all(parent).with_context(|| {
        format!(
            "failed to create parent directory '{}' for database url '{database_url}'",
            parent.display()
        )
    })?;

    Ok(())
}

fn sqlite_path(database_url: &str) -> Option<PathBuf> {
    if database_url == "sqlite::memory:" || !database_url.starts_with("sqlite:") {
        return None;
    }

    let path = database_url
        .trim_start_matches("sqlite://")
        .trim_start_matches("sqlite:")
        .split('?')
        .next()
        .unwrap_or_default();

    if path.is_empty() {
        return None;
    }

    Some(Path::new(path).to_path_buf())
}

#[cfg(test)]
#[path = "tests/lib_tests.rs"]
mod tests;
