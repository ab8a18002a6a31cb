//! Session controller: owns the catalog, stores, and network clients,
//! applies reducer transitions, and keeps interaction live while a network
//! call is in flight.

use std::sync::Arc;
use std::time::Duration;

use anyhow::Result;
use catalog::Catalog;
use shared::domain::{CourseId, Difficulty, Language, ProjectId, Theme, UserProgress};
use shared::error::{FailureKind, SurfaceError};
use storage::Storage;
use tokio::sync::Mutex;
use tokio::time::sleep;
use tracing::{debug, warn};

use crate::config::Settings;
use crate::connectivity::ConnectivityMonitor;
use crate::reducer::{reduce, Action, Effect, SessionView};
use crate::sandbox::{SandboxApi, SandboxClient, SandboxError, SANDBOX_UNREACHABLE_MESSAGE};
use crate::tutor::{
    TutorApi, TutorClient, TutorError, CREDENTIAL_MISSING_MESSAGE, TUTOR_UNAVAILABLE_MESSAGE,
};
use crate::view::ViewState;

/// Fixed message shown in the tutor panel when invocation is refused offline.
pub const OFFLINE_TUTOR_MESSAGE: &str = "AI assistance is disabled while you are offline.";

/// Fixed message shown in the output terminal when execution is refused
/// offline.
pub const OFFLINE_EXECUTION_MESSAGE: &str = "You are currently offline. Code execution is \
     unavailable until the connection returns.";

/// Brief visual-feedback pause between submitting a project and returning to
/// the project list.
const SUBMISSION_FEEDBACK_DELAY: Duration = Duration::from_millis(500);

pub struct SessionController {
    catalog: Arc<Catalog>,
    storage: Storage,
    tutor: Arc<dyn TutorApi>,
    sandbox: Arc<dyn SandboxApi>,
    connectivity: ConnectivityMonitor,
    inner: Mutex<ControllerState>,
}

struct ControllerState {
    view: SessionView,
    progress: UserProgress,
    /// Bumped on every visible view change. Responses from calls issued
    /// under an older generation are discarded on arrival; there is no
    /// cancellation of the in-flight request itself.
    generation: u64,
    tutor_busy: bool,
    execution_busy: bool,
}

impl SessionController {
    pub async fn new(settings: &Settings, connectivity: ConnectivityMonitor) -> Result<Self> {
        let storage = Storage::new(&settings.database_url).await?;
        Ok(Self::with_dependencies(
            Arc::new(Catalog::builtin()),
            storage,
            Arc::new(TutorClient::new(settings)),
            Arc::new(SandboxClient::new(settings)),
            connectivity,
        )
        .await)
    }

    pub async fn with_dependencies(
        catalog: Arc<Catalog>,
        storage: Storage,
        tutor: Arc<dyn TutorApi>,
        sandbox: Arc<dyn SandboxApi>,
        connectivity: ConnectivityMonitor,
    ) -> Self {
        let progress = storage.load_progress().await;
        Self {
            catalog,
            storage,
            tutor,
            sandbox,
            connectivity,
            inner: Mutex::new(ControllerState {
                view: SessionView::default(),
                progress,
                generation: 0,
                tutor_busy: false,
                execution_busy: false,
            }),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    pub fn connectivity(&self) -> &ConnectivityMonitor {
        &self.connectivity
    }

    /// Snapshot of the current screen for rendering.
    pub async fn view(&self) -> SessionView {
        self.inner.lock().await.view.clone()
    }

    /// Snapshot of the learner's progress record.
    pub async fn progress(&self) -> UserProgress {
        self.inner.lock().await.progress.clone()
    }

    pub async fn theme(&self) -> Theme {
        self.storage.load_theme().await
    }

    pub async fn set_theme(&self, theme: Theme) -> Result<()> {
        self.storage.save_theme(theme).await
    }

    pub async fn open_course(&self, course_id: &CourseId) -> Result<()> {
        self.apply(Action::OpenCourse {
            course_id: course_id.clone(),
        })
        .await
    }

    pub async fn complete_lesson(&self) -> Result<()> {
        self.apply(Action::CompleteLesson).await
    }

    pub async fn open_practice_lab(&self) -> Result<()> {
        self.apply(Action::OpenPracticeLab).await
    }

    /// Enters a project, seeding the editor from the saved draft when one
    /// exists.
    pub async fn open_project(&self, project_id: &ProjectId) -> Result<()> {
        let draft = self.storage.load_draft(project_id).await?;
        self.apply(Action::OpenProject {
            project_id: project_id.clone(),
            draft,
        })
        .await
    }

    pub async fn set_language_filter(&self, language: Option<Language>) -> Result<()> {
        self.apply(Action::SetLanguageFilter(language)).await
    }

    pub async fn set_difficulty_filter(&self, difficulty: Option<Difficulty>) -> Result<()> {
        self.apply(Action::SetDifficultyFilter(difficulty)).await
    }

    pub async fn go_to_dashboard(&self) -> Result<()> {
        self.apply(Action::GoToDashboard).await
    }

    pub async fn back_to_project_list(&self) -> Result<()> {
        self.apply(Action::BackToProjectList).await
    }

    pub async fn reveal_solution(&self) -> Result<()> {
        self.apply(Action::RevealSolution).await
    }

    pub async fn edit_code(&self, text: impl Into<String>) -> Result<()> {
        self.apply(Action::EditCode(text.into())).await
    }

    /// Saves the editor buffer as the active project's draft.
    pub async fn save_draft(&self) -> Result<()> {
        let (project_id, code) = {
            let inner = self.inner.lock().await;
            let ViewState::ProjectDetail { project_id } = &inner.view.state else {
                return Ok(());
            };
            (project_id.clone(), inner.view.editor.clone())
        };
        self.storage.save_draft(&project_id, &code).await
    }

    /// Records the completion, clears the draft, and returns to the project
    /// list after a brief visual-feedback pause. Navigation during the pause
    /// wins: the deferred view change is dropped.
    pub async fn submit_project(&self) -> Result<()> {
        let generation = {
            let mut inner = self.inner.lock().await;
            if !matches!(inner.view.state, ViewState::ProjectDetail { .. }) {
                return Ok(());
            }
            self.apply_locked(&mut inner, Action::SubmitProject).await?;
            inner.generation
        };

        sleep(SUBMISSION_FEEDBACK_DELAY).await;

        let mut inner = self.inner.lock().await;
        if inner.generation != generation {
            debug!("dropping deferred post-submission transition after navigation");
            return Ok(());
        }
        self.apply_locked(&mut inner, Action::SubmissionSettled).await
    }

    /// Asks the tutor about the current editor buffer. Refused locally while
    /// offline or while an earlier request is still in flight; failures
    /// surface as inline feedback text, never as a crash.
    pub async fn ask_tutor(&self) {
        let (generation, code, context, language) = {
            let mut inner = self.inner.lock().await;
            if !self.connectivity.is_online() {
                inner.view.tutor_feedback = Some(OFFLINE_TUTOR_MESSAGE.to_string());
                return;
            }
            if inner.tutor_busy {
                return;
            }
            let Some((code, context, language)) = tutor_inputs(&inner.view, &self.catalog) else {
                return;
            };
            inner.tutor_busy = true;
            inner.view.tutor_feedback = None;
            (inner.generation, code, context, language)
        };

        let outcome = self.tutor.ask(&code, &context, language).await;

        let mut inner = self.inner.lock().await;
        inner.tutor_busy = false;
        if inner.generation != generation {
            debug!("discarding stale tutor response");
            return;
        }
        inner.view.tutor_feedback = Some(match outcome {
            Ok(feedback) => feedback,
            Err(err) => {
                warn!(error = %err, "tutor request failed");
                tutor_surface_error(&err).message
            }
        });
    }

    /// Runs the editor buffer in the sandbox. Same gating rules as
    /// [`Self::ask_tutor`].
    pub async fn run_code(&self, stdin: &str) {
        let (generation, code, language) = {
            let mut inner = self.inner.lock().await;
            if !self.connectivity.is_online() {
                inner.view.execution_output = Some(OFFLINE_EXECUTION_MESSAGE.to_string());
                return;
            }
            if inner.execution_busy {
                return;
            }
            let Some((code, language)) = execution_inputs(&inner.view, &self.catalog) else {
                return;
            };
            inner.execution_busy = true;
            inner.view.execution_output = None;
            (inner.generation, code, language)
        };

        let outcome = self.sandbox.execute(&code, language.wire_tag(), stdin).await;

        let mut inner = self.inner.lock().await;
        inner.execution_busy = false;
        if inner.generation != generation {
            debug!("discarding stale execution response");
            return;
        }
        inner.view.execution_output = Some(match outcome {
            Ok(output) => output,
            Err(err) => {
                warn!(error = %err, "sandbox request failed");
                sandbox_surface_error(&err).message
            }
        });
    }

    async fn apply(&self, action: Action) -> Result<()> {
        let mut inner = self.inner.lock().await;
        self.apply_locked(&mut inner, action).await
    }

    async fn apply_locked(&self, inner: &mut ControllerState, action: Action) -> Result<()> {
        let transition = reduce(&inner.view, &self.catalog, &inner.progress, action);

        // Side effects run after the pure transition is computed, before the
        // new view becomes visible.
        for effect in &transition.effects {
            match effect {
                Effect::RecordLessonCompletion(lesson_id) => {
                    self.storage
                        .record_lesson_completion(&mut inner.progress, lesson_id)
                        .await?;
                }
                Effect::RecordProjectCompletion(project_id) => {
                    self.storage
                        .record_project_completion(&mut inner.progress, project_id)
                        .await?;
                }
                Effect::ClearDraft(project_id) => {
                    self.storage.clear_draft(project_id).await?;
                }
            }
        }

        if transition.view.state != inner.view.state {
            inner.generation = inner.generation.wrapping_add(1);
        }
        inner.view = transition.view;
        Ok(())
    }
}

fn tutor_inputs(view: &SessionView, catalog: &Catalog) -> Option<(String, String, Language)> {
    match &view.state {
        ViewState::Course {
            course_id,
            lesson_index,
        } => {
            let lesson = catalog.course(course_id)?.lessons.get(*lesson_index)?;
            Some((view.editor.clone(), lesson.content.clone(), lesson.language))
        }
        ViewState::ProjectDetail { project_id } => {
            let project = catalog.project(project_id)?;
            Some((
                view.editor.clone(),
                project.description.clone(),
                project.language,
            ))
        }
        _ => None,
    }
}

fn execution_inputs(view: &SessionView, catalog: &Catalog) -> Option<(String, Language)> {
    match &view.state {
        ViewState::Course {
            course_id,
            lesson_index,
        } => {
            let lesson = catalog.course(course_id)?.lessons.get(*lesson_index)?;
            Some((view.editor.clone(), lesson.language))
        }
        ViewState::ProjectDetail { project_id } => {
            Some((view.editor.clone(), catalog.project(project_id)?.language))
        }
        _ => None,
    }
}

fn tutor_surface_error(err: &TutorError) -> SurfaceError {
    match err {
        TutorError::CredentialMissing => {
            SurfaceError::new(FailureKind::CredentialMissing, CREDENTIAL_MISSING_MESSAGE)
        }
        TutorError::ServiceUnavailable(_) => {
            SurfaceError::new(FailureKind::ServiceUnavailable, TUTOR_UNAVAILABLE_MESSAGE)
        }
    }
}

fn sandbox_surface_error(err: &SandboxError) -> SurfaceError {
    match err {
        SandboxError::UnsupportedLanguage(_) => {
            SurfaceError::new(FailureKind::UnsupportedLanguage, err.to_string())
        }
        SandboxError::Unreachable(_) | SandboxError::MalformedResponse(_) => {
            SurfaceError::new(FailureKind::ServiceUnavailable, SANDBOX_UNREACHABLE_MESSAGE)
        }
    }
}

#[cfg(test)]
#[path = "tests/controller_tests.rs"]
mod tests;
