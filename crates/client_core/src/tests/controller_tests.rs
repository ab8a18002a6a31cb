use super::*;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use shared::domain::{Course, Lesson, LessonId};

use crate::view::ProjectFilters;

struct ScriptedTutor {
    reply: Option<String>,
    calls: Arc<AtomicUsize>,
    delay: Duration,
}

impl ScriptedTutor {
    fn replying(reply: &str) -> Self {
        Self {
            reply: Some(reply.to_string()),
            calls: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
        }
    }

    fn without_credential() -> Self {
        Self {
            reply: None,
            calls: Arc::new(AtomicUsize::new(0)),
            delay: Duration::ZERO,
        }
    }

    fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }
}

#[async_trait]
impl TutorApi for ScriptedTutor {
    async fn ask(
        &self,
        _code: &str,
        _context: &str,
        _language: Language,
    ) -> Result<String, TutorError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }
        match &self.reply {
            Some(reply) => Ok(reply.clone()),
            None => Err(TutorError::CredentialMissing),
        }
    }
}

struct ScriptedSandbox {
    output: String,
    calls: Arc<AtomicUsize>,
    last_language_tag: Arc<Mutex<Option<String>>>,
}

impl ScriptedSandbox {
    fn printing(output: &str) -> Self {
        Self {
            output: output.to_string(),
            calls: Arc::new(AtomicUsize::new(0)),
            last_language_tag: Arc::new(Mutex::new(None)),
        }
    }
}

#[async_trait]
impl SandboxApi for ScriptedSandbox {
    async fn execute(
        &self,
        _code: &str,
        language_tag: &str,
        _stdin: &str,
    ) -> Result<String, SandboxError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        *self.last_language_tag.lock().await = Some(language_tag.to_string());
        Ok(self.output.clone())
    }
}

async fn controller_with(
    catalog: Catalog,
    tutor: Arc<dyn TutorApi>,
    sandbox: Arc<dyn SandboxApi>,
    online: bool,
) -> SessionController {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    SessionController::with_dependencies(
        Arc::new(catalog),
        storage,
        tutor,
        sandbox,
        ConnectivityMonitor::new(online),
    )
    .await
}

fn two_lesson_catalog() -> Catalog {
    let lessons = vec![
        Lesson {
            id: LessonId::new("short_1"),
            title: "First".to_string(),
            content: "<p>First lesson</p>".to_string(),
            initial_code: "# lesson one\n".to_string(),
            solution_code: "print(1)\n".to_string(),
            language: Language::Python,
        },
        Lesson {
            id: LessonId::new("short_2"),
            title: "Second".to_string(),
            content: "<p>Second lesson</p>".to_string(),
            initial_code: "# lesson two\n".to_string(),
            solution_code: "print(2)\n".to_string(),
            language: Language::Python,
        },
    ];
    let course = Course {
        id: CourseId::new("course_short"),
        language: Language::Python,
        title: "Short Course".to_string(),
        level: "Beginner Level".to_string(),
        description: "Two lessons only.".to_string(),
        icon: "🐍".to_string(),
        lessons,
    };
    Catalog::from_parts(vec![course], Catalog::builtin().projects().to_vec())
}

#[tokio::test]
async fn completing_a_two_lesson_course_sequentially() {
    let tutor = Arc::new(ScriptedTutor::replying("well done"));
    let sandbox = Arc::new(ScriptedSandbox::printing("ok\n"));
    let controller = controller_with(two_lesson_catalog(), tutor, sandbox, true).await;

    let course_id = CourseId::new("course_short");
    controller.open_course(&course_id).await.expect("open");
    assert_eq!(controller.view().await.editor, "# lesson one\n");

    controller.complete_lesson().await.expect("complete");
    let view = controller.view().await;
    assert_eq!(
        view.state,
        ViewState::Course {
            course_id: course_id.clone(),
            lesson_index: 1,
        }
    );
    assert_eq!(view.editor, "# lesson two\n");

    controller.complete_lesson().await.expect("complete");
    assert_eq!(controller.view().await.state, ViewState::Dashboard);

    let progress = controller.progress().await;
    assert_eq!(progress.completed_lesson_ids.len(), 2);
    assert_eq!(progress.hours_learned, 1.0);
}

#[tokio::test]
async fn progress_is_persisted_after_each_completion() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let controller = SessionController::with_dependencies(
        Arc::new(two_lesson_catalog()),
        storage.clone(),
        Arc::new(ScriptedTutor::replying("unused")),
        Arc::new(ScriptedSandbox::printing("unused")),
        ConnectivityMonitor::new(true),
    )
    .await;

    controller
        .open_course(&CourseId::new("course_short"))
        .await
        .expect("open");
    controller.complete_lesson().await.expect("complete");

    let persisted = storage.load_progress().await;
    assert!(persisted.is_lesson_completed(&LessonId::new("short_1")));
    assert_eq!(persisted.hours_learned, 0.5);
}

#[tokio::test]
async fn repeating_a_lesson_does_not_double_count() {
    let controller = controller_with(
        two_lesson_catalog(),
        Arc::new(ScriptedTutor::replying("unused")),
        Arc::new(ScriptedSandbox::printing("unused")),
        true,
    )
    .await;
    let course_id = CourseId::new("course_short");

    controller.open_course(&course_id).await.expect("open");
    controller.complete_lesson().await.expect("complete");

    // Revisit the course and complete the same first lesson again.
    controller.open_course(&course_id).await.expect("open");
    let view = controller.view().await;
    assert_eq!(
        view.state,
        ViewState::Course {
            course_id: course_id.clone(),
            lesson_index: 1,
        }
    );
    controller.go_to_dashboard().await.expect("back");
    controller.open_course(&course_id).await.expect("open");
    controller.complete_lesson().await.expect("complete");

    let progress = controller.progress().await;
    assert_eq!(progress.completed_lesson_ids.len(), 2);
    assert_eq!(progress.hours_learned, 1.0);
}

#[tokio::test]
async fn offline_gating_refuses_both_clients_locally() {
    let tutor = Arc::new(ScriptedTutor::replying("never sent"));
    let tutor_calls = Arc::clone(&tutor.calls);
    let sandbox = Arc::new(ScriptedSandbox::printing("never run"));
    let sandbox_calls = Arc::clone(&sandbox.calls);

    let controller = controller_with(Catalog::builtin(), tutor, sandbox, false).await;
    controller
        .open_course(&CourseId::new("course_python"))
        .await
        .expect("open");

    controller.ask_tutor().await;
    controller.run_code("").await;

    let view = controller.view().await;
    assert_eq!(
        view.tutor_feedback.as_deref(),
        Some(OFFLINE_TUTOR_MESSAGE)
    );
    assert_eq!(
        view.execution_output.as_deref(),
        Some(OFFLINE_EXECUTION_MESSAGE)
    );
    assert_eq!(tutor_calls.load(Ordering::SeqCst), 0);
    assert_eq!(sandbox_calls.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn tutor_feedback_lands_in_the_panel() {
    let controller = controller_with(
        Catalog::builtin(),
        Arc::new(ScriptedTutor::replying("Use a `for` loop here.")),
        Arc::new(ScriptedSandbox::printing("unused")),
        true,
    )
    .await;
    controller
        .open_course(&CourseId::new("course_python"))
        .await
        .expect("open");

    controller.ask_tutor().await;
    assert_eq!(
        controller.view().await.tutor_feedback.as_deref(),
        Some("Use a `for` loop here.")
    );
}

#[tokio::test]
async fn missing_credential_surfaces_the_fixed_advisory() {
    let controller = controller_with(
        Catalog::builtin(),
        Arc::new(ScriptedTutor::without_credential()),
        Arc::new(ScriptedSandbox::printing("unused")),
        true,
    )
    .await;
    controller
        .open_course(&CourseId::new("course_python"))
        .await
        .expect("open");

    controller.ask_tutor().await;
    assert_eq!(
        controller.view().await.tutor_feedback.as_deref(),
        Some(CREDENTIAL_MISSING_MESSAGE)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn in_flight_tutor_request_blocks_reentry() {
    let tutor = Arc::new(
        ScriptedTutor::replying("slow answer").with_delay(Duration::from_millis(100)),
    );
    let calls = Arc::clone(&tutor.calls);
    let controller = Arc::new(
        controller_with(
            Catalog::builtin(),
            tutor,
            Arc::new(ScriptedSandbox::printing("unused")),
            true,
        )
        .await,
    );
    controller
        .open_course(&CourseId::new("course_python"))
        .await
        .expect("open");

    let background = Arc::clone(&controller);
    let first = tokio::spawn(async move { background.ask_tutor().await });
    sleep(Duration::from_millis(20)).await;

    // The triggering control is disabled while a call is in flight; a second
    // invocation must be a no-op.
    controller.ask_tutor().await;
    first.await.expect("join");

    assert_eq!(calls.load(Ordering::SeqCst), 1);
    assert_eq!(
        controller.view().await.tutor_feedback.as_deref(),
        Some("slow answer")
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn stale_tutor_response_is_discarded_after_navigation() {
    let tutor = Arc::new(
        ScriptedTutor::replying("too late").with_delay(Duration::from_millis(100)),
    );
    let controller = Arc::new(
        controller_with(
            Catalog::builtin(),
            tutor,
            Arc::new(ScriptedSandbox::printing("unused")),
            true,
        )
        .await,
    );
    controller
        .open_course(&CourseId::new("course_python"))
        .await
        .expect("open");

    let background = Arc::clone(&controller);
    let request = tokio::spawn(async move { background.ask_tutor().await });
    sleep(Duration::from_millis(20)).await;

    controller.go_to_dashboard().await.expect("navigate");
    request.await.expect("join");

    // The response outlived its originating view and must not surface.
    assert_eq!(controller.view().await.tutor_feedback, None);
}

#[tokio::test]
async fn run_code_surfaces_the_sandbox_output() {
    let sandbox = Arc::new(ScriptedSandbox::printing("hello softvibe\n"));
    let language_tag = Arc::clone(&sandbox.last_language_tag);
    let controller = controller_with(
        Catalog::builtin(),
        Arc::new(ScriptedTutor::replying("unused")),
        sandbox,
        true,
    )
    .await;
    controller
        .open_project(&ProjectId::new("proj_c_1"))
        .await
        .expect("open");

    controller.run_code("").await;

    assert_eq!(
        controller.view().await.execution_output.as_deref(),
        Some("hello softvibe\n")
    );
    assert_eq!(language_tag.lock().await.as_deref(), Some("c"));
}

#[tokio::test]
async fn draft_round_trip_and_clear_on_submission() {
    let storage = Storage::new("sqlite::memory:").await.expect("db");
    let controller = SessionController::with_dependencies(
        Arc::new(Catalog::builtin()),
        storage.clone(),
        Arc::new(ScriptedTutor::replying("unused")),
        Arc::new(ScriptedSandbox::printing("unused")),
        ConnectivityMonitor::new(true),
    )
    .await;
    let project_id = ProjectId::new("proj_py_1");

    controller.open_practice_lab().await.expect("lab");
    controller.open_project(&project_id).await.expect("open");
    controller
        .edit_code("import csv\n# my attempt\n")
        .await
        .expect("edit");
    controller.save_draft().await.expect("save");

    // Re-entering the project restores the draft instead of starter code.
    controller.back_to_project_list().await.expect("back");
    controller.open_project(&project_id).await.expect("reopen");
    assert_eq!(controller.view().await.editor, "import csv\n# my attempt\n");

    controller.submit_project().await.expect("submit");

    assert!(matches!(
        controller.view().await.state,
        ViewState::ProjectList { .. }
    ));
    assert_eq!(storage.load_draft(&project_id).await.expect("load"), None);
    let progress = controller.progress().await;
    assert!(progress.is_project_completed(&project_id));
    assert_eq!(progress.hours_learned, 2.0);
}

#[tokio::test]
async fn resubmitting_a_project_changes_nothing() {
    let controller = controller_with(
        Catalog::builtin(),
        Arc::new(ScriptedTutor::replying("unused")),
        Arc::new(ScriptedSandbox::printing("unused")),
        true,
    )
    .await;
    let project_id = ProjectId::new("proj_java_1");

    for _ in 0..2 {
        controller.open_project(&project_id).await.expect("open");
        controller.submit_project().await.expect("submit");
    }

    let progress = controller.progress().await;
    assert_eq!(progress.completed_project_ids.len(), 1);
    assert_eq!(progress.hours_learned, 2.0);
}

#[tokio::test(flavor = "multi_thread")]
async fn navigation_during_the_submission_pause_wins() {
    let controller = Arc::new(
        controller_with(
            Catalog::builtin(),
            Arc::new(ScriptedTutor::replying("unused")),
            Arc::new(ScriptedSandbox::printing("unused")),
            true,
        )
        .await,
    );
    controller
        .open_project(&ProjectId::new("proj_c_1"))
        .await
        .expect("open");

    let background = Arc::clone(&controller);
    let submission = tokio::spawn(async move { background.submit_project().await });
    sleep(Duration::from_millis(100)).await;

    controller.go_to_dashboard().await.expect("navigate");
    submission.await.expect("join").expect("submit");

    // The deferred return to the project list was dropped.
    assert_eq!(controller.view().await.state, ViewState::Dashboard);
    assert!(controller
        .progress()
        .await
        .is_project_completed(&ProjectId::new("proj_c_1")));
}

#[tokio::test]
async fn filters_narrow_the_visible_projects() {
    let controller = controller_with(
        Catalog::builtin(),
        Arc::new(ScriptedTutor::replying("unused")),
        Arc::new(ScriptedSandbox::printing("unused")),
        true,
    )
    .await;

    controller.open_practice_lab().await.expect("lab");
    controller
        .set_language_filter(Some(Language::Python))
        .await
        .expect("filter");

    let view = controller.view().await;
    let ViewState::ProjectList { filters } = view.state else {
        panic!("expected project list, got {:?}", view.state);
    };
    assert_eq!(
        filters,
        ProjectFilters {
            language: Some(Language::Python),
            difficulty: None,
        }
    );

    let visible = controller
        .catalog()
        .filter_projects(filters.language, filters.difficulty);
    assert!(!visible.is_empty());
    assert!(visible
        .iter()
        .all(|project| project.language == Language::Python));
}

#[tokio::test]
async fn theme_preference_round_trips_through_the_controller() {
    let controller = controller_with(
        Catalog::builtin(),
        Arc::new(ScriptedTutor::replying("unused")),
        Arc::new(ScriptedSandbox::printing("unused")),
        true,
    )
    .await;

    assert_eq!(controller.theme().await, Theme::Dark);
    controller.set_theme(Theme::Light).await.expect("set");
    assert_eq!(controller.theme().await, Theme::Light);
}
