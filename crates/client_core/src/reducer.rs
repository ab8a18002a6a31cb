//! Pure view-state transitions. `reduce` never touches storage or the
//! network; persisted side effects come back as [`Effect`]s for the session
//! controller to apply after the transition.

use catalog::{resume_lesson_index, Catalog};
use shared::domain::{CourseId, Difficulty, Language, LessonId, ProjectId, UserProgress};
use tracing::warn;

use crate::view::{ProjectFilters, ViewState};

/// Everything the rendering layer needs to draw the current screen.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct SessionView {
    pub state: ViewState,
    /// The code editor buffer.
    pub editor: String,
    /// Inline tutor feedback panel, including inline error text.
    pub tutor_feedback: Option<String>,
    /// Output terminal content, including inline error text.
    pub execution_output: Option<String>,
    /// Filters last used on the project list, restored when navigating back
    /// from a project detail screen.
    pub last_project_filters: ProjectFilters,
}

#[derive(Debug, Clone)]
pub enum Action {
    OpenCourse {
        course_id: CourseId,
    },
    CompleteLesson,
    OpenPracticeLab,
    /// The caller pre-loads any saved draft so the transition stays pure.
    OpenProject {
        project_id: ProjectId,
        draft: Option<String>,
    },
    SetLanguageFilter(Option<Language>),
    SetDifficultyFilter(Option<Difficulty>),
    SubmitProject,
    /// Applied after the brief post-submission feedback delay.
    SubmissionSettled,
    GoToDashboard,
    BackToProjectList,
    RevealSolution,
    EditCode(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    RecordLessonCompletion(LessonId),
    RecordProjectCompletion(ProjectId),
    ClearDraft(ProjectId),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Transition {
    pub view: SessionView,
    pub effects: Vec<Effect>,
}

impl Transition {
    fn pure(view: SessionView) -> Self {
        Self {
            view,
            effects: Vec::new(),
        }
    }

    fn unchanged(view: SessionView) -> Self {
        Self::pure(view)
    }
}

pub fn reduce(
    current: &SessionView,
    catalog: &Catalog,
    progress: &UserProgress,
    action: Action,
) -> Transition {
    match action {
        Action::OpenCourse { course_id } => {
            let Some(course) = catalog.course(&course_id) else {
                warn!(course_id = %course_id, "ignoring selection of unknown course");
                return Transition::unchanged(current.clone());
            };
            let lesson_index = resume_lesson_index(course, progress);
            let Some(lesson) = course.lessons.get(lesson_index) else {
                warn!(course_id = %course_id, "ignoring course without lessons");
                return Transition::unchanged(current.clone());
            };
            Transition::pure(SessionView {
                state: ViewState::Course {
                    course_id,
                    lesson_index,
                },
                editor: lesson.initial_code.clone(),
                tutor_feedback: None,
                execution_output: None,
                last_project_filters: current.last_project_filters,
            })
        }

        Action::CompleteLesson => {
            let ViewState::Course {
                course_id,
                lesson_index,
            } = &current.state
            else {
                return Transition::unchanged(current.clone());
            };
            let Some(course) = catalog.course(course_id) else {
                return Transition::unchanged(current.clone());
            };
            let Some(lesson) = course.lessons.get(*lesson_index) else {
                return Transition::unchanged(current.clone());
            };

            let effects = vec![Effect::RecordLessonCompletion(lesson.id.clone())];
            let next_index = lesson_index + 1;

            let view = if let Some(next_lesson) = course.lessons.get(next_index) {
                SessionView {
                    state: ViewState::Course {
                        course_id: course_id.clone(),
                        lesson_index: next_index,
                    },
                    editor: next_lesson.initial_code.clone(),
                    tutor_feedback: None,
                    execution_output: None,
                    last_project_filters: current.last_project_filters,
                }
            } else {
                SessionView {
                    state: ViewState::Dashboard,
                    editor: String::new(),
                    tutor_feedback: None,
                    execution_output: None,
                    last_project_filters: current.last_project_filters,
                }
            };
            Transition { view, effects }
        }

        Action::OpenPracticeLab => {
            let filters = ProjectFilters::default();
            Transition::pure(SessionView {
                state: ViewState::ProjectList { filters },
                last_project_filters: filters,
                ..current.clone()
            })
        }

        Action::OpenProject { project_id, draft } => {
            let Some(project) = catalog.project(&project_id) else {
                warn!(project_id = %project_id, "ignoring selection of unknown project");
                return Transition::unchanged(current.clone());
            };
            Transition::pure(SessionView {
                state: ViewState::ProjectDetail { project_id },
                editor: draft.unwrap_or_else(|| project.starter_code.clone()),
                tutor_feedback: None,
                execution_output: None,
                last_project_filters: current.last_project_filters,
            })
        }

        Action::SetLanguageFilter(language) => {
            let ViewState::ProjectList { filters } = &current.state else {
                return Transition::unchanged(current.clone());
            };
            let filters = ProjectFilters {
                language,
                ..*filters
            };
            Transition::pure(SessionView {
                state: ViewState::ProjectList { filters },
                last_project_filters: filters,
                ..current.clone()
            })
        }

        Action::SetDifficultyFilter(difficulty) => {
            let ViewState::ProjectList { filters } = &current.state else {
                return Transition::unchanged(current.clone());
            };
            let filters = ProjectFilters {
                difficulty,
                ..*filters
            };
            Transition::pure(SessionView {
                state: ViewState::ProjectList { filters },
                last_project_filters: filters,
                ..current.clone()
            })
        }

        Action::SubmitProject => {
            let ViewState::ProjectDetail { project_id } = &current.state else {
                return Transition::unchanged(current.clone());
            };
            // The view change follows separately via SubmissionSettled, so
            // the completed state stays briefly visible.
            Transition {
                view: current.clone(),
                effects: vec![
                    Effect::RecordProjectCompletion(project_id.clone()),
                    Effect::ClearDraft(project_id.clone()),
                ],
            }
        }

        Action::SubmissionSettled | Action::BackToProjectList => {
            let ViewState::ProjectDetail { .. } = &current.state else {
                return Transition::unchanged(current.clone());
            };
            Transition::pure(SessionView {
                state: ViewState::ProjectList {
                    filters: current.last_project_filters,
                },
                ..current.clone()
            })
        }

        Action::GoToDashboard => Transition::pure(SessionView {
            state: ViewState::Dashboard,
            ..current.clone()
        }),

        Action::RevealSolution => {
            let ViewState::Course {
                course_id,
                lesson_index,
            } = &current.state
            else {
                return Transition::unchanged(current.clone());
            };
            let Some(solution) = catalog
                .course(course_id)
                .and_then(|course| course.lessons.get(*lesson_index))
                .map(|lesson| lesson.solution_code.clone())
            else {
                return Transition::unchanged(current.clone());
            };
            Transition::pure(SessionView {
                editor: solution,
                ..current.clone()
            })
        }

        Action::EditCode(text) => Transition::pure(SessionView {
            editor: text,
            ..current.clone()
        }),
    }
}
