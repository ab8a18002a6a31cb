//! View-state model for the four client screens.

use shared::domain::{CourseId, Difficulty, Language, ProjectId};

/// Practice-lab filters. `None` means "All".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ProjectFilters {
    pub language: Option<Language>,
    pub difficulty: Option<Difficulty>,
}

/// The active screen. Transient; never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum ViewState {
    #[default]
    Dashboard,
    Course {
        course_id: CourseId,
        /// Always within `[0, lessons.len())` for the active course.
        lesson_index: usize,
    },
    ProjectList {
        filters: ProjectFilters,
    },
    ProjectDetail {
        project_id: ProjectId,
    },
}
