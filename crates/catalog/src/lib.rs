//! Static, read-only registry of courses and practice projects.

use shared::domain::{Course, CourseId, Difficulty, Language, Project, ProjectId, UserProgress};

mod content;

#[derive(Debug, Clone)]
pub struct Catalog {
    courses: Vec<Course>,
    projects: Vec<Project>,
}

impl Catalog {
    /// The built-in curriculum shipped with the application.
    pub fn builtin() -> Self {
        Self {
            courses: content::builtin_courses(),
            projects: content::builtin_projects(),
        }
    }

    /// A catalog from arbitrary parts. Primarily for tests that want a small
    /// fixture instead of the full built-in content.
    pub fn from_parts(courses: Vec<Course>, projects: Vec<Project>) -> Self {
        Self { courses, projects }
    }

    pub fn courses(&self) -> &[Course] {
        &self.courses
    }

    pub fn projects(&self) -> &[Project] {
        &self.projects
    }

    pub fn course(&self, id: &CourseId) -> Option<&Course> {
        self.courses.iter().find(|course| &course.id == id)
    }

    pub fn project(&self, id: &ProjectId) -> Option<&Project> {
        self.projects.iter().find(|project| &project.id == id)
    }

    /// Projects matching the practice-lab filters. `None` means "All".
    /// Re-evaluated against the full catalog on every call; the catalog is
    /// small and static, so there is nothing worth caching.
    pub fn filter_projects(
        &self,
        language: Option<Language>,
        difficulty: Option<Difficulty>,
    ) -> Vec<&Project> {
        self.projects
            .iter()
            .filter(|project| language.map_or(true, |lang| project.language == lang))
            .filter(|project| difficulty.map_or(true, |diff| project.difficulty == diff))
            .collect()
    }
}

/// Index of the first lesson in `course` the learner has not completed yet,
/// defaulting to 0 when the course is unstarted or fully complete.
pub fn resume_lesson_index(course: &Course, progress: &UserProgress) -> usize {
    course
        .lessons
        .iter()
        .position(|lesson| !progress.is_lesson_completed(&lesson.id))
        .unwrap_or(0)
}

/// How many of the course's lessons the learner has completed. Dangling ids
/// in the progress record never count because membership is checked against
/// the course's own lessons.
pub fn completed_lesson_count(course: &Course, progress: &UserProgress) -> usize {
    course
        .lessons
        .iter()
        .filter(|lesson| progress.is_lesson_completed(&lesson.id))
        .count()
}

/// Whole-percentage course progress for the dashboard cards.
pub fn course_progress_percent(course: &Course, progress: &UserProgress) -> u8 {
    if course.lessons.is_empty() {
        return 0;
    }
    let completed = completed_lesson_count(course, progress);
    ((completed * 100) / course.lessons.len()) as u8
}
