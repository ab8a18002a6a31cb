use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Hours credited to the learner the first time a lesson is completed.
pub const LESSON_HOURS_CREDIT: f64 = 0.5;
/// Hours credited to the learner the first time a project is completed.
pub const PROJECT_HOURS_CREDIT: f64 = 2.0;

macro_rules! id_newtype {
    ($name:ident) => {
        #[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub String);

        impl $name {
            pub fn new(id: impl Into<String>) -> Self {
                Self(id.into())
            }

            pub fn as_str(&self) -> &str {
                &self.0
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(&self.0)
            }
        }
    };
}

id_newtype!(CourseId);
id_newtype!(LessonId);
id_newtype!(ProjectId);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Language {
    Python,
    Java,
    C,
}

impl Language {
    /// Lowercase tag used on the wire towards the sandbox and tutor services.
    pub fn wire_tag(&self) -> &'static str {
        match self {
            Self::Python => "python",
            Self::Java => "java",
            Self::C => "c",
        }
    }

    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Python => "Python",
            Self::Java => "Java",
            Self::C => "C",
        }
    }

    pub fn parse_tag(tag: &str) -> Option<Self> {
        match tag.to_ascii_lowercase().as_str() {
            "python" => Some(Self::Python),
            "java" => Some(Self::Java),
            "c" => Some(Self::C),
            _ => None,
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.display_name())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Beginner => "Beginner",
            Self::Intermediate => "Intermediate",
            Self::Advanced => "Advanced",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Theme {
    #[default]
    Dark,
    Light,
}

impl Theme {
    /// The literal value persisted under the theme storage key.
    pub fn storage_value(&self) -> &'static str {
        match self {
            Self::Dark => "dark",
            Self::Light => "light",
        }
    }

    pub fn from_storage_value(value: &str) -> Option<Self> {
        match value {
            "dark" => Some(Self::Dark),
            "light" => Some(Self::Light),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: LessonId,
    pub title: String,
    /// Instructional rich text (HTML). Stripped to plain text before it is
    /// embedded in tutor prompts.
    pub content: String,
    pub initial_code: String,
    pub solution_code: String,
    pub language: Language,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Project {
    pub id: ProjectId,
    pub title: String,
    pub difficulty: Difficulty,
    pub description: String,
    pub language: Language,
    pub starter_code: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
    pub id: CourseId,
    pub language: Language,
    pub title: String,
    pub level: String,
    pub description: String,
    pub icon: String,
    /// Order is significant: it defines curriculum progression.
    pub lessons: Vec<Lesson>,
}

/// Per-learner progress record, persisted as JSON across sessions.
///
/// Field names serialize in camelCase to stay compatible with the
/// historically persisted payload shape.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserProgress {
    pub completed_lesson_ids: HashSet<LessonId>,
    pub completed_project_ids: HashSet<ProjectId>,
    pub hours_learned: f64,
    pub streak_days: u32,
    pub last_login_date: DateTime<Utc>,
}

impl Default for UserProgress {
    fn default() -> Self {
        Self {
            completed_lesson_ids: HashSet::new(),
            completed_project_ids: HashSet::new(),
            hours_learned: 0.0,
            streak_days: 0,
            last_login_date: Utc::now(),
        }
    }
}

impl UserProgress {
    /// Marks a lesson completed. Idempotent: the hours credit is applied only
    /// on the first call for a given id. Returns whether anything changed.
    pub fn record_lesson(&mut self, lesson_id: &LessonId) -> bool {
        if !self.completed_lesson_ids.insert(lesson_id.clone()) {
            return false;
        }
        self.hours_learned += LESSON_HOURS_CREDIT;
        true
    }

    /// Idempotent analogue of [`Self::record_lesson`] for projects.
    pub fn record_project(&mut self, project_id: &ProjectId) -> bool {
        if !self.completed_project_ids.insert(project_id.clone()) {
            return false;
        }
        self.hours_learned += PROJECT_HOURS_CREDIT;
        true
    }

    pub fn is_lesson_completed(&self, lesson_id: &LessonId) -> bool {
        self.completed_lesson_ids.contains(lesson_id)
    }

    pub fn is_project_completed(&self, project_id: &ProjectId) -> bool {
        self.completed_project_ids.contains(project_id)
    }
}
