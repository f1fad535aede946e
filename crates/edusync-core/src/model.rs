//! Core data model types for edusync.
//!
//! These mirror the records exchanged with the LMS REST API (camelCase on the
//! wire, PascalCase accepted as an alias) plus the locally persisted history
//! entry.

use std::collections::BTreeMap;
use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A named, scored quiz associated with a course.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Assessment {
    /// Server-assigned identifier.
    #[serde(alias = "AssessmentId")]
    pub assessment_id: String,
    /// Human-readable title.
    #[serde(alias = "Title", default)]
    pub title: String,
    /// Score awarded for a fully correct attempt.
    #[serde(alias = "MaxScore", default)]
    pub max_score: u32,
    /// Serialized questions: a JSON array or the delimited text format.
    #[serde(rename = "question", alias = "Question", default)]
    pub question_payload: Option<String>,
    /// Owning course, if any.
    #[serde(alias = "CourseId", default)]
    pub course_id: Option<String>,
}

impl Assessment {
    /// The raw question payload, empty when the server sent none.
    pub fn payload(&self) -> &str {
        self.question_payload.as_deref().unwrap_or("")
    }
}

/// A single multiple-choice question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    /// The prompt shown to the user.
    pub question_text: String,
    /// Choices in display order.
    pub options: Vec<String>,
    /// The correct choice; should equal one of `options`.
    pub correct_answer: String,
}

/// The options a user picked, keyed by question index.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnswerSet(BTreeMap<usize, String>);

impl AnswerSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record `option` for `index`, replacing any earlier answer.
    pub fn record(&mut self, index: usize, option: impl Into<String>) {
        self.0.insert(index, option.into());
    }

    pub fn get(&self, index: usize) -> Option<&str> {
        self.0.get(&index).map(String::as_str)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (usize, &str)> {
        self.0.iter().map(|(i, a)| (*i, a.as_str()))
    }
}

/// A course as returned by `GET /Course`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    #[serde(alias = "CourseId")]
    pub course_id: String,
    #[serde(alias = "Title", default)]
    pub title: String,
    #[serde(alias = "Description", default)]
    pub description: Option<String>,
    #[serde(alias = "InstructorId", default)]
    pub instructor_id: Option<String>,
}

/// Account role.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Role {
    Student,
    Instructor,
    #[serde(other)]
    Unknown,
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Student => write!(f, "Student"),
            Role::Instructor => write!(f, "Instructor"),
            Role::Unknown => write!(f, "Unknown"),
        }
    }
}

/// The logged-in user.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    pub user_id: String,
    #[serde(default)]
    pub name: String,
    #[serde(default)]
    pub email: String,
    #[serde(default = "default_role")]
    pub role: Role,
}

fn default_role() -> Role {
    Role::Unknown
}

/// Body of `POST /Auth/login`.
#[derive(Clone, Serialize)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("email", &self.email)
            .field("password", &"***")
            .finish()
    }
}

/// Response of `POST /Auth/login`.
#[derive(Debug, Clone, Deserialize)]
pub struct LoginResponse {
    pub token: String,
    pub user: UserProfile,
}

/// Body of `POST /Results`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResultSubmission {
    pub assessment_id: String,
    pub user_id: Option<String>,
    pub score: u32,
    pub attempt_date: DateTime<Utc>,
    /// Whole seconds from load to submit.
    pub time_taken: u64,
}

/// A result row from `GET /Results/Assessment/{id}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RemoteResult {
    #[serde(alias = "ResultId", default)]
    pub result_id: Option<String>,
    #[serde(alias = "AssessmentId")]
    pub assessment_id: String,
    #[serde(alias = "UserId", default)]
    pub user_id: Option<String>,
    #[serde(alias = "Score", default)]
    pub score: u32,
    /// Kept verbatim; the server does not always include an offset.
    #[serde(alias = "AttemptDate", default)]
    pub attempt_date: Option<String>,
    #[serde(alias = "TimeTaken", default)]
    pub time_taken: Option<u64>,
}

/// One attempt in the local result history.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    pub id: Uuid,
    pub assessment_id: String,
    pub assessment_title: String,
    #[serde(default)]
    pub user_id: Option<String>,
    pub score: u32,
    pub max_score: u32,
    pub time_taken: u64,
    pub attempt_date: DateTime<Utc>,
    /// Number of questions in the attempt.
    pub questions: usize,
    pub correct_answers: usize,
}
