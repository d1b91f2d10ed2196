//! Common types and transforms shared by the campus admin console crates

pub mod auth;
pub mod enrollment;
pub mod error;
pub mod reconcile;
pub mod rules;

pub use enrollment::{attach_enrollments, Aggregated, EnrollmentIndex};
pub use error::{FormError, ParseRoleError};
pub use rules::{EditorMode, RuleEditor, RuleForm, Submission};

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Role a user holds inside one course
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "UPPERCASE")]
pub enum CourseRole {
    Student,
    Assistant,
}

impl CourseRole {
    pub const ALL: [CourseRole; 2] = [CourseRole::Student, CourseRole::Assistant];

    /// Wire value, as the backend spells it
    pub fn as_str(&self) -> &'static str {
        match self {
            CourseRole::Student => "STUDENT",
            CourseRole::Assistant => "ASSISTANT",
        }
    }

    /// Human label used in tables and menus
    pub fn label(&self) -> &'static str {
        match self {
            CourseRole::Student => "Student",
            CourseRole::Assistant => "Assistant",
        }
    }
}

impl fmt::Display for CourseRole {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for CourseRole {
    type Err = ParseRoleError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "STUDENT" => Ok(CourseRole::Student),
            "ASSISTANT" => Ok(CourseRole::Assistant),
            _ => Err(ParseRoleError(s.to_string())),
        }
    }
}

/// Course reference embedded in enrollment records
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Course {
    pub id: String,
    pub title: String,
}

/// Flat enrollment record as returned by `GET /admins/courses/enrollments`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Enrollment {
    #[serde(rename = "userId", default)]
    pub user_id: Option<String>, // absent on malformed records
    pub role: CourseRole,
    pub course: Course,
}

/// Enrollment as attached to a user, without the owning user id
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserEnrollment {
    pub role: CourseRole,
    pub course: Course,
}

impl From<&Enrollment> for UserEnrollment {
    fn from(e: &Enrollment) -> Self {
        Self {
            role: e.role,
            course: e.course.clone(),
        }
    }
}

/// Platform user account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct User {
    pub uuid: String,
    pub name: String,
    pub created_at: String,
    #[serde(default)]
    pub account_locked_by_admins: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default)]
    pub enrollments: Vec<UserEnrollment>, // filled in by the aggregator
}

/// Administrator account
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Admin {
    pub id: String,
    pub username: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub registration_date: Option<String>,
}

/// Rule record managed through the rules endpoints
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Rule {
    pub id: String,
    pub title: String,
    pub description: String,
    pub effective_date: String,
    #[serde(default)]
    pub applicable_conditions: Vec<String>,
}

impl Rule {
    /// Copy of this rule with the editable fields taken from `payload`
    pub fn merged(&self, payload: &RulePayload) -> Rule {
        Rule {
            id: self.id.clone(),
            title: payload.title.clone(),
            description: payload.description.clone(),
            effective_date: payload.effective_date.clone(),
            applicable_conditions: payload.applicable_conditions.clone(),
        }
    }
}

/// Body of `POST /admins/rules`, also the `update` part of a PATCH
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RulePayload {
    pub title: String,
    pub description: String,
    pub effective_date: String,
    pub applicable_conditions: Vec<String>,
}

/// Body of `PATCH /admins/rules/{id}`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct RuleUpdateRequest {
    pub admin_name: String,
    pub update: RulePayload,
}

/// Body of `PATCH /admins/users/{uuid}/lock-status`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct LockStatusUpdate {
    pub locked: bool,
}

/// Body of `PATCH /admins/courses/{courseId}/enrollments/{uuid}`
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct EnrollmentUpdate {
    pub role: CourseRole,
}
