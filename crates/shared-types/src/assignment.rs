use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::error::AppError;

/// Submission upload limit when `MAX_UPLOAD_BYTES` is not set.
pub const MAX_SUBMISSION_BYTES: u64 = 20 * 1024 * 1024;

// ---------------------------------------------------------------------------
// Domain Structs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Assignment {
    pub id: i64,
    pub course_id: i64,
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    pub total_points: i32,
    pub created_by: i64,
    pub created_at: DateTime<Utc>,
}

/// A student's uploaded work for one assignment.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "server", derive(sqlx::FromRow))]
#[serde(rename_all = "camelCase")]
pub struct Submission {
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub file_name: String,
    pub content_type: String,
    /// Object-store key; never sent to clients.
    #[serde(default, skip_serializing)]
    pub storage_key: String,
    pub file_size: i64,
    #[serde(default)]
    pub comments: Option<String>,
    pub submitted_at: DateTime<Utc>,
}

// ---------------------------------------------------------------------------
// Request DTOs
// ---------------------------------------------------------------------------

/// Body of `POST /api/assignments`.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
#[cfg_attr(feature = "validation", derive(validator::Validate))]
#[serde(rename_all = "camelCase")]
pub struct CreateAssignmentRequest {
    pub course_id: i64,
    #[cfg_attr(
        feature = "validation",
        validate(length(min = 1, max = 200, message = "Title is required"))
    )]
    pub title: String,
    #[serde(default)]
    pub description: Option<String>,
    #[serde(default)]
    pub due_date: Option<NaiveDate>,
    #[cfg_attr(
        feature = "validation",
        validate(range(min = 1, max = 1000, message = "Total points must be between 1 and 1000"))
    )]
    pub total_points: i32,
    pub created_by: i64,
}

/// Metadata of the file picked in the submission form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmissionFile {
    pub name: String,
    pub content_type: String,
    pub size: u64,
}

/// Checks run before a submission is dispatched, and again on the server.
/// `max_bytes` is the server's configured upload limit.
pub fn validate_submission_file(file: Option<&SubmissionFile>, max_bytes: u64) -> Result<(), AppError> {
    let Some(file) = file else {
        return Err(AppError::field("file", "Please attach a file to submit"));
    };
    if file.name.trim().is_empty() {
        return Err(AppError::field("file", "The selected file has no name"));
    }
    if file.size == 0 {
        return Err(AppError::field("file", "The selected file is empty"));
    }
    if file.size > max_bytes {
        return Err(AppError::field(
            "file",
            format!("File must be under {} MB", max_bytes.div_ceil(1024 * 1024)),
        ));
    }
    Ok(())
}
