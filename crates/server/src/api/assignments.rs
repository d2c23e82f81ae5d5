use dioxus::prelude::*;
use shared_types::{Assignment, AssignmentProgress, CreateAssignmentRequest, Submission};

#[cfg(feature = "server")]
use crate::db::{get_db, get_store};

#[cfg(feature = "server")]
use crate::error_convert::AppErrorExt;

#[cfg(feature = "server")]
use super::auth::*;

#[server]
pub async fn list_course_assignments(course_id: i64) -> Result<Vec<Assignment>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::assignments::list_for_course(db, &claims, course_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// The signed-in student's assignments with their submission state.
#[server]
pub async fn my_assignments() -> Result<Vec<AssignmentProgress>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::assignments::mine(db, &claims)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[cfg_attr(feature = "server", tracing::instrument(skip(body)))]
#[server]
pub async fn create_assignment(body: CreateAssignmentRequest) -> Result<Assignment, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::assignments::create(db, &claims, &body)
        .await
        .map_err(|e| e.into_server_fn_error())
}

/// Turn in an assignment. The file travels base64-encoded.
#[cfg_attr(feature = "server", tracing::instrument(skip(file_data, comments)))]
#[server]
pub async fn submit_assignment(
    assignment_id: i64,
    comments: Option<String>,
    file_name: String,
    content_type: String,
    file_data: String,
) -> Result<Submission, ServerFnError> {
    use crate::service::assignments::SubmissionUpload;
    use shared_types::AppError;

    let claims = require_auth()?;

    let bytes = base64::Engine::decode(&base64::engine::general_purpose::STANDARD, &file_data)
        .map_err(|e| AppError::field("file", format!("Invalid file data: {e}")).into_server_fn_error())?;

    let upload = SubmissionUpload {
        assignment_id,
        comments: comments.filter(|c| !c.trim().is_empty()),
        file_name,
        content_type,
        bytes,
    };

    let db = get_db().await;
    let store = get_store();
    crate::service::assignments::submit(db, &store, &claims, upload)
        .await
        .map_err(|e| e.into_server_fn_error())
}

#[server]
pub async fn list_submissions(assignment_id: i64) -> Result<Vec<Submission>, ServerFnError> {
    let claims = require_auth()?;
    let db = get_db().await;
    crate::service::assignments::submissions(db, &claims, assignment_id)
        .await
        .map_err(|e| e.into_server_fn_error())
}
