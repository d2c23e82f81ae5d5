use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::{header, HeaderMap, HeaderValue, StatusCode},
    Json,
};
use sqlx::{Pool, Postgres};

use shared_types::{AppError, Assignment, AssignmentProgress, CreateAssignmentRequest, Submission};

use crate::auth::extractors::{actions, AuthRequired, Permitted};
use crate::service;
use crate::service::assignments::SubmissionUpload;
use crate::storage::SubmissionStore;

// ---------------------------------------------------------------------------
// GET /api/courses/{id}/assignments
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/courses/{id}/assignments",
    params(("id" = i64, Path, description = "Course ID")),
    responses(
        (status = 200, description = "Assignments of the course", body = Vec<Assignment>),
        (status = 403, description = "Course not visible to caller", body = AppError),
        (status = 404, description = "Course not found", body = AppError)
    ),
    tag = "assignments"
)]
pub async fn list_course_assignments(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Assignment>>, AppError> {
    Ok(Json(service::assignments::list_for_course(&pool, &claims, id).await?))
}

// ---------------------------------------------------------------------------
// GET /api/assignments/mine
// ---------------------------------------------------------------------------

/// The calling student's assignments with their submission state.
#[utoipa::path(
    get,
    path = "/api/assignments/mine",
    responses(
        (status = 200, description = "Assignments with submission state", body = Vec<AssignmentProgress>),
        (status = 403, description = "Students only", body = AppError)
    ),
    tag = "assignments"
)]
pub async fn my_assignments(
    State(pool): State<Pool<Postgres>>,
    AuthRequired(claims): AuthRequired,
) -> Result<Json<Vec<AssignmentProgress>>, AppError> {
    Ok(Json(service::assignments::mine(&pool, &claims).await?))
}

// ---------------------------------------------------------------------------
// POST /api/assignments
// ---------------------------------------------------------------------------

#[utoipa::path(
    post,
    path = "/api/assignments",
    request_body = CreateAssignmentRequest,
    responses(
        (status = 201, description = "Assignment created", body = Assignment),
        (status = 403, description = "Not permitted", body = AppError),
        (status = 422, description = "Validation failed", body = AppError)
    ),
    tag = "assignments"
)]
pub async fn create_assignment(
    State(pool): State<Pool<Postgres>>,
    auth: Permitted<actions::CreateAssignment>,
    Json(body): Json<CreateAssignmentRequest>,
) -> Result<(StatusCode, Json<Assignment>), AppError> {
    let assignment = service::assignments::create(&pool, auth.claims(), &body).await?;
    Ok((StatusCode::CREATED, Json(assignment)))
}

// ---------------------------------------------------------------------------
// POST /api/assignments/submit
// ---------------------------------------------------------------------------

/// Documents the multipart body; the handler reads the parts directly.
#[derive(utoipa::ToSchema)]
#[schema(rename_all = "camelCase")]
#[allow(dead_code)]
pub struct SubmissionForm {
    #[schema(value_type = String, format = Binary)]
    file: Vec<u8>,
    assignment_id: i64,
    comments: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<SubmissionUpload, AppError> {
    let bad_form = |e: axum::extract::multipart::MultipartError| {
        AppError::bad_request(format!("Malformed upload: {e}"))
    };

    let mut assignment_id = None;
    let mut comments = None;
    let mut file = None;

    while let Some(field) = multipart.next_field().await.map_err(bad_form)? {
        match field.name().unwrap_or_default() {
            "assignmentId" => {
                let text = field.text().await.map_err(bad_form)?;
                assignment_id = Some(
                    text.trim()
                        .parse::<i64>()
                        .map_err(|_| AppError::field("assignmentId", "Invalid assignment"))?,
                );
            }
            "comments" => comments = Some(field.text().await.map_err(bad_form)?),
            "file" => {
                let file_name = field.file_name().unwrap_or_default().to_string();
                let content_type = field
                    .content_type()
                    .unwrap_or("application/octet-stream")
                    .to_string();
                let bytes = field.bytes().await.map_err(bad_form)?;
                file = Some((file_name, content_type, bytes.to_vec()));
            }
            _ => {}
        }
    }

    let assignment_id =
        assignment_id.ok_or_else(|| AppError::field("assignmentId", "Assignment is required"))?;
    let (file_name, content_type, bytes) =
        file.ok_or_else(|| AppError::field("file", "Please attach a file to submit"))?;

    Ok(SubmissionUpload {
        assignment_id,
        comments,
        file_name,
        content_type,
        bytes,
    })
}

/// Multipart form with `file`, `assignmentId` and optional `comments`.
#[utoipa::path(
    post,
    path = "/api/assignments/submit",
    request_body(content = SubmissionForm, content_type = "multipart/form-data"),
    responses(
        (status = 201, description = "Submission stored", body = Submission),
        (status = 403, description = "Not a student or not enrolled", body = AppError),
        (status = 422, description = "Missing or empty file", body = AppError)
    ),
    tag = "assignments"
)]
pub async fn submit_assignment(
    State(pool): State<Pool<Postgres>>,
    State(store): State<Arc<SubmissionStore>>,
    auth: Permitted<actions::SubmitAssignment>,
    multipart: Multipart,
) -> Result<(StatusCode, Json<Submission>), AppError> {
    let upload = read_upload(multipart).await?;
    let submission = service::assignments::submit(&pool, &store, auth.claims(), upload).await?;
    Ok((StatusCode::CREATED, Json(submission)))
}

// ---------------------------------------------------------------------------
// GET /api/assignments/{id}/submissions
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/assignments/{id}/submissions",
    params(("id" = i64, Path, description = "Assignment ID")),
    responses(
        (status = 200, description = "Submissions, newest first", body = Vec<Submission>),
        (status = 403, description = "Not permitted", body = AppError)
    ),
    tag = "assignments"
)]
pub async fn list_submissions(
    State(pool): State<Pool<Postgres>>,
    auth: Permitted<actions::ViewSubmissions>,
    Path(id): Path<i64>,
) -> Result<Json<Vec<Submission>>, AppError> {
    Ok(Json(service::assignments::submissions(&pool, auth.claims(), id).await?))
}

// ---------------------------------------------------------------------------
// GET /api/submissions/{id}/file
// ---------------------------------------------------------------------------

#[utoipa::path(
    get,
    path = "/api/submissions/{id}/file",
    params(("id" = i64, Path, description = "Submission ID")),
    responses(
        (status = 200, description = "The submitted file", content_type = "application/octet-stream"),
        (status = 403, description = "Not permitted", body = AppError),
        (status = 404, description = "Not found", body = AppError)
    ),
    tag = "assignments"
)]
pub async fn download_submission(
    State(pool): State<Pool<Postgres>>,
    State(store): State<Arc<SubmissionStore>>,
    AuthRequired(claims): AuthRequired,
    Path(id): Path<i64>,
) -> Result<(HeaderMap, Vec<u8>), AppError> {
    let (submission, bytes) = service::assignments::submission_file(&pool, &store, &claims, id).await?;

    let mut headers = HeaderMap::new();
    let content_type = HeaderValue::from_str(&submission.content_type)
        .unwrap_or(HeaderValue::from_static("application/octet-stream"));
    headers.insert(header::CONTENT_TYPE, content_type);
    if let Ok(disposition) =
        HeaderValue::from_str(&format!("attachment; filename=\"{}\"", submission.file_name))
    {
        headers.insert(header::CONTENT_DISPOSITION, disposition);
    }
    Ok((headers, bytes))
}
