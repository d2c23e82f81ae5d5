use shared_types::policy::Action;
use shared_types::{
    validate_submission_file, AppError, Assignment, AssignmentProgress, CreateAssignmentRequest, Submission,
    SubmissionFile, UserRole,
};
use sqlx::{Pool, Postgres};

use crate::access;
use crate::auth::extractors::{caller_role, require_action};
use crate::auth::jwt::Claims;
use crate::error_convert::ValidateRequest;
use crate::repo;
use crate::storage::{self, ObjectStore, SubmissionStore};

/// A submission as it arrives from the multipart form or the server function.
pub struct SubmissionUpload {
    pub assignment_id: i64,
    pub comments: Option<String>,
    pub file_name: String,
    pub content_type: String,
    pub bytes: Vec<u8>,
}

impl SubmissionUpload {
    fn file(&self) -> SubmissionFile {
        SubmissionFile {
            name: self.file_name.clone(),
            content_type: self.content_type.clone(),
            size: self.bytes.len() as u64,
        }
    }
}

pub async fn list_for_course(pool: &Pool<Postgres>, claims: &Claims, course_id: i64) -> Result<Vec<Assignment>, AppError> {
    access::ensure_can_view_course(pool, claims, course_id).await?;
    repo::course::get(pool, course_id).await?;
    repo::assignment::list_by_course(pool, course_id).await
}

/// The calling student's assignments across their courses, with submission state.
pub async fn mine(pool: &Pool<Postgres>, claims: &Claims) -> Result<Vec<AssignmentProgress>, AppError> {
    if caller_role(claims)? != UserRole::Student {
        return Err(AppError::forbidden("Only students have assignments of their own"));
    }
    repo::assignment::progress_for_student(pool, claims.sub).await
}

/// `createdBy` must name the caller; it is echoed back by the form.
#[tracing::instrument(skip(pool, req), fields(course_id = req.course_id))]
pub async fn create(pool: &Pool<Postgres>, claims: &Claims, req: &CreateAssignmentRequest) -> Result<Assignment, AppError> {
    require_action(claims, Action::CreateAssignment)?;
    req.validate_request()?;
    if req.created_by != claims.sub {
        return Err(AppError::forbidden("Assignments can only be created in your own name"));
    }
    repo::course::get(pool, req.course_id).await?;
    let assignment = repo::assignment::create(pool, req).await?;
    tracing::info!(assignment_id = assignment.id, "Assignment created");
    Ok(assignment)
}

/// Store the file, then record the submission. A student may submit more
/// than once; every upload is kept.
#[tracing::instrument(skip(pool, store, upload), fields(assignment_id = upload.assignment_id, size = upload.bytes.len()))]
pub async fn submit(
    pool: &Pool<Postgres>,
    store: &SubmissionStore,
    claims: &Claims,
    upload: SubmissionUpload,
) -> Result<Submission, AppError> {
    require_action(claims, Action::SubmitAssignment)?;
    validate_submission_file(Some(&upload.file()), crate::config::max_upload_bytes() as u64)?;

    let assignment = repo::assignment::get(pool, upload.assignment_id).await?;
    if !repo::enrollment::is_enrolled(pool, claims.sub, assignment.course_id).await? {
        return Err(AppError::forbidden("You are not enrolled in this course"));
    }

    let key = storage::submission_key(assignment.id, claims.sub, &upload.file_name);
    let file_size = upload.bytes.len() as i64;
    store
        .put(&key, &upload.content_type, upload.bytes)
        .await
        .map_err(|e| {
            tracing::error!(error = %e, key = %key, "Failed to store submission file");
            AppError::internal("Could not store the uploaded file")
        })?;

    let saved = repo::submission::create(
        pool,
        repo::submission::NewSubmission {
            assignment_id: assignment.id,
            student_id: claims.sub,
            file_name: &storage::sanitize_file_name(&upload.file_name),
            content_type: &upload.content_type,
            storage_key: &key,
            file_size,
            comments: upload.comments.as_deref(),
        },
    )
    .await;

    match saved {
        Ok(submission) => {
            tracing::info!(submission_id = submission.id, "Submission recorded");
            Ok(submission)
        }
        Err(e) => {
            // Do not leave an orphaned object behind.
            if let Err(cleanup) = store.delete(&key).await {
                tracing::warn!(error = %cleanup, key = %key, "Failed to remove orphaned submission file");
            }
            Err(e)
        }
    }
}

pub async fn submissions(pool: &Pool<Postgres>, claims: &Claims, assignment_id: i64) -> Result<Vec<Submission>, AppError> {
    require_action(claims, Action::ViewSubmissions)?;
    repo::assignment::get(pool, assignment_id).await?;
    repo::submission::list_by_assignment(pool, assignment_id).await
}

/// Download a submission's bytes: staff, the submitting student, or one of
/// their parents.
pub async fn submission_file(
    pool: &Pool<Postgres>,
    store: &SubmissionStore,
    claims: &Claims,
    submission_id: i64,
) -> Result<(Submission, Vec<u8>), AppError> {
    let submission = repo::submission::find_by_id(pool, submission_id)
        .await?
        .ok_or_else(|| AppError::not_found(format!("Submission {submission_id} not found")))?;
    access::ensure_can_view_student(pool, claims, submission.student_id).await?;

    let bytes = store.get(&submission.storage_key).await.map_err(|e| {
        tracing::error!(error = %e, submission_id, "Failed to read submission file");
        AppError::not_found("The submitted file is no longer available")
    })?;
    Ok((submission, bytes))
}
