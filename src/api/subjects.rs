use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_staff, AuthClaims};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::subject::{ChapterDelete, SubjectChapterAdd, SubjectResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/addSubjectChapter", post(add_subject_chapter))
        .route("/subjects/:school_code/:class_name", get(list_subjects))
        .route("/deleteSubject/:school_code/:class_name/:subject", delete(delete_subject))
        .route("/deleteChapter", delete(delete_chapter))
}

async fn add_subject_chapter(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<SubjectChapterAdd>,
) -> Result<(StatusCode, Json<SubjectResponse>), ApiError> {
    require_staff(&claims)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let now = primitive_now_utc();
    let existing = repositories::subjects::find_by_key(
        state.db(),
        &payload.school_code,
        &payload.class_name,
        &payload.subject,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load subject"))?;

    let subject = match existing {
        Some(subject) => {
            let mut chapters = subject.chapters.0.clone();
            if chapters.iter().any(|c| c == &payload.chapter) {
                // Idempotent: re-adding an existing chapter changes nothing.
                subject
            } else {
                chapters.push(payload.chapter.clone());
                repositories::subjects::update_chapters(state.db(), &subject.id, chapters, now)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to update subject"))?
            }
        }
        None => repositories::subjects::create(
            state.db(),
            repositories::subjects::CreateSubject {
                id: &Uuid::new_v4().to_string(),
                school_code: &payload.school_code,
                class_name: &payload.class_name,
                subject: &payload.subject,
                chapters: vec![payload.chapter.clone()],
                created_at: now,
                updated_at: now,
            },
        )
        .await
        .map_err(|e| ApiError::internal(e, "Failed to create subject"))?,
    };

    Ok((StatusCode::CREATED, Json(SubjectResponse::from_db(subject))))
}

async fn list_subjects(
    State(state): State<AppState>,
    Path((school_code, class_name)): Path<(String, String)>,
) -> Result<Json<Vec<SubjectResponse>>, ApiError> {
    let subjects = repositories::subjects::list_by_class(state.db(), &school_code, &class_name)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list subjects"))?;

    Ok(Json(subjects.into_iter().map(SubjectResponse::from_db).collect()))
}

async fn delete_subject(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path((school_code, class_name, subject)): Path<(String, String, String)>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_staff(&claims)?;

    let deleted =
        repositories::subjects::delete_by_key(state.db(), &school_code, &class_name, &subject)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to delete subject"))?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Subject not found".to_string()));
    }

    // Exams scoped to this subject go with it, files included.
    let removed_exams =
        repositories::exams::delete_by_class_subject(state.db(), &class_name, &subject)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to delete exams for subject"))?;
    for exam in &removed_exams {
        if let Err(err) = state.files().remove_by_url(&exam.file_url).await {
            tracing::warn!(error = %err, exam_id = %exam.id, "Failed to remove exam file");
        }
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "deleted_exams": removed_exams.len(),
    })))
}

async fn delete_chapter(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<ChapterDelete>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_staff(&claims)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let subject = repositories::subjects::find_by_key(
        state.db(),
        &payload.school_code,
        &payload.class_name,
        &payload.subject,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load subject"))?
    .ok_or_else(|| ApiError::NotFound("Subject not found".to_string()))?;

    let mut chapters = subject.chapters.0.clone();
    let before = chapters.len();
    chapters.retain(|c| c != &payload.chapter);
    if chapters.len() == before {
        return Err(ApiError::NotFound("Chapter not found".to_string()));
    }

    repositories::subjects::update_chapters(state.db(), &subject.id, chapters, primitive_now_utc())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to update subject"))?;

    let removed_exams = repositories::exams::delete_by_chapter(
        state.db(),
        &payload.class_name,
        &payload.subject,
        &payload.chapter,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to delete exams for chapter"))?;
    for exam in &removed_exams {
        if let Err(err) = state.files().remove_by_url(&exam.file_url).await {
            tracing::warn!(error = %err, exam_id = %exam.id, "Failed to remove exam file");
        }
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "deleted_exams": removed_exams.len(),
    })))
}

#[cfg(test)]
mod tests;
