use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    routing::{delete, get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_staff, AuthClaims};
use crate::api::validation::validate_pdf_upload;
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::exam::{ExamMeta, ExamResponse, OlympiadMeta, OlympiadResponse};
use crate::services::storage::UploadKind;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/uploadExam", post(upload_exam))
        .route("/allExams", get(all_exams))
        .route("/deleteExam/:id", delete(delete_exam))
        .route("/uploadOlympiadPDF", post(upload_olympiad))
        .route("/currentOlympiadExam", get(current_olympiad))
}

struct PdfPart {
    file_name: String,
    bytes: Vec<u8>,
}

/// Pulls the `pdf` and `meta` parts out of a multipart body. Unknown parts
/// are skipped.
async fn read_upload_parts(
    multipart: &mut Multipart,
) -> Result<(PdfPart, Option<String>), ApiError> {
    let mut pdf: Option<PdfPart> = None;
    let mut meta: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Invalid multipart body: {e}")))?
    {
        match field.name() {
            Some("pdf") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .ok_or_else(|| ApiError::BadRequest("pdf part must be a file".to_string()))?;
                let content_type = field.content_type().unwrap_or_default().to_string();
                validate_pdf_upload(&file_name, &content_type)?;

                let bytes = field
                    .bytes()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read pdf part: {e}")))?;
                if bytes.is_empty() {
                    return Err(ApiError::BadRequest("pdf part must not be empty".to_string()));
                }
                pdf = Some(PdfPart { file_name, bytes: bytes.to_vec() });
            }
            Some("meta") => {
                let text = field
                    .text()
                    .await
                    .map_err(|e| ApiError::BadRequest(format!("Failed to read meta part: {e}")))?;
                meta = Some(text);
            }
            _ => {}
        }
    }

    let pdf = pdf
        .ok_or_else(|| ApiError::BadRequest("Missing required multipart part 'pdf'".to_string()))?;
    Ok((pdf, meta))
}

async fn upload_exam(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ExamResponse>), ApiError> {
    require_staff(&claims)?;

    let (pdf, meta) = read_upload_parts(&mut multipart).await?;
    let meta = meta
        .ok_or_else(|| ApiError::BadRequest("Missing required multipart part 'meta'".to_string()))?;
    let meta: ExamMeta = serde_json::from_str(&meta)
        .map_err(|e| ApiError::BadRequest(format!("Invalid meta JSON: {e}")))?;
    meta.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let stored = state
        .files()
        .save_pdf(UploadKind::Exam, &pdf.file_name, &pdf.bytes)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store exam file"))?;

    tracing::info!(url = %stored.url, size = stored.size, sha256 = %stored.sha256, "Stored exam PDF");

    let exam = repositories::exams::create(
        state.db(),
        repositories::exams::CreateExam {
            id: &Uuid::new_v4().to_string(),
            display_name: &meta.display_name,
            file_url: &stored.url,
            class_name: &meta.class_name,
            subject: &meta.subject,
            chapter: &meta.chapter,
            questions: meta.questions,
            answers: meta.answers,
            created_at: primitive_now_utc(),
        },
    )
    .await;

    let exam = match exam {
        Ok(exam) => exam,
        Err(err) => {
            // Do not leave orphaned files behind when the insert fails.
            if let Err(cleanup) = state.files().remove_by_url(&stored.url).await {
                tracing::warn!(error = %cleanup, "Failed to clean up exam file");
            }
            return Err(ApiError::internal(err, "Failed to create exam"));
        }
    };

    Ok((StatusCode::CREATED, Json(ExamResponse::from_db(exam))))
}

async fn all_exams(State(state): State<AppState>) -> Result<Json<Vec<ExamResponse>>, ApiError> {
    let exams = repositories::exams::list_all(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list exams"))?;

    Ok(Json(exams.into_iter().map(ExamResponse::from_db).collect()))
}

async fn delete_exam(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_staff(&claims)?;

    let exam = repositories::exams::delete(state.db(), &id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete exam"))?
        .ok_or_else(|| ApiError::NotFound("Exam not found".to_string()))?;

    if let Err(err) = state.files().remove_by_url(&exam.file_url).await {
        tracing::warn!(error = %err, exam_id = %exam.id, "Failed to remove exam file");
    }

    Ok(Json(serde_json::json!({"success": true})))
}

async fn upload_olympiad(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<OlympiadResponse>), ApiError> {
    require_staff(&claims)?;

    let (pdf, meta) = read_upload_parts(&mut multipart).await?;
    let meta: OlympiadMeta = match meta {
        Some(raw) => serde_json::from_str(&raw)
            .map_err(|e| ApiError::BadRequest(format!("Invalid meta JSON: {e}")))?,
        None => OlympiadMeta {
            display_name: pdf.file_name.clone(),
            questions: serde_json::Value::Null,
            answers: serde_json::Value::Null,
        },
    };
    meta.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let stored = state
        .files()
        .save_pdf(UploadKind::Olympiad, &pdf.file_name, &pdf.bytes)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to store olympiad file"))?;

    let (created, previous) = repositories::olympiad::replace(
        state.db(),
        repositories::olympiad::CreateOlympiadExam {
            id: &Uuid::new_v4().to_string(),
            display_name: &meta.display_name,
            file_url: &stored.url,
            questions: meta.questions,
            answers: meta.answers,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to replace olympiad exam"))?;

    if let Some(previous) = previous {
        if let Err(err) = state.files().remove_by_url(&previous.file_url).await {
            tracing::warn!(error = %err, "Failed to remove previous olympiad file");
        }
    }

    Ok((StatusCode::CREATED, Json(OlympiadResponse::from_db(created))))
}

async fn current_olympiad(
    State(state): State<AppState>,
) -> Result<Json<OlympiadResponse>, ApiError> {
    let exam = repositories::olympiad::current(state.db())
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load olympiad exam"))?
        .ok_or_else(|| ApiError::NotFound("No olympiad exam uploaded".to_string()))?;

    Ok(Json(OlympiadResponse::from_db(exam)))
}

#[cfg(test)]
mod tests;
