use axum::{
    extract::{Path, State},
    http::StatusCode,
    routing::{get, post},
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::guards::{require_student, AuthClaims};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::exam::SubmissionResponse;
use crate::schemas::student::{ExamSubmit, ScoreSave, StudentResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/teacher/students/:school_code/:class_name", get(list_students))
        .route("/student/save-score", post(save_score))
        .route("/student/ranking/:school_code/:class_name", get(ranking))
        .route("/student/profile/:school_code/:student_id", get(profile))
        .route("/student/submit-exam", post(submit_exam))
}

async fn list_students(
    State(state): State<AppState>,
    Path((school_code, class_name)): Path<(String, String)>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let students = repositories::students::list_by_class(state.db(), &school_code, &class_name)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list students"))?;

    Ok(Json(students.into_iter().map(StudentResponse::from_db).collect()))
}

async fn save_score(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<ScoreSave>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_student(&claims)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let updated = repositories::students::save_score(
        state.db(),
        &payload.school_code,
        &payload.student_id,
        &payload.class_name,
        repositories::students::SaveScore {
            total_score: payload.total_score,
            progress: payload.progress,
            level: payload.level,
            updated_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to save score"))?;

    if updated == 0 {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    Ok(Json(serde_json::json!({"success": true})))
}

async fn ranking(
    State(state): State<AppState>,
    Path((school_code, class_name)): Path<(String, String)>,
) -> Result<Json<Vec<StudentResponse>>, ApiError> {
    let students = repositories::students::ranking_by_class(state.db(), &school_code, &class_name)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load ranking"))?;

    Ok(Json(students.into_iter().map(StudentResponse::from_db).collect()))
}

async fn profile(
    State(state): State<AppState>,
    Path((school_code, student_id)): Path<(String, String)>,
) -> Result<Json<StudentResponse>, ApiError> {
    let student = repositories::students::find_by_key(state.db(), &school_code, &student_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load student"))?
        .ok_or_else(|| ApiError::NotFound("Student not found".to_string()))?;

    Ok(Json(StudentResponse::from_db(student)))
}

async fn submit_exam(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<ExamSubmit>,
) -> Result<(StatusCode, Json<SubmissionResponse>), ApiError> {
    require_student(&claims)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let exam = repositories::exams::find_by_id(state.db(), &payload.exam_id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load exam"))?;
    if exam.is_none() {
        return Err(ApiError::NotFound("Exam not found".to_string()));
    }

    let student = repositories::students::find_by_class_key(
        state.db(),
        &payload.school_code,
        &payload.student_id,
        &payload.class_name,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to load student"))?;
    if student.is_none() {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    let submission = repositories::submissions::create(
        state.db(),
        repositories::submissions::CreateSubmission {
            id: &Uuid::new_v4().to_string(),
            school_code: &payload.school_code,
            student_id: &payload.student_id,
            class_name: &payload.class_name,
            exam_id: &payload.exam_id,
            answers: payload.answers,
            submitted_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to store submission"))?;

    Ok((StatusCode::CREATED, Json(SubmissionResponse::from_db(submission))))
}
