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
use crate::schemas::notice::{NoticeCreate, NoticeResponse};

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/addNotice", post(add_notice))
        .route("/notices/:school_code", get(list_notices))
        .route("/deleteNotice/:id", delete(delete_notice))
}

async fn add_notice(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Json(payload): Json<NoticeCreate>,
) -> Result<(StatusCode, Json<NoticeResponse>), ApiError> {
    require_staff(&claims)?;
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;

    let notice = repositories::notices::create(
        state.db(),
        repositories::notices::CreateNotice {
            id: &Uuid::new_v4().to_string(),
            school_code: &payload.school_code,
            class_name: &payload.class_name,
            section: payload.section.as_deref(),
            title: &payload.title,
            message: &payload.message,
            notice_date: &payload.notice_date,
            notice_time: &payload.notice_time,
            created_at: primitive_now_utc(),
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create notice"))?;

    Ok((StatusCode::CREATED, Json(NoticeResponse::from_db(notice))))
}

async fn list_notices(
    State(state): State<AppState>,
    Path(school_code): Path<String>,
) -> Result<Json<Vec<NoticeResponse>>, ApiError> {
    let notices = repositories::notices::list_by_school(state.db(), &school_code)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to list notices"))?;

    Ok(Json(notices.into_iter().map(NoticeResponse::from_db).collect()))
}

async fn delete_notice(
    State(state): State<AppState>,
    AuthClaims(claims): AuthClaims,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    require_staff(&claims)?;

    let deleted = repositories::notices::delete(state.db(), &id)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to delete notice"))?;

    if deleted == 0 {
        return Err(ApiError::NotFound("Notice not found".to_string()));
    }

    Ok(Json(serde_json::json!({"success": true})))
}

#[cfg(test)]
mod tests;
