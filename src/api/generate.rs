use axum::{extract::State, routing::post, Json, Router};

use crate::api::errors::ApiError;
use crate::api::validation::{require_str, validate_count};
use crate::core::state::AppState;
use crate::schemas::generate::{GenerateRequest, GenerateResponse};
use crate::services::generation::GenerationService;
use crate::services::prompts::GenerationParams;

pub(crate) fn router() -> Router<AppState> {
    Router::new().route("/generate", post(generate))
}

async fn generate(
    State(state): State<AppState>,
    Json(payload): Json<GenerateRequest>,
) -> Result<Json<GenerateResponse>, ApiError> {
    let topic = require_str(payload.topic.as_deref(), "topic")?;
    let difficulty = require_str(payload.difficulty.as_deref(), "difficulty")?;
    let type_label = require_str(payload.type_label.as_deref(), "type")?;
    let count = validate_count(payload.count)?;

    let params = GenerationParams {
        student_class: payload.student_class.as_deref().unwrap_or_default().trim().to_string(),
        subject: payload.subject.as_deref().unwrap_or_default().trim().to_string(),
        topic: topic.to_string(),
        difficulty: difficulty.to_string(),
        type_label: type_label.to_string(),
        count,
    };

    let message = payload.message.as_deref();
    let result = if GenerationService::is_chat(&params, message) {
        state
            .generation()
            .chat(&params, message.unwrap_or_default().trim())
            .await
            .map_err(|e| ApiError::internal(e, "Failed to generate content"))?
    } else {
        state
            .generation()
            .generate(&params)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to generate content"))?
    };

    Ok(Json(GenerateResponse { success: true, result }))
}

#[cfg(test)]
mod tests;
