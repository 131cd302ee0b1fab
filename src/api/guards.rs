use async_trait::async_trait;
use axum::extract::{FromRequestParts, State};
use axum::http::{header, request::Parts};

use crate::api::errors::ApiError;
use crate::core::security::{self, Claims, Role};
use crate::core::state::AppState;

/// Verified JWT claims from the `Authorization: Bearer` header. Tokens are
/// self-contained, so no database round trip happens here.
pub(crate) struct AuthClaims(pub(crate) Claims);

#[async_trait]
impl FromRequestParts<AppState> for AuthClaims {
    type Rejection = ApiError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let State(app_state) = State::<AppState>::from_request_parts(parts, state)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to access application state"))?;

        let auth_header = parts
            .headers
            .get(header::AUTHORIZATION)
            .and_then(|value| value.to_str().ok())
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or(ApiError::Unauthorized("Invalid authentication credentials"))?;

        let claims = security::verify_token(token, app_state.settings())
            .map_err(|_| ApiError::Unauthorized("Invalid authentication credentials"))?;

        Ok(AuthClaims(claims))
    }
}

/// School admins and teachers may manage subjects, exams and notices.
pub(crate) fn require_staff(claims: &Claims) -> Result<(), ApiError> {
    match claims.role {
        Role::School | Role::Teacher => Ok(()),
        Role::Student => Err(ApiError::Forbidden("Staff access required")),
    }
}

pub(crate) fn require_student(claims: &Claims) -> Result<(), ApiError> {
    match claims.role {
        Role::Student => Ok(()),
        _ => Err(ApiError::Forbidden("Student access required")),
    }
}
