use axum::{
    extract::State,
    http::StatusCode,
    routing::post,
    Json, Router,
};
use uuid::Uuid;
use validator::Validate;

use crate::api::errors::ApiError;
use crate::api::validation::validate_password_len;
use crate::core::security::{self, Role};
use crate::core::state::AppState;
use crate::core::time::primitive_now_utc;
use crate::repositories;
use crate::schemas::auth::{
    PasswordReset, SchoolLogin, SchoolRegister, StudentLogin, StudentPresence, StudentRegister,
    TeacherLogin, TeacherRegister, TokenResponse,
};

/// Max attempts per window for auth endpoints.
const AUTH_RATE_LIMIT: u64 = 10;
/// Rate limit window in seconds.
const AUTH_RATE_WINDOW_SECONDS: u64 = 60;

pub(crate) fn router() -> Router<AppState> {
    Router::new()
        .route("/register-school", post(register_school))
        .route("/register-teacher", post(register_teacher))
        .route("/register-student", post(register_student))
        .route("/school-login", post(school_login))
        .route("/teacher-login", post(teacher_login))
        .route("/student-login", post(student_login))
        .route("/reset-password", post(reset_password))
        .route("/student-online", post(student_online))
        .route("/student-logout", post(student_logout))
}

async fn check_rate_limit(state: &AppState, endpoint: &str, identity: &str) -> Result<(), ApiError> {
    let rate_key = format!("rl:{endpoint}:{identity}");
    // Best effort: a limiter outage must not lock everyone out.
    let allowed = state
        .redis()
        .rate_limit(&rate_key, AUTH_RATE_LIMIT, AUTH_RATE_WINDOW_SECONDS)
        .await
        .unwrap_or(true);
    if allowed {
        Ok(())
    } else {
        Err(ApiError::TooManyRequests("Too many attempts, try again later"))
    }
}

fn token_response(
    state: &AppState,
    subject: &str,
    role: Role,
    school_code: &str,
) -> Result<TokenResponse, ApiError> {
    let token = security::create_access_token(subject, role, school_code, state.settings(), None)
        .map_err(|e| ApiError::internal(e, "Failed to create access token"))?;

    Ok(TokenResponse {
        access_token: token,
        token_type: "bearer".to_string(),
        role,
        school_code: school_code.to_string(),
    })
}

async fn register_school(
    State(state): State<AppState>,
    Json(payload): Json<SchoolRegister>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validate_password_len(&payload.password)?;
    check_rate_limit(&state, "register-school", &payload.school_code).await?;

    let existing = repositories::schools::exists_by_code_or_school_id(
        state.db(),
        &payload.school_code,
        &payload.school_id,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to check existing school"))?;

    if existing.is_some() {
        return Err(ApiError::Conflict("School with this code or id already exists".to_string()));
    }

    let admin_password_hash = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let now = primitive_now_utc();
    let school = repositories::schools::create(
        state.db(),
        repositories::schools::CreateSchool {
            id: &Uuid::new_v4().to_string(),
            school_code: &payload.school_code,
            school_id: &payload.school_id,
            name: &payload.name,
            address: payload.address.as_deref(),
            admin_password_hash,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create school"))?;

    let response = token_response(&state, &school.id, Role::School, &school.school_code)?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn register_teacher(
    State(state): State<AppState>,
    Json(payload): Json<TeacherRegister>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validate_password_len(&payload.password)?;
    check_rate_limit(&state, "register-teacher", &payload.teacher_id).await?;

    let school = repositories::schools::find_by_code(state.db(), &payload.school_code)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load school"))?;
    if school.is_none() {
        return Err(ApiError::NotFound("School not found".to_string()));
    }

    let existing =
        repositories::teachers::find_by_key(state.db(), &payload.school_code, &payload.teacher_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to check existing teacher"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict("Teacher with this id already exists".to_string()));
    }

    let password_hash = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let now = primitive_now_utc();
    let teacher = repositories::teachers::create(
        state.db(),
        repositories::teachers::CreateTeacher {
            id: &Uuid::new_v4().to_string(),
            school_code: &payload.school_code,
            teacher_id: &payload.teacher_id,
            full_name: &payload.full_name,
            password_hash,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create teacher"))?;

    let response = token_response(&state, &teacher.id, Role::Teacher, &teacher.school_code)?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn register_student(
    State(state): State<AppState>,
    Json(payload): Json<StudentRegister>,
) -> Result<(StatusCode, Json<TokenResponse>), ApiError> {
    payload.validate().map_err(|e| ApiError::BadRequest(e.to_string()))?;
    validate_password_len(&payload.password)?;
    check_rate_limit(&state, "register-student", &payload.student_id).await?;

    let school = repositories::schools::find_by_code(state.db(), &payload.school_code)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load school"))?;
    if school.is_none() {
        return Err(ApiError::NotFound("School not found".to_string()));
    }

    let existing = repositories::students::find_by_class_key(
        state.db(),
        &payload.school_code,
        &payload.student_id,
        &payload.class_name,
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to check existing student"))?;
    if existing.is_some() {
        return Err(ApiError::Conflict(
            "Student with this id already exists in the class".to_string(),
        ));
    }

    let password_hash = security::hash_password(&payload.password)
        .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;

    let now = primitive_now_utc();
    let student = repositories::students::create(
        state.db(),
        repositories::students::CreateStudent {
            id: &Uuid::new_v4().to_string(),
            school_code: &payload.school_code,
            student_id: &payload.student_id,
            class_name: &payload.class_name,
            section: payload.section.as_deref(),
            full_name: &payload.full_name,
            password_hash,
            created_at: now,
            updated_at: now,
        },
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to create student"))?;

    let response = token_response(&state, &student.id, Role::Student, &student.school_code)?;
    Ok((StatusCode::CREATED, Json(response)))
}

async fn school_login(
    State(state): State<AppState>,
    Json(payload): Json<SchoolLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    check_rate_limit(&state, "school-login", &payload.school_code).await?;

    let school = repositories::schools::find_by_code(state.db(), &payload.school_code)
        .await
        .map_err(|e| ApiError::internal(e, "Failed to load school"))?
        .ok_or(ApiError::Unauthorized("Incorrect school code or password"))?;

    let verified = security::verify_password(&payload.password, &school.admin_password_hash)
        .map_err(|_| ApiError::Unauthorized("Incorrect school code or password"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Incorrect school code or password"));
    }

    Ok(Json(token_response(&state, &school.id, Role::School, &school.school_code)?))
}

async fn teacher_login(
    State(state): State<AppState>,
    Json(payload): Json<TeacherLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    check_rate_limit(&state, "teacher-login", &payload.teacher_id).await?;

    let teacher =
        repositories::teachers::find_by_key(state.db(), &payload.school_code, &payload.teacher_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load teacher"))?
            .ok_or(ApiError::Unauthorized("Incorrect teacher id or password"))?;

    let verified = security::verify_password(&payload.password, &teacher.password_hash)
        .map_err(|_| ApiError::Unauthorized("Incorrect teacher id or password"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Incorrect teacher id or password"));
    }

    Ok(Json(token_response(&state, &teacher.id, Role::Teacher, &teacher.school_code)?))
}

async fn student_login(
    State(state): State<AppState>,
    Json(payload): Json<StudentLogin>,
) -> Result<Json<TokenResponse>, ApiError> {
    check_rate_limit(&state, "student-login", &payload.student_id).await?;

    let student =
        repositories::students::find_by_key(state.db(), &payload.school_code, &payload.student_id)
            .await
            .map_err(|e| ApiError::internal(e, "Failed to load student"))?
            .ok_or(ApiError::Unauthorized("Incorrect student id or password"))?;

    let verified = security::verify_password(&payload.password, &student.password_hash)
        .map_err(|_| ApiError::Unauthorized("Incorrect student id or password"))?;
    if !verified {
        return Err(ApiError::Unauthorized("Incorrect student id or password"));
    }

    repositories::students::set_online(
        state.db(),
        &student.school_code,
        &student.student_id,
        true,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update presence"))?;

    Ok(Json(token_response(&state, &student.id, Role::Student, &student.school_code)?))
}

async fn reset_password(
    State(state): State<AppState>,
    Json(payload): Json<PasswordReset>,
) -> Result<Json<serde_json::Value>, ApiError> {
    check_rate_limit(&state, "reset-password", &payload.school_code).await?;
    validate_password_len(&payload.new_password)?;

    let now = primitive_now_utc();
    match payload.role {
        Role::School => {
            let school = repositories::schools::find_by_code(state.db(), &payload.school_code)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to load school"))?
                .ok_or(ApiError::Unauthorized("Incorrect credentials"))?;

            verify_old_password(&payload.old_password, &school.admin_password_hash)?;

            let hash = security::hash_password(&payload.new_password)
                .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;
            repositories::schools::update_password(state.db(), &payload.school_code, &hash, now)
                .await
                .map_err(|e| ApiError::internal(e, "Failed to update password"))?;
        }
        Role::Teacher => {
            let teacher_id = payload
                .user_id
                .as_deref()
                .ok_or_else(|| ApiError::BadRequest("Missing required field 'userId'".to_string()))?;
            let teacher =
                repositories::teachers::find_by_key(state.db(), &payload.school_code, teacher_id)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to load teacher"))?
                    .ok_or(ApiError::Unauthorized("Incorrect credentials"))?;

            verify_old_password(&payload.old_password, &teacher.password_hash)?;

            let hash = security::hash_password(&payload.new_password)
                .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;
            repositories::teachers::update_password(
                state.db(),
                &payload.school_code,
                teacher_id,
                &hash,
                now,
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update password"))?;
        }
        Role::Student => {
            let student_id = payload
                .user_id
                .as_deref()
                .ok_or_else(|| ApiError::BadRequest("Missing required field 'userId'".to_string()))?;
            let student =
                repositories::students::find_by_key(state.db(), &payload.school_code, student_id)
                    .await
                    .map_err(|e| ApiError::internal(e, "Failed to load student"))?
                    .ok_or(ApiError::Unauthorized("Incorrect credentials"))?;

            verify_old_password(&payload.old_password, &student.password_hash)?;

            let hash = security::hash_password(&payload.new_password)
                .map_err(|e| ApiError::internal(e, "Failed to hash password"))?;
            repositories::students::update_password(
                state.db(),
                &payload.school_code,
                student_id,
                &hash,
                now,
            )
            .await
            .map_err(|e| ApiError::internal(e, "Failed to update password"))?;
        }
    }

    Ok(Json(serde_json::json!({"success": true, "message": "Password updated"})))
}

async fn student_online(
    State(state): State<AppState>,
    Json(payload): Json<StudentPresence>,
) -> Result<Json<serde_json::Value>, ApiError> {
    set_presence(&state, &payload, true).await
}

async fn student_logout(
    State(state): State<AppState>,
    Json(payload): Json<StudentPresence>,
) -> Result<Json<serde_json::Value>, ApiError> {
    set_presence(&state, &payload, false).await
}

async fn set_presence(
    state: &AppState,
    payload: &StudentPresence,
    is_online: bool,
) -> Result<Json<serde_json::Value>, ApiError> {
    let updated = repositories::students::set_online(
        state.db(),
        &payload.school_code,
        &payload.student_id,
        is_online,
        primitive_now_utc(),
    )
    .await
    .map_err(|e| ApiError::internal(e, "Failed to update presence"))?;

    if updated == 0 {
        return Err(ApiError::NotFound("Student not found".to_string()));
    }

    Ok(Json(serde_json::json!({"success": true, "is_online": is_online})))
}

fn verify_old_password(password: &str, hash: &str) -> Result<(), ApiError> {
    let verified = security::verify_password(password, hash)
        .map_err(|_| ApiError::Unauthorized("Incorrect credentials"))?;
    if verified {
        Ok(())
    } else {
        Err(ApiError::Unauthorized("Incorrect credentials"))
    }
}
