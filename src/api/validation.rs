use crate::api::errors::ApiError;
use std::path::Path;

pub(crate) const MIN_PASSWORD_LEN: usize = 8;
pub(crate) const MAX_QUESTION_COUNT: u32 = 50;

/// Presence check for a required string field. Returns the trimmed value.
pub(crate) fn require_str<'a>(value: Option<&'a str>, field: &str) -> Result<&'a str, ApiError> {
    match value.map(str::trim) {
        Some(trimmed) if !trimmed.is_empty() => Ok(trimmed),
        _ => Err(ApiError::BadRequest(format!("Missing required field '{field}'"))),
    }
}

pub(crate) fn validate_count(count: Option<u32>) -> Result<u32, ApiError> {
    let count =
        count.ok_or_else(|| ApiError::BadRequest("Missing required field 'count'".to_string()))?;
    if (1..=MAX_QUESTION_COUNT).contains(&count) {
        Ok(count)
    } else {
        Err(ApiError::BadRequest(format!("count must be between 1 and {MAX_QUESTION_COUNT}")))
    }
}

pub(crate) fn validate_password_len(password: &str) -> Result<(), ApiError> {
    if password.chars().count() >= MIN_PASSWORD_LEN {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!(
            "Password must be at least {MIN_PASSWORD_LEN} characters long"
        )))
    }
}

pub(crate) fn validate_pdf_upload(filename: &str, content_type: &str) -> Result<(), ApiError> {
    let extension = Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| ApiError::BadRequest("File must have an extension".to_string()))?;

    if extension != "pdf" {
        return Err(ApiError::BadRequest(format!("File extension '{extension}' is not allowed")));
    }

    let mime = content_type.trim().to_ascii_lowercase();
    if mime == "application/pdf" {
        Ok(())
    } else {
        Err(ApiError::BadRequest(format!("MIME type '{mime}' does not match extension '.pdf'")))
    }
}
