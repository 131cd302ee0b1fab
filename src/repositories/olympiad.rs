use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::OlympiadExam;

const COLUMNS: &str = "id, display_name, file_url, questions, answers, created_at";

pub(crate) async fn current(pool: &PgPool) -> Result<Option<OlympiadExam>, sqlx::Error> {
    sqlx::query_as::<_, OlympiadExam>(&format!(
        "SELECT {COLUMNS} FROM olympiad_exam ORDER BY created_at DESC LIMIT 1"
    ))
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateOlympiadExam<'a> {
    pub id: &'a str,
    pub display_name: &'a str,
    pub file_url: &'a str,
    pub questions: serde_json::Value,
    pub answers: serde_json::Value,
    pub created_at: PrimitiveDateTime,
}

/// Swaps in the new olympiad exam. At most one row is kept; the previous one
/// (if any) is returned so the caller can drop its file from disk.
pub(crate) async fn replace(
    pool: &PgPool,
    params: CreateOlympiadExam<'_>,
) -> Result<(OlympiadExam, Option<OlympiadExam>), sqlx::Error> {
    let mut tx = pool.begin().await?;
    let previous = sqlx::query_as::<_, OlympiadExam>(&format!(
        "DELETE FROM olympiad_exam RETURNING {COLUMNS}"
    ))
    .fetch_optional(&mut *tx)
    .await?;
    let created = sqlx::query_as::<_, OlympiadExam>(&format!(
        "INSERT INTO olympiad_exam (
            id, display_name, file_url, questions, answers, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.display_name)
    .bind(params.file_url)
    .bind(sqlx::types::Json(params.questions))
    .bind(sqlx::types::Json(params.answers))
    .bind(params.created_at)
    .fetch_one(&mut *tx)
    .await?;
    tx.commit().await?;
    Ok((created, previous))
}
