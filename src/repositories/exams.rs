use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Exam;

const COLUMNS: &str = "\
    id, display_name, file_url, class_name, subject, chapter, questions, answers, created_at";

pub(crate) async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("SELECT {COLUMNS} FROM exams WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn list_all(pool: &PgPool) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "SELECT {COLUMNS} FROM exams ORDER BY created_at DESC"
    ))
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateExam<'a> {
    pub id: &'a str,
    pub display_name: &'a str,
    pub file_url: &'a str,
    pub class_name: &'a str,
    pub subject: &'a str,
    pub chapter: &'a str,
    pub questions: serde_json::Value,
    pub answers: serde_json::Value,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateExam<'_>) -> Result<Exam, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "INSERT INTO exams (
            id, display_name, file_url, class_name, subject, chapter, questions, answers, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.display_name)
    .bind(params.file_url)
    .bind(params.class_name)
    .bind(params.subject)
    .bind(params.chapter)
    .bind(sqlx::types::Json(params.questions))
    .bind(sqlx::types::Json(params.answers))
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<Option<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!("DELETE FROM exams WHERE id = $1 RETURNING {COLUMNS}"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

/// Removes every exam scoped to a class/subject pair. Returns the deleted rows
/// so callers can clean up the stored files as well.
pub(crate) async fn delete_by_class_subject(
    pool: &PgPool,
    class_name: &str,
    subject: &str,
) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "DELETE FROM exams WHERE class_name = $1 AND subject = $2 RETURNING {COLUMNS}"
    ))
    .bind(class_name)
    .bind(subject)
    .fetch_all(pool)
    .await
}

pub(crate) async fn delete_by_chapter(
    pool: &PgPool,
    class_name: &str,
    subject: &str,
    chapter: &str,
) -> Result<Vec<Exam>, sqlx::Error> {
    sqlx::query_as::<_, Exam>(&format!(
        "DELETE FROM exams WHERE class_name = $1 AND subject = $2 AND chapter = $3 \
         RETURNING {COLUMNS}"
    ))
    .bind(class_name)
    .bind(subject)
    .bind(chapter)
    .fetch_all(pool)
    .await
}
