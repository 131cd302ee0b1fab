use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Subject;

const COLUMNS: &str = "\
    id, school_code, class_name, subject, chapters, created_at, updated_at";

pub(crate) async fn find_by_key(
    pool: &PgPool,
    school_code: &str,
    class_name: &str,
    subject: &str,
) -> Result<Option<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "SELECT {COLUMNS} FROM subjects \
         WHERE school_code = $1 AND class_name = $2 AND subject = $3"
    ))
    .bind(school_code)
    .bind(class_name)
    .bind(subject)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_class(
    pool: &PgPool,
    school_code: &str,
    class_name: &str,
) -> Result<Vec<Subject>, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "SELECT {COLUMNS} FROM subjects \
         WHERE school_code = $1 AND class_name = $2 ORDER BY subject"
    ))
    .bind(school_code)
    .bind(class_name)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateSubject<'a> {
    pub id: &'a str,
    pub school_code: &'a str,
    pub class_name: &'a str,
    pub subject: &'a str,
    pub chapters: Vec<String>,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSubject<'_>,
) -> Result<Subject, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "INSERT INTO subjects (
            id, school_code, class_name, subject, chapters, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.school_code)
    .bind(params.class_name)
    .bind(params.subject)
    .bind(sqlx::types::Json(params.chapters))
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update_chapters(
    pool: &PgPool,
    id: &str,
    chapters: Vec<String>,
    updated_at: PrimitiveDateTime,
) -> Result<Subject, sqlx::Error> {
    sqlx::query_as::<_, Subject>(&format!(
        "UPDATE subjects SET chapters = $1, updated_at = $2 WHERE id = $3
         RETURNING {COLUMNS}",
    ))
    .bind(sqlx::types::Json(chapters))
    .bind(updated_at)
    .bind(id)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete_by_key(
    pool: &PgPool,
    school_code: &str,
    class_name: &str,
    subject: &str,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "DELETE FROM subjects WHERE school_code = $1 AND class_name = $2 AND subject = $3",
    )
    .bind(school_code)
    .bind(class_name)
    .bind(subject)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
