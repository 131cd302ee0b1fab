use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Teacher;

const COLUMNS: &str = "\
    id, school_code, teacher_id, full_name, password_hash, created_at, updated_at";

pub(crate) async fn find_by_key(
    pool: &PgPool,
    school_code: &str,
    teacher_id: &str,
) -> Result<Option<Teacher>, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "SELECT {COLUMNS} FROM teachers WHERE school_code = $1 AND teacher_id = $2"
    ))
    .bind(school_code)
    .bind(teacher_id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateTeacher<'a> {
    pub id: &'a str,
    pub school_code: &'a str,
    pub teacher_id: &'a str,
    pub full_name: &'a str,
    pub password_hash: String,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateTeacher<'_>,
) -> Result<Teacher, sqlx::Error> {
    sqlx::query_as::<_, Teacher>(&format!(
        "INSERT INTO teachers (
            id, school_code, teacher_id, full_name, password_hash, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.school_code)
    .bind(params.teacher_id)
    .bind(params.full_name)
    .bind(params.password_hash)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update_password(
    pool: &PgPool,
    school_code: &str,
    teacher_id: &str,
    password_hash: &str,
    updated_at: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE teachers SET password_hash = $1, updated_at = $2 \
         WHERE school_code = $3 AND teacher_id = $4",
    )
    .bind(password_hash)
    .bind(updated_at)
    .bind(school_code)
    .bind(teacher_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
