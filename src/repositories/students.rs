use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Student;

const COLUMNS: &str = "\
    id, school_code, student_id, class_name, section, full_name, password_hash, \
    total_score, progress, level, is_online, last_active, created_at, updated_at";

pub(crate) async fn find_by_key(
    pool: &PgPool,
    school_code: &str,
    student_id: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students WHERE school_code = $1 AND student_id = $2"
    ))
    .bind(school_code)
    .bind(student_id)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn find_by_class_key(
    pool: &PgPool,
    school_code: &str,
    student_id: &str,
    class_name: &str,
) -> Result<Option<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students \
         WHERE school_code = $1 AND student_id = $2 AND class_name = $3"
    ))
    .bind(school_code)
    .bind(student_id)
    .bind(class_name)
    .fetch_optional(pool)
    .await
}

pub(crate) async fn list_by_class(
    pool: &PgPool,
    school_code: &str,
    class_name: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students \
         WHERE school_code = $1 AND class_name = $2 ORDER BY student_id"
    ))
    .bind(school_code)
    .bind(class_name)
    .fetch_all(pool)
    .await
}

pub(crate) async fn ranking_by_class(
    pool: &PgPool,
    school_code: &str,
    class_name: &str,
) -> Result<Vec<Student>, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "SELECT {COLUMNS} FROM students \
         WHERE school_code = $1 AND class_name = $2 \
         ORDER BY total_score DESC, student_id"
    ))
    .bind(school_code)
    .bind(class_name)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateStudent<'a> {
    pub id: &'a str,
    pub school_code: &'a str,
    pub student_id: &'a str,
    pub class_name: &'a str,
    pub section: Option<&'a str>,
    pub full_name: &'a str,
    pub password_hash: String,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateStudent<'_>,
) -> Result<Student, sqlx::Error> {
    sqlx::query_as::<_, Student>(&format!(
        "INSERT INTO students (
            id, school_code, student_id, class_name, section, full_name, password_hash,
            total_score, progress, level, is_online, last_active, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,0,'{{}}',1,FALSE,NULL,$8,$9)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.school_code)
    .bind(params.student_id)
    .bind(params.class_name)
    .bind(params.section)
    .bind(params.full_name)
    .bind(params.password_hash)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) struct SaveScore {
    pub total_score: f64,
    pub progress: serde_json::Value,
    pub level: i32,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn save_score(
    pool: &PgPool,
    school_code: &str,
    student_id: &str,
    class_name: &str,
    params: SaveScore,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE students SET total_score = $1, progress = $2, level = $3, updated_at = $4 \
         WHERE school_code = $5 AND student_id = $6 AND class_name = $7",
    )
    .bind(params.total_score)
    .bind(sqlx::types::Json(params.progress))
    .bind(params.level)
    .bind(params.updated_at)
    .bind(school_code)
    .bind(student_id)
    .bind(class_name)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn set_online(
    pool: &PgPool,
    school_code: &str,
    student_id: &str,
    is_online: bool,
    now: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE students SET is_online = $1, last_active = $2, updated_at = $2 \
         WHERE school_code = $3 AND student_id = $4",
    )
    .bind(is_online)
    .bind(now)
    .bind(school_code)
    .bind(student_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}

pub(crate) async fn update_password(
    pool: &PgPool,
    school_code: &str,
    student_id: &str,
    password_hash: &str,
    updated_at: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE students SET password_hash = $1, updated_at = $2 \
         WHERE school_code = $3 AND student_id = $4",
    )
    .bind(password_hash)
    .bind(updated_at)
    .bind(school_code)
    .bind(student_id)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
