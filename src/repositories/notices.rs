use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::Notice;

const COLUMNS: &str = "\
    id, school_code, class_name, section, title, message, notice_date, notice_time, created_at";

pub(crate) async fn list_by_school(
    pool: &PgPool,
    school_code: &str,
) -> Result<Vec<Notice>, sqlx::Error> {
    sqlx::query_as::<_, Notice>(&format!(
        "SELECT {COLUMNS} FROM notices WHERE school_code = $1 ORDER BY created_at DESC"
    ))
    .bind(school_code)
    .fetch_all(pool)
    .await
}

pub(crate) struct CreateNotice<'a> {
    pub id: &'a str,
    pub school_code: &'a str,
    pub class_name: &'a str,
    pub section: Option<&'a str>,
    pub title: &'a str,
    pub message: &'a str,
    pub notice_date: &'a str,
    pub notice_time: &'a str,
    pub created_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateNotice<'_>) -> Result<Notice, sqlx::Error> {
    sqlx::query_as::<_, Notice>(&format!(
        "INSERT INTO notices (
            id, school_code, class_name, section, title, message, notice_date, notice_time, created_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8,$9)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.school_code)
    .bind(params.class_name)
    .bind(params.section)
    .bind(params.title)
    .bind(params.message)
    .bind(params.notice_date)
    .bind(params.notice_time)
    .bind(params.created_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn delete(pool: &PgPool, id: &str) -> Result<u64, sqlx::Error> {
    let result = sqlx::query("DELETE FROM notices WHERE id = $1").bind(id).execute(pool).await?;
    Ok(result.rows_affected())
}
