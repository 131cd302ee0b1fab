use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::School;

const COLUMNS: &str = "\
    id, school_code, school_id, name, address, admin_password_hash, created_at, updated_at";

pub(crate) async fn find_by_code(
    pool: &PgPool,
    school_code: &str,
) -> Result<Option<School>, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!("SELECT {COLUMNS} FROM schools WHERE school_code = $1"))
        .bind(school_code)
        .fetch_optional(pool)
        .await
}

pub(crate) async fn exists_by_code_or_school_id(
    pool: &PgPool,
    school_code: &str,
    school_id: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar::<_, String>(
        "SELECT id FROM schools WHERE school_code = $1 OR school_id = $2",
    )
    .bind(school_code)
    .bind(school_id)
    .fetch_optional(pool)
    .await
}

pub(crate) struct CreateSchool<'a> {
    pub id: &'a str,
    pub school_code: &'a str,
    pub school_id: &'a str,
    pub name: &'a str,
    pub address: Option<&'a str>,
    pub admin_password_hash: String,
    pub created_at: PrimitiveDateTime,
    pub updated_at: PrimitiveDateTime,
}

pub(crate) async fn create(pool: &PgPool, params: CreateSchool<'_>) -> Result<School, sqlx::Error> {
    sqlx::query_as::<_, School>(&format!(
        "INSERT INTO schools (
            id, school_code, school_id, name, address, admin_password_hash, created_at, updated_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7,$8)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.school_code)
    .bind(params.school_id)
    .bind(params.name)
    .bind(params.address)
    .bind(params.admin_password_hash)
    .bind(params.created_at)
    .bind(params.updated_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn update_password(
    pool: &PgPool,
    school_code: &str,
    admin_password_hash: &str,
    updated_at: PrimitiveDateTime,
) -> Result<u64, sqlx::Error> {
    let result = sqlx::query(
        "UPDATE schools SET admin_password_hash = $1, updated_at = $2 WHERE school_code = $3",
    )
    .bind(admin_password_hash)
    .bind(updated_at)
    .bind(school_code)
    .execute(pool)
    .await?;
    Ok(result.rows_affected())
}
