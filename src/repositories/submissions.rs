use sqlx::PgPool;
use time::PrimitiveDateTime;

use crate::db::models::ExamSubmission;

const COLUMNS: &str = "id, school_code, student_id, class_name, exam_id, answers, submitted_at";

pub(crate) struct CreateSubmission<'a> {
    pub id: &'a str,
    pub school_code: &'a str,
    pub student_id: &'a str,
    pub class_name: &'a str,
    pub exam_id: &'a str,
    pub answers: serde_json::Value,
    pub submitted_at: PrimitiveDateTime,
}

pub(crate) async fn create(
    pool: &PgPool,
    params: CreateSubmission<'_>,
) -> Result<ExamSubmission, sqlx::Error> {
    sqlx::query_as::<_, ExamSubmission>(&format!(
        "INSERT INTO exam_submissions (
            id, school_code, student_id, class_name, exam_id, answers, submitted_at
        ) VALUES ($1,$2,$3,$4,$5,$6,$7)
        RETURNING {COLUMNS}",
    ))
    .bind(params.id)
    .bind(params.school_code)
    .bind(params.student_id)
    .bind(params.class_name)
    .bind(params.exam_id)
    .bind(sqlx::types::Json(params.answers))
    .bind(params.submitted_at)
    .fetch_one(pool)
    .await
}

pub(crate) async fn list_by_student(
    pool: &PgPool,
    school_code: &str,
    student_id: &str,
) -> Result<Vec<ExamSubmission>, sqlx::Error> {
    sqlx::query_as::<_, ExamSubmission>(&format!(
        "SELECT {COLUMNS} FROM exam_submissions \
         WHERE school_code = $1 AND student_id = $2 ORDER BY submitted_at DESC"
    ))
    .bind(school_code)
    .bind(student_id)
    .fetch_all(pool)
    .await
}
