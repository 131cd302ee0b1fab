use serde::{Deserialize, Serialize};
use sqlx::types::Json;
use sqlx::FromRow;
use time::PrimitiveDateTime;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct School {
    pub(crate) id: String,
    pub(crate) school_code: String,
    pub(crate) school_id: String,
    pub(crate) name: String,
    pub(crate) address: Option<String>,
    pub(crate) admin_password_hash: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Teacher {
    pub(crate) id: String,
    pub(crate) school_code: String,
    pub(crate) teacher_id: String,
    pub(crate) full_name: String,
    pub(crate) password_hash: String,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Student {
    pub(crate) id: String,
    pub(crate) school_code: String,
    pub(crate) student_id: String,
    pub(crate) class_name: String,
    pub(crate) section: Option<String>,
    pub(crate) full_name: String,
    pub(crate) password_hash: String,
    pub(crate) total_score: f64,
    pub(crate) progress: Json<serde_json::Value>,
    pub(crate) level: i32,
    pub(crate) is_online: bool,
    pub(crate) last_active: Option<PrimitiveDateTime>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Subject {
    pub(crate) id: String,
    pub(crate) school_code: String,
    pub(crate) class_name: String,
    pub(crate) subject: String,
    pub(crate) chapters: Json<Vec<String>>,
    pub(crate) created_at: PrimitiveDateTime,
    pub(crate) updated_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Notice {
    pub(crate) id: String,
    pub(crate) school_code: String,
    pub(crate) class_name: String,
    pub(crate) section: Option<String>,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) notice_date: String,
    pub(crate) notice_time: String,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct Exam {
    pub(crate) id: String,
    pub(crate) display_name: String,
    pub(crate) file_url: String,
    pub(crate) class_name: String,
    pub(crate) subject: String,
    pub(crate) chapter: String,
    pub(crate) questions: Json<serde_json::Value>,
    pub(crate) answers: Json<serde_json::Value>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct OlympiadExam {
    pub(crate) id: String,
    pub(crate) display_name: String,
    pub(crate) file_url: String,
    pub(crate) questions: Json<serde_json::Value>,
    pub(crate) answers: Json<serde_json::Value>,
    pub(crate) created_at: PrimitiveDateTime,
}

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub(crate) struct ExamSubmission {
    pub(crate) id: String,
    pub(crate) school_code: String,
    pub(crate) student_id: String,
    pub(crate) class_name: String,
    pub(crate) exam_id: String,
    pub(crate) answers: Json<serde_json::Value>,
    pub(crate) submitted_at: PrimitiveDateTime,
}
