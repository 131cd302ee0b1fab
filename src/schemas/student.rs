use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Student;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ScoreSave {
    #[serde(alias = "schoolCode")]
    #[validate(length(min = 1, message = "schoolCode must not be empty"))]
    pub(crate) school_code: String,
    #[serde(alias = "studentId")]
    #[validate(length(min = 1, message = "studentId must not be empty"))]
    pub(crate) student_id: String,
    #[serde(alias = "className", alias = "stuClass")]
    #[validate(length(min = 1, message = "className must not be empty"))]
    pub(crate) class_name: String,
    #[serde(alias = "totalScore")]
    pub(crate) total_score: f64,
    #[serde(default)]
    pub(crate) progress: serde_json::Value,
    #[serde(default = "default_level")]
    pub(crate) level: i32,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamSubmit {
    #[serde(alias = "schoolCode")]
    #[validate(length(min = 1, message = "schoolCode must not be empty"))]
    pub(crate) school_code: String,
    #[serde(alias = "studentId")]
    #[validate(length(min = 1, message = "studentId must not be empty"))]
    pub(crate) student_id: String,
    #[serde(alias = "className", alias = "stuClass")]
    #[validate(length(min = 1, message = "className must not be empty"))]
    pub(crate) class_name: String,
    #[serde(alias = "examId")]
    #[validate(length(min = 1, message = "examId must not be empty"))]
    pub(crate) exam_id: String,
    #[serde(default)]
    pub(crate) answers: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct StudentResponse {
    pub(crate) id: String,
    pub(crate) school_code: String,
    pub(crate) student_id: String,
    pub(crate) class_name: String,
    pub(crate) section: Option<String>,
    pub(crate) full_name: String,
    pub(crate) total_score: f64,
    pub(crate) progress: serde_json::Value,
    pub(crate) level: i32,
    pub(crate) is_online: bool,
    pub(crate) last_active: Option<String>,
    pub(crate) created_at: String,
}

impl StudentResponse {
    /// Password hash never leaves the database layer.
    pub(crate) fn from_db(student: Student) -> Self {
        Self {
            id: student.id,
            school_code: student.school_code,
            student_id: student.student_id,
            class_name: student.class_name,
            section: student.section,
            full_name: student.full_name,
            total_score: student.total_score,
            progress: student.progress.0,
            level: student.level,
            is_online: student.is_online,
            last_active: student.last_active.map(format_primitive),
            created_at: format_primitive(student.created_at),
        }
    }
}

fn default_level() -> i32 {
    1
}
