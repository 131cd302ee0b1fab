use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::{Exam, ExamSubmission, OlympiadExam};

/// The `meta` JSON part of a multipart exam upload.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ExamMeta {
    #[serde(alias = "displayName", alias = "name")]
    #[validate(length(min = 1, message = "displayName must not be empty"))]
    pub(crate) display_name: String,
    #[serde(alias = "className", alias = "stuClass")]
    #[validate(length(min = 1, message = "className must not be empty"))]
    pub(crate) class_name: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: String,
    #[validate(length(min = 1, message = "chapter must not be empty"))]
    pub(crate) chapter: String,
    #[serde(default)]
    pub(crate) questions: serde_json::Value,
    #[serde(default)]
    pub(crate) answers: serde_json::Value,
}

/// The `meta` part of an olympiad upload has no class/subject scope.
#[derive(Debug, Deserialize, Validate)]
pub(crate) struct OlympiadMeta {
    #[serde(alias = "displayName", alias = "name")]
    #[validate(length(min = 1, message = "displayName must not be empty"))]
    pub(crate) display_name: String,
    #[serde(default)]
    pub(crate) questions: serde_json::Value,
    #[serde(default)]
    pub(crate) answers: serde_json::Value,
}

#[derive(Debug, Serialize)]
pub(crate) struct ExamResponse {
    pub(crate) id: String,
    pub(crate) display_name: String,
    pub(crate) file_url: String,
    pub(crate) class_name: String,
    pub(crate) subject: String,
    pub(crate) chapter: String,
    pub(crate) questions: serde_json::Value,
    pub(crate) answers: serde_json::Value,
    pub(crate) created_at: String,
}

impl ExamResponse {
    pub(crate) fn from_db(exam: Exam) -> Self {
        Self {
            id: exam.id,
            display_name: exam.display_name,
            file_url: exam.file_url,
            class_name: exam.class_name,
            subject: exam.subject,
            chapter: exam.chapter,
            questions: exam.questions.0,
            answers: exam.answers.0,
            created_at: format_primitive(exam.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct OlympiadResponse {
    pub(crate) id: String,
    pub(crate) display_name: String,
    pub(crate) file_url: String,
    pub(crate) questions: serde_json::Value,
    pub(crate) answers: serde_json::Value,
    pub(crate) created_at: String,
}

impl OlympiadResponse {
    pub(crate) fn from_db(exam: OlympiadExam) -> Self {
        Self {
            id: exam.id,
            display_name: exam.display_name,
            file_url: exam.file_url,
            questions: exam.questions.0,
            answers: exam.answers.0,
            created_at: format_primitive(exam.created_at),
        }
    }
}

#[derive(Debug, Serialize)]
pub(crate) struct SubmissionResponse {
    pub(crate) id: String,
    pub(crate) school_code: String,
    pub(crate) student_id: String,
    pub(crate) class_name: String,
    pub(crate) exam_id: String,
    pub(crate) answers: serde_json::Value,
    pub(crate) submitted_at: String,
}

impl SubmissionResponse {
    pub(crate) fn from_db(submission: ExamSubmission) -> Self {
        Self {
            id: submission.id,
            school_code: submission.school_code,
            student_id: submission.student_id,
            class_name: submission.class_name,
            exam_id: submission.exam_id,
            answers: submission.answers.0,
            submitted_at: format_primitive(submission.submitted_at),
        }
    }
}
