use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Subject;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SubjectChapterAdd {
    #[serde(alias = "schoolCode")]
    #[validate(length(min = 1, message = "schoolCode must not be empty"))]
    pub(crate) school_code: String,
    #[serde(alias = "className", alias = "stuClass")]
    #[validate(length(min = 1, message = "className must not be empty"))]
    pub(crate) class_name: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: String,
    #[validate(length(min = 1, message = "chapter must not be empty"))]
    pub(crate) chapter: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct ChapterDelete {
    #[serde(alias = "schoolCode")]
    #[validate(length(min = 1, message = "schoolCode must not be empty"))]
    pub(crate) school_code: String,
    #[serde(alias = "className", alias = "stuClass")]
    #[validate(length(min = 1, message = "className must not be empty"))]
    pub(crate) class_name: String,
    #[validate(length(min = 1, message = "subject must not be empty"))]
    pub(crate) subject: String,
    #[validate(length(min = 1, message = "chapter must not be empty"))]
    pub(crate) chapter: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct SubjectResponse {
    pub(crate) id: String,
    pub(crate) school_code: String,
    pub(crate) class_name: String,
    pub(crate) subject: String,
    pub(crate) chapters: Vec<String>,
    pub(crate) created_at: String,
    pub(crate) updated_at: String,
}

impl SubjectResponse {
    pub(crate) fn from_db(subject: Subject) -> Self {
        Self {
            id: subject.id,
            school_code: subject.school_code,
            class_name: subject.class_name,
            subject: subject.subject,
            chapters: subject.chapters.0,
            created_at: format_primitive(subject.created_at),
            updated_at: format_primitive(subject.updated_at),
        }
    }
}
