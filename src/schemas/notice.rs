use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::time::format_primitive;
use crate::db::models::Notice;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct NoticeCreate {
    #[serde(alias = "schoolCode")]
    #[validate(length(min = 1, message = "schoolCode must not be empty"))]
    pub(crate) school_code: String,
    #[serde(alias = "className", alias = "stuClass")]
    #[validate(length(min = 1, message = "className must not be empty"))]
    pub(crate) class_name: String,
    #[serde(default)]
    pub(crate) section: Option<String>,
    #[validate(length(min = 1, message = "title must not be empty"))]
    pub(crate) title: String,
    #[validate(length(min = 1, message = "message must not be empty"))]
    pub(crate) message: String,
    #[serde(alias = "noticeDate", alias = "date")]
    #[validate(length(min = 1, message = "noticeDate must not be empty"))]
    pub(crate) notice_date: String,
    #[serde(alias = "noticeTime", alias = "time")]
    #[validate(length(min = 1, message = "noticeTime must not be empty"))]
    pub(crate) notice_time: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct NoticeResponse {
    pub(crate) id: String,
    pub(crate) school_code: String,
    pub(crate) class_name: String,
    pub(crate) section: Option<String>,
    pub(crate) title: String,
    pub(crate) message: String,
    pub(crate) notice_date: String,
    pub(crate) notice_time: String,
    pub(crate) created_at: String,
}

impl NoticeResponse {
    pub(crate) fn from_db(notice: Notice) -> Self {
        Self {
            id: notice.id,
            school_code: notice.school_code,
            class_name: notice.class_name,
            section: notice.section,
            title: notice.title,
            message: notice.message,
            notice_date: notice.notice_date,
            notice_time: notice.notice_time,
            created_at: format_primitive(notice.created_at),
        }
    }
}
