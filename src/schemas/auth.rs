use serde::{Deserialize, Serialize};
use validator::Validate;

use crate::core::security::Role;

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct SchoolRegister {
    #[serde(alias = "schoolCode")]
    #[validate(length(min = 1, message = "schoolCode must not be empty"))]
    pub(crate) school_code: String,
    #[serde(alias = "schoolId")]
    #[validate(length(min = 1, message = "schoolId must not be empty"))]
    pub(crate) school_id: String,
    #[validate(length(min = 1, message = "name must not be empty"))]
    pub(crate) name: String,
    #[serde(default)]
    pub(crate) address: Option<String>,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct TeacherRegister {
    #[serde(alias = "schoolCode")]
    #[validate(length(min = 1, message = "schoolCode must not be empty"))]
    pub(crate) school_code: String,
    #[serde(alias = "teacherId")]
    #[validate(length(min = 1, message = "teacherId must not be empty"))]
    pub(crate) teacher_id: String,
    #[serde(alias = "fullName", alias = "name")]
    #[validate(length(min = 1, message = "fullName must not be empty"))]
    pub(crate) full_name: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize, Validate)]
pub(crate) struct StudentRegister {
    #[serde(alias = "schoolCode")]
    #[validate(length(min = 1, message = "schoolCode must not be empty"))]
    pub(crate) school_code: String,
    #[serde(alias = "studentId")]
    #[validate(length(min = 1, message = "studentId must not be empty"))]
    pub(crate) student_id: String,
    #[serde(alias = "className", alias = "stuClass")]
    #[validate(length(min = 1, message = "className must not be empty"))]
    pub(crate) class_name: String,
    #[serde(default)]
    pub(crate) section: Option<String>,
    #[serde(alias = "fullName", alias = "name")]
    #[validate(length(min = 1, message = "fullName must not be empty"))]
    pub(crate) full_name: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct SchoolLogin {
    #[serde(alias = "schoolCode")]
    pub(crate) school_code: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct TeacherLogin {
    #[serde(alias = "schoolCode")]
    pub(crate) school_code: String,
    #[serde(alias = "teacherId")]
    pub(crate) teacher_id: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentLogin {
    #[serde(alias = "schoolCode")]
    pub(crate) school_code: String,
    #[serde(alias = "studentId")]
    pub(crate) student_id: String,
    pub(crate) password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct PasswordReset {
    pub(crate) role: Role,
    #[serde(alias = "schoolCode")]
    pub(crate) school_code: String,
    /// Teacher or student identifier; ignored for the school role.
    #[serde(default, alias = "userId", alias = "teacherId", alias = "studentId")]
    pub(crate) user_id: Option<String>,
    #[serde(alias = "oldPassword")]
    pub(crate) old_password: String,
    #[serde(alias = "newPassword")]
    pub(crate) new_password: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct StudentPresence {
    #[serde(alias = "schoolCode")]
    pub(crate) school_code: String,
    #[serde(alias = "studentId")]
    pub(crate) student_id: String,
}

#[derive(Debug, Serialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: String,
    pub(crate) token_type: String,
    pub(crate) role: Role,
    pub(crate) school_code: String,
}
