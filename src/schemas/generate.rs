use serde::{Deserialize, Serialize};

/// Body of `POST /api/generate`. Every field is optional at the serde level
/// so missing values surface as a 400 with a useful message, not a decode
/// rejection.
#[derive(Debug, Default, Deserialize)]
pub(crate) struct GenerateRequest {
    #[serde(default, alias = "studentClass", alias = "class")]
    pub(crate) student_class: Option<String>,
    #[serde(default)]
    pub(crate) subject: Option<String>,
    #[serde(default)]
    pub(crate) topic: Option<String>,
    #[serde(default)]
    pub(crate) difficulty: Option<String>,
    #[serde(default, alias = "type")]
    pub(crate) type_label: Option<String>,
    #[serde(default)]
    pub(crate) count: Option<u32>,
    #[serde(default)]
    pub(crate) message: Option<String>,
}

#[derive(Debug, Serialize)]
pub(crate) struct GenerateResponse {
    pub(crate) success: bool,
    pub(crate) result: String,
}
