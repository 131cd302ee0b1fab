pub(crate) mod auth;
pub(crate) mod errors;
pub(crate) mod exams;
pub(crate) mod generate;
pub(crate) mod guards;
pub(crate) mod handlers;
pub(crate) mod notices;
pub(crate) mod router;
pub(crate) mod students;
pub(crate) mod subjects;
pub(crate) mod validation;
