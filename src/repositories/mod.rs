pub(crate) mod exams;
pub(crate) mod notices;
pub(crate) mod olympiad;
pub(crate) mod schools;
pub(crate) mod students;
pub(crate) mod subjects;
pub(crate) mod submissions;
pub(crate) mod teachers;
