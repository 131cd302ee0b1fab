pub(crate) mod generation;
pub(crate) mod prompts;
pub(crate) mod storage;
