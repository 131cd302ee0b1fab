//! Prompt templates for the generation gateway. Builders are pure functions
//! over [`GenerationParams`] so they can be tested without any backend.

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum PromptKind {
    Notes,
    Chat,
    Coding,
    All,
    Section(String),
}

impl PromptKind {
    /// Any type string outside the known set is treated as a section name
    /// ("MCQ", "Short Answer", ...).
    pub(crate) fn parse(raw: &str) -> Self {
        let trimmed = raw.trim();
        match trimmed.to_ascii_uppercase().as_str() {
            "NOTES" => Self::Notes,
            "CONVERSATION" | "CHAT" => Self::Chat,
            "CODING" => Self::Coding,
            "ALL" => Self::All,
            _ => Self::Section(trimmed.to_string()),
        }
    }
}

#[derive(Debug, Clone)]
pub(crate) struct GenerationParams {
    pub(crate) student_class: String,
    pub(crate) subject: String,
    pub(crate) topic: String,
    pub(crate) difficulty: String,
    pub(crate) type_label: String,
    pub(crate) count: u32,
}

impl GenerationParams {
    pub(crate) fn kind(&self) -> PromptKind {
        PromptKind::parse(&self.type_label)
    }
}

pub(crate) fn build_prompt(params: &GenerationParams) -> String {
    let title_topic = params.topic.to_uppercase();
    let title_subject = params.subject.to_uppercase();

    match params.kind() {
        PromptKind::Notes => format!(
            "STUDY NOTES: {title_topic} ({title_subject})\n\
             Write complete revision notes on the topic \"{topic}\" in {subject} \
             for {class}, at {difficulty} difficulty.\n\
             Cover definitions, key ideas, worked examples and a short summary. \
             Use plain text with clear headings.",
            topic = params.topic,
            subject = params.subject,
            class = params.student_class,
            difficulty = params.difficulty,
        ),
        PromptKind::Coding => format!(
            "CODING PRACTICE: {title_topic} ({title_subject})\n\
             Create {count} programming exercises on \"{topic}\" for {class}, \
             {difficulty} difficulty.\n\
             For each exercise give the problem statement, sample input/output \
             and a reference solution with a brief explanation.",
            count = params.count,
            topic = params.topic,
            class = params.student_class,
            difficulty = params.difficulty,
        ),
        PromptKind::All => format!(
            "QUESTION PAPER: {title_topic} ({title_subject})\n\
             Prepare a full question paper on \"{topic}\" in {subject} for {class}, \
             {difficulty} difficulty.\n\
             Include these sections, each with {count} questions: \
             MCQ, Fill in the Blanks, Short Answer, Long Answer.\n\
             Number every question and provide an answer key at the end.",
            topic = params.topic,
            subject = params.subject,
            class = params.student_class,
            difficulty = params.difficulty,
            count = params.count,
        ),
        PromptKind::Section(section) => format!(
            "{section_upper}: {title_topic} ({title_subject})\n\
             Create {count} {section} questions on \"{topic}\" in {subject} for \
             {class}, {difficulty} difficulty.\n\
             Number every question and provide an answer key at the end.",
            section_upper = section.to_uppercase(),
            count = params.count,
            topic = params.topic,
            subject = params.subject,
            class = params.student_class,
            difficulty = params.difficulty,
        ),
        // Chat requests carry a running message and go through
        // `build_chat_prompt` instead.
        PromptKind::Chat => build_chat_prompt(params, ""),
    }
}

pub(crate) fn build_chat_prompt(params: &GenerationParams, message: &str) -> String {
    format!(
        "You are a friendly tutor helping a {class} student with {subject} \
         (topic: {topic}, level: {difficulty}).\n\
         Answer clearly and briefly, with examples where they help.\n\
         Student says: {message}",
        class = params.student_class,
        subject = params.subject,
        topic = params.topic,
        difficulty = params.difficulty,
    )
}

#[cfg(test)]
mod tests {
    use super::{build_chat_prompt, build_prompt, GenerationParams, PromptKind};

    fn params(type_label: &str) -> GenerationParams {
        GenerationParams {
            student_class: "Class 5".to_string(),
            subject: "Math".to_string(),
            topic: "Fractions".to_string(),
            difficulty: "Easy".to_string(),
            type_label: type_label.to_string(),
            count: 5,
        }
    }

    #[test]
    fn parse_maps_known_types_and_falls_back_to_section() {
        assert_eq!(PromptKind::parse("NOTES"), PromptKind::Notes);
        assert_eq!(PromptKind::parse("notes"), PromptKind::Notes);
        assert_eq!(PromptKind::parse("CONVERSATION"), PromptKind::Chat);
        assert_eq!(PromptKind::parse("chat"), PromptKind::Chat);
        assert_eq!(PromptKind::parse("CODING"), PromptKind::Coding);
        assert_eq!(PromptKind::parse("ALL"), PromptKind::All);
        assert_eq!(PromptKind::parse(" MCQ "), PromptKind::Section("MCQ".to_string()));
    }

    #[test]
    fn section_prompt_embeds_count_and_uppercases_title() {
        let prompt = build_prompt(&params("MCQ"));
        assert!(prompt.starts_with("MCQ: FRACTIONS (MATH)"));
        assert!(prompt.contains("Create 5 MCQ questions"));
        assert!(prompt.contains("Class 5"));
        assert!(prompt.contains("Easy"));
    }

    #[test]
    fn all_prompt_lists_every_section_with_per_section_count() {
        let prompt = build_prompt(&params("ALL"));
        assert!(prompt.contains("each with 5 questions"));
        for section in ["MCQ", "Fill in the Blanks", "Short Answer", "Long Answer"] {
            assert!(prompt.contains(section), "missing section {section}");
        }
    }

    #[test]
    fn notes_prompt_keeps_original_casing_in_body() {
        let prompt = build_prompt(&params("NOTES"));
        assert!(prompt.starts_with("STUDY NOTES: FRACTIONS (MATH)"));
        assert!(prompt.contains("\"Fractions\" in Math"));
    }

    #[test]
    fn chat_prompt_carries_the_message() {
        let prompt = build_chat_prompt(&params("CHAT"), "why is 1/2 bigger than 1/3?");
        assert!(prompt.contains("why is 1/2 bigger than 1/3?"));
        assert!(prompt.contains("Class 5"));
    }
}
