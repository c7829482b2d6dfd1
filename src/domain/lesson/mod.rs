pub mod error;
pub mod service;

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

pub use error::LessonServiceError;
pub use service::{LessonActivation, LessonService};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Level {
    Beginner,
    Intermediate,
    Advanced,
}

/// Display order of the catalog
pub const LEVELS: [Level; 3] = [Level::Beginner, Level::Intermediate, Level::Advanced];

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Level::Beginner => "Beginner",
            Level::Intermediate => "Intermediate",
            Level::Advanced => "Advanced",
        };
        write!(f, "{}", name)
    }
}

impl FromStr for Level {
    type Err = LessonServiceError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "beginner" => Ok(Level::Beginner),
            "intermediate" => Ok(Level::Intermediate),
            "advanced" => Ok(Level::Advanced),
            other => Err(LessonServiceError::Invalid(format!(
                "Unknown level '{}'",
                other
            ))),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Word {
    pub id: String,
    pub hanzi: String,
    pub pinyin: String,
    pub meaning: String,
    pub example_sentence: String,
    pub example_meaning: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum Speaker {
    A,
    B,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DialogueLine {
    pub speaker: Speaker,
    pub hanzi: String,
    pub pinyin: String,
    pub meaning: String,
    pub avatar: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Dialogue {
    pub id: String,
    pub title: String,
    pub lines: Vec<DialogueLine>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct QuizQuestion {
    pub id: String,
    pub question: String,
    pub options: Vec<String>,
    /// Index into `options`
    pub correct_answer: usize,
    pub explanation: String,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ContentType {
    Vocabulary,
    Dialogue,
    Quiz,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(tag = "type", content = "content")]
pub enum LessonContent {
    #[serde(rename = "VOCABULARY")]
    VocabularyList(Vec<Word>),
    #[serde(rename = "DIALOGUE")]
    DialogueScript(Dialogue),
    #[serde(rename = "QUIZ")]
    QuizQuestionSet(Vec<QuizQuestion>),
}

impl LessonContent {
    pub fn content_type(&self) -> ContentType {
        match self {
            LessonContent::VocabularyList(_) => ContentType::Vocabulary,
            LessonContent::DialogueScript(_) => ContentType::Dialogue,
            LessonContent::QuizQuestionSet(_) => ContentType::Quiz,
        }
    }

    pub fn item_count(&self) -> usize {
        match self {
            LessonContent::VocabularyList(words) => words.len(),
            LessonContent::DialogueScript(dialogue) => dialogue.lines.len(),
            LessonContent::QuizQuestionSet(questions) => questions.len(),
        }
    }

    /// Texts worth warming when the lesson opens, in display order.
    /// Vocabulary warms only its first `vocabulary_limit` words; quizzes
    /// have nothing to speak.
    pub fn prefetch_texts(&self, vocabulary_limit: usize) -> Vec<String> {
        match self {
            LessonContent::VocabularyList(words) => words
                .iter()
                .take(vocabulary_limit)
                .map(|word| word.hanzi.clone())
                .collect(),
            LessonContent::DialogueScript(dialogue) => {
                dialogue.lines.iter().map(|line| line.hanzi.clone()).collect()
            }
            LessonContent::QuizQuestionSet(_) => Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct Lesson {
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: Level,
    pub is_locked: bool,
    #[serde(flatten)]
    pub content: LessonContent,
}

impl Lesson {
    pub fn summary(&self) -> LessonSummary {
        LessonSummary {
            id: self.id.clone(),
            title: self.title.clone(),
            description: self.description.clone(),
            level: self.level,
            content_type: self.content.content_type(),
            is_locked: self.is_locked,
            item_count: self.content.item_count(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct LessonSummary {
    pub id: String,
    pub title: String,
    pub description: String,
    pub level: Level,
    #[serde(rename = "type")]
    pub content_type: ContentType,
    pub is_locked: bool,
    pub item_count: usize,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LevelGroup {
    pub level: Level,
    pub lessons: Vec<LessonSummary>,
}

/// Read access to the lesson catalog
pub trait LessonRepository: Send + Sync {
    fn get_all_lessons(&self) -> Vec<Lesson>;
    fn find_by_id(&self, lesson_id: &str) -> Option<Lesson>;
}
