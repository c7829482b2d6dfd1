pub mod gemini_speech_repository;
pub mod lesson_repository;
pub mod mistake_repository;
pub mod openai_speech_repository;
pub mod speech_repository;

pub use gemini_speech_repository::GeminiSpeechRepository;
pub use lesson_repository::HardcodedLessonRepository;
pub use mistake_repository::JsonFileMistakeRepository;
pub use openai_speech_repository::{client_without_retry, OpenAiSpeechRepository};
pub use speech_repository::{SpeechError, SpeechRepository};
