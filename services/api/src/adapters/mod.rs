pub mod db;
pub mod diagram_llm;
pub mod quiz_llm;
pub mod tutor_llm;

pub use db::PgStateStore;
pub use diagram_llm::OpenAiDiagramAdapter;
pub use quiz_llm::OpenAiQuizAdapter;
pub use tutor_llm::OpenAiTutorAdapter;
