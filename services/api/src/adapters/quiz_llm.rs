//! services/api/src/adapters/quiz_llm.rs
//!
//! This module contains the adapter for the quiz-generating LLM.
//! It implements the `QuizGenerationService` port from the `core` crate.

const QUIZ_PROMPT_TEMPLATE: &str = r#"# QUIZ GENERATION REQUEST

Generate a quiz for a student learning **{topic}**.

## Parameters:
- **Difficulty Level**: {difficulty}
- **Number of Questions**: {count}
- **Language**: {language}
- **Student Confidence**: {confidence}/5

## Requirements:
1. Create {count} multiple-choice questions
2. Each question should have 4 options (A, B, C, D)
3. Include clear explanations for correct answers
4. Match the difficulty level appropriately
5. Make questions practical and engaging
6. Respond ONLY in valid JSON format

## JSON Format (STRICT):
{
  "quizTitle": "Quiz title here",
  "topic": "{topic}",
  "difficulty": "{difficulty}",
  "questions": [
    {
      "id": 1,
      "question": "Question text here",
      "options": {
        "A": "Option A text",
        "B": "Option B text",
        "C": "Option C text",
        "D": "Option D text"
      },
      "correctAnswer": "A",
      "explanation": "Detailed explanation why A is correct"
    }
  ]
}

Generate the quiz now in {language}:"#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use mentormind_core::domain::{Quiz, QuizSpec};
use mentormind_core::ports::{PortError, PortResult, QuizGenerationService};

/// Default confidence spelled into the prompt when the learner's is unknown.
const DEFAULT_CONFIDENCE: u8 = 3;

//=========================================================================================
// Response Cleanup and Parsing
//=========================================================================================

/// Strips Markdown code fences the model often wraps its JSON in.
fn strip_code_fences(text: &str) -> String {
    text.replace("```json", "").replace("```", "").trim().to_string()
}

/// Parses the model's response into a `Quiz`. A payload without a `questions`
/// sequence (or otherwise off-shape) is a failure.
fn parse_quiz(text: &str) -> PortResult<Quiz> {
    let cleaned = strip_code_fences(text);
    serde_json::from_str(&cleaned)
        .map_err(|e| PortError::Unexpected(format!("Quiz response was not valid quiz JSON: {e}")))
}

fn build_prompt(spec: &QuizSpec) -> String {
    QUIZ_PROMPT_TEMPLATE
        .replace("{topic}", &spec.topic)
        .replace("{difficulty}", &spec.difficulty.to_string())
        .replace("{count}", &spec.question_count.to_string())
        .replace("{language}", &spec.language.to_string())
        .replace(
            "{confidence}",
            &spec.confidence.unwrap_or(DEFAULT_CONFIDENCE).to_string(),
        )
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `QuizGenerationService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiQuizAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiQuizAdapter {
    /// Creates a new `OpenAiQuizAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `QuizGenerationService` Trait Implementation
//=========================================================================================

#[async_trait]
impl QuizGenerationService for OpenAiQuizAdapter {
    /// Generates a multiple-choice quiz and parses the model's JSON reply.
    async fn generate_quiz(&self, spec: &QuizSpec) -> PortResult<Quiz> {
        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(build_prompt(spec))
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?
            .into()];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        let content = response
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message.content)
            .ok_or_else(|| {
                PortError::Unexpected("Quiz LLM response contained no text content.".to_string())
            })?;

        parse_quiz(&content)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use mentormind_core::domain::{Difficulty, Language, OptionLabel};

    fn quiz_json() -> String {
        r#"{
            "quizTitle": "Algebra Basics",
            "topic": "Algebra",
            "difficulty": "beginner",
            "questions": [
                {
                    "id": 1,
                    "question": "What is 2x when x = 3?",
                    "options": {"A": "5", "B": "6", "C": "8", "D": "9"},
                    "correctAnswer": "B",
                    "explanation": "2 times 3 is 6."
                }
            ]
        }"#
        .to_string()
    }

    #[test]
    fn parses_a_plain_json_reply() {
        let quiz = parse_quiz(&quiz_json()).unwrap();
        assert_eq!(quiz.quiz_title, "Algebra Basics");
        assert_eq!(quiz.difficulty, Difficulty::Beginner);
        assert_eq!(quiz.questions.len(), 1);
        assert_eq!(quiz.questions[0].correct_answer, OptionLabel::B);
        assert_eq!(quiz.questions[0].options.b, "6");
    }

    #[test]
    fn strips_markdown_code_fences_before_parsing() {
        let fenced = format!("```json\n{}\n```", quiz_json());
        let quiz = parse_quiz(&fenced).unwrap();
        assert_eq!(quiz.topic, "Algebra");
    }

    #[test]
    fn missing_questions_sequence_is_a_failure() {
        let err = parse_quiz(r#"{"quizTitle": "T", "topic": "T", "difficulty": "beginner"}"#)
            .unwrap_err();
        assert!(matches!(err, PortError::Unexpected(_)));
    }

    #[test]
    fn non_json_reply_is_a_failure() {
        assert!(parse_quiz("Sorry, I can't produce a quiz right now.").is_err());
    }

    #[test]
    fn prompt_carries_the_request_parameters() {
        let spec = QuizSpec {
            topic: "Photosynthesis".into(),
            difficulty: Difficulty::Intermediate,
            question_count: 5,
            language: Language::Urdu,
            confidence: Some(4),
        };

        let prompt = build_prompt(&spec);
        assert!(prompt.contains("**Photosynthesis**"));
        assert!(prompt.contains("**Difficulty Level**: intermediate"));
        assert!(prompt.contains("Create 5 multiple-choice questions"));
        assert!(prompt.contains("Generate the quiz now in urdu:"));
        assert!(prompt.contains("4/5"));
    }

    #[test]
    fn prompt_defaults_confidence_when_unknown() {
        let spec = QuizSpec {
            topic: "Algebra".into(),
            difficulty: Difficulty::Beginner,
            question_count: 3,
            language: Language::English,
            confidence: None,
        };
        assert!(build_prompt(&spec).contains("3/5"));
    }
}
