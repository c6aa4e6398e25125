//! services/api/src/adapters/tutor_llm.rs
//!
//! This module contains the adapter for the main tutoring LLM.
//! It implements the `TutoringService` port from the `core` crate.

const SYSTEM_INSTRUCTIONS_TEMPLATE: &str = r#"# MENTORMIND AI - PROFESSIONAL TUTOR PROTOCOL

## STUDENT PROFILE:
- Name: {name}
- Topic: {topic}
- Confidence Level: {confidence}/5
- Language Preference: {language}

## RESPONSE GUIDELINES:

### FOR SIMPLE MESSAGES (Greetings, Short questions):
- Keep responses concise (1-2 lines)
- Friendly but professional tone
- No unnecessary explanations
- Example: "Hello" -> "Hello {name}! How can I assist you with {topic} today?"

### FOR TOPIC REQUESTS & EXPLANATIONS:
- Use STEP-BY-STEP format when explaining concepts:
  **Step 1:** [Title]
  [Explanation]

  **Step 2:** [Title]
  [Explanation]

- Break complex topics into digestible steps
- Include practical examples after each step
- Use analogies relevant to Pakistani context when helpful
- End with a quick comprehension check question

### FOR FOLLOW-UPS:
- Build on previous context
- Progressive learning approach
- Check understanding before moving forward
- Adapt difficulty based on student responses

### FORMATTING RULES:
- Use **bold** for key concepts and step titles
- Use emojis strategically (🎯 for goals, 💡 for tips, ✅ for checkpoints)
- Use # for main headers, ## for subheaders, ### for sub-sections
- Clear paragraph breaks between steps
- Use numbered lists (1., 2., 3.) for sequences
- Use bullet points (-, •) for related items
- Use backticks for code or technical terms
- Use --- for horizontal dividers when separating major sections
- Professional yet approachable tone
- IMPORTANT: Format your response as markdown for better readability

### ADAPTIVE TEACHING:
- Match explanation depth to confidence level ({confidence}/5)
- For beginners: Use simple language, more examples
- For advanced: Include technical details, challenges

## CURRENT RESPONSE:
Respond in {language}. Match the message intent and length appropriately."#;

const USER_INPUT_TEMPLATE: &str = r#"## CONTEXT ANALYSIS:
Message: "{message}"
Message Type: {message_kind}

Respond in {language} to the message above."#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{
        ChatCompletionRequestSystemMessageArgs, ChatCompletionRequestUserMessageArgs,
        CreateChatCompletionRequestArgs,
    },
    Client,
};
use async_trait::async_trait;
use mentormind_core::domain::{Language, UserProfile};
use mentormind_core::ports::{PortError, PortResult, TutoringService};
use regex::Regex;

//=========================================================================================
// Message Classification
//=========================================================================================

/// Coarse intent of one learner message; feeds both the prompt and the
/// decision whether to auto-generate a diagram.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Greeting,
    TopicRequest,
    SummaryRequest,
    ExampleRequest,
    ShortMessage,
    DetailedQuery,
}

impl MessageKind {
    /// The label spelled out in the prompt.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Greeting => "GREETING",
            MessageKind::TopicRequest => "TOPIC_REQUEST",
            MessageKind::SummaryRequest => "SUMMARY_REQUEST",
            MessageKind::ExampleRequest => "EXAMPLE_REQUEST",
            MessageKind::ShortMessage => "SHORT_MESSAGE",
            MessageKind::DetailedQuery => "DETAILED_QUERY",
        }
    }

    /// Whether this message asks for an explanation, the kind that warrants
    /// an auto-generated visual aid for image-preferring learners.
    pub fn is_explanation(&self) -> bool {
        matches!(self, MessageKind::TopicRequest | MessageKind::DetailedQuery)
    }
}

/// Classifies a learner message by keyword patterns.
pub fn classify_message(message: &str) -> MessageKind {
    let msg = message.trim().to_lowercase();

    if Regex::new(r"^(hello|hi|hey|salam|hola)").unwrap().is_match(&msg) {
        return MessageKind::Greeting;
    }
    if Regex::new(r"(explain|what is|tell me about|define)")
        .unwrap()
        .is_match(&msg)
    {
        return MessageKind::TopicRequest;
    }
    if Regex::new(r"(summary|brief|short|overview)")
        .unwrap()
        .is_match(&msg)
    {
        return MessageKind::SummaryRequest;
    }
    if Regex::new(r"(example|for example)").unwrap().is_match(&msg) {
        return MessageKind::ExampleRequest;
    }
    if msg.chars().count() < 20 {
        return MessageKind::ShortMessage;
    }

    MessageKind::DetailedQuery
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `TutoringService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiTutorAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiTutorAdapter {
    /// Creates a new `OpenAiTutorAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `TutoringService` Trait Implementation
//=========================================================================================

#[async_trait]
impl TutoringService for OpenAiTutorAdapter {
    /// Produces a personalized tutoring reply to one learner message.
    async fn tutor_reply(
        &self,
        message: &str,
        profile: &UserProfile,
        language: Language,
    ) -> PortResult<String> {
        let instructions = SYSTEM_INSTRUCTIONS_TEMPLATE
            .replace("{name}", &profile.name)
            .replace("{topic}", &profile.topic)
            .replace("{confidence}", &profile.confidence.to_string())
            .replace("{language}", &language.to_string());

        let user_input = USER_INPUT_TEMPLATE
            .replace("{message}", message)
            .replace("{message_kind}", classify_message(message).as_str())
            .replace("{language}", &language.to_string());

        let messages = vec![
            ChatCompletionRequestSystemMessageArgs::default()
                .content(instructions)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
            ChatCompletionRequestUserMessageArgs::default()
                .content(user_input)
                .build()
                .map_err(|e| PortError::Unexpected(e.to_string()))?
                .into(),
        ];

        let request = CreateChatCompletionRequestArgs::default()
            .model(&self.model)
            .messages(messages)
            .n(1)
            .build()
            .map_err(|e| PortError::Unexpected(e.to_string()))?;

        // Call the API and manually map the error if it occurs, which respects the orphan rule.
        let response = self
            .client
            .chat()
            .create(request)
            .await
            .map_err(|e: OpenAIError| PortError::Unexpected(e.to_string()))?;

        // Extract the text content from the first choice in the response.
        if let Some(choice) = response.choices.into_iter().next() {
            if let Some(content) = choice.message.content {
                Ok(content)
            } else {
                Err(PortError::Unexpected(
                    "Tutoring LLM response contained no text content.".to_string(),
                ))
            }
        } else {
            Err(PortError::Unexpected(
                "Tutoring LLM returned no choices in its response.".to_string(),
            ))
        }
    }
}
