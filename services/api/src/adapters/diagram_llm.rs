//! services/api/src/adapters/diagram_llm.rs
//!
//! This module contains the adapter for the educational-diagram LLM.
//! It implements the `DiagramService` port from the `core` crate: the model
//! is asked for a complete SVG, which is returned as an image data URL.

const DIAGRAM_PROMPT_TEMPLATE: &str = r#"You are an educational diagram generator. Create a detailed SVG diagram for the following:

Topic: {topic}
Concept: {concept}
Diagram Type: {kind}

Generate a complete, valid SVG code (not just a description) that visualizes this concept.
The SVG should:
- Be 800x600 pixels
- Use clear, readable fonts (14-18px)
- Have a clean, educational style with colors like #4F46E5 (blue), #7C3AED (purple), #10B981 (green)
- Include labels, arrows, and text to explain the concept
- Be suitable for learning and understanding {topic}

Provide ONLY the SVG code, starting with <svg> and ending with </svg>. No explanations, just the code."#;

use async_openai::{
    config::OpenAIConfig,
    error::OpenAIError,
    types::chat::{ChatCompletionRequestUserMessageArgs, CreateChatCompletionRequestArgs},
    Client,
};
use async_trait::async_trait;
use base64::{engine::general_purpose::STANDARD, Engine as _};
use mentormind_core::domain::DiagramKind;
use mentormind_core::ports::{DiagramService, PortError, PortResult};

//=========================================================================================
// Diagram-kind Selection
//=========================================================================================

/// Picks the diagram shape that best fits the learner's message, by keyword.
/// Concept explanations default to a mindmap.
pub fn smart_diagram_kind(message: &str) -> DiagramKind {
    let msg = message.to_lowercase();

    if msg.contains("step") || msg.contains("process") || msg.contains("how to") {
        return DiagramKind::Flowchart;
    }
    if msg.contains("compare") || msg.contains("difference") || msg.contains("vs") {
        return DiagramKind::Comparison;
    }
    if msg.contains("progress") || msg.contains("learning path") || msg.contains("roadmap") {
        return DiagramKind::Process;
    }

    DiagramKind::Mindmap
}

//=========================================================================================
// Response Cleanup
//=========================================================================================

/// Strips code fences and validates that the model actually produced SVG.
fn extract_svg(text: &str) -> PortResult<String> {
    let mut cleaned = text.trim().to_string();
    if cleaned.contains("```") {
        cleaned = cleaned
            .replace("```svg", "")
            .replace("```", "")
            .trim()
            .to_string();
    }

    if !cleaned.contains("<svg") {
        return Err(PortError::Unexpected(
            "Generated content is not valid SVG".to_string(),
        ));
    }

    Ok(cleaned)
}

fn to_data_url(svg: &str) -> String {
    format!("data:image/svg+xml;base64,{}", STANDARD.encode(svg))
}

//=========================================================================================
// The Main Adapter Struct
//=========================================================================================

/// An adapter that implements `DiagramService` using an OpenAI-compatible LLM.
#[derive(Clone)]
pub struct OpenAiDiagramAdapter {
    client: Client<OpenAIConfig>,
    model: String,
}

impl OpenAiDiagramAdapter {
    /// Creates a new `OpenAiDiagramAdapter`.
    pub fn new(client: Client<OpenAIConfig>, model: String) -> Self {
        Self { client, model }
    }
}

//=========================================================================================
// `DiagramService` Trait Implementation
//=========================================================================================

#[async_trait]
impl DiagramService for OpenAiDiagramAdapter {
    /// Generates an SVG diagram and returns it as a `data:image/svg+xml` URL.
    async fn generate_diagram(
        &self,
        topic: &str,
        concept: &str,
        kind: DiagramKind,
    ) -> PortResult<String> {
        let prompt = DIAGRAM_PROMPT_TEMPLATE
            .replace("{topic}", topic)
            .replace("{concept}", concept)
            .replace("{kind}", &kind.to_string());

        let messages = vec![ChatCompletionRequestUserMessageArgs::default()
            .content(prompt)
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
                PortError::Unexpected("Diagram LLM response contained no text content.".to_string())
            })?;

        let svg = extract_svg(&content)?;
        Ok(to_data_url(&svg))
    }
}
