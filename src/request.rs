//! Request payload construction for the multimodal conversation endpoint.
//!
//! The DashScope wire format nests messages under `input` and represents
//! message content as a list of single-key parts (`{"image": …}` /
//! `{"text": …}`). Building the payload is pure and deterministic: the same
//! image reference and prompts always yield a structurally identical request.

use serde::Serialize;

/// Top-level request body for the multimodal-generation endpoint.
#[derive(Debug, Clone, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub input: ChatInput,
}

#[derive(Debug, Clone, Serialize)]
pub struct ChatInput {
    pub messages: Vec<Message>,
}

/// One conversation turn.
#[derive(Debug, Clone, Serialize)]
pub struct Message {
    pub role: &'static str,
    pub content: Vec<ContentPart>,
}

/// A single content part of a message.
///
/// Serialised untagged, so each variant becomes the single-key object the
/// endpoint expects.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum ContentPart {
    Text { text: String },
    Image { image: String },
}

/// Build the two-message request payload.
///
/// Layout (in order):
/// 1. **System message** — the classification and parsing rules
/// 2. **User message** — the image reference followed by the output-format
///    instructions
pub fn build_request(
    model: &str,
    image_ref: &str,
    system_prompt: &str,
    user_prompt: &str,
) -> ChatRequest {
    ChatRequest {
        model: model.to_string(),
        input: ChatInput {
            messages: vec![
                Message {
                    role: "system",
                    content: vec![ContentPart::Text {
                        text: system_prompt.to_string(),
                    }],
                },
                Message {
                    role: "user",
                    content: vec![
                        ContentPart::Image {
                            image: image_ref.to_string(),
                        },
                        ContentPart::Text {
                            text: user_prompt.to_string(),
                        },
                    ],
                },
            ],
        },
    }
}
