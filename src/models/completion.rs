use serde::{Deserialize, Serialize};

use crate::models::chat::{Message, Role};

/// Full (non-streaming) response of `POST /chat/completions`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletion {
    pub choices: Vec<Choice>,
    pub created: i64,
    pub model: String,
    #[serde(default)]
    pub object: String,
    #[serde(default)]
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Choice {
    pub message: Message,
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}

/// One server-sent event of a streaming completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatCompletionChunk {
    pub choices: Vec<ChunkChoice>,
    pub created: i64,
    pub model: String,
    #[serde(default)]
    pub object: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChunkChoice {
    pub delta: MessageDelta,
    pub index: u32,
    #[serde(default)]
    pub finish_reason: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MessageDelta {
    #[serde(default)]
    pub role: Option<Role>,
    #[serde(default)]
    pub content: Option<String>,
}

impl ChatCompletion {
    /// Content of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices.first().map(|c| c.message.content.as_str())
    }
}

impl ChatCompletionChunk {
    /// Delta content of the first choice, if any.
    pub fn content(&self) -> Option<&str> {
        self.choices
            .first()
            .and_then(|c| c.delta.content.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_deserializes_without_usage() {
        let completion: ChatCompletion = serde_json::from_str(
            r#"{
                "choices": [
                    {"message": {"role": "assistant", "content": "hi"}, "index": 0, "finish_reason": "stop"}
                ],
                "created": 1700000000,
                "model": "GigaChat"
            }"#,
        )
        .unwrap();

        assert_eq!(completion.content(), Some("hi"));
        assert!(completion.usage.is_none());
        assert_eq!(completion.choices[0].finish_reason.as_deref(), Some("stop"));
    }

    #[test]
    fn chunk_delta_may_carry_only_a_role() {
        let chunk: ChatCompletionChunk = serde_json::from_str(
            r#"{
                "choices": [{"delta": {"role": "assistant"}, "index": 0}],
                "created": 1700000000,
                "model": "GigaChat"
            }"#,
        )
        .unwrap();

        assert_eq!(chunk.content(), None);
        assert_eq!(chunk.choices[0].delta.role, Some(Role::Assistant));
    }
}
