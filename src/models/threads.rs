use serde::{Deserialize, Serialize};

/// Generation options for `POST /threads/run`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ThreadRunOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max_tokens: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub repetition_penalty: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profanity_check: Option<bool>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ThreadRunResponse {
    pub thread_id: String,
    pub status: String,
    #[serde(default)]
    pub created_at: Option<i64>,
}
