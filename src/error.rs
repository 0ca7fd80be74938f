use thiserror::Error;

#[derive(Error, Debug)]
pub enum GigaChatError {
    #[error("authentication failed at {url} (status {status}): {message}")]
    Authentication {
        url: String,
        status: u16,
        message: String,
    },

    #[error("API request to {url} failed (status {status}): {message}")]
    Response {
        url: String,
        status: u16,
        message: String,
    },

    #[error("transport error: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {message}")]
    Config { message: String },

    #[error("expected response content type '{expected}', got '{got}'")]
    UnexpectedContentType { expected: String, got: String },
}

pub type Result<T> = std::result::Result<T, GigaChatError>;
