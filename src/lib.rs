//! Async client for the GigaChat API: OAuth 2.0 token management, chat
//! completions, server-sent-event streaming, model catalog and thread runs.
//!
//! ```no_run
//! use gigachat::{GigaChat, Settings};
//!
//! # async fn run() -> gigachat::Result<()> {
//! let client = GigaChat::new(Settings::builder().credentials("<auth key>").build()?)?;
//! let completion = client.chat("What is the answer to everything?").await?;
//! println!("{}", completion.content().unwrap_or_default());
//! # Ok(())
//! # }
//! ```

pub mod api;
pub mod client;
pub mod error;
pub mod models;
pub mod settings;

pub use client::GigaChat;
pub use error::{GigaChatError, Result};
pub use models::{
    AccessToken, Chat, ChatCompletion, ChatCompletionChunk, Message, Model, Models, Role,
    ThreadRunOptions, ThreadRunResponse,
};
pub use settings::Settings;
