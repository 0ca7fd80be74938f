pub mod chat;
pub mod completion;
pub mod model;
pub mod threads;
pub mod token;

pub use chat::{Chat, Message, Role};
pub use completion::{
    ChatCompletion, ChatCompletionChunk, Choice, ChunkChoice, MessageDelta, Usage,
};
pub use model::{Model, Models};
pub use threads::{ThreadRunOptions, ThreadRunResponse};
pub use token::{AccessToken, Token};
