//! AI layer: prompt templates, OpenAI-compatible chat-completion client, and
//! the judgment field extractor built on top of them.

pub mod client;
pub mod extractor;
pub mod prompt;

pub use client::{
    ChatCompletion, ChatMessage, ChatRequest, ChatResponse, ClientConfig, CompletionError,
    HttpChatClient, Role,
};
pub use extractor::{Extraction, Extractor};
