//! LLM provider adapters for ALL-KI.

pub mod openai_client;

pub use openai_client::OpenAiChatClient;
