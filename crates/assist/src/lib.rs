//! Speech-to-text and answer suggestions for respondents, backed by an
//! OpenAI-compatible HTTP API.
//!
//! Nothing here touches submission state. Callers treat every
//! [`AssistError`] as an upstream failure.

pub mod client;
pub mod config;
pub mod error;
pub mod prompt;

pub use client::AssistClient;
pub use config::AssistConfig;
pub use error::AssistError;
