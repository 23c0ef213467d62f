//! Core domain types and traits for GreenMow Assist.
//!
//! This crate defines the vocabulary the rest of the workspace speaks:
//! messages and conversations, the `Provider` abstraction over hosted
//! language models, the `Tool` abstraction over callable fleet operations,
//! session records, and the error taxonomy.

pub mod error;
pub mod message;
pub mod provider;
pub mod session;
pub mod tool;

pub use error::{Error, ProviderError, Result, StoreError, ToolError};
pub use message::{Conversation, Message, MessageToolCall, Role, SessionId};
pub use provider::{Provider, ProviderRequest, ProviderResponse, ToolDefinition, Usage};
pub use session::{Language, SessionRecord};
pub use tool::{Tool, ToolCall, ToolRegistry, ToolResult};
