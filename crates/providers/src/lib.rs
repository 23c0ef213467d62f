//! Model provider implementations.
//!
//! Currently one provider: any OpenAI-compatible chat-completions endpoint
//! (OpenAI, Azure OpenAI via proxy, vLLM, Ollama, ...).

mod openai_compat;

pub use openai_compat::OpenAiCompatProvider;
