//! Conversation orchestration for GreenMow.
//!
//! Ties together language/intent classification, session state, knowledge
//! base retrieval, and the bounded model/tool loop.

pub mod classifier;
pub mod engine;
pub mod sessions;

pub use engine::{ChatEngine, TurnRequest, TurnResult};
pub use sessions::SessionStore;
