// src/chat/mod.rs

//! Chat collaborator contract.
//!
//! The rest of the crate is indifferent to where replies come from (local
//! model, remote API): a backend implements [`ChatService`] and returns a
//! lazy stream of reply fragments. [`repl::run_repl`] drives the interactive
//! loop over any backend.

pub mod repl;

use anyhow::Result;

pub use repl::run_repl;

/// Who produced a conversation turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    User,
    Assistant,
}

/// One turn of the conversation history.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatTurn {
    pub role: Role,
    pub content: String,
}

impl ChatTurn {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: Role::Assistant,
            content: content.into(),
        }
    }
}

/// Incrementally-available reply fragments.
pub type TokenStream = Box<dyn Iterator<Item = Result<String>>>;

/// External chat backend consumed by the REPL.
pub trait ChatService {
    /// Produce a streamed reply to `message` given the prior conversation.
    fn stream_reply(&mut self, message: &str, history: &[ChatTurn]) -> Result<TokenStream>;
}
