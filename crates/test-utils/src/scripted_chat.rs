use std::collections::VecDeque;

use anyhow::{anyhow, Result};
use docdex::chat::{ChatService, ChatTurn, TokenStream};

/// A chat backend that replays canned replies, fragment by fragment.
///
/// Each call to `stream_reply` pops the next scripted reply and also records
/// the message and the history length it was called with, so tests can
/// assert on history accumulation.
#[derive(Debug, Default)]
pub struct ScriptedChat {
    replies: VecDeque<Vec<String>>,
    pub seen_messages: Vec<String>,
    pub seen_history_lens: Vec<usize>,
}

impl ScriptedChat {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a reply, split into the fragments it should stream as.
    pub fn push_reply<I, S>(&mut self, fragments: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.replies
            .push_back(fragments.into_iter().map(Into::into).collect());
    }
}

impl ChatService for ScriptedChat {
    fn stream_reply(&mut self, message: &str, history: &[ChatTurn]) -> Result<TokenStream> {
        self.seen_messages.push(message.to_string());
        self.seen_history_lens.push(history.len());

        let fragments = self
            .replies
            .pop_front()
            .ok_or_else(|| anyhow!("no scripted reply left for message {message:?}"))?;

        Ok(Box::new(fragments.into_iter().map(Ok)))
    }
}
