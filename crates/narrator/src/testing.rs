//! Scripted oracle for tests.

use std::cell::RefCell;
use std::collections::VecDeque;

use crate::oracle::{Oracle, OracleError};

/// Replays queued replies in order; unavailable once the script runs out.
///
/// Every prompt it receives is kept for inspection.
#[derive(Debug, Default)]
pub struct ScriptedOracle {
    replies: RefCell<VecDeque<Result<String, OracleError>>>,
    prompts: RefCell<Vec<(String, f64)>>,
}

impl ScriptedOracle {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queues the given replies as successful completions
    pub fn with_replies<I, S>(replies: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let oracle = Self::new();
        for reply in replies {
            oracle.push_reply(reply);
        }
        oracle
    }

    pub fn push_reply(&self, reply: impl Into<String>) {
        self.replies.borrow_mut().push_back(Ok(reply.into()));
    }

    pub fn push_unavailable(&self) {
        self.replies
            .borrow_mut()
            .push_back(Err(OracleError::Unavailable("scripted outage".to_string())));
    }

    /// Prompts received so far, oldest first
    pub fn prompts(&self) -> Vec<String> {
        self.prompts.borrow().iter().map(|(p, _)| p.clone()).collect()
    }

    /// Temperatures received so far, oldest first
    pub fn temperatures(&self) -> Vec<f64> {
        self.prompts.borrow().iter().map(|&(_, t)| t).collect()
    }

    pub fn remaining(&self) -> usize {
        self.replies.borrow().len()
    }
}

impl Oracle for ScriptedOracle {
    fn complete(&self, prompt: &str, temperature: f64) -> Result<String, OracleError> {
        self.prompts
            .borrow_mut()
            .push((prompt.to_string(), temperature));
        self.replies
            .borrow_mut()
            .pop_front()
            .unwrap_or_else(|| Err(OracleError::Unavailable("script exhausted".to_string())))
    }
}
