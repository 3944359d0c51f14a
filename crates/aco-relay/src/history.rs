// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Per-user conversation history with a sliding-window bound.
//!
//! Every append trims the oldest turns so that at most `limit` remain.
//! Alternation of user and model turns is not enforced: a failed backend
//! call leaves a user turn without its reply.

use std::collections::VecDeque;

use aco_core::{Role, Turn};
use dashmap::DashMap;

/// Turns kept per user unless configured otherwise.
pub const DEFAULT_HISTORY_LIMIT: usize = 20;

/// Process-wide conversation ledger keyed by user id.
pub struct ConversationStore {
    histories: DashMap<String, VecDeque<Turn>>,
    limit: usize,
}

impl ConversationStore {
    pub fn new(limit: usize) -> Self {
        Self {
            histories: DashMap::new(),
            limit: limit.max(1),
        }
    }

    pub fn limit(&self) -> usize {
        self.limit
    }

    /// Appends a turn, then evicts from the front down to the limit.
    pub fn append(&self, user_id: &str, role: Role, text: impl Into<String>) {
        let mut history = self.histories.entry(user_id.to_string()).or_default();
        history.push_back(Turn {
            role,
            text: text.into(),
        });
        while history.len() > self.limit {
            history.pop_front();
        }
    }

    /// All turns except the most recently appended one, oldest first.
    pub fn history_excluding_last(&self, user_id: &str) -> Vec<Turn> {
        self.histories
            .get(user_id)
            .map(|history| {
                let keep = history.len().saturating_sub(1);
                history.iter().take(keep).cloned().collect()
            })
            .unwrap_or_default()
    }

    /// The full stored history, oldest first.
    pub fn history(&self, user_id: &str) -> Vec<Turn> {
        self.histories
            .get(user_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    pub fn len(&self, user_id: &str) -> usize {
        self.histories.get(user_id).map_or(0, |h| h.len())
    }

    pub fn is_empty(&self, user_id: &str) -> bool {
        self.len(user_id) == 0
    }

    pub fn clear(&self, user_id: &str) {
        self.histories.remove(user_id);
    }
}

impl Default for ConversationStore {
    fn default() -> Self {
        Self::new(DEFAULT_HISTORY_LIMIT)
    }
}
