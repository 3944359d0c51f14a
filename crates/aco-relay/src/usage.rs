// SPDX-FileCopyrightText: 2026 Aco Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Message counters per user and per destination.
//!
//! Counters are process-resident and reset on restart.

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use dashmap::DashMap;

/// Counters for one user across all destinations.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct UserStats {
    pub count: u64,
    pub last_message_at: Option<DateTime<Utc>>,
}

/// Message count of one user within a destination.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserCount {
    pub user_id: String,
    pub count: u64,
}

/// Counters for one destination.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct DestinationStats {
    pub total_messages: u64,
    /// Per-user counts in order of each user's first message.
    pub per_user: Vec<UserCount>,
}

impl DestinationStats {
    /// Number of distinct users seen in the destination.
    pub fn active_users(&self) -> usize {
        self.per_user.len()
    }

    pub fn count_for(&self, user_id: &str) -> u64 {
        self.per_user
            .iter()
            .find(|entry| entry.user_id == user_id)
            .map_or(0, |entry| entry.count)
    }
}

#[derive(Default)]
struct DestinationLedger {
    total_messages: u64,
    per_user: Vec<UserCount>,
    index: HashMap<String, usize>,
}

impl DestinationLedger {
    fn record(&mut self, user_id: &str) {
        self.total_messages += 1;
        match self.index.get(user_id) {
            Some(&slot) => self.per_user[slot].count += 1,
            None => {
                self.index.insert(user_id.to_string(), self.per_user.len());
                self.per_user.push(UserCount {
                    user_id: user_id.to_string(),
                    count: 1,
                });
            }
        }
    }

    fn snapshot(&self) -> DestinationStats {
        DestinationStats {
            total_messages: self.total_messages,
            per_user: self.per_user.clone(),
        }
    }
}

/// Process-wide usage counters.
#[derive(Default)]
pub struct UsageTracker {
    users: DashMap<String, UserStats>,
    destinations: DashMap<String, DestinationLedger>,
}

impl UsageTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records one message by `user_id`, attributed to `destination_id`
    /// when it was posted in a group destination.
    pub fn record(&self, user_id: &str, destination_id: Option<&str>) {
        self.record_at(user_id, destination_id, Utc::now());
    }

    pub fn record_at(&self, user_id: &str, destination_id: Option<&str>, at: DateTime<Utc>) {
        {
            let mut stats = self.users.entry(user_id.to_string()).or_default();
            stats.count += 1;
            stats.last_message_at = Some(at);
        }

        if let Some(destination_id) = destination_id {
            self.destinations
                .entry(destination_id.to_string())
                .or_default()
                .record(user_id);
        }
    }

    pub fn user_stats(&self, user_id: &str) -> UserStats {
        self.users
            .get(user_id)
            .map(|stats| stats.clone())
            .unwrap_or_default()
    }

    pub fn destination_stats(&self, destination_id: &str) -> DestinationStats {
        self.destinations
            .get(destination_id)
            .map(|ledger| ledger.snapshot())
            .unwrap_or_default()
    }

    /// Users of a destination by descending count. Ties keep first-seen order.
    pub fn top_users(&self, destination_id: &str, limit: usize) -> Vec<UserCount> {
        let mut ranked = self.destination_stats(destination_id).per_user;
        // sort_by is stable, which keeps first-seen order among equal counts
        ranked.sort_by(|a, b| b.count.cmp(&a.count));
        ranked.truncate(limit);
        ranked
    }
}
