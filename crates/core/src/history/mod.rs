use std::collections::BTreeSet;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A committed draw. Never mutated after creation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DrawHistoryItem {
    pub number: i64,
    pub timestamp: DateTime<Utc>,
}

impl DrawHistoryItem {
    pub fn new(number: i64, timestamp: DateTime<Utc>) -> Self {
        Self { number, timestamp }
    }

    pub fn now(number: i64) -> Self {
        Self::new(number, Utc::now())
    }
}

/// Append-only record of committed draws.
///
/// Items are stored oldest first; [`HistoryLedger::all`] hands them out
/// newest first for display.
#[derive(Debug, Default, Clone)]
pub struct HistoryLedger {
    items: Vec<DrawHistoryItem>,
    drawn: BTreeSet<i64>,
}

impl HistoryLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a draw. Returns `false` and leaves the ledger untouched when
    /// the number was already drawn.
    pub fn append(&mut self, item: DrawHistoryItem) -> bool {
        if !self.drawn.insert(item.number) {
            return false;
        }
        self.items.push(item);
        true
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.drawn.clear();
    }

    pub fn list_drawn_numbers(&self) -> &BTreeSet<i64> {
        &self.drawn
    }

    pub fn contains(&self, number: i64) -> bool {
        self.drawn.contains(&number)
    }

    /// Every draw, newest first.
    pub fn all(&self) -> Vec<DrawHistoryItem> {
        self.items.iter().rev().cloned().collect()
    }

    pub fn latest(&self) -> Option<&DrawHistoryItem> {
        self.items.last()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}
