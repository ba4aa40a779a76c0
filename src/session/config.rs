use serde::{
    Deserialize,
    Serialize,
};

use crate::core::{
    Card,
    CardStats,
    Difficulty,
};

pub const DEFAULT_AUTOPLAY_STEP_SECONDS: u64 = 3;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CardOrder {
    #[default]
    Sequential,
    Random,
}

/// Options for one study session. Out-of-range numeric values are corrected
/// to safe defaults when read, never rejected.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SessionConfig {
    pub order: CardOrder,
    /// Maximum number of cards to study; <= 0 means the full filtered set.
    pub limit: i64,
    /// Per-card countdown before the answer auto-reveals; <= 0 disables it.
    pub time_limit_seconds: i64,
    /// Exact-match category filter; `None`, "" and "all" match everything.
    pub category: Option<String>,
    /// Difficulty filter; empty matches everything.
    pub difficulty_filter: Vec<Difficulty>,
    /// Seconds between autoplay steps (reveal, then advance).
    pub autoplay_step_seconds: u64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        SessionConfig {
            order: CardOrder::Sequential,
            limit: 0,
            time_limit_seconds: 0,
            category: None,
            difficulty_filter: Vec::new(),
            autoplay_step_seconds: DEFAULT_AUTOPLAY_STEP_SECONDS,
        }
    }
}

impl SessionConfig {
    /// Number of cards the working set is truncated to, given the filtered size.
    pub fn effective_limit(&self, available: usize) -> usize {
        if self.limit <= 0 {
            available
        } else {
            (self.limit as usize).min(available)
        }
    }

    pub fn countdown_seconds(&self) -> Option<u64> {
        if self.time_limit_seconds > 0 {
            Some(self.time_limit_seconds as u64)
        } else {
            None
        }
    }

    pub fn autoplay_step_seconds(&self) -> u64 {
        self.autoplay_step_seconds.max(1)
    }

    fn category_filter(&self) -> Option<&str> {
        match self.category.as_deref() {
            None | Some("") | Some("all") => None,
            Some(category) => Some(category),
        }
    }

    /// Whether a card belongs in the working set under this configuration.
    pub fn matches(&self, card: &Card, stats: &CardStats) -> bool {
        if let Some(category) = self.category_filter() {
            if card.category.as_deref() != Some(category) {
                return false;
            }
        }

        if !self.difficulty_filter.is_empty()
            && !self.difficulty_filter.contains(&stats.difficulty)
        {
            return false;
        }

        true
    }
}
