use std::collections::HashMap;

use chrono::{
    DateTime,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub image_url: Option<String>, // Shown on the question face when present
    #[serde(default)]
    pub hint: Option<String>,
    #[serde(default)]
    pub category: Option<String>, // Free-form tag, exact-match filtering
}

impl Card {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Card {
            question: question.into(),
            answer: answer.into(),
            image_url: None,
            hint: None,
            category: None,
        }
    }

    pub fn with_category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Difficulty {
    #[default]
    Neutral,
    Easy,
    Difficult,
}

/// Lifetime counters for one card, keyed by its position in the owning deck.
/// Counters only ever go up; `difficulty` is the three-valued toggle state.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardStats {
    pub viewed: u32,
    pub correct: u32,
    pub incorrect: u32,
    #[serde(default)]
    pub difficulty: Difficulty,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<Card>,
    #[serde(default)]
    pub stats: HashMap<usize, CardStats>, // Sparse; missing entries read as default
    #[serde(default)]
    pub last_studied: Option<DateTime<Utc>>,
}

impl Deck {
    pub fn new(name: impl Into<String>, cards: Vec<Card>) -> Self {
        Deck { name: name.into(), cards, stats: HashMap::new(), last_studied: None }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    /// Stats for the card at `original_index`, defaulting lazily so callers
    /// never see a missing entry.
    pub fn card_stats(&self, original_index: usize) -> CardStats {
        self.stats.get(&original_index).copied().unwrap_or_default()
    }

    /// Distinct non-empty category tags, sorted. Computed on demand, not stored.
    pub fn categories(&self) -> Vec<String> {
        let mut categories: Vec<String> = self
            .cards
            .iter()
            .filter_map(|card| card.category.as_deref())
            .filter(|category| !category.is_empty())
            .map(|category| category.to_string())
            .collect();
        categories.sort();
        categories.dedup();
        categories
    }
}
