use std::collections::HashMap;

use super::builder::WorkingCard;
use crate::core::{
    CardStats,
    Deck,
    Difficulty,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkKind {
    Correct,
    Incorrect,
    Easy,
    Difficult,
}

/// Session-scoped verdict for one card. The flags are mutually exclusive:
/// the later of correct/incorrect wins, the persistent counters keep both.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SessionInteraction {
    pub marked_correct: bool,
    pub marked_incorrect: bool,
}

/// Tracks persistent per-card stats and the session's interaction flags.
/// Keys are original deck indices throughout.
#[derive(Debug)]
pub struct StatsTracker {
    stats: HashMap<usize, CardStats>,
    interactions: HashMap<usize, SessionInteraction>,
}

impl StatsTracker {
    /// Seeds persistent stats from the deck and an interaction entry for
    /// every working-set card, before anything is displayed.
    pub fn new(deck: &Deck, working_set: &[WorkingCard]) -> Self {
        let mut interactions = HashMap::new();
        for working_card in working_set {
            interactions.insert(working_card.original_index, SessionInteraction::default());
        }

        StatsTracker { stats: deck.stats.clone(), interactions }
    }

    pub fn stats(&self, original_index: usize) -> CardStats {
        self.stats.get(&original_index).copied().unwrap_or_default()
    }

    pub fn interaction(&self, original_index: usize) -> SessionInteraction {
        self.interactions.get(&original_index).copied().unwrap_or_default()
    }

    pub fn stats_map(&self) -> &HashMap<usize, CardStats> {
        &self.stats
    }

    /// Raw display counter: bumped every time a card is shown, including
    /// re-displays via previous/next.
    pub fn record_view(&mut self, original_index: usize) {
        self.stats.entry(original_index).or_default().viewed += 1;
    }

    pub fn record_mark(&mut self, original_index: usize, kind: MarkKind) {
        match kind {
            MarkKind::Correct => self.record_verdict(original_index, true),
            MarkKind::Incorrect => self.record_verdict(original_index, false),
            MarkKind::Easy => self.toggle_difficulty(original_index, Difficulty::Easy),
            MarkKind::Difficult => self.toggle_difficulty(original_index, Difficulty::Difficult),
        }
    }

    /// Correct/incorrect marking. Re-marking the same kind is a no-op;
    /// switching kinds flips the session flags and bumps the new counter
    /// without decrementing the old one.
    fn record_verdict(&mut self, original_index: usize, correct: bool) {
        let interaction = self.interactions.entry(original_index).or_default();
        let stats = self.stats.entry(original_index).or_default();

        if correct {
            if !interaction.marked_correct {
                stats.correct += 1;
                interaction.marked_correct = true;
            }
            interaction.marked_incorrect = false;
        } else {
            if !interaction.marked_incorrect {
                stats.incorrect += 1;
                interaction.marked_incorrect = true;
            }
            interaction.marked_correct = false;
        }
    }

    /// Easy/difficult are a persistent toggle pair: marking the current value
    /// resets to neutral, marking the other value replaces it.
    fn toggle_difficulty(&mut self, original_index: usize, difficulty: Difficulty) {
        let stats = self.stats.entry(original_index).or_default();
        stats.difficulty =
            if stats.difficulty == difficulty { Difficulty::Neutral } else { difficulty };
    }

    /// Session totals, counted from the interaction flags rather than the
    /// cumulative counters.
    pub fn session_totals(&self) -> (u32, u32) {
        let correct =
            self.interactions.values().filter(|interaction| interaction.marked_correct).count();
        let incorrect =
            self.interactions.values().filter(|interaction| interaction.marked_incorrect).count();
        (correct as u32, incorrect as u32)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::Card;

    fn tracker() -> StatsTracker {
        let deck = Deck::new("test", vec![Card::new("q", "a")]);
        let working_set =
            vec![WorkingCard { card: deck.cards[0].clone(), original_index: 0 }];
        StatsTracker::new(&deck, &working_set)
    }

    #[test]
    fn views_count_every_display() {
        let mut tracker = tracker();
        tracker.record_view(0);
        tracker.record_view(0);
        tracker.record_view(0);
        assert_eq!(tracker.stats(0).viewed, 3);
    }

    #[test]
    fn remarking_the_same_kind_is_idempotent() {
        let mut tracker = tracker();
        tracker.record_mark(0, MarkKind::Correct);
        tracker.record_mark(0, MarkKind::Correct);

        assert_eq!(tracker.stats(0).correct, 1);
        assert!(tracker.interaction(0).marked_correct);
        assert!(!tracker.interaction(0).marked_incorrect);
    }

    #[test]
    fn switching_verdict_flips_flags_and_keeps_counters_monotonic() {
        // Scenario D: correct then incorrect on the same displayed card.
        let mut tracker = tracker();
        tracker.record_mark(0, MarkKind::Correct);
        tracker.record_mark(0, MarkKind::Incorrect);

        let interaction = tracker.interaction(0);
        assert!(interaction.marked_incorrect);
        assert!(!interaction.marked_correct);

        // The earlier correct mark stays in the audit counters.
        let stats = tracker.stats(0);
        assert_eq!(stats.correct, 1);
        assert_eq!(stats.incorrect, 1);

        assert_eq!(tracker.session_totals(), (0, 1));
    }

    #[test]
    fn easy_twice_returns_to_neutral() {
        let mut tracker = tracker();
        tracker.record_mark(0, MarkKind::Easy);
        assert_eq!(tracker.stats(0).difficulty, Difficulty::Easy);

        tracker.record_mark(0, MarkKind::Easy);
        assert_eq!(tracker.stats(0).difficulty, Difficulty::Neutral);
    }

    #[test]
    fn easy_then_difficult_leaves_difficult_only() {
        let mut tracker = tracker();
        tracker.record_mark(0, MarkKind::Easy);
        tracker.record_mark(0, MarkKind::Difficult);
        assert_eq!(tracker.stats(0).difficulty, Difficulty::Difficult);
    }

    #[test]
    fn difficulty_toggle_is_independent_of_session_flags() {
        let mut tracker = tracker();
        tracker.record_mark(0, MarkKind::Correct);
        tracker.record_mark(0, MarkKind::Difficult);

        assert!(tracker.interaction(0).marked_correct);
        assert_eq!(tracker.stats(0).difficulty, Difficulty::Difficult);
        assert_eq!(tracker.stats(0).correct, 1);
    }
}
