use chrono::{
    DateTime,
    Utc,
};
use serde::Serialize;

use super::{
    builder::WorkingCard,
    config::SessionConfig,
    stats::StatsTracker,
};
use crate::core::{
    CardStats,
    Difficulty,
};

/// One row of the end-of-session breakdown, in working-set display order.
#[derive(Debug, Clone, Serialize)]
pub struct CardResult {
    pub question: String,
    pub answer: String,
    pub marked_correct: bool,
    pub marked_incorrect: bool,
    pub difficulty: Difficulty,
    pub stats: CardStats, // Cumulative across all sessions, not just this one
}

#[derive(Debug, Clone, Serialize)]
pub struct SessionSummary {
    pub deck_name: String,
    pub cards_studied: usize,
    pub correct: u32,
    pub incorrect: u32,
    pub elapsed_seconds: i64,
    pub config: SessionConfig,
    pub cards: Vec<CardResult>,
    /// False when the repository rejected the post-session save; the
    /// in-memory results above are still complete.
    pub stats_saved: bool,
}

/// Computes the summary at the moment the session finishes. Totals come from
/// the session interaction flags; the per-card rows carry the cumulative
/// counters alongside them.
pub(crate) fn summarize(
    deck_name: &str,
    config: &SessionConfig,
    working_set: &[WorkingCard],
    tracker: &StatsTracker,
    start_time: DateTime<Utc>,
) -> SessionSummary {
    let (correct, incorrect) = tracker.session_totals();

    let cards = working_set
        .iter()
        .map(|working_card| {
            let interaction = tracker.interaction(working_card.original_index);
            let stats = tracker.stats(working_card.original_index);
            CardResult {
                question: working_card.card.question.clone(),
                answer: working_card.card.answer.clone(),
                marked_correct: interaction.marked_correct,
                marked_incorrect: interaction.marked_incorrect,
                difficulty: stats.difficulty,
                stats,
            }
        })
        .collect();

    SessionSummary {
        deck_name: deck_name.to_string(),
        cards_studied: working_set.len(),
        correct,
        incorrect,
        elapsed_seconds: (Utc::now() - start_time).num_seconds().max(0),
        config: config.clone(),
        cards,
        stats_saved: false,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        core::{
            Card,
            Deck,
        },
        session::stats::MarkKind,
    };

    #[test]
    fn totals_count_session_flags_not_lifetime_counters() {
        let mut deck = Deck::new("quiz", vec![Card::new("q1", "a1"), Card::new("q2", "a2")]);
        // Lifetime history from earlier sessions must not leak into totals.
        deck.stats.insert(0, CardStats { correct: 7, incorrect: 4, ..CardStats::default() });

        let working_set: Vec<WorkingCard> = deck
            .cards
            .iter()
            .cloned()
            .enumerate()
            .map(|(original_index, card)| WorkingCard { card, original_index })
            .collect();

        let mut tracker = StatsTracker::new(&deck, &working_set);
        tracker.record_mark(0, MarkKind::Correct);
        tracker.record_mark(1, MarkKind::Incorrect);

        let summary = summarize(
            "quiz",
            &SessionConfig::default(),
            &working_set,
            &tracker,
            Utc::now(),
        );

        assert_eq!(summary.cards_studied, 2);
        assert_eq!(summary.correct, 1);
        assert_eq!(summary.incorrect, 1);
        assert_eq!(summary.cards.len(), 2);

        assert!(summary.cards[0].marked_correct);
        assert_eq!(summary.cards[0].stats.correct, 8);
        assert!(summary.cards[1].marked_incorrect);
        assert!(summary.elapsed_seconds >= 0);
    }

    #[test]
    fn breakdown_preserves_display_order() {
        let deck = Deck::new("quiz", vec![Card::new("q1", "a1"), Card::new("q2", "a2")]);
        // Reversed working set, as a random session could produce.
        let working_set = vec![
            WorkingCard { card: deck.cards[1].clone(), original_index: 1 },
            WorkingCard { card: deck.cards[0].clone(), original_index: 0 },
        ];
        let tracker = StatsTracker::new(&deck, &working_set);

        let summary = summarize(
            "quiz",
            &SessionConfig::default(),
            &working_set,
            &tracker,
            Utc::now(),
        );

        assert_eq!(summary.cards[0].question, "q2");
        assert_eq!(summary.cards[1].question, "q1");
    }
}
