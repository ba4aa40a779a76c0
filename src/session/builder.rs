use rand::{
    rng,
    seq::SliceRandom,
};

use super::config::{
    CardOrder,
    SessionConfig,
};
use crate::core::{
    Card,
    Deck,
    FlashdeckError,
};

/// A card paired with its position in the owning deck. The original index is
/// the stable stats key; it survives shuffling and truncation.
#[derive(Debug, Clone, PartialEq)]
pub struct WorkingCard {
    pub card: Card,
    pub original_index: usize,
}

/// Builds the ordered, filtered, size-limited working set for one session.
/// Read-only with respect to the deck.
pub fn build_working_set(
    deck: &Deck,
    config: &SessionConfig,
) -> Result<Vec<WorkingCard>, FlashdeckError> {
    let mut working_set: Vec<WorkingCard> = deck
        .cards
        .iter()
        .enumerate()
        .filter(|(index, card)| config.matches(card, &deck.card_stats(*index)))
        .map(|(index, card)| WorkingCard { card: card.clone(), original_index: index })
        .collect();

    if working_set.is_empty() {
        return Err(FlashdeckError::EmptySelection);
    }

    // Shuffle the whole filtered set before truncating, so a limited random
    // session draws uniformly from everything that matched.
    if config.order == CardOrder::Random {
        working_set.shuffle(&mut rng());
    }

    working_set.truncate(config.effective_limit(working_set.len()));

    Ok(working_set)
}

#[cfg(test)]
mod tests {
    use std::collections::HashSet;

    use super::*;
    use crate::core::{
        CardStats,
        Difficulty,
    };

    fn deck_of(questions: &[&str]) -> Deck {
        let cards = questions.iter().map(|q| Card::new(*q, format!("{}-answer", q))).collect();
        Deck::new("test", cards)
    }

    #[test]
    fn sequential_order_is_a_prefix_preserving_deck_order() {
        let deck = deck_of(&["a", "b", "c", "d", "e"]);
        let config = SessionConfig { limit: 3, ..SessionConfig::default() };

        let working_set = build_working_set(&deck, &config).unwrap();

        let questions: Vec<&str> =
            working_set.iter().map(|w| w.card.question.as_str()).collect();
        assert_eq!(questions, vec!["a", "b", "c"]);
        let indices: Vec<usize> = working_set.iter().map(|w| w.original_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[test]
    fn random_order_is_a_permutation_of_the_filtered_set() {
        let deck = deck_of(&["a", "b", "c", "d", "e"]);
        let config = SessionConfig { order: CardOrder::Random, ..SessionConfig::default() };

        let working_set = build_working_set(&deck, &config).unwrap();

        assert_eq!(working_set.len(), 5);
        let indices: HashSet<usize> = working_set.iter().map(|w| w.original_index).collect();
        assert_eq!(indices, (0..5).collect::<HashSet<usize>>());
    }

    #[test]
    fn working_set_length_follows_the_limit_law() {
        let deck = deck_of(&["a", "b", "c", "d", "e"]);

        for limit in [-1, 0, 2, 5, 50] {
            let config = SessionConfig { limit, ..SessionConfig::default() };
            let working_set = build_working_set(&deck, &config).unwrap();
            let expected = if limit <= 0 { 5 } else { (limit as usize).min(5) };
            assert_eq!(working_set.len(), expected, "limit {}", limit);
        }
    }

    #[test]
    fn category_filter_keeps_only_matching_cards() {
        // Scenario A: 3 cards, one tagged "Math", limit larger than the deck.
        let mut deck = deck_of(&["a", "b", "c"]);
        deck.cards[1].category = Some("Math".to_string());
        let config = SessionConfig {
            category: Some("Math".to_string()),
            limit: 10,
            ..SessionConfig::default()
        };

        let working_set = build_working_set(&deck, &config).unwrap();

        assert_eq!(working_set.len(), 1);
        assert_eq!(working_set[0].original_index, 1);
        assert_eq!(working_set[0].card.question, "b");
    }

    #[test]
    fn random_limited_draw_has_no_duplicates() {
        // Scenario B: 5 cards, random order, limit 2.
        let deck = deck_of(&["a", "b", "c", "d", "e"]);
        let config =
            SessionConfig { order: CardOrder::Random, limit: 2, ..SessionConfig::default() };

        let working_set = build_working_set(&deck, &config).unwrap();

        assert_eq!(working_set.len(), 2);
        let indices: HashSet<usize> = working_set.iter().map(|w| w.original_index).collect();
        assert_eq!(indices.len(), 2);
        assert!(indices.iter().all(|&i| i < 5));
    }

    #[test]
    fn empty_selection_is_an_error() {
        // Scenario C: no card carries the requested category.
        let deck = deck_of(&["a", "b"]);
        let config =
            SessionConfig { category: Some("History".to_string()), ..SessionConfig::default() };

        match build_working_set(&deck, &config) {
            Err(FlashdeckError::EmptySelection) => {}
            other => panic!("Expected EmptySelection, got {:?}", other),
        }
    }

    #[test]
    fn difficulty_filter_uses_persistent_stats() {
        let mut deck = deck_of(&["a", "b", "c"]);
        deck.stats.insert(
            1,
            CardStats { difficulty: Difficulty::Difficult, ..CardStats::default() },
        );

        let config = SessionConfig {
            difficulty_filter: vec![Difficulty::Difficult],
            ..SessionConfig::default()
        };

        let working_set = build_working_set(&deck, &config).unwrap();
        assert_eq!(working_set.len(), 1);
        assert_eq!(working_set[0].original_index, 1);
    }
}
