pub mod import;
pub mod library;

pub use import::{
    deck_from_csv,
    import_csv_file,
};
pub use library::DeckLibrary;

use crate::core::{
    CardStats,
    Deck,
};

/// The deck store as the session engine sees it. Sessions only read decks
/// and write back per-card stats; everything else the store does (import,
/// rename, merge) is its own business.
pub trait DeckRepository {
    fn get_deck(&self, name: &str) -> Option<Deck>;

    /// Persists the stats for one card, keyed by original index. Returns
    /// false when the deck or the backing store is unavailable.
    fn update_card_stats(&mut self, deck_name: &str, original_index: usize, stats: &CardStats)
        -> bool;

    /// Called once per finished session; stamps the deck and flushes.
    fn save_session_completion(&mut self, deck_name: &str) -> bool;
}
