use std::{
    collections::HashMap,
    path::PathBuf,
};

use chrono::Utc;
use serde::{
    Deserialize,
    Serialize,
};

use super::DeckRepository;
use crate::{
    core::{
        CardStats,
        Deck,
        FlashdeckError,
    },
    persistence,
};

const LIBRARY_FILE: &str = "decks.json";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct LibraryData {
    decks: HashMap<String, Deck>,
}

/// The local deck store: every named deck plus its per-card stats, persisted
/// as one JSON file under the app data dir. Stat updates accumulate in
/// memory and hit disk on session completion; a crash in between loses them
/// (accepted, matching the original's save-at-end behavior).
#[derive(Debug)]
pub struct DeckLibrary {
    data: LibraryData,
    file_path: Option<PathBuf>,
}

impl DeckLibrary {
    /// Loads the library from the default location, falling back to an
    /// empty one when the file is missing or unreadable.
    pub fn load() -> Self {
        Self::load_from(persistence::get_data_file_path(LIBRARY_FILE))
    }

    pub fn load_from(file_path: PathBuf) -> Self {
        let data = persistence::load_json_or_default(&file_path);
        DeckLibrary { data, file_path: Some(file_path) }
    }

    /// A library that never touches disk. Backs tests and throwaway runs.
    pub fn in_memory() -> Self {
        DeckLibrary { data: LibraryData::default(), file_path: None }
    }

    pub fn save(&self) -> Result<(), FlashdeckError> {
        match &self.file_path {
            Some(path) => persistence::save_json(&self.data, path),
            None => Ok(()),
        }
    }

    fn persist(&self) -> bool {
        match self.save() {
            Ok(()) => true,
            Err(e) => {
                eprintln!("Failed to save deck library: {}", e);
                false
            }
        }
    }

    pub fn deck_names(&self) -> Vec<String> {
        let mut names: Vec<String> = self.data.decks.keys().cloned().collect();
        names.sort();
        names
    }

    pub fn deck_exists(&self, name: &str) -> bool {
        self.data.decks.contains_key(name)
    }

    pub fn deck(&self, name: &str) -> Option<&Deck> {
        self.data.decks.get(name)
    }

    /// Inserts or replaces a deck under its own name.
    pub fn add_deck(&mut self, deck: Deck) -> Result<(), FlashdeckError> {
        self.data.decks.insert(deck.name.clone(), deck);
        self.save()
    }

    pub fn delete_deck(&mut self, name: &str) -> Result<(), FlashdeckError> {
        self.data
            .decks
            .remove(name)
            .ok_or_else(|| FlashdeckError::DeckNotFound(name.to_string()))?;
        self.save()
    }

    pub fn rename_deck(&mut self, old_name: &str, new_name: &str) -> Result<(), FlashdeckError> {
        if self.deck_exists(new_name) {
            return Err(FlashdeckError::DuplicateDeck(new_name.to_string()));
        }

        let mut deck = self
            .data
            .decks
            .remove(old_name)
            .ok_or_else(|| FlashdeckError::DeckNotFound(old_name.to_string()))?;
        deck.name = new_name.to_string();
        self.data.decks.insert(new_name.to_string(), deck);
        self.save()
    }

    /// Appends the source deck's cards to the target and deletes the source.
    /// Source stats keys are remapped past the target's card count so they
    /// keep following their cards.
    pub fn merge_decks(&mut self, source: &str, target: &str) -> Result<(), FlashdeckError> {
        if source == target {
            return Err(FlashdeckError::Custom(
                "Cannot merge a deck into itself".to_string(),
            ));
        }
        if !self.deck_exists(target) {
            return Err(FlashdeckError::DeckNotFound(target.to_string()));
        }
        let source_deck = self
            .data
            .decks
            .remove(source)
            .ok_or_else(|| FlashdeckError::DeckNotFound(source.to_string()))?;

        let target_deck = match self.data.decks.get_mut(target) {
            Some(deck) => deck,
            None => return Err(FlashdeckError::DeckNotFound(target.to_string())),
        };

        let offset = target_deck.cards.len();
        target_deck.cards.extend(source_deck.cards);
        for (index, stats) in source_deck.stats {
            target_deck.stats.insert(index + offset, stats);
        }

        self.save()
    }
}

impl DeckRepository for DeckLibrary {
    fn get_deck(&self, name: &str) -> Option<Deck> {
        self.data.decks.get(name).cloned()
    }

    fn update_card_stats(
        &mut self,
        deck_name: &str,
        original_index: usize,
        stats: &CardStats,
    ) -> bool {
        let deck = match self.data.decks.get_mut(deck_name) {
            Some(deck) => deck,
            None => return false,
        };
        if original_index >= deck.cards.len() {
            return false;
        }

        deck.stats.insert(original_index, *stats);
        true
    }

    fn save_session_completion(&mut self, deck_name: &str) -> bool {
        let deck = match self.data.decks.get_mut(deck_name) {
            Some(deck) => deck,
            None => return false,
        };
        deck.last_studied = Some(Utc::now());
        self.persist()
    }
}
