pub mod core;
pub mod deck;
pub mod persistence;
pub mod session;

pub use crate::core::{
    Card,
    CardStats,
    Deck,
    Difficulty,
    FlashdeckError,
};
pub use deck::{
    DeckLibrary,
    DeckRepository,
};
pub use session::{
    CardOrder,
    MarkKind,
    SessionConfig,
    SessionSummary,
    StudySession,
};
