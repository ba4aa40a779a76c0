pub mod errors;
pub mod models;

pub use errors::FlashdeckError;
pub use models::{ Card, CardStats, Deck, Difficulty };
