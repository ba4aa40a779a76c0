use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlashdeckError {
    #[error("I/O error: {0}")]
    Io(Box<std::io::Error>),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("CSV error: {0}")]
    Csv(Box<csv::Error>),

    #[error("No cards match the selected filters")]
    EmptySelection,

    #[error("Invalid session state: {0}")]
    InvalidState(&'static str),

    #[error("Deck not found: {0}")]
    DeckNotFound(String),

    #[error("A deck named '{0}' already exists")]
    DuplicateDeck(String),

    #[error("CSV is missing required column: {0}")]
    MissingColumn(&'static str),

    #[error("FlashdeckError: {0}")]
    Custom(String),
}

impl From<std::io::Error> for FlashdeckError {
    fn from(error: std::io::Error) -> Self {
        FlashdeckError::Io(Box::new(error))
    }
}

impl From<csv::Error> for FlashdeckError {
    fn from(error: csv::Error) -> Self {
        FlashdeckError::Csv(Box::new(error))
    }
}
