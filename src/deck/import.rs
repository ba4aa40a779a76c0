use std::{
    fs,
    path::Path,
};

use crate::core::{
    Card,
    Deck,
    FlashdeckError,
};

/// Builds a deck from CSV text. The header row is required; `question` and
/// `answer` columns are mandatory, `hint`, `category` and `image_url` are
/// picked up when present. Header matching is case-insensitive. Blank rows
/// are skipped.
pub fn deck_from_csv(name: &str, content: &str) -> Result<Deck, FlashdeckError> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .from_reader(content.as_bytes());

    let headers: Vec<String> =
        reader.headers()?.iter().map(|h| h.trim().to_lowercase()).collect();

    let question_col = column(&headers, "question").ok_or(FlashdeckError::MissingColumn("question"))?;
    let answer_col = column(&headers, "answer").ok_or(FlashdeckError::MissingColumn("answer"))?;
    let hint_col = column(&headers, "hint");
    let category_col = column(&headers, "category");
    let image_col = column(&headers, "image_url");

    let mut cards = Vec::new();
    for result in reader.records() {
        let record = result?;

        let question = field(&record, Some(question_col));
        let answer = field(&record, Some(answer_col));
        if question.is_none() && answer.is_none() {
            continue; // Blank row
        }

        cards.push(Card {
            question: question.unwrap_or_default(),
            answer: answer.unwrap_or_default(),
            hint: field(&record, hint_col),
            category: field(&record, category_col),
            image_url: field(&record, image_col),
        });
    }

    println!("Imported {} cards into deck '{}'", cards.len(), name);
    Ok(Deck::new(name, cards))
}

/// Imports a CSV file, naming the deck after the file stem.
pub fn import_csv_file(path: &Path) -> Result<Deck, FlashdeckError> {
    let name = path
        .file_stem()
        .map(|stem| stem.to_string_lossy().to_string())
        .ok_or_else(|| FlashdeckError::Custom(format!("Not a file: {}", path.display())))?;

    let content = fs::read_to_string(path)?;
    deck_from_csv(&name, &content)
}

fn column(headers: &[String], name: &str) -> Option<usize> {
    headers.iter().position(|header| header == name)
}

fn field(record: &csv::StringRecord, column: Option<usize>) -> Option<String> {
    column
        .and_then(|index| record.get(index))
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}
