use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use time::OffsetDateTime;

/// Store-assigned book identifier.
pub type BookId = i64;

/// A persisted book record.
#[derive(Debug, Clone, PartialEq, Serialize, sqlx::FromRow)]
pub struct Book {
    /// Unique identifier assigned by the store
    pub id: BookId,
    /// Title of the book
    pub title: String,
    /// Author of the book
    pub author: String,
    pub isbn: String,
    /// Publication year
    pub year: i32,
    /// Price, never negative
    #[serde(with = "rust_decimal::serde::float")]
    pub price: Decimal,
    /// Set once at insertion
    #[serde(with = "time::serde::rfc3339")]
    pub created_at: OffsetDateTime,
    /// Refreshed on every successful mutation
    #[serde(with = "time::serde::rfc3339")]
    pub updated_at: OffsetDateTime,
}

/// Payload accepted by create and replace.
///
/// Title and author must be present; the remaining fields fall back to their
/// zero values. Store-owned fields (`id`, timestamps) are ignored if sent.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct BookInput {
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub isbn: String,
    #[serde(default)]
    pub year: i32,
    #[serde(default, with = "rust_decimal::serde::float")]
    pub price: Decimal,
}

impl Book {
    /// Case-insensitive substring match on title or author.
    pub fn matches(&self, needle: &str) -> bool {
        let needle = needle.to_lowercase();
        self.title.to_lowercase().contains(&needle) || self.author.to_lowercase().contains(&needle)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use time::macros::datetime;

    fn dune() -> Book {
        Book {
            id: 1,
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            isbn: "001".to_string(),
            year: 1965,
            price: Decimal::new(999, 2),
            created_at: datetime!(2024-05-01 10:00 UTC),
            updated_at: datetime!(2024-05-01 10:00 UTC),
        }
    }

    #[test]
    fn book_serializes_with_numeric_price_and_rfc3339_timestamps() {
        let value = serde_json::to_value(dune()).unwrap();
        assert_eq!(value["id"], 1);
        assert_eq!(value["price"].as_f64(), Some(9.99));
        assert_eq!(value["created_at"], "2024-05-01T10:00:00Z");
        assert_eq!(value["updated_at"], "2024-05-01T10:00:00Z");
    }

    #[test]
    fn input_requires_title_and_author() {
        let missing_author = json!({ "title": "Dune" });
        assert!(serde_json::from_value::<BookInput>(missing_author).is_err());

        let minimal: BookInput =
            serde_json::from_value(json!({ "title": "Dune", "author": "Herbert" })).unwrap();
        assert_eq!(minimal.isbn, "");
        assert_eq!(minimal.year, 0);
        assert_eq!(minimal.price, Decimal::ZERO);
    }

    #[test]
    fn input_ignores_store_owned_fields() {
        let input: BookInput = serde_json::from_value(json!({
            "id": 42,
            "title": "Dune",
            "author": "Herbert",
            "price": 12.5,
            "created_at": "2024-05-01T10:00:00Z"
        }))
        .unwrap();
        assert_eq!(input.price, Decimal::new(125, 1));
    }

    #[test]
    fn matches_title_or_author_ignoring_case() {
        let book = dune();
        assert!(book.matches("DUNE"));
        assert!(book.matches("herb"));
        assert!(!book.matches("asimov"));
    }
}
