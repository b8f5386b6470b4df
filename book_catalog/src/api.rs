use paperclip::actix::Apiv2Schema;
use paperclip::v2::models::DataType;
use paperclip::v2::schema::TypedData;
use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize};

pub type BookId = String;

fn is_zero(number: &serde_json::Number) -> bool {
    number.as_f64() == Some(0.0)
}

/// Publication year, kept exactly as the client sent it
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(untagged)]
pub enum Year {
    Number(serde_json::Number),
    Text(String),
}

impl Year {
    /// Empty text counts as missing
    pub(crate) fn is_empty(&self) -> bool {
        matches!(self, Year::Text(text) if text.is_empty())
    }

    pub(crate) fn is_zero(&self) -> bool {
        matches!(self, Year::Number(number) if is_zero(number))
    }
}

impl From<i64> for Year {
    fn from(value: i64) -> Self {
        Year::Number(value.into())
    }
}

impl From<&str> for Year {
    fn from(value: &str) -> Self {
        Year::Text(value.to_string())
    }
}

impl TypedData for Year {
    fn data_type() -> DataType {
        DataType::String
    }
}

/// Number of copies in stock, any JSON number
#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq)]
#[serde(transparent)]
pub struct Copies(pub serde_json::Number);

impl Copies {
    pub(crate) fn is_zero(&self) -> bool {
        is_zero(&self.0)
    }
}

impl From<i64> for Copies {
    fn from(value: i64) -> Self {
        Copies(value.into())
    }
}

impl TypedData for Copies {
    fn data_type() -> DataType {
        DataType::Number
    }
}

/// Patch fields may be left out, but a field that is sent needs a value
fn present<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer)?
        .map(Some)
        .ok_or_else(|| D::Error::custom("null is not a valid value for a book field"))
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// A single catalog entry, identified by `book_id`
pub struct Book {
    pub book_id: BookId,
    pub title: String,
    pub author: String,
    pub genre: String,
    /// Either a number or a string
    pub year: Year,
    pub copies: Copies,
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Body of a create request. Every field is required, they are optional here
/// only so that a missing one is reported as a validation failure.
pub struct NewBook {
    pub book_id: Option<BookId>,
    pub title: Option<String>,
    pub author: Option<String>,
    pub genre: Option<String>,
    pub year: Option<Year>,
    pub copies: Option<Copies>,
}

impl From<Book> for NewBook {
    fn from(book: Book) -> Self {
        Self {
            book_id: Some(book.book_id),
            title: Some(book.title),
            author: Some(book.author),
            genre: Some(book.genre),
            year: Some(book.year),
            copies: Some(book.copies),
        }
    }
}

#[derive(Debug, Default, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
/// Partial update of a book, only fields that are set are overwritten.
/// A field sent as `null` is rejected, stored books always hold a value.
pub struct BookPatch {
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub genre: Option<String>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub year: Option<Year>,
    #[serde(default, deserialize_with = "present", skip_serializing_if = "Option::is_none")]
    pub copies: Option<Copies>,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct ErrorResponse {
    pub error: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, Eq, PartialEq, Apiv2Schema)]
pub struct MessageResponse {
    pub message: String,
}

#[cfg(test)]
mod api_tests {
    use serde_json::json;

    use crate::api::{Book, BookPatch, Copies, NewBook, Year};

    #[test]
    fn year_keeps_the_json_type_it_was_sent_with() {
        let numeric: Book = serde_json::from_value(json!({
            "book_id": "B1", "title": "T", "author": "A", "genre": "G", "year": 2020, "copies": 3
        }))
        .unwrap();
        assert_eq!(numeric.year, Year::from(2020));
        assert_eq!(serde_json::to_value(&numeric).unwrap()["year"], json!(2020));

        let textual: Book = serde_json::from_value(json!({
            "book_id": "B2", "title": "T", "author": "A", "genre": "G", "year": "c. 1600", "copies": 1
        }))
        .unwrap();
        assert_eq!(textual.year, Year::from("c. 1600"));
        assert_eq!(serde_json::to_value(&textual).unwrap()["year"], json!("c. 1600"));
    }

    #[test]
    fn fractional_numbers_are_kept_as_sent() {
        let book: Book = serde_json::from_value(json!({
            "book_id": "B1", "title": "T", "author": "A", "genre": "G", "year": 2020.0, "copies": 2.5
        }))
        .unwrap();
        let stored = serde_json::to_value(&book).unwrap();
        assert_eq!(stored["year"], json!(2020.0));
        assert_eq!(stored["copies"], json!(2.5));
        assert!(!book.copies.is_zero());
        assert!(Copies(serde_json::Number::from_f64(0.0).unwrap()).is_zero());
    }

    #[test]
    fn book_serializes_fields_in_declaration_order() {
        let book = Book {
            book_id: "B1".to_string(),
            title: "T".to_string(),
            author: "A".to_string(),
            genre: "G".to_string(),
            year: Year::from(2020),
            copies: Copies::from(3),
        };
        assert_eq!(
            serde_json::to_string(&book).unwrap(),
            r#"{"book_id":"B1","title":"T","author":"A","genre":"G","year":2020,"copies":3}"#
        );
    }

    #[test]
    fn new_book_accepts_missing_fields() {
        let new_book: NewBook = serde_json::from_value(json!({ "book_id": "B1" })).unwrap();
        assert_eq!(
            new_book,
            NewBook {
                book_id: Some("B1".to_string()),
                ..NewBook::default()
            }
        );
    }

    #[test]
    fn patch_ignores_book_id_and_missing_fields() {
        let patch: BookPatch =
            serde_json::from_value(json!({ "book_id": "other", "copies": 5 })).unwrap();
        assert_eq!(
            patch,
            BookPatch {
                copies: Some(Copies::from(5)),
                ..BookPatch::default()
            }
        );
        assert_eq!(serde_json::to_value(&patch).unwrap(), json!({ "copies": 5 }));
    }

    #[test]
    fn patch_rejects_null_fields() {
        let result = serde_json::from_value::<BookPatch>(json!({ "copies": 5, "title": null }));
        let err = result.expect_err("Null title accepted");
        assert!(err.to_string().contains("null is not a valid value"));
    }
}
