pub use store_backed_books_repository::StoreBackedBookRepository;

use serde::Deserialize;

use crate::api::{Book, BookId, BookPatch, NewBook};

mod store_backed_books_repository;

#[derive(thiserror::Error, Debug)]
pub enum BookRepositoryError {
    #[error("All fields are required")]
    Validation,

    #[error("Book {0} already exists")]
    DuplicateId(BookId),

    #[error("Book {0} not found")]
    NotFound(BookId),

    #[error("Book store unavailable: {0}")]
    StorageUnavailable(#[from] std::io::Error),

    #[error("Book store contains corrupt data: {0}")]
    CorruptData(#[from] serde_json::Error),
}

/// How strictly `create_book` decides that a required field is missing
#[derive(Debug, Default, Clone, Copy, Eq, PartialEq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// Absent, null and empty strings are missing, zero is a real value
    #[default]
    Presence,
    /// Also treats zero `copies` or `year` as missing
    Falsy,
}

impl ValidationMode {
    /// Turns a create request into a book, or fails if any field is missing
    pub fn validate(&self, new_book: NewBook) -> Result<Book, BookRepositoryError> {
        let NewBook {
            book_id: Some(book_id),
            title: Some(title),
            author: Some(author),
            genre: Some(genre),
            year: Some(year),
            copies: Some(copies),
        } = new_book
        else {
            return Err(BookRepositoryError::Validation);
        };

        let any_empty = [&book_id, &title, &author, &genre]
            .iter()
            .any(|field| field.is_empty())
            || year.is_empty();
        let any_zero = copies.is_zero() || year.is_zero();

        if any_empty || (*self == ValidationMode::Falsy && any_zero) {
            return Err(BookRepositoryError::Validation);
        }

        Ok(Book {
            book_id,
            title,
            author,
            genre,
            year,
            copies,
        })
    }
}

#[async_trait::async_trait]
pub trait BookRepository: Send + Sync {
    /// Validates and appends a new book, fails if its id is already taken
    async fn create_book(&self, new_book: NewBook) -> Result<Book, BookRepositoryError>;
    /// Lists all books in insertion order
    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError>;
    /// Retrieves the book with exactly this id
    async fn get_book(&self, book_id: &str) -> Result<Book, BookRepositoryError>;
    /// Overwrites the fields set in the patch, returns the updated book
    async fn update_book(
        &self,
        book_id: &str,
        patch: BookPatch,
    ) -> Result<Book, BookRepositoryError>;
    /// Removes the book with this id
    async fn delete_book(&self, book_id: &str) -> Result<(), BookRepositoryError>;
}
