pub use in_memory_book_store::InMemoryBookStore;
pub use json_file_book_store::JsonFileBookStore;

use crate::api::Book;
use crate::books_repository::BookRepositoryError;

mod in_memory_book_store;
mod json_file_book_store;

/// Durable home of the whole book collection, always loaded and saved as one unit
#[async_trait::async_trait]
pub trait BookStore: Send + Sync {
    /// Reads every stored book, in the order they were saved
    async fn load(&self) -> Result<Vec<Book>, BookRepositoryError>;
    /// Replaces the stored collection with `books`
    async fn save(&self, books: &[Book]) -> Result<(), BookRepositoryError>;
}
