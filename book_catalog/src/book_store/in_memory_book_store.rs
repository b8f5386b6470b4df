use crate::api::Book;
use crate::book_store::BookStore;
use crate::books_repository::BookRepositoryError;

/// Non persistent store, used with `BOOK_CATALOG_USE_IN_MEMORY_DB` and in tests
#[derive(Default)]
pub struct InMemoryBookStore {
    books: parking_lot::RwLock<Vec<Book>>,
}

impl InMemoryBookStore {
    pub fn with_books(books: Vec<Book>) -> Self {
        Self {
            books: parking_lot::RwLock::new(books),
        }
    }
}

#[async_trait::async_trait]
impl BookStore for InMemoryBookStore {
    async fn load(&self) -> Result<Vec<Book>, BookRepositoryError> {
        Ok(self.books.read().clone())
    }

    async fn save(&self, books: &[Book]) -> Result<(), BookRepositoryError> {
        *self.books.write() = books.to_vec();
        Ok(())
    }
}
