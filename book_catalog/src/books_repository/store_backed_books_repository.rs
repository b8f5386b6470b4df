use serde_json::json;

use crate::api::{Book, BookPatch, NewBook};
use crate::book_store::BookStore;
use crate::books_repository::{BookRepository, BookRepositoryError, ValidationMode};

/// Repository that loads the whole collection from its store for every call
/// and writes the whole collection back after every change.
///
/// Changes are serialized by `write_lock`, so two concurrent writers can not
/// both start from the same collection and overwrite each other. Reads skip the
/// lock and rely on the store replacing its content atomically.
pub struct StoreBackedBookRepository<S> {
    store: S,
    validation_mode: ValidationMode,
    write_lock: tokio::sync::Mutex<()>,
}

impl<S: BookStore> StoreBackedBookRepository<S> {
    pub fn new(store: S, validation_mode: ValidationMode) -> Self {
        Self {
            store,
            validation_mode,
            write_lock: Default::default(),
        }
    }

    pub fn store(&self) -> &S {
        &self.store
    }
}

fn position_of(books: &[Book], book_id: &str) -> Result<usize, BookRepositoryError> {
    books
        .iter()
        .position(|book| book.book_id == book_id)
        .ok_or_else(|| BookRepositoryError::NotFound(book_id.to_string()))
}

#[async_trait::async_trait]
impl<S: BookStore> BookRepository for StoreBackedBookRepository<S> {
    #[tracing::instrument(skip(self, new_book), fields(book_id = ?new_book.book_id))]
    async fn create_book(&self, new_book: NewBook) -> Result<Book, BookRepositoryError> {
        let book = self.validation_mode.validate(new_book)?;

        let _guard = self.write_lock.lock().await;
        let mut books = self.store.load().await?;
        if books.iter().any(|existing| existing.book_id == book.book_id) {
            return Err(BookRepositoryError::DuplicateId(book.book_id));
        }
        books.push(book.clone());
        self.store.save(&books).await?;

        tracing::info!("Book created, {} books in store", books.len());
        Ok(book)
    }

    #[tracing::instrument(skip(self))]
    async fn list_books(&self) -> Result<Vec<Book>, BookRepositoryError> {
        self.store.load().await
    }

    #[tracing::instrument(skip(self))]
    async fn get_book(&self, book_id: &str) -> Result<Book, BookRepositoryError> {
        let mut books = self.store.load().await?;
        let index = position_of(&books, book_id)?;
        Ok(books.swap_remove(index))
    }

    #[tracing::instrument(skip(self))]
    async fn update_book(
        &self,
        book_id: &str,
        patch: BookPatch,
    ) -> Result<Book, BookRepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut books = self.store.load().await?;
        let index = position_of(&books, book_id)?;

        // no validation here, a patch may blank out any field
        let mut merged = json!(books[index]);
        json_patch::merge(&mut merged, &json!(patch));
        books[index] = serde_json::from_value(merged)?;
        self.store.save(&books).await?;

        tracing::info!("Book updated");
        Ok(books.swap_remove(index))
    }

    #[tracing::instrument(skip(self))]
    async fn delete_book(&self, book_id: &str) -> Result<(), BookRepositoryError> {
        let _guard = self.write_lock.lock().await;
        let mut books = self.store.load().await?;
        let index = position_of(&books, book_id)?;
        books.remove(index);
        self.store.save(&books).await?;

        tracing::info!("Book deleted, {} books left", books.len());
        Ok(())
    }
}
