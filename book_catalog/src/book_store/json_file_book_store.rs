use std::ffi::OsString;
use std::path::{Path, PathBuf};

use anyhow::Context;

use crate::api::Book;
use crate::book_store::BookStore;
use crate::books_repository::BookRepositoryError;

/// Keeps the collection as a pretty printed JSON array in a single file
pub struct JsonFileBookStore {
    path: PathBuf,
}

impl JsonFileBookStore {
    /// Opens the store at `path`, creating it as an empty array if it does not exist yet
    pub async fn init(path: impl Into<PathBuf>) -> anyhow::Result<Self> {
        let path = path.into();
        tracing::info!("Book store path: {}", path.display());

        let exists = tokio::fs::try_exists(&path)
            .await
            .with_context(|| format!("Failed to check {}", path.display()))?;
        if !exists {
            if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                tokio::fs::create_dir_all(parent)
                    .await
                    .context("Failed to create book store directory")?;
            }
            tokio::fs::write(&path, b"[]")
                .await
                .context("Failed to create empty book store")?;
            tracing::info!("Created empty book store");
        }

        Ok(Self { path })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temporary_path(&self) -> PathBuf {
        let mut temporary: OsString = self.path.clone().into_os_string();
        temporary.push(".tmp");
        PathBuf::from(temporary)
    }
}

#[async_trait::async_trait]
impl BookStore for JsonFileBookStore {
    async fn load(&self) -> Result<Vec<Book>, BookRepositoryError> {
        let content = tokio::fs::read(&self.path).await?;
        Ok(serde_json::from_slice(&content)?)
    }

    async fn save(&self, books: &[Book]) -> Result<(), BookRepositoryError> {
        let content = serde_json::to_vec_pretty(books)?;
        // rename replaces the store in one step, readers see either the old or the new file
        let temporary_path = self.temporary_path();
        tokio::fs::write(&temporary_path, content).await?;
        tokio::fs::rename(&temporary_path, &self.path).await?;
        Ok(())
    }
}

#[cfg(test)]
mod json_file_book_store_tests {
    use tempfile::tempdir;

    use crate::api::{Book, Copies, Year};
    use crate::book_store::{BookStore, JsonFileBookStore};
    use crate::books_repository::BookRepositoryError;

    fn book(book_id: &str) -> Book {
        Book {
            book_id: book_id.to_string(),
            title: "Dune".to_string(),
            author: "Frank Herbert".to_string(),
            genre: "Science fiction".to_string(),
            year: Year::from(1965),
            copies: Copies::from(2),
        }
    }

    #[tokio::test]
    async fn test_init_creates_empty_store() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("data.json");

        let store = JsonFileBookStore::init(&path).await.expect("Failed to init");

        assert_eq!(std::fs::read_to_string(&path).unwrap(), "[]");
        assert_eq!(store.load().await.expect("Failed to load"), Vec::<Book>::new());
    }

    #[tokio::test]
    async fn test_init_keeps_existing_content() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let existing = serde_json::to_string(&vec![book("B1")]).unwrap();
        std::fs::write(&path, &existing).unwrap();

        let store = JsonFileBookStore::init(&path).await.expect("Failed to init");

        assert_eq!(store.load().await.unwrap(), vec![book("B1")]);
    }

    #[tokio::test]
    async fn test_save_then_load_keeps_order() {
        let dir = tempdir().unwrap();
        let store = JsonFileBookStore::init(dir.path().join("data.json"))
            .await
            .unwrap();

        let books = vec![book("B2"), book("B1"), book("B3")];
        store.save(&books).await.expect("Failed to save");

        assert_eq!(store.load().await.unwrap(), books);
        assert!(!store.temporary_path().exists());
    }

    #[tokio::test]
    async fn test_save_writes_two_space_indented_json() {
        let dir = tempdir().unwrap();
        let store = JsonFileBookStore::init(dir.path().join("data.json"))
            .await
            .unwrap();

        store.save(&[book("B1")]).await.unwrap();

        let content = std::fs::read_to_string(store.path()).unwrap();
        assert!(content.starts_with("[\n  {\n    \"book_id\": \"B1\","));
    }

    #[tokio::test]
    async fn test_missing_file_is_storage_unavailable() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        let store = JsonFileBookStore::init(&path).await.unwrap();
        std::fs::remove_file(&path).unwrap();

        assert!(matches!(
            store.load().await,
            Err(BookRepositoryError::StorageUnavailable(..))
        ));
    }

    #[tokio::test]
    async fn test_unparsable_file_is_corrupt_data() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("data.json");
        std::fs::write(&path, r#"{"not": "an array"}"#).unwrap();
        let store = JsonFileBookStore::init(&path).await.unwrap();

        assert!(matches!(
            store.load().await,
            Err(BookRepositoryError::CorruptData(..))
        ));
    }
}
