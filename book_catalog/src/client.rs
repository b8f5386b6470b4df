use anyhow::{bail, Context};
use reqwest::StatusCode;
use reqwest_middleware::{ClientBuilder, ClientWithMiddleware};
use reqwest_retry::policies::ExponentialBackoff;
use reqwest_retry::RetryTransientMiddleware;
use reqwest_tracing::TracingMiddleware;

use crate::api::{Book, BookPatch, ErrorResponse, NewBook};

pub struct BookCatalogClient {
    url: String,
    /// Retries transient failures, only used for idempotent requests
    client: ClientWithMiddleware,
    /// No retries, a lost response to a create must not be replayed as a duplicate
    create_client: ClientWithMiddleware,
}

/// Outcome of a create call that the service refused
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum CreateBookRejection {
    MissingFields,
    DuplicateId,
}

async fn error_message(response: reqwest::Response) -> String {
    response
        .json::<ErrorResponse>()
        .await
        .map(|body| body.error)
        .unwrap_or_default()
}

impl BookCatalogClient {
    pub fn new(url: &str) -> anyhow::Result<Self> {
        let reqwest_client = reqwest::Client::builder()
            .build()
            .context("Failed to build reqwest client")?;
        let retry_policy = ExponentialBackoff::builder().build_with_max_retries(3);
        let client = ClientBuilder::new(reqwest_client.clone())
            // Insert the tracing middleware
            .with(TracingMiddleware::default())
            .with(RetryTransientMiddleware::new_with_policy(retry_policy))
            .build();
        let create_client = ClientBuilder::new(reqwest_client)
            .with(TracingMiddleware::default())
            .build();

        Ok(Self {
            url: url.trim_end_matches('/').to_string(),
            client,
            create_client,
        })
    }

    /// Calls POST /books endpoint
    /// Returns the created book, or why the service refused to create it
    pub async fn create_book(
        &self,
        new_book: &NewBook,
    ) -> anyhow::Result<Result<Book, CreateBookRejection>> {
        let response = self
            .create_client
            .post(format!("{}/books", self.url))
            .json(new_book)
            .send()
            .await?;

        if response.status() == StatusCode::CREATED {
            return Ok(Ok(response.json().await?));
        }
        let status = response.status();
        let error = error_message(response).await;
        match (status, error.as_str()) {
            (StatusCode::BAD_REQUEST, "Book ID already exists") => {
                Ok(Err(CreateBookRejection::DuplicateId))
            }
            (StatusCode::BAD_REQUEST, "All fields are required") => {
                Ok(Err(CreateBookRejection::MissingFields))
            }
            _ => bail!("Failed to create book {} {}", status, error),
        }
    }

    /// Calls GET /books endpoint
    pub async fn list_books(&self) -> anyhow::Result<Vec<Book>> {
        let response = self
            .client
            .get(format!("{}/books", self.url))
            .send()
            .await?;
        if response.status().is_success() {
            Ok(response.json().await?)
        } else {
            bail!("Failed to list books {}", error_message(response).await)
        }
    }

    /// Calls GET /books/{book_id} endpoint
    /// Returns None if the book is not in the catalog
    pub async fn get_book(&self, book_id: &str) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .get(self.book_url(book_id)?)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            bail!("Failed to get book {}", error_message(response).await)
        }
    }

    /// Calls PUT /books/{book_id} endpoint
    /// Returns the updated book, None if the book is not in the catalog
    pub async fn update_book(
        &self,
        book_id: &str,
        patch: &BookPatch,
    ) -> anyhow::Result<Option<Book>> {
        let response = self
            .client
            .put(self.book_url(book_id)?)
            .json(patch)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(None)
        } else if response.status().is_success() {
            Ok(Some(response.json().await?))
        } else {
            bail!("Failed to update book {}", error_message(response).await)
        }
    }

    /// Calls DELETE /books/{book_id} endpoint
    /// Returns false if there was nothing to delete
    pub async fn delete_book(&self, book_id: &str) -> anyhow::Result<bool> {
        let response = self
            .client
            .delete(self.book_url(book_id)?)
            .send()
            .await?;
        if response.status() == StatusCode::NOT_FOUND {
            Ok(false)
        } else if response.status().is_success() {
            Ok(true)
        } else {
            bail!("Failed to delete book {}", error_message(response).await)
        }
    }

    fn book_url(&self, book_id: &str) -> anyhow::Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&format!("{}/books/", self.url))
            .context("Invalid book catalog url")?;
        url.path_segments_mut()
            .map_err(|_| anyhow::anyhow!("Book catalog url can not be a base"))?
            .pop_if_empty()
            .push(book_id);
        Ok(url)
    }
}
