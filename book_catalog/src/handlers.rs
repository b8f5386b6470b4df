use std::sync::Arc;

use actix_web::web::Data;
use actix_web::Error;
use actix_web::HttpResponse;
use paperclip::actix::{
    api_v2_operation,
    web::{self},
};

use crate::api::{BookId, BookPatch, ErrorResponse, MessageResponse, NewBook};
use crate::books_repository::{BookRepository, BookRepositoryError};

fn error_response(operation: &str, err: BookRepositoryError) -> HttpResponse {
    let error = |message: &str| ErrorResponse {
        error: message.to_string(),
    };
    match err {
        BookRepositoryError::Validation => {
            HttpResponse::BadRequest().json(error("All fields are required"))
        }
        BookRepositoryError::DuplicateId(_) => {
            HttpResponse::BadRequest().json(error("Book ID already exists"))
        }
        BookRepositoryError::NotFound(_) => HttpResponse::NotFound().json(error("Book not found")),
        err @ (BookRepositoryError::StorageUnavailable(_)
        | BookRepositoryError::CorruptData(_)) => {
            tracing::error!("{} failed {}", operation, err);
            HttpResponse::InternalServerError().json(error("Internal server error"))
        }
    }
}

#[api_v2_operation]
pub async fn health() -> Result<HttpResponse, Error> {
    Ok(HttpResponse::Ok().finish())
}

#[api_v2_operation]
pub async fn get_all_books(
    books_repository: Data<Arc<dyn BookRepository>>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.list_books().await {
        Ok(books) => HttpResponse::Ok().json(books),
        Err(err) => error_response("Get all books", err),
    })
}

#[api_v2_operation]
pub async fn create_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    new_book: web::Json<NewBook>,
) -> Result<HttpResponse, Error> {
    Ok(
        match books_repository.create_book(new_book.into_inner()).await {
            Ok(book) => HttpResponse::Created().json(book),
            Err(err) => error_response("Create book", err),
        },
    )
}

#[api_v2_operation]
pub async fn get_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.get_book(&book_id).await {
        Ok(book) => HttpResponse::Ok().json(book),
        Err(err) => error_response("Get book", err),
    })
}

#[api_v2_operation]
pub async fn update_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
    patch: web::Json<BookPatch>,
) -> Result<HttpResponse, Error> {
    Ok(
        match books_repository
            .update_book(&book_id, patch.into_inner())
            .await
        {
            Ok(book) => HttpResponse::Ok().json(book),
            Err(err) => error_response("Update book", err),
        },
    )
}

#[api_v2_operation]
pub async fn delete_book(
    books_repository: Data<Arc<dyn BookRepository>>,
    book_id: web::Path<BookId>,
) -> Result<HttpResponse, Error> {
    Ok(match books_repository.delete_book(&book_id).await {
        Ok(()) => HttpResponse::Ok().json(MessageResponse {
            message: "Book deleted successfully".to_string(),
        }),
        Err(err) => error_response("Delete book", err),
    })
}
