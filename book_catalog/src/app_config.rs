use actix_web::error::InternalError;
use actix_web::HttpResponse;
use paperclip::actix::web;

use crate::api::ErrorResponse;
use crate::handlers;

pub fn config_app(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/health").route(web::get().to(handlers::health)))
        .service(
            web::resource("/books")
                .route(web::get().to(handlers::get_all_books))
                .route(web::post().to(handlers::create_book)),
        )
        .service(
            web::resource("/books/{book_id}")
                .route(web::get().to(handlers::get_book))
                .route(web::put().to(handlers::update_book))
                .route(web::delete().to(handlers::delete_book)),
        );
}

/// Rejects unparsable bodies with the same `{error}` shape as every other failure
pub fn json_config() -> actix_web::web::JsonConfig {
    actix_web::web::JsonConfig::default().error_handler(|err, _req| {
        let response = HttpResponse::BadRequest().json(ErrorResponse {
            error: err.to_string(),
        });
        InternalError::from_response(err, response).into()
    })
}
