//! Helpers shared by the end to end tests, which run against an already
//! started book catalog service.

use rand::distributions::Alphanumeric;
use rand::seq::SliceRandom;
use rand::Rng;

use book_catalog::api::{Copies, NewBook, Year};

const GENRES: [&str; 5] = ["Fantasy", "Horror", "Poetry", "Biography", "Science fiction"];

/// Address of the service under test, `BOOK_CATALOG_URL` or the default port
pub fn catalog_url() -> String {
    std::env::var("BOOK_CATALOG_URL").unwrap_or("http://127.0.0.1:3000".to_string())
}

fn random_word<R: Rng>(rng: &mut R, len: usize) -> String {
    rng.sample_iter(&Alphanumeric)
        .take(len)
        .map(char::from)
        .collect()
}

/// Book with an id unlikely to collide with anything already stored
pub fn random_book<R: Rng>(rng: &mut R) -> NewBook {
    NewBook {
        book_id: Some(format!("e2e-{}", random_word(rng, 16))),
        title: Some(random_word(rng, 12)),
        author: Some(random_word(rng, 8)),
        genre: GENRES.choose(rng).map(|genre| genre.to_string()),
        year: Some(Year::from(rng.gen_range(1450i64..2025))),
        copies: Some(Copies::from(rng.gen_range(0i64..20))),
    }
}
