//! Integration tests against real JSON files in a temporary directory

mod lifecycle;
mod repl_session;

use std::sync::Arc;

use book_catalog::{
    config::AnalyticsConfig,
    models::Book,
    repository::{BookStore, JsonBookStore, JsonCheckoutLedger, Repository},
    services::Services,
};
use tempfile::TempDir;

/// Services over fresh stores seeded with the given books
pub fn catalog_with(books: &[Book]) -> (TempDir, Services) {
    let dir = tempfile::tempdir().expect("temp dir");
    let book_store = JsonBookStore::open(dir.path().join("books.json")).expect("book store");
    for book in books {
        book_store.add(book).expect("seed book");
    }
    let ledger = JsonCheckoutLedger::open(dir.path().join("checkout_history.json")).expect("ledger");
    let repository = Repository::new(Arc::new(book_store), Arc::new(ledger));
    (dir, Services::new(repository, AnalyticsConfig::default()))
}

pub fn book(id: &str, title: &str) -> Book {
    serde_json::from_value(serde_json::json!({
        "book_id": id,
        "title": title,
        "author": "Test Author",
    }))
    .expect("valid book")
}
