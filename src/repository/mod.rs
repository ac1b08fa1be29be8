//! Repository layer: store capabilities and their JSON-file backing

pub mod books;
pub mod checkouts;
mod json_file;

use std::sync::Arc;

use uuid::Uuid;

use crate::{
    config::StorageConfig,
    error::AppResult,
    models::{Book, CheckoutRecord},
};

pub use books::JsonBookStore;
pub use checkouts::JsonCheckoutLedger;

/// Book records keyed by `book_id`
#[cfg_attr(test, mockall::automock)]
pub trait BookStore: Send + Sync {
    /// All books in storage order
    fn list(&self) -> AppResult<Vec<Book>>;
    fn find_by_id(&self, book_id: &str) -> AppResult<Option<Book>>;
    /// Books whose title matches exactly
    fn find_by_title(&self, title: &str) -> AppResult<Vec<Book>>;
    fn add(&self, book: &Book) -> AppResult<String>;
    /// Fails with `BookNotFound` when no book has this id
    fn remove(&self, book_id: &str) -> AppResult<()>;
    /// Replace the stored record with the same `book_id`; fails with `BookNotFound`
    fn update(&self, book: &Book) -> AppResult<()>;
}

/// Append-oriented collection of checkout records, kept in insertion order
#[cfg_attr(test, mockall::automock)]
pub trait CheckoutLedger: Send + Sync {
    fn append(&self, record: &CheckoutRecord) -> AppResult<Uuid>;
    /// Replace the stored record with the same id; fails with `RecordNotFound`
    fn update(&self, record: &CheckoutRecord) -> AppResult<()>;
    fn list(&self) -> AppResult<Vec<CheckoutRecord>>;
    fn find_by_book_id(&self, book_id: &str) -> AppResult<Vec<CheckoutRecord>>;
    fn find_open_by_book_id(&self, book_id: &str) -> AppResult<Vec<CheckoutRecord>>;
}

/// Main repository struct holding both stores
#[derive(Clone)]
pub struct Repository {
    pub books: Arc<dyn BookStore>,
    pub checkouts: Arc<dyn CheckoutLedger>,
}

impl Repository {
    pub fn new(books: Arc<dyn BookStore>, checkouts: Arc<dyn CheckoutLedger>) -> Self {
        Self { books, checkouts }
    }

    /// Open the JSON files named in the storage configuration, creating them when missing
    pub fn open(config: &StorageConfig) -> AppResult<Self> {
        let books = JsonBookStore::open(&config.books_path)?;
        let checkouts = JsonCheckoutLedger::open(&config.checkouts_path)?;
        Ok(Self::new(Arc::new(books), Arc::new(checkouts)))
    }
}
