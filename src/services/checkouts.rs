//! Checkout lifecycle service
//!
//! Sole writer of both the checkout ledger and the books' availability flag.
//! A book is available exactly when the ledger holds no open record for it.

use chrono::Utc;

use crate::{
    error::{AppError, AppResult},
    models::{Book, CheckinReceipt, CheckoutReceipt, CheckoutRecord},
    repository::Repository,
};

#[derive(Clone)]
pub struct CheckoutService {
    repository: Repository,
}

impl CheckoutService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    fn get_book(&self, book_id: &str) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(book_id)?
            .ok_or_else(|| AppError::BookNotFound(book_id.to_string()))
    }

    /// Check a book out.
    ///
    /// The ledger record is appended before the book is flagged unavailable, so a
    /// failure in between leaves an open record with a stale flag, which a rescan
    /// of the ledger can detect.
    pub fn checkout(&self, book_id: &str) -> AppResult<CheckoutReceipt> {
        let mut book = self.get_book(book_id)?;

        let open = self.repository.checkouts.find_open_by_book_id(book_id)?;
        if !open.is_empty() {
            return Err(AppError::AlreadyCheckedOut {
                book_id: book.book_id,
                title: book.title,
            });
        }

        let record = CheckoutRecord::new(book_id, Utc::now())?;
        let checkout_id = self.repository.checkouts.append(&record)?;

        book.available = false;
        self.repository.books.update(&book)?;

        tracing::info!(book_id, %checkout_id, "Book checked out");

        Ok(CheckoutReceipt {
            checkout_id,
            book_id: book.book_id,
            title: book.title,
            checked_out_at: record.checked_out_at,
        })
    }

    /// Check a book back in, closing its open record.
    ///
    /// Should the ledger hold several open records for the book, the most recently
    /// appended one is closed.
    pub fn checkin(&self, book_id: &str) -> AppResult<CheckinReceipt> {
        let mut book = self.get_book(book_id)?;

        let open = self.repository.checkouts.find_open_by_book_id(book_id)?;
        if open.len() > 1 {
            tracing::warn!(
                book_id,
                open_records = open.len(),
                "Ledger holds more than one open checkout for this book; closing the latest"
            );
        }
        let Some(mut record) = open.into_iter().last() else {
            return Err(AppError::NotCheckedOut {
                book_id: book.book_id,
                title: book.title,
            });
        };

        record.close(Some(Utc::now()))?;
        self.repository.checkouts.update(&record)?;

        book.available = true;
        self.repository.books.update(&book)?;

        tracing::info!(book_id, checkout_id = %record.id, "Book checked in");

        Ok(CheckinReceipt {
            checkout_id: record.id,
            book_id: book.book_id,
            title: book.title,
            checked_in_at: record.checked_in_at.unwrap_or(record.checked_out_at),
        })
    }

    /// All records for a book, oldest first
    pub fn history_for_book(&self, book_id: &str) -> AppResult<Vec<CheckoutRecord>> {
        self.get_book(book_id)?;
        self.repository.checkouts.find_by_book_id(book_id)
    }

    /// Every record in the ledger, oldest first
    pub fn all_history(&self) -> AppResult<Vec<CheckoutRecord>> {
        self.repository.checkouts.list()
    }
}
