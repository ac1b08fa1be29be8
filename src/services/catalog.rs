//! Catalog management service

use validator::Validate;

use crate::{
    error::{AppError, AppResult},
    models::{Book, CreateBook},
    repository::Repository,
};

#[derive(Clone)]
pub struct CatalogService {
    repository: Repository,
}

impl CatalogService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub fn list_books(&self) -> AppResult<Vec<Book>> {
        self.repository.books.list()
    }

    pub fn get_book(&self, book_id: &str) -> AppResult<Book> {
        self.repository
            .books
            .find_by_id(book_id)?
            .ok_or_else(|| AppError::BookNotFound(book_id.to_string()))
    }

    /// Books whose title matches `title` exactly
    pub fn find_by_title(&self, title: &str) -> AppResult<Vec<Book>> {
        self.repository.books.find_by_title(title.trim())
    }

    /// Create a new book, returning its generated id
    pub fn add_book(&self, request: CreateBook) -> AppResult<String> {
        request.validate()?;
        let book = Book::from(request);
        let id = self.repository.books.add(&book)?;
        tracing::info!(book_id = %id, title = %book.title, "Book added");
        Ok(id)
    }

    /// Change one field of a book from raw user input
    pub fn edit_book(&self, book_id: &str, field: &str, value: &str) -> AppResult<Book> {
        let mut book = self.get_book(book_id)?;
        book.set_field(field, value)?;
        self.repository.books.update(&book)?;
        tracing::info!(book_id, field, "Book edited");
        Ok(book)
    }

    /// Remove a book. Refused while the book is checked out, so the ledger never
    /// holds an open record for a book that no longer exists.
    pub fn remove_book(&self, book_id: &str) -> AppResult<Book> {
        let book = self.get_book(book_id)?;
        if !self.repository.checkouts.find_open_by_book_id(book_id)?.is_empty() {
            return Err(AppError::AlreadyCheckedOut {
                book_id: book.book_id,
                title: book.title,
            });
        }
        self.repository.books.remove(book_id)?;
        tracing::info!(book_id, "Book removed");
        Ok(book)
    }
}
