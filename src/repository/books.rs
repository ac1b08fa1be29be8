//! Books repository backed by a JSON file

use std::path::{Path, PathBuf};

use crate::{
    error::{AppError, AppResult},
    models::Book,
};

use super::{json_file, BookStore};

#[derive(Debug, Clone)]
pub struct JsonBookStore {
    path: PathBuf,
}

impl JsonBookStore {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        json_file::ensure_exists(&path)?;
        Ok(Self { path })
    }
}

impl BookStore for JsonBookStore {
    fn list(&self) -> AppResult<Vec<Book>> {
        json_file::read_all(&self.path)
    }

    fn find_by_id(&self, book_id: &str) -> AppResult<Option<Book>> {
        Ok(self.list()?.into_iter().find(|b| b.book_id == book_id))
    }

    fn find_by_title(&self, title: &str) -> AppResult<Vec<Book>> {
        Ok(self.list()?.into_iter().filter(|b| b.title == title).collect())
    }

    fn add(&self, book: &Book) -> AppResult<String> {
        let mut books = self.list()?;
        if books.iter().any(|b| b.book_id == book.book_id) {
            return Err(AppError::Validation(format!(
                "A book with ID {} already exists",
                book.book_id
            )));
        }
        books.push(book.clone());
        json_file::write_all(&self.path, &books)?;
        Ok(book.book_id.clone())
    }

    fn remove(&self, book_id: &str) -> AppResult<()> {
        let mut books = self.list()?;
        let before = books.len();
        books.retain(|b| b.book_id != book_id);
        if books.len() == before {
            return Err(AppError::BookNotFound(book_id.to_string()));
        }
        json_file::write_all(&self.path, &books)
    }

    fn update(&self, book: &Book) -> AppResult<()> {
        let mut books = self.list()?;
        let slot = books
            .iter_mut()
            .find(|b| b.book_id == book.book_id)
            .ok_or_else(|| AppError::BookNotFound(book.book_id.clone()))?;
        *slot = book.clone();
        json_file::write_all(&self.path, &books)
    }
}
