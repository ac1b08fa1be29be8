//! Checkout ledger backed by a JSON file

use std::path::{Path, PathBuf};

use uuid::Uuid;

use crate::{
    error::{AppError, AppResult},
    models::CheckoutRecord,
};

use super::{json_file, CheckoutLedger};

#[derive(Debug, Clone)]
pub struct JsonCheckoutLedger {
    path: PathBuf,
}

impl JsonCheckoutLedger {
    pub fn open(path: impl AsRef<Path>) -> AppResult<Self> {
        let path = path.as_ref().to_path_buf();
        json_file::ensure_exists(&path)?;
        Ok(Self { path })
    }
}

impl CheckoutLedger for JsonCheckoutLedger {
    fn append(&self, record: &CheckoutRecord) -> AppResult<Uuid> {
        let mut records = self.list()?;
        records.push(record.clone());
        json_file::write_all(&self.path, &records)?;
        Ok(record.id)
    }

    fn update(&self, record: &CheckoutRecord) -> AppResult<()> {
        let mut records = self.list()?;
        let slot = records
            .iter_mut()
            .find(|r| r.id == record.id)
            .ok_or(AppError::RecordNotFound(record.id))?;
        *slot = record.clone();
        json_file::write_all(&self.path, &records)
    }

    fn list(&self) -> AppResult<Vec<CheckoutRecord>> {
        json_file::read_all(&self.path)
    }

    fn find_by_book_id(&self, book_id: &str) -> AppResult<Vec<CheckoutRecord>> {
        Ok(self.list()?.into_iter().filter(|r| r.book_id == book_id).collect())
    }

    fn find_open_by_book_id(&self, book_id: &str) -> AppResult<Vec<CheckoutRecord>> {
        Ok(self
            .list()?
            .into_iter()
            .filter(|r| r.book_id == book_id && r.is_open())
            .collect())
    }
}
