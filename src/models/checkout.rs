//! Checkout record model and the receipts handed back to callers

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::{AppError, AppResult};

/// One loan of one book. Open while `checked_in_at` is unset.
///
/// Ledger files written by the earlier catalog tool use `checkout_history_id`
/// and `*_time` keys with zone-less timestamps; both shapes are read.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CheckoutRecord {
    #[serde(alias = "checkout_history_id")]
    pub id: Uuid,
    pub book_id: String,
    #[serde(alias = "checked_out_time", deserialize_with = "timestamp::deserialize")]
    pub checked_out_at: DateTime<Utc>,
    #[serde(
        default,
        alias = "checked_in_time",
        deserialize_with = "timestamp::deserialize_option"
    )]
    pub checked_in_at: Option<DateTime<Utc>>,
}

impl CheckoutRecord {
    /// Open a new record. Fails with [`AppError::Validation`] on a blank `book_id`.
    pub fn new(book_id: impl Into<String>, checked_out_at: DateTime<Utc>) -> AppResult<Self> {
        let book_id = book_id.into();
        if book_id.trim().is_empty() {
            return Err(AppError::Validation(
                "A checkout needs a non-empty book ID".to_string(),
            ));
        }
        Ok(Self {
            id: Uuid::new_v4(),
            book_id,
            checked_out_at,
            checked_in_at: None,
        })
    }

    /// Close the record, stamping it with `checked_in_at` or the current time.
    ///
    /// Closing is not idempotent: a second call fails with
    /// [`AppError::AlreadyClosed`]. A `checked_in_at` earlier than
    /// `checked_out_at` is replaced by `checked_out_at`.
    pub fn close(&mut self, checked_in_at: Option<DateTime<Utc>>) -> AppResult<()> {
        if self.checked_in_at.is_some() {
            return Err(AppError::AlreadyClosed(self.id));
        }
        let at = checked_in_at.unwrap_or_else(Utc::now);
        self.checked_in_at = Some(at.max(self.checked_out_at));
        Ok(())
    }

    pub fn is_open(&self) -> bool {
        self.checked_in_at.is_none()
    }
}

/// RFC 3339 timestamps, or zone-less ISO 8601 ones taken as UTC
mod timestamp {
    use chrono::{DateTime, NaiveDateTime, Utc};
    use serde::{de::Error, Deserialize, Deserializer};

    fn parse(raw: &str) -> Option<DateTime<Utc>> {
        if let Ok(at) = DateTime::parse_from_rfc3339(raw) {
            return Some(at.with_timezone(&Utc));
        }
        NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
            .ok()
            .map(|naive| naive.and_utc())
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(d: D) -> Result<DateTime<Utc>, D::Error> {
        let raw = String::deserialize(d)?;
        parse(&raw).ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", raw)))
    }

    pub fn deserialize_option<'de, D: Deserializer<'de>>(
        d: D,
    ) -> Result<Option<DateTime<Utc>>, D::Error> {
        match Option::<String>::deserialize(d)? {
            Some(raw) => parse(&raw)
                .map(Some)
                .ok_or_else(|| D::Error::custom(format!("invalid timestamp '{}'", raw))),
            None => Ok(None),
        }
    }
}

impl fmt::Display for CheckoutRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let checked_in = match self.checked_in_at {
            Some(at) => at.to_rfc3339(),
            None => "still out".to_string(),
        };
        write!(
            f,
            "{}  book={}  out={}  in={}",
            self.id,
            self.book_id,
            self.checked_out_at.to_rfc3339(),
            checked_in
        )
    }
}

/// Returned by a successful checkout
#[derive(Debug, Clone)]
pub struct CheckoutReceipt {
    pub checkout_id: Uuid,
    pub book_id: String,
    pub title: String,
    pub checked_out_at: DateTime<Utc>,
}

impl fmt::Display for CheckoutReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Book '{}' checked out successfully. Checkout ID: {}",
            self.title, self.checkout_id
        )
    }
}

/// Returned by a successful check-in
#[derive(Debug, Clone)]
pub struct CheckinReceipt {
    pub checkout_id: Uuid,
    pub book_id: String,
    pub title: String,
    pub checked_in_at: DateTime<Utc>,
}

impl fmt::Display for CheckinReceipt {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Book '{}' checked in successfully.", self.title)
    }
}
