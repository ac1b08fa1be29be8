//! Data models for the book catalog

pub mod book;
pub mod checkout;

// Re-export commonly used types
pub use book::{Book, CreateBook};
pub use checkout::{CheckinReceipt, CheckoutReceipt, CheckoutRecord};
