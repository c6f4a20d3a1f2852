//! Core contracts shared by the veil crates.
//!
//! This crate defines the table schema snapshot a transformer validates its
//! configuration against, and the row/driver contract transformers read from
//! and write to.

pub mod error;
pub mod record;
pub mod schema;

pub use error::{Error, Result};
pub use record::{MemoryRecord, RawValue, Record, RowDriver};
pub use schema::{Column, ColumnType, TableSchema, validate_table};
