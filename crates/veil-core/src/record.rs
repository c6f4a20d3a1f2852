use std::sync::Arc;

use crate::error::{Error, Result};
use crate::schema::Column;

/// Raw column value as seen by transformers.
///
/// NULL is a flag here; recognizing a textual sentinel in serialized rows is
/// up to whoever builds the record.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawValue {
    pub data: Vec<u8>,
    pub is_null: bool,
}

impl RawValue {
    pub fn new(data: impl Into<Vec<u8>>) -> Self {
        Self {
            data: data.into(),
            is_null: false,
        }
    }

    pub fn null() -> Self {
        Self {
            data: Vec::new(),
            is_null: true,
        }
    }

    /// UTF-8 view of a non-null value.
    pub fn as_str(&self) -> Option<&str> {
        if self.is_null {
            return None;
        }
        std::str::from_utf8(&self.data).ok()
    }
}

/// Schema lookup used while validating transformer configuration.
pub trait RowDriver {
    fn table_name(&self) -> String;

    fn column(&self, name: &str) -> Option<&Column>;
}

/// Read/write access to one row.
pub trait Record {
    fn get_raw_column_value_by_name(&self, name: &str) -> Result<RawValue>;

    fn set_raw_column_value_by_name(&mut self, name: &str, value: RawValue) -> Result<()>;
}

/// Row held in memory with values in column order.
#[derive(Debug, Clone)]
pub struct MemoryRecord {
    columns: Arc<[String]>,
    values: Vec<RawValue>,
}

impl MemoryRecord {
    pub fn new(columns: Arc<[String]>, values: Vec<RawValue>) -> Result<Self> {
        if columns.len() != values.len() {
            return Err(Error::Arity {
                expected: columns.len(),
                actual: values.len(),
            });
        }
        Ok(Self { columns, values })
    }

    pub fn into_values(self) -> Vec<RawValue> {
        self.values
    }

    fn position(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|column| column == name)
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }
}

impl Record for MemoryRecord {
    fn get_raw_column_value_by_name(&self, name: &str) -> Result<RawValue> {
        let idx = self.position(name)?;
        Ok(self.values[idx].clone())
    }

    fn set_raw_column_value_by_name(&mut self, name: &str, value: RawValue) -> Result<()> {
        let idx = self.position(name)?;
        self.values[idx] = value;
        Ok(())
    }
}
