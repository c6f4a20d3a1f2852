use std::collections::BTreeSet;

use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::record::RowDriver;

/// Snapshot of the table a set of transformers operates on.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct TableSchema {
    /// Namespace of the table (e.g. `public`).
    pub schema: String,
    /// Table name within the namespace.
    pub name: String,
    /// Columns in storage order.
    pub columns: Vec<Column>,
}

/// Column metadata for a table.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Column {
    pub ordinal_position: i16,
    pub name: String,
    pub column_type: ColumnType,
    #[serde(default = "default_nullable")]
    pub is_nullable: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub comment: Option<String>,
}

/// Formatted type metadata for a column.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct ColumnType {
    /// User-friendly formatted type without modifiers (e.g. `character varying`).
    pub data_type: String,
    /// Maximum length for bounded character types.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub character_max_length: Option<i32>,
}

impl ColumnType {
    pub fn new(data_type: impl Into<String>) -> Self {
        Self {
            data_type: data_type.into(),
            character_max_length: None,
        }
    }

    pub fn with_max_length(mut self, max_len: i32) -> Self {
        self.character_max_length = Some(max_len);
        self
    }

    /// Type name lowercased with any `(n)` modifier removed.
    pub fn normalized(&self) -> String {
        self.data_type
            .split('(')
            .next()
            .unwrap_or(&self.data_type)
            .trim()
            .to_lowercase()
    }
}

impl TableSchema {
    /// Build a table from `(name, data_type)` pairs, numbering columns in order.
    pub fn from_columns<'a>(
        schema: impl Into<String>,
        name: impl Into<String>,
        columns: impl IntoIterator<Item = (&'a str, ColumnType)>,
    ) -> Self {
        let columns = columns
            .into_iter()
            .enumerate()
            .map(|(idx, (name, column_type))| Column {
                ordinal_position: (idx + 1) as i16,
                name: name.to_string(),
                column_type,
                is_nullable: true,
                comment: None,
            })
            .collect();
        Self {
            schema: schema.into(),
            name: name.into(),
            columns,
        }
    }

    pub fn qualified_name(&self) -> String {
        format!("{}.{}", self.schema, self.name)
    }

    pub fn column_names(&self) -> Vec<String> {
        let mut columns: Vec<&Column> = self.columns.iter().collect();
        columns.sort_by_key(|col| col.ordinal_position);
        columns.into_iter().map(|col| col.name.clone()).collect()
    }
}

impl RowDriver for TableSchema {
    fn table_name(&self) -> String {
        self.qualified_name()
    }

    fn column(&self, name: &str) -> Option<&Column> {
        self.columns.iter().find(|col| col.name == name)
    }
}

/// Validate internal consistency of a table schema.
///
/// Rejects empty names, duplicate column names and duplicate ordinal positions.
pub fn validate_table(table: &TableSchema) -> Result<()> {
    if table.name.trim().is_empty() {
        return Err(Error::InvalidSchema("table name is empty".to_string()));
    }

    let mut names = BTreeSet::new();
    let mut positions = BTreeSet::new();
    for column in &table.columns {
        if column.name.is_empty() {
            return Err(Error::InvalidSchema(format!(
                "column at position {} has an empty name",
                column.ordinal_position
            )));
        }
        if !names.insert(column.name.as_str()) {
            return Err(Error::InvalidSchema(format!(
                "duplicate column name: {}.{}",
                table.qualified_name(),
                column.name
            )));
        }
        if !positions.insert(column.ordinal_position) {
            return Err(Error::InvalidSchema(format!(
                "duplicate ordinal position {} in {}",
                column.ordinal_position,
                table.qualified_name()
            )));
        }
    }

    Ok(())
}

fn default_nullable() -> bool {
    true
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalizes_type_modifiers() {
        let column_type = ColumnType::new("Character Varying(64)");
        assert_eq!(column_type.normalized(), "character varying");
    }

    #[test]
    fn rejects_duplicate_columns() {
        let table = TableSchema::from_columns(
            "public",
            "users",
            [("name", ColumnType::new("text")), ("name", ColumnType::new("text"))],
        );
        let err = validate_table(&table).expect_err("duplicate column must fail");
        assert!(err.to_string().contains("duplicate column name"));
    }

    #[test]
    fn looks_up_columns_by_exact_name() {
        let table = TableSchema::from_columns("public", "users", [("name", ColumnType::new("text"))]);
        assert!(table.column("name").is_some());
        assert!(table.column("Name").is_none());
    }
}
