use std::path::Path;

use serde::Deserialize;

use veil_core::{ColumnType, TableSchema};
use veil_transform::RawParams;

use crate::CliError;

/// Environment variable holding the hex-encoded global salt.
pub const GLOBAL_SALT_ENV: &str = "VEIL_GLOBAL_SALT";

/// Contents of a `veil.toml` file.
#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct MaskConfig {
    pub table: TableConfig,
    /// Token meaning NULL in input and output files.
    #[serde(default = "default_null_sentinel")]
    pub null_sentinel: String,
    /// Hex key for hash engines; falls back to `VEIL_GLOBAL_SALT`.
    #[serde(default)]
    pub global_salt: Option<String>,
    #[serde(default)]
    pub transformers: Vec<TransformerConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TableConfig {
    #[serde(default = "default_schema")]
    pub schema: String,
    pub name: String,
    /// Column types; columns not listed here are treated as `text`.
    #[serde(default)]
    pub columns: Vec<ColumnConfig>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct ColumnConfig {
    pub name: String,
    #[serde(default = "default_data_type")]
    pub data_type: String,
    #[serde(default)]
    pub max_length: Option<i32>,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct TransformerConfig {
    pub name: String,
    #[serde(default)]
    pub params: toml::Table,
}

impl MaskConfig {
    pub fn load(path: &Path) -> Result<Self, CliError> {
        let content = std::fs::read_to_string(path)?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, CliError> {
        let config: MaskConfig = toml::from_str(content)?;
        if config.transformers.is_empty() {
            return Err(CliError::InvalidConfig(
                "at least one [[transformers]] entry is required".to_string(),
            ));
        }
        Ok(config)
    }

    /// Table schema for a file whose header is `header`.
    pub fn table_schema(&self, header: &[String]) -> Result<TableSchema, CliError> {
        for column in &self.table.columns {
            if !header.contains(&column.name) {
                return Err(CliError::InvalidConfig(format!(
                    "column '{}' is configured but missing from the input header",
                    column.name
                )));
            }
        }

        let columns = header.iter().map(|name| {
            let column_type = match self.table.columns.iter().find(|col| &col.name == name) {
                Some(config) => {
                    let column_type = ColumnType::new(config.data_type.clone());
                    match config.max_length {
                        Some(max_len) => column_type.with_max_length(max_len),
                        None => column_type,
                    }
                }
                None => ColumnType::new(default_data_type()),
            };
            (name.as_str(), column_type)
        });

        Ok(TableSchema::from_columns(
            self.table.schema.clone(),
            self.table.name.clone(),
            columns,
        ))
    }

    /// Global salt from the config file, else from the environment.
    pub fn global_salt(&self) -> Result<Option<Vec<u8>>, CliError> {
        let encoded = match &self.global_salt {
            Some(value) => Some(value.clone()),
            None => std::env::var(GLOBAL_SALT_ENV).ok(),
        };
        encoded
            .map(|value| {
                hex::decode(value.trim()).map_err(|err| {
                    CliError::InvalidConfig(format!("global salt must be hex encoded: {err}"))
                })
            })
            .transpose()
    }
}

impl TransformerConfig {
    pub fn raw_params(&self) -> Result<RawParams, CliError> {
        match serde_json::to_value(&self.params)? {
            serde_json::Value::Object(map) => Ok(map),
            other => Err(CliError::InvalidConfig(format!(
                "params for '{}' must be a table, got {other}",
                self.name
            ))),
        }
    }
}

fn default_null_sentinel() -> String {
    "\\N".to_string()
}

fn default_schema() -> String {
    "public".to_string()
}

fn default_data_type() -> String {
    "text".to_string()
}
