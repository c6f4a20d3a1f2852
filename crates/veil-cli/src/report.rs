use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;

use chrono::Utc;
use serde::Serialize;

use veil_transform::{TransformerInstance, ValidationWarning};

use crate::CliError;

/// Summary of one `veil mask` run, written as JSON with `--report`.
#[derive(Debug, Clone, Serialize)]
pub struct MaskReport {
    pub run_id: String,
    pub started_at: String,
    pub table: String,
    pub rows: u64,
    pub bytes_written: u64,
    pub duration_ms: u64,
    pub transformers: Vec<TransformerSummary>,
    /// NULL cells passed through untouched, per affected column.
    pub nulls_preserved: BTreeMap<String, u64>,
    pub warnings_by_code: BTreeMap<String, u64>,
    pub warnings: Vec<ValidationWarning>,
}

#[derive(Debug, Clone, Serialize)]
pub struct TransformerSummary {
    pub name: String,
    pub columns: Vec<String>,
}

impl MaskReport {
    pub fn new(run_id: String) -> Self {
        Self {
            run_id,
            started_at: Utc::now().to_rfc3339(),
            table: String::new(),
            rows: 0,
            bytes_written: 0,
            duration_ms: 0,
            transformers: Vec::new(),
            nulls_preserved: BTreeMap::new(),
            warnings_by_code: BTreeMap::new(),
            warnings: Vec::new(),
        }
    }

    pub fn record_instance(&mut self, instance: &TransformerInstance) {
        let columns: Vec<String> = instance
            .transformer
            .affected_columns()
            .into_iter()
            .map(str::to_string)
            .collect();
        for column in &columns {
            self.nulls_preserved.entry(column.clone()).or_insert(0);
        }
        self.transformers.push(TransformerSummary {
            name: instance.transformer.name().to_string(),
            columns,
        });
        for warning in &instance.warnings {
            *self
                .warnings_by_code
                .entry(warning.code.to_string())
                .or_insert(0) += 1;
            self.warnings.push(warning.clone());
        }
    }

    pub fn write(&self, path: &Path) -> Result<(), CliError> {
        let mut writer = BufWriter::new(File::create(path)?);
        serde_json::to_writer_pretty(&mut writer, self)?;
        writer.write_all(b"\n")?;
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use uuid::Uuid;
    use veil_core::{ColumnType, TableSchema};
    use veil_transform::{InstanceOptions, RawParams, TransformContext, default_registry};

    use super::*;

    fn instance(params: serde_json::Value) -> TransformerInstance {
        let table = TableSchema::from_columns(
            "public",
            "people",
            [("name", ColumnType::new("character(20)"))],
        );
        let params: RawParams = serde_json::from_value(params).expect("params");
        default_registry()
            .expect("registry")
            .instance(
                "RandomPerson",
                &TransformContext::new(),
                &table,
                &params,
                &InstanceOptions::default(),
            )
            .expect("instance")
    }

    #[test]
    fn counts_warnings_by_code() {
        let instance = instance(serde_json::json!({
            "columns": [{ "name": "name", "template": "{{ .FirstName }}" }]
        }));
        let mut report = MaskReport::new("run".to_string());
        report.record_instance(&instance);

        assert_eq!(report.transformers.len(), 1);
        assert_eq!(report.transformers[0].columns, vec!["name".to_string()]);
        assert_eq!(report.nulls_preserved.get("name"), Some(&0));
        assert_eq!(report.warnings_by_code.get("fixed_width_padding"), Some(&1));
    }

    #[test]
    fn writes_json_report() {
        let dir = std::env::temp_dir().join(format!("veil_report_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        let path = dir.join("report.json");

        let mut report = MaskReport::new("run-1".to_string());
        report.table = "public.people".to_string();
        report.rows = 3;
        report.write(&path).expect("write report");

        let value: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&path).expect("read")).expect("json");
        assert_eq!(value["run_id"], "run-1");
        assert_eq!(value["rows"], 3);
        assert!(value["started_at"].as_str().is_some_and(|s| !s.is_empty()));
    }
}
