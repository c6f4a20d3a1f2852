use std::collections::BTreeMap;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info};

use veil_core::{MemoryRecord, RawValue, validate_table};
use veil_transform::{
    InstanceOptions, TransformContext, TransformerInstance, TransformerRegistry,
};

use crate::CliError;
use crate::config::MaskConfig;
use crate::report::{MaskReport, TransformerSummary};

/// Read `input`, run every configured transformer over each row, write `output`.
pub fn mask_file(
    config: &MaskConfig,
    registry: &TransformerRegistry,
    ctx: &TransformContext,
    input: &Path,
    output: &Path,
    report: &mut MaskReport,
) -> Result<(), CliError> {
    let started = Instant::now();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .from_path(input)?;

    let header: Vec<String> = reader
        .headers()?
        .iter()
        .map(|name| name.to_string())
        .collect();
    let table = config.table_schema(&header)?;
    validate_table(&table)?;
    report.table = table.qualified_name();

    let options = InstanceOptions {
        global_salt: config.global_salt()?,
    };

    let mut instances = Vec::with_capacity(config.transformers.len());
    for entry in &config.transformers {
        let params = entry.raw_params()?;
        let instance = registry.instance(&entry.name, ctx, &table, &params, &options)?;
        debug!(
            transformer = entry.name.as_str(),
            warnings = instance.warnings.len(),
            "transformer instantiated"
        );
        report.record_instance(&instance);
        instances.push(instance);
    }

    let null_columns = affected_positions(&instances, &header);
    let columns: Arc<[String]> = header.clone().into();
    let sentinel = config.null_sentinel.as_bytes();

    let file = BufWriter::new(File::create(output)?);
    let counting = CountingWriter::new(file);
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(counting);
    writer.write_record(&header)?;

    info!(
        table = report.table.as_str(),
        transformers = instances.len(),
        input = %input.display(),
        "masking started"
    );

    let mut row_buf = csv::ByteRecord::new();
    let mut rows: u64 = 0;
    while reader.read_byte_record(&mut row_buf)? {
        rows += 1;
        let values: Vec<RawValue> = row_buf
            .iter()
            .map(|field| {
                if field == sentinel {
                    RawValue::null()
                } else {
                    RawValue::new(field)
                }
            })
            .collect();

        for (name, position) in &null_columns {
            if values[*position].is_null {
                *report.nulls_preserved.entry(name.clone()).or_insert(0) += 1;
            }
        }

        let mut record = MemoryRecord::new(Arc::clone(&columns), values)?;
        for instance in &mut instances {
            instance
                .transformer
                .transform(ctx, &mut record)
                .map_err(|source| CliError::Row { row: rows, source })?;
        }

        let out = record.into_values();
        // A generated value spelled like the NULL marker would read back as NULL.
        if let Some((column, _)) = header
            .iter()
            .zip(&out)
            .find(|(_, value)| !value.is_null && value.data == sentinel)
        {
            return Err(CliError::SentinelCollision {
                row: rows,
                column: column.clone(),
            });
        }
        let fields = out.iter().map(|value| {
            if value.is_null {
                sentinel
            } else {
                value.data.as_slice()
            }
        });
        writer.write_record(fields)?;
    }

    writer.flush()?;
    let counting = writer.into_inner().map_err(|err| err.into_error())?;
    report.rows = rows;
    report.bytes_written = counting.bytes_written();
    report.duration_ms = started.elapsed().as_millis() as u64;
    debug!(rows, bytes = report.bytes_written, "output flushed");
    info!(rows, duration_ms = report.duration_ms, "masking finished");
    Ok(())
}

/// Affected column names paired with their position in the header.
fn affected_positions(instances: &[TransformerInstance], header: &[String]) -> Vec<(String, usize)> {
    let mut seen = BTreeMap::new();
    for instance in instances {
        for column in instance.transformer.affected_columns() {
            if let Some(position) = header.iter().position(|name| name == column) {
                seen.insert(column.to_string(), position);
            }
        }
    }
    seen.into_iter().collect()
}

struct CountingWriter<W: Write> {
    inner: W,
    bytes: u64,
}

impl<W: Write> CountingWriter<W> {
    fn new(inner: W) -> Self {
        Self { inner, bytes: 0 }
    }

    fn bytes_written(&self) -> u64 {
        self.bytes
    }
}

impl<W: Write> Write for CountingWriter<W> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let size = self.inner.write(buf)?;
        self.bytes = self.bytes.saturating_add(size as u64);
        Ok(size)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.inner.flush()
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use uuid::Uuid;
    use veil_transform::default_registry;

    use super::*;

    fn temp_dir() -> PathBuf {
        let dir = std::env::temp_dir().join(format!("veil_mask_{}", Uuid::new_v4()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    const CONFIG: &str = r#"
global_salt = "00112233"

[table]
name = "users"
columns = [{ name = "id", data_type = "integer" }]

[[transformers]]
name = "RandomPerson"
[transformers.params]
engine = "hash"
columns = [{ name = "full_name", template = "{{ .FirstName }} {{ .LastName }}" }]
"#;

    fn run(dir: &Path, input: &str) -> (String, MaskReport) {
        let config = MaskConfig::parse(CONFIG).expect("config");
        let registry = default_registry().expect("registry");
        let ctx = TransformContext::new();
        let input_path = dir.join("in.csv");
        let output_path = dir.join("out.csv");
        std::fs::write(&input_path, input).expect("write input");
        let mut report = MaskReport::new(Uuid::new_v4().to_string());
        mask_file(&config, &registry, &ctx, &input_path, &output_path, &mut report)
            .expect("mask");
        let output = std::fs::read_to_string(&output_path).expect("read output");
        (output, report)
    }

    #[test]
    fn masks_column_and_preserves_nulls() {
        let dir = temp_dir();
        let (output, report) = run(&dir, "id,full_name\n1,Alice Smith\n2,\\N\n3,Bob Jones\n");
        let lines: Vec<&str> = output.lines().collect();

        assert_eq!(lines.len(), 4);
        assert_eq!(lines[0], "id,full_name");
        let masked = lines[1].strip_prefix("1,").expect("id kept");
        assert_eq!(masked.split(' ').count(), 2);
        assert_eq!(lines[2], "2,\\N");
        assert_eq!(report.rows, 3);
        assert_eq!(report.nulls_preserved.get("full_name"), Some(&1));
        assert_eq!(report.table, "public.users");
        assert!(report.bytes_written > 0);
    }

    #[test]
    fn hash_engine_output_is_stable_across_runs() {
        let dir = temp_dir();
        let input = "id,full_name\n1,Alice Smith\n2,Alice Smith\n";
        let (first, _) = run(&dir, input);
        let (second, _) = run(&dir, input);
        assert_eq!(first, second);

        let lines: Vec<&str> = first.lines().collect();
        let name = |line: &str| line.split_once(',').map(|(_, rest)| rest.to_string());
        assert_eq!(name(lines[1]), name(lines[2]));
    }

    #[test]
    fn generated_value_matching_null_marker_is_rejected() {
        let dir = temp_dir();
        let config = MaskConfig::parse(
            r#"
[table]
name = "users"

[[transformers]]
name = "RandomPerson"
[transformers.params]
columns = [{ name = "full_name", template = "\\N" }]
"#,
        )
        .expect("config");
        let registry = default_registry().expect("registry");
        let input_path = dir.join("in.csv");
        std::fs::write(&input_path, "id,full_name\n1,Alice\n").expect("write input");
        let mut report = MaskReport::new("run".to_string());

        let err = mask_file(
            &config,
            &registry,
            &TransformContext::new(),
            &input_path,
            &dir.join("out.csv"),
            &mut report,
        )
        .expect_err("collision");
        assert!(
            matches!(err, CliError::SentinelCollision { row: 1, ref column } if column == "full_name")
        );
        assert_eq!(report.warnings_by_code.get("static_template"), Some(&1));
    }

    #[test]
    fn unknown_column_in_params_fails_before_writing_rows() {
        let dir = temp_dir();
        let config = MaskConfig::parse(CONFIG).expect("config");
        let registry = default_registry().expect("registry");
        let input_path = dir.join("in.csv");
        std::fs::write(&input_path, "id,name\n1,Alice\n").expect("write input");
        let mut report = MaskReport::new("run".to_string());

        let err = mask_file(
            &config,
            &registry,
            &TransformContext::new(),
            &input_path,
            &dir.join("out.csv"),
            &mut report,
        )
        .expect_err("unknown column");
        assert!(matches!(err, CliError::Config(_)));
        assert!(!dir.join("out.csv").exists());
    }
}
