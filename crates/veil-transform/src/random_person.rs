//! `RandomPerson`: replace text columns with a synthetic person name.
//!
//! Each configured column gets its own template. Per row, a non-null value is
//! turned into entropy (randomly, or by hashing the original value), the
//! entropy picks a person from the name corpus, and the column's template
//! renders that person. NULL stays NULL.

use std::collections::{BTreeSet, HashMap};
use std::fmt;
use std::sync::Arc;

use serde::Deserialize;
use tracing::{debug, trace, warn};

use veil_core::{Column, RawValue, Record, RowDriver};

use crate::context::TransformContext;
use crate::errors::{ConfigurationError, TransformError, ValidationWarning};
use crate::generators::{self, EngineKind, Generator};
use crate::names::NameCorpus;
use crate::params::{ParamKind, ParamMap, ParamSpec, RawParams, parse_hex_salt, validate_params};
use crate::person::{Gender, GenderPolicy, PersonSynthesizer};
use crate::registry::{
    InstanceOptions, Transformer, TransformerDefinition, TransformerInstance, TransformerRegistry,
};
use crate::template::CompiledTemplate;

pub const RANDOM_PERSON: &str = "RandomPerson";

const PARAMS: &[ParamSpec] = &[
    ParamSpec::new("columns", ParamKind::Array, true)
        .describe("columns to replace, as [{name, template}] with {{ .Field }} placeholders"),
    ParamSpec::new("engine", ParamKind::String, false)
        .with_default("random")
        .describe("entropy source: random or hash (deterministic per original value)"),
    ParamSpec::new("gender", ParamKind::String, false)
        .with_default("Any")
        .describe("gender of generated persons: Male, Female or Any"),
    ParamSpec::new("salt", ParamKind::String, false)
        .describe("hex key for the hash engine; overrides the global salt"),
    ParamSpec::new("gender_column", ParamKind::String, false)
        .describe("column whose value selects the gender per row"),
    ParamSpec::new("gender_mapping", ParamKind::Object, false)
        .describe("values of gender_column meaning each gender, as {Male: [...], Female: [...]}"),
    ParamSpec::new("fallback_gender", ParamKind::String, false)
        .with_default("Any")
        .describe("gender used when gender_column is NULL or unmapped"),
];

const DEFAULT_MALE_VALUES: &[&str] = &["male", "m", "man", "Male", "M", "Man", "MALE"];
const DEFAULT_FEMALE_VALUES: &[&str] = &["female", "f", "woman", "Female", "F", "Woman", "FEMALE"];

const TEXT_TYPES: &[&str] = &["text", "character varying", "varchar", "citext", "name"];
const PADDED_TYPES: &[&str] = &["character", "char", "bpchar"];
const UNVERIFIED_TYPES: &[&str] = &["user-defined"];

pub fn register(registry: &mut TransformerRegistry) -> Result<(), ConfigurationError> {
    registry.register(definition())
}

pub fn definition() -> TransformerDefinition {
    TransformerDefinition::new(
        RANDOM_PERSON,
        "Generate a person name (title, first, middle, last name, gender) and render it per column template",
        PARAMS,
        new_random_person,
    )
}

fn new_random_person(
    _ctx: &TransformContext,
    driver: &dyn RowDriver,
    params: &RawParams,
    options: &InstanceOptions,
) -> Result<TransformerInstance, ConfigurationError> {
    let (transformer, warnings) =
        RandomPersonTransformer::from_params(driver, params, options, NameCorpus::builtin())?;
    Ok(TransformerInstance {
        transformer: Box::new(transformer),
        warnings,
    })
}

#[derive(Debug, Deserialize)]
#[serde(deny_unknown_fields)]
struct ColumnParam {
    name: String,
    template: String,
}

#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct GenderMappingParam {
    #[serde(rename = "Male", default)]
    male: Vec<String>,
    #[serde(rename = "Female", default)]
    female: Vec<String>,
}

#[derive(Debug)]
struct ColumnSpec {
    name: String,
    template: CompiledTemplate,
}

#[derive(Debug)]
enum GenderSource {
    Fixed(GenderPolicy),
    Column {
        column: String,
        mapping: HashMap<String, Gender>,
        fallback: GenderPolicy,
    },
}

impl GenderSource {
    fn reachable(&self) -> &'static [Gender] {
        match self {
            GenderSource::Fixed(policy) => policy.reachable(),
            GenderSource::Column { .. } => &Gender::ALL,
        }
    }

    fn needs_selector(&self) -> bool {
        match self {
            GenderSource::Fixed(policy) => *policy == GenderPolicy::Any,
            GenderSource::Column { fallback, .. } => *fallback == GenderPolicy::Any,
        }
    }
}

/// Transformer replacing each configured column with a rendered person.
pub struct RandomPersonTransformer {
    columns: Vec<ColumnSpec>,
    engine: EngineKind,
    gender: GenderSource,
    synthesizer: PersonSynthesizer,
    generator: Box<dyn Generator>,
}

impl fmt::Debug for RandomPersonTransformer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RandomPersonTransformer")
            .field("columns", &self.columns)
            .field("engine", &self.engine)
            .field("gender", &self.gender)
            .field("entropy_len", &self.synthesizer.entropy_len())
            .finish_non_exhaustive()
    }
}

impl RandomPersonTransformer {
    /// Validate `params` and build the transformer over `corpus`.
    ///
    /// Every error is reported here; a returned transformer never fails on
    /// configuration while processing rows.
    pub fn from_params(
        driver: &dyn RowDriver,
        params: &RawParams,
        options: &InstanceOptions,
        corpus: Arc<NameCorpus>,
    ) -> Result<(Self, Vec<ValidationWarning>), ConfigurationError> {
        let params = validate_params(params, PARAMS)?;
        let mut warnings = Vec::new();

        let column_params: Vec<ColumnParam> = params
            .decode("columns")?
            .ok_or(ConfigurationError::MissingParam("columns"))?;
        let resolved = resolve_columns(driver, &column_params)?;

        let engine = params
            .get_str("engine")
            .map(EngineKind::parse)
            .transpose()?
            .unwrap_or(EngineKind::Random);
        let gender = gender_source(driver, &params, &mut warnings)?;

        let mut columns = Vec::with_capacity(column_params.len());
        for param in &column_params {
            let template = CompiledTemplate::compile(&param.template).map_err(|source| {
                ConfigurationError::Template {
                    column: param.name.clone(),
                    source,
                }
            })?;
            columns.push(ColumnSpec {
                name: param.name.clone(),
                template,
            });
        }

        let synthesizer = PersonSynthesizer::new(corpus, gender.reachable(), gender.needs_selector())?;

        for (spec, column) in columns.iter().zip(&resolved) {
            check_column(column, &spec.template, &synthesizer, &mut warnings)?;
        }

        let salt = resolve_salt(&params, options, engine, &mut warnings)?;
        let generator = generators::build(engine, synthesizer.entropy_len(), salt.as_deref())?;

        for warning in &warnings {
            warn!(
                transformer = RANDOM_PERSON,
                code = warning.code,
                path = %warning.path,
                "{}",
                warning.message
            );
        }
        for column in &columns {
            debug!(
                transformer = RANDOM_PERSON,
                column = %column.name,
                template = column.template.source(),
                "column template compiled"
            );
        }
        debug!(
            transformer = RANDOM_PERSON,
            table = %driver.table_name(),
            columns = columns.len(),
            engine = engine.as_str(),
            entropy_len = synthesizer.entropy_len(),
            "transformer ready"
        );

        Ok((
            Self {
                columns,
                engine,
                gender,
                synthesizer,
                generator,
            },
            warnings,
        ))
    }

    pub fn entropy_len(&self) -> usize {
        self.synthesizer.entropy_len()
    }

    fn row_gender(&self, record: &dyn Record) -> Result<GenderPolicy, TransformError> {
        match &self.gender {
            GenderSource::Fixed(policy) => Ok(*policy),
            GenderSource::Column {
                column,
                mapping,
                fallback,
            } => {
                let value = record.get_raw_column_value_by_name(column).map_err(|source| {
                    TransformError::Record {
                        column: column.clone(),
                        source,
                    }
                })?;
                Ok(value
                    .as_str()
                    .and_then(|text| mapping.get(text.trim()))
                    .map(|gender| GenderPolicy::from(*gender))
                    .unwrap_or(*fallback))
            }
        }
    }
}

impl Transformer for RandomPersonTransformer {
    fn name(&self) -> &'static str {
        RANDOM_PERSON
    }

    fn affected_columns(&self) -> Vec<&str> {
        self.columns.iter().map(|column| column.name.as_str()).collect()
    }

    fn transform(
        &mut self,
        ctx: &TransformContext,
        record: &mut dyn Record,
    ) -> Result<(), TransformError> {
        if ctx.is_cancelled() {
            return Err(TransformError::Cancelled);
        }

        let mut originals = Vec::with_capacity(self.columns.len());
        for column in &self.columns {
            let value = record
                .get_raw_column_value_by_name(&column.name)
                .map_err(|source| TransformError::Record {
                    column: column.name.clone(),
                    source,
                })?;
            originals.push(value);
        }

        // NULL columns are left untouched and never drive generation.
        let Some(first) = originals.iter().position(|value| !value.is_null) else {
            return Ok(());
        };
        let lead = self.columns[first].name.as_str();

        let policy = self.row_gender(record)?;
        let seed = match self.engine {
            EngineKind::Hash => row_seed(&originals),
            EngineKind::Random => Vec::new(),
        };
        let entropy = self
            .generator
            .generate(&seed)
            .map_err(|source| TransformError::Generation {
                column: lead.to_string(),
                source,
            })?;
        let person = self
            .synthesizer
            .synthesize(&entropy, policy)
            .map_err(|source| TransformError::Generation {
                column: lead.to_string(),
                source,
            })?;
        trace!(column = lead, gender = %person.gender, "person generated");

        for (column, original) in self.columns.iter().zip(&originals) {
            if original.is_null {
                continue;
            }
            let rendered = RawValue::new(column.template.render(&person));
            record
                .set_raw_column_value_by_name(&column.name, rendered)
                .map_err(|source| TransformError::Record {
                    column: column.name.clone(),
                    source,
                })?;
        }

        Ok(())
    }
}

/// Hash seed for one row.
///
/// A lone non-null value seeds with its raw bytes. Several values are joined
/// in column order, each prefixed with its big-endian `u32` length; NULL
/// columns contribute `u32::MAX` so their position stays distinct.
fn row_seed(originals: &[RawValue]) -> Vec<u8> {
    let mut present = originals.iter().filter(|value| !value.is_null);
    if let (Some(only), None) = (present.next(), present.next()) {
        return only.data.clone();
    }

    let capacity = originals.iter().map(|value| value.data.len() + 4).sum();
    let mut seed = Vec::with_capacity(capacity);
    for value in originals {
        if value.is_null {
            seed.extend_from_slice(&u32::MAX.to_be_bytes());
        } else {
            let len = u32::try_from(value.data.len()).unwrap_or(u32::MAX - 1);
            seed.extend_from_slice(&len.to_be_bytes());
            seed.extend_from_slice(&value.data);
        }
    }
    seed
}

fn resolve_columns<'d>(
    driver: &'d dyn RowDriver,
    params: &[ColumnParam],
) -> Result<Vec<&'d Column>, ConfigurationError> {
    if params.is_empty() {
        return Err(ConfigurationError::EmptyColumns);
    }

    let mut seen = BTreeSet::new();
    let mut resolved = Vec::with_capacity(params.len());
    for param in params {
        if !seen.insert(param.name.as_str()) {
            return Err(ConfigurationError::DuplicateColumn(param.name.clone()));
        }
        let column = driver
            .column(&param.name)
            .ok_or_else(|| ConfigurationError::UnknownColumn {
                column: param.name.clone(),
                table: driver.table_name(),
            })?;
        resolved.push(column);
    }
    Ok(resolved)
}

fn gender_source(
    driver: &dyn RowDriver,
    params: &ParamMap<'_>,
    warnings: &mut Vec<ValidationWarning>,
) -> Result<GenderSource, ConfigurationError> {
    let gender = params
        .get_str("gender")
        .map(|value| GenderPolicy::parse("gender", value))
        .transpose()?
        .unwrap_or(GenderPolicy::Any);

    let Some(column) = params.get_str("gender_column") else {
        for key in ["gender_mapping", "fallback_gender"] {
            if params.contains(key) {
                warnings.push(ValidationWarning::new(
                    "unused_param",
                    key,
                    format!("{key} has no effect without gender_column"),
                    Some("set gender_column or remove the param".to_string()),
                ));
            }
        }
        return Ok(GenderSource::Fixed(gender));
    };

    if driver.column(column).is_none() {
        return Err(ConfigurationError::UnknownColumn {
            column: column.to_string(),
            table: driver.table_name(),
        });
    }

    if params.contains("gender") {
        warnings.push(ValidationWarning::new(
            "gender_overridden",
            "gender",
            "gender is ignored because gender_column is set",
            Some("use fallback_gender for rows without a mapped gender".to_string()),
        ));
    }

    let fallback = params
        .get_str("fallback_gender")
        .map(|value| GenderPolicy::parse("fallback_gender", value))
        .transpose()?
        .unwrap_or(GenderPolicy::Any);

    let mapping_param: GenderMappingParam = match params.decode("gender_mapping")? {
        Some(mapping) => mapping,
        None => GenderMappingParam {
            male: DEFAULT_MALE_VALUES.iter().map(|v| v.to_string()).collect(),
            female: DEFAULT_FEMALE_VALUES.iter().map(|v| v.to_string()).collect(),
        },
    };

    let mut mapping = HashMap::new();
    for (values, gender) in [
        (&mapping_param.male, Gender::Male),
        (&mapping_param.female, Gender::Female),
    ] {
        for value in values {
            let key = value.trim().to_string();
            if let Some(existing) = mapping.insert(key.clone(), gender)
                && existing != gender
            {
                return Err(ConfigurationError::AmbiguousGenderMapping(key));
            }
        }
    }

    Ok(GenderSource::Column {
        column: column.to_string(),
        mapping,
        fallback,
    })
}

fn check_column(
    column: &Column,
    template: &CompiledTemplate,
    synthesizer: &PersonSynthesizer,
    warnings: &mut Vec<ValidationWarning>,
) -> Result<(), ConfigurationError> {
    let path = format!("columns.{}", column.name);
    let data_type = column.column_type.normalized();

    if PADDED_TYPES.contains(&data_type.as_str()) {
        warnings.push(ValidationWarning::new(
            "fixed_width_padding",
            path.clone(),
            format!("{data_type} pads generated names with trailing spaces"),
            Some("prefer text or character varying".to_string()),
        ));
    } else if UNVERIFIED_TYPES.contains(&data_type.as_str()) {
        warnings.push(ValidationWarning::new(
            "unverified_type",
            path.clone(),
            "user-defined type; generated text may be rejected on restore",
            None,
        ));
    } else if !TEXT_TYPES.contains(&data_type.as_str()) {
        return Err(ConfigurationError::IncompatibleColumnType {
            column: column.name.clone(),
            data_type: column.column_type.data_type.clone(),
        });
    }

    if let Some(max_len) = column.column_type.character_max_length {
        let longest = template.max_rendered_chars(synthesizer.corpus(), synthesizer.genders());
        if longest > max_len.max(0) as usize {
            warnings.push(ValidationWarning::new(
                "possible_truncation",
                path.clone(),
                format!("rendered value may reach {longest} characters but column allows {max_len}"),
                Some("shorten the template or widen the column".to_string()),
            ));
        }
    }

    if template.fields().next().is_none() {
        warnings.push(ValidationWarning::new(
            "static_template",
            path,
            "template has no placeholders; every row gets the same value",
            None,
        ));
    }

    Ok(())
}

fn resolve_salt(
    params: &ParamMap<'_>,
    options: &InstanceOptions,
    engine: EngineKind,
    warnings: &mut Vec<ValidationWarning>,
) -> Result<Option<Vec<u8>>, ConfigurationError> {
    let salt = match params.get_str("salt") {
        Some(value) => Some(parse_hex_salt("salt", value)?),
        None => options.global_salt.clone(),
    };

    if engine == EngineKind::Random && params.contains("salt") {
        warnings.push(ValidationWarning::new(
            "unused_param",
            "salt",
            "salt has no effect with the random engine",
            Some("set engine = \"hash\" or remove the salt".to_string()),
        ));
    }

    Ok(salt)
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};
    use veil_core::{ColumnType, MemoryRecord, TableSchema};

    use super::*;
    use crate::names::{DEFAULT_FIRST_NAMES_FEMALE, DEFAULT_FIRST_NAMES_MALE};

    fn table() -> TableSchema {
        TableSchema::from_columns(
            "public",
            "users",
            [
                ("id", ColumnType::new("integer")),
                ("name", ColumnType::new("text")),
                ("sex", ColumnType::new("text")),
                ("code", ColumnType::new("character").with_max_length(60)),
                ("short", ColumnType::new("character varying").with_max_length(5)),
                ("tag", ColumnType::new("USER-DEFINED")),
            ],
        )
    }

    fn params(value: Value) -> RawParams {
        match value {
            Value::Object(map) => map,
            _ => panic!("params must be an object"),
        }
    }

    fn build(value: Value) -> Result<(RandomPersonTransformer, Vec<ValidationWarning>), ConfigurationError> {
        RandomPersonTransformer::from_params(
            &table(),
            &params(value),
            &InstanceOptions::default(),
            NameCorpus::builtin(),
        )
    }

    fn row(name: RawValue, sex: RawValue) -> MemoryRecord {
        let columns: Arc<[String]> = table().column_names().into();
        MemoryRecord::new(
            columns,
            vec![
                RawValue::new("1"),
                name,
                sex,
                RawValue::new("x"),
                RawValue::new("y"),
                RawValue::new("z"),
            ],
        )
        .expect("record")
    }

    #[test]
    fn rejects_non_text_column() {
        let err = build(json!({"columns": [{"name": "id", "template": "{{ .FirstName }}"}]}))
            .expect_err("integer column");
        assert!(matches!(err, ConfigurationError::IncompatibleColumnType { column, .. } if column == "id"));
    }

    #[test]
    fn rejects_duplicate_and_empty_columns() {
        let err = build(json!({"columns": []})).expect_err("empty");
        assert!(matches!(err, ConfigurationError::EmptyColumns));

        let err = build(json!({"columns": [
            {"name": "name", "template": "{{ .FirstName }}"},
            {"name": "name", "template": "{{ .LastName }}"}
        ]}))
        .expect_err("duplicate");
        assert!(matches!(err, ConfigurationError::DuplicateColumn(name) if name == "name"));
    }

    #[test]
    fn rejects_unknown_column_keys() {
        let err = build(json!({"columns": [{"name": "name", "template": "x", "tpl": "y"}]}))
            .expect_err("unknown key");
        assert!(matches!(err, ConfigurationError::InvalidParam { param, .. } if param == "columns"));
    }

    #[test]
    fn rejects_invalid_enums() {
        let err = build(json!({"columns": [{"name": "name", "template": "x"}], "gender": "any"}))
            .expect_err("gender");
        assert!(matches!(err, ConfigurationError::InvalidEnum { param: "gender", .. }));

        let err = build(json!({"columns": [{"name": "name", "template": "x"}], "engine": "md5"}))
            .expect_err("engine");
        assert!(matches!(err, ConfigurationError::InvalidEnum { param: "engine", .. }));
    }

    #[test]
    fn warns_on_padding_and_truncation() {
        let (_, warnings) = build(json!({"columns": [
            {"name": "code", "template": "{{ .FirstName }}"},
            {"name": "short", "template": "{{ .FirstName }} {{ .LastName }}"}
        ]}))
        .expect("build");
        let codes: Vec<&str> = warnings.iter().map(|w| w.code).collect();
        assert_eq!(codes, vec!["fixed_width_padding", "possible_truncation"]);
        assert_eq!(warnings[1].path, "columns.short");
    }

    #[test]
    fn warns_on_salt_with_random_engine() {
        let (_, warnings) = build(json!({
            "columns": [{"name": "name", "template": "{{ .FirstName }}"}],
            "salt": "00ff"
        }))
        .expect("build");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "unused_param");
    }

    #[test]
    fn rejects_non_hex_salt() {
        let err = build(json!({
            "columns": [{"name": "name", "template": "{{ .FirstName }}"}],
            "engine": "hash",
            "salt": "not hex"
        }))
        .expect_err("salt");
        assert!(matches!(err, ConfigurationError::InvalidParam { param, .. } if param == "salt"));
    }

    #[test]
    fn fixed_gender_skips_selector_slice() {
        let (male, _) = build(json!({
            "columns": [{"name": "name", "template": "{{ .FirstName }}"}],
            "gender": "Male"
        }))
        .expect("male");
        let (any, _) = build(json!({
            "columns": [{"name": "name", "template": "{{ .FirstName }}"}]
        }))
        .expect("any");
        assert_eq!(any.entropy_len(), male.entropy_len() + 1);
    }

    #[test]
    fn gender_column_drives_gender_per_row() {
        let (mut transformer, warnings) = build(json!({
            "columns": [{"name": "name", "template": "{{ .FirstName }}"}],
            "gender_column": "sex",
            "fallback_gender": "Female"
        }))
        .expect("build");
        assert!(warnings.is_empty());
        let ctx = TransformContext::new();

        for _ in 0..50 {
            let mut record = row(RawValue::new("Jane"), RawValue::new(" M "));
            transformer.transform(&ctx, &mut record).expect("transform");
            let value = record.get_raw_column_value_by_name("name").expect("name");
            let name = value.as_str().expect("utf8");
            assert!(DEFAULT_FIRST_NAMES_MALE.contains(&name), "{name}");

            let mut record = row(RawValue::new("Jane"), RawValue::null());
            transformer.transform(&ctx, &mut record).expect("transform");
            let value = record.get_raw_column_value_by_name("name").expect("name");
            let name = value.as_str().expect("utf8");
            assert!(DEFAULT_FIRST_NAMES_FEMALE.contains(&name), "{name}");
        }
    }

    #[test]
    fn gender_column_must_exist() {
        let err = build(json!({
            "columns": [{"name": "name", "template": "{{ .FirstName }}"}],
            "gender_column": "gender"
        }))
        .expect_err("missing gender column");
        assert!(matches!(err, ConfigurationError::UnknownColumn { column, .. } if column == "gender"));
    }

    #[test]
    fn ambiguous_gender_mapping_is_rejected() {
        let err = build(json!({
            "columns": [{"name": "name", "template": "{{ .FirstName }}"}],
            "gender_column": "sex",
            "gender_mapping": {"Male": ["x"], "Female": ["x"]}
        }))
        .expect_err("ambiguous");
        assert!(matches!(err, ConfigurationError::AmbiguousGenderMapping(value) if value == "x"));
    }

    #[test]
    fn gender_param_is_overridden_by_gender_column() {
        let (_, warnings) = build(json!({
            "columns": [{"name": "name", "template": "{{ .FirstName }}"}],
            "gender": "Male",
            "gender_column": "sex"
        }))
        .expect("build");
        assert_eq!(warnings.len(), 1);
        assert_eq!(warnings[0].code, "gender_overridden");
    }

    #[test]
    fn cancelled_context_stops_before_row() {
        let (mut transformer, _) = build(json!({
            "columns": [{"name": "name", "template": "{{ .FirstName }}"}]
        }))
        .expect("build");
        let ctx = TransformContext::new();
        ctx.cancel();
        let mut record = row(RawValue::new("Jane"), RawValue::null());
        let err = transformer.transform(&ctx, &mut record).expect_err("cancelled");
        assert!(matches!(err, TransformError::Cancelled));
        let value = record.get_raw_column_value_by_name("name").expect("name");
        assert_eq!(value.as_str(), Some("Jane"));
    }

    fn codes(warnings: &[ValidationWarning]) -> Vec<&str> {
        warnings.iter().map(|w| w.code).collect()
    }

    fn read(record: &MemoryRecord, column: &str) -> RawValue {
        record.get_raw_column_value_by_name(column).expect("read")
    }

    #[test]
    fn warns_on_user_defined_type() {
        let (_, warnings) = build(json!({"columns": [{"name": "tag", "template": "{{ .FirstName }}"}]}))
            .expect("build");
        assert_eq!(codes(&warnings), vec!["unverified_type"]);
        assert_eq!(warnings[0].path, "columns.tag");
    }

    #[test]
    fn warns_on_template_without_placeholders() {
        let (_, warnings) =
            build(json!({"columns": [{"name": "name", "template": "redacted"}]})).expect("build");
        assert_eq!(codes(&warnings), vec!["static_template"]);
    }

    #[test]
    fn warns_on_gender_params_without_gender_column() {
        let (_, warnings) = build(json!({
            "columns": [{"name": "name", "template": "{{ .FirstName }}"}],
            "gender_mapping": {"Male": ["1"]},
            "fallback_gender": "Male"
        }))
        .expect("build");
        assert_eq!(codes(&warnings), vec!["unused_param", "unused_param"]);
        let paths: Vec<&str> = warnings.iter().map(|w| w.path.as_str()).collect();
        assert_eq!(paths, vec!["gender_mapping", "fallback_gender"]);
    }

    #[test]
    fn custom_gender_mapping_drives_row_gender() {
        let (mut transformer, warnings) = build(json!({
            "columns": [{"name": "name", "template": "{{ .Gender }}"}],
            "gender_column": "sex",
            "gender_mapping": {"Male": ["1"], "Female": ["2"]}
        }))
        .expect("build");
        assert!(warnings.is_empty());
        let ctx = TransformContext::new();

        for _ in 0..20 {
            for (code, expected) in [("1", "Male"), ("2", "Female")] {
                let mut record = row(RawValue::new("Jane"), RawValue::new(code));
                transformer.transform(&ctx, &mut record).expect("transform");
                assert_eq!(read(&record, "name").as_str(), Some(expected));
            }
        }
    }

    #[test]
    fn columns_of_one_row_share_one_person() {
        let (mut transformer, _) = build(json!({
            "columns": [
                {"name": "name", "template": "{{ .Gender }}"},
                {"name": "sex", "template": "{{ .Gender }}"}
            ]
        }))
        .expect("build");
        let ctx = TransformContext::new();

        let mut genders = BTreeSet::new();
        for _ in 0..200 {
            let mut record = row(RawValue::new("Jane"), RawValue::new("F"));
            transformer.transform(&ctx, &mut record).expect("transform");
            let name = read(&record, "name");
            assert_eq!(name, read(&record, "sex"));
            genders.insert(name.data);
        }
        assert_eq!(genders.len(), 2);
    }

    #[test]
    fn hash_engine_is_deterministic_for_multi_column_rows() {
        let config = json!({
            "columns": [
                {"name": "name", "template": "{{ .Title }} {{ .FirstName }} {{ .LastName }}"},
                {"name": "sex", "template": "{{ .Gender }}"}
            ],
            "engine": "hash"
        });
        let (mut first, _) = build(config.clone()).expect("first");
        let (mut second, _) = build(config).expect("second");
        let ctx = TransformContext::new();

        for idx in 0..20 {
            let original = || row(RawValue::new(format!("Jane {idx}")), RawValue::new("F"));
            let mut a = original();
            let mut b = original();
            first.transform(&ctx, &mut a).expect("first");
            second.transform(&ctx, &mut b).expect("second");
            assert_eq!(read(&a, "name"), read(&b, "name"));
            assert_eq!(read(&a, "sex"), read(&b, "sex"));
        }
    }

    #[test]
    fn lone_value_seeds_like_a_single_column() {
        let template = "{{ .FirstName }} {{ .LastName }}";
        let (mut pair, _) = build(json!({
            "columns": [
                {"name": "name", "template": template},
                {"name": "sex", "template": "{{ .Gender }}"}
            ],
            "engine": "hash"
        }))
        .expect("pair");
        let (mut single, _) = build(json!({
            "columns": [{"name": "name", "template": template}],
            "engine": "hash"
        }))
        .expect("single");
        let ctx = TransformContext::new();

        let mut a = row(RawValue::new("Jane Roe"), RawValue::null());
        let mut b = row(RawValue::new("Jane Roe"), RawValue::null());
        pair.transform(&ctx, &mut a).expect("pair");
        single.transform(&ctx, &mut b).expect("single");
        assert_eq!(read(&a, "name"), read(&b, "name"));
        assert!(read(&a, "sex").is_null);
    }

    #[test]
    fn all_null_row_is_left_untouched() {
        let (mut transformer, _) = build(json!({
            "columns": [
                {"name": "name", "template": "{{ .FirstName }}"},
                {"name": "sex", "template": "{{ .Gender }}"}
            ],
            "engine": "hash"
        }))
        .expect("build");
        let mut record = row(RawValue::null(), RawValue::null());
        transformer
            .transform(&TransformContext::new(), &mut record)
            .expect("transform");
        assert!(read(&record, "name").is_null);
        assert!(read(&record, "sex").is_null);
    }

    #[test]
    fn row_seed_keeps_value_boundaries() {
        assert_eq!(row_seed(&[RawValue::new("ab"), RawValue::null()]), b"ab".to_vec());
        let split = |left: &str, right: &str| row_seed(&[RawValue::new(left), RawValue::new(right)]);
        assert_ne!(split("ab", "c"), split("a", "bc"));
        assert_eq!(split("a", "b"), vec![0, 0, 0, 1, b'a', 0, 0, 0, 1, b'b']);
        assert_ne!(
            row_seed(&[RawValue::new("a"), RawValue::new("b"), RawValue::null()]),
            row_seed(&[RawValue::new("a"), RawValue::null(), RawValue::new("b")])
        );
    }

    #[test]
    fn transformer_is_send() {
        fn assert_send<T: Send>() {}
        assert_send::<RandomPersonTransformer>();
    }
}
