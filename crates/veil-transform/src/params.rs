//! Decoding of the raw parameter bag handed to transformer factories.

use serde::Serialize;
use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::errors::ConfigurationError;

/// Unevaluated parameters as produced by a configuration loader.
pub type RawParams = Map<String, Value>;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ParamKind {
    String,
    Array,
    Object,
}

/// Declared parameter of a transformer.
#[derive(Clone, Copy, Debug, Serialize)]
pub struct ParamSpec {
    pub key: &'static str,
    pub kind: ParamKind,
    pub required: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub default: Option<&'static str>,
    pub description: &'static str,
}

impl ParamSpec {
    pub const fn new(key: &'static str, kind: ParamKind, required: bool) -> Self {
        Self {
            key,
            kind,
            required,
            default: None,
            description: "",
        }
    }

    pub const fn with_default(mut self, default: &'static str) -> Self {
        self.default = Some(default);
        self
    }

    pub const fn describe(mut self, description: &'static str) -> Self {
        self.description = description;
        self
    }
}

/// Parameters checked against their specs.
pub struct ParamMap<'a> {
    map: &'a Map<String, Value>,
}

/// Reject unknown keys, wrongly-typed values and missing required keys.
pub fn validate_params<'a>(
    params: &'a RawParams,
    specs: &[ParamSpec],
) -> Result<ParamMap<'a>, ConfigurationError> {
    for (key, value) in params {
        let Some(spec) = specs.iter().find(|spec| spec.key == key.as_str()) else {
            return Err(ConfigurationError::UnknownParam(key.clone()));
        };
        validate_kind(key, spec.kind, value)?;
    }

    for spec in specs {
        if spec.required && !params.contains_key(spec.key) {
            return Err(ConfigurationError::MissingParam(spec.key));
        }
    }

    Ok(ParamMap { map: params })
}

impl<'a> ParamMap<'a> {
    pub fn contains(&self, key: &str) -> bool {
        self.map.contains_key(key)
    }

    pub fn get_str(&self, key: &str) -> Option<&'a str> {
        self.map.get(key).and_then(|value| value.as_str())
    }

    /// Deserialize a structured parameter into `T`.
    pub fn decode<T: DeserializeOwned>(&self, key: &str) -> Result<Option<T>, ConfigurationError> {
        let Some(value) = self.map.get(key) else {
            return Ok(None);
        };
        serde_json::from_value(value.clone())
            .map(Some)
            .map_err(|err| ConfigurationError::InvalidParam {
                param: key.to_string(),
                reason: err.to_string(),
            })
    }
}

/// Parse a hex-encoded salt.
pub fn parse_hex_salt(param: &str, value: &str) -> Result<Vec<u8>, ConfigurationError> {
    hex::decode(value.trim()).map_err(|err| ConfigurationError::InvalidParam {
        param: param.to_string(),
        reason: format!("salt must be hex encoded: {err}"),
    })
}

fn validate_kind(key: &str, kind: ParamKind, value: &Value) -> Result<(), ConfigurationError> {
    let valid = match kind {
        ParamKind::String => value.is_string(),
        ParamKind::Array => value.is_array(),
        ParamKind::Object => value.is_object(),
    };

    if valid {
        Ok(())
    } else {
        Err(ConfigurationError::InvalidParam {
            param: key.to_string(),
            reason: format!("expected {}", kind_name(kind)),
        })
    }
}

fn kind_name(kind: ParamKind) -> &'static str {
    match kind {
        ParamKind::String => "a string",
        ParamKind::Array => "an array",
        ParamKind::Object => "an object",
    }
}
