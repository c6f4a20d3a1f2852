//! Transformer definitions and the name → definition registry.

use std::collections::BTreeMap;
use std::fmt;

use veil_core::{Record, RowDriver};

use crate::context::TransformContext;
use crate::errors::{ConfigurationError, TransformError, ValidationWarning};
use crate::params::ParamSpec;
use crate::random_person;

pub use crate::params::RawParams;

/// Settings shared by every transformer built for one run.
#[derive(Debug, Clone, Default)]
pub struct InstanceOptions {
    /// Key for hash engines when a transformer does not set its own salt.
    pub global_salt: Option<Vec<u8>>,
}

/// Per-row column transformation.
///
/// Takes `&mut self` because random engines advance an internal stream;
/// each worker owns its own instance.
pub trait Transformer: Send {
    fn name(&self) -> &'static str;

    fn affected_columns(&self) -> Vec<&str>;

    fn transform(
        &mut self,
        ctx: &TransformContext,
        record: &mut dyn Record,
    ) -> Result<(), TransformError>;
}

/// A constructed transformer plus the advisory warnings produced while
/// validating its configuration.
pub struct TransformerInstance {
    pub transformer: Box<dyn Transformer>,
    pub warnings: Vec<ValidationWarning>,
}

impl fmt::Debug for TransformerInstance {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerInstance")
            .field("transformer", &self.transformer.name())
            .field("columns", &self.transformer.affected_columns())
            .field("warnings", &self.warnings)
            .finish()
    }
}

pub type TransformerFactory = fn(
    &TransformContext,
    &dyn RowDriver,
    &RawParams,
    &InstanceOptions,
) -> Result<TransformerInstance, ConfigurationError>;

/// Declarative metadata plus the factory building the transformer.
#[derive(Clone)]
pub struct TransformerDefinition {
    pub name: &'static str,
    pub description: &'static str,
    pub params: &'static [ParamSpec],
    factory: TransformerFactory,
}

impl TransformerDefinition {
    pub fn new(
        name: &'static str,
        description: &'static str,
        params: &'static [ParamSpec],
        factory: TransformerFactory,
    ) -> Self {
        Self {
            name,
            description,
            params,
            factory,
        }
    }

    /// Validate `params` against `driver` and build the transformer.
    pub fn instance(
        &self,
        ctx: &TransformContext,
        driver: &dyn RowDriver,
        params: &RawParams,
        options: &InstanceOptions,
    ) -> Result<TransformerInstance, ConfigurationError> {
        (self.factory)(ctx, driver, params, options)
    }
}

impl fmt::Debug for TransformerDefinition {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TransformerDefinition")
            .field("name", &self.name)
            .field("description", &self.description)
            .field("params", &self.params)
            .finish_non_exhaustive()
    }
}

/// Name → definition map, filled once at startup and read-only afterwards.
#[derive(Debug, Clone, Default)]
pub struct TransformerRegistry {
    definitions: BTreeMap<&'static str, TransformerDefinition>,
}

impl TransformerRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn register(&mut self, definition: TransformerDefinition) -> Result<(), ConfigurationError> {
        if self.definitions.contains_key(definition.name) {
            return Err(ConfigurationError::DuplicateTransformer(definition.name));
        }
        self.definitions.insert(definition.name, definition);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Option<&TransformerDefinition> {
        self.definitions.get(name)
    }

    pub fn definitions(&self) -> impl Iterator<Item = &TransformerDefinition> {
        self.definitions.values()
    }

    /// Look up `name` and build an instance of it.
    pub fn instance(
        &self,
        name: &str,
        ctx: &TransformContext,
        driver: &dyn RowDriver,
        params: &RawParams,
        options: &InstanceOptions,
    ) -> Result<TransformerInstance, ConfigurationError> {
        let definition = self
            .get(name)
            .ok_or_else(|| ConfigurationError::UnknownTransformer(name.to_string()))?;
        definition.instance(ctx, driver, params, options)
    }
}

/// Registry with every built-in transformer.
pub fn default_registry() -> Result<TransformerRegistry, ConfigurationError> {
    let mut registry = TransformerRegistry::new();
    random_person::register(&mut registry)?;
    Ok(registry)
}
