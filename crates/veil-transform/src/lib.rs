//! Column transformers that replace sensitive values with synthetic ones.
//!
//! The `RandomPerson` transformer turns each non-null value into a plausible
//! person name. Entropy comes either from a random stream or from a keyed hash
//! of the original value, so the same input can be made to map to the same
//! person across runs.

pub mod context;
pub mod errors;
pub mod generators;
pub mod names;
pub mod params;
pub mod person;
pub mod random_person;
pub mod registry;
pub mod template;

pub use context::TransformContext;
pub use errors::{ConfigurationError, GenerationError, TransformError, ValidationWarning};
pub use generators::{EngineKind, Generator, HashBytes, RandomBytes};
pub use names::NameCorpus;
pub use person::{EntropyLayout, Gender, GenderPolicy, Person, PersonField, PersonSynthesizer};
pub use random_person::{RANDOM_PERSON, RandomPersonTransformer};
pub use registry::{
    InstanceOptions, RawParams, Transformer, TransformerDefinition, TransformerInstance,
    TransformerRegistry, default_registry,
};
pub use template::{CompiledTemplate, TemplateError};
