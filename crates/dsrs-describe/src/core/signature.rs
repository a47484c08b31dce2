use indexmap::IndexMap;
use schemars::JsonSchema;

use super::describe::Describe;
use super::errors::SchemaError;
use super::json_schema::import_schema;
use super::model::{FieldInfo, ModelRegistry};

/// Input and output fields of a prompt, plus the models their types refer to.
///
/// ```
/// use dsrs_describe::Signature;
///
/// let signature = Signature::new("Answer the question.")
///     .with_input::<String>("question", "")
///     .with_output::<Vec<String>>("answers", "candidate answers");
///
/// assert_eq!(signature.input_fields().len(), 1);
/// assert_eq!(signature.output_fields()["answers"].desc(), Some("candidate answers"));
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Signature {
    instruction: String,
    input_fields: IndexMap<String, FieldInfo>,
    output_fields: IndexMap<String, FieldInfo>,
    registry: ModelRegistry,
}

impl Signature {
    pub fn new(instruction: impl Into<String>) -> Self {
        Self {
            instruction: instruction.into(),
            ..Self::default()
        }
    }

    /// Appends an input field of type `T`. An empty `desc` means no description.
    pub fn with_input<T: Describe>(mut self, name: &str, desc: &str) -> Self {
        self.registry.register::<T>();
        self.input_fields
            .insert(name.to_string(), described(FieldInfo::new(T::annotation()), desc));
        self
    }

    /// Appends an output field of type `T`. An empty `desc` means no description.
    pub fn with_output<T: Describe>(mut self, name: &str, desc: &str) -> Self {
        self.registry.register::<T>();
        self.output_fields
            .insert(name.to_string(), described(FieldInfo::new(T::annotation()), desc));
        self
    }

    /// Appends an input field whose type is described by its `schemars` schema.
    pub fn with_schema_input<T: JsonSchema>(
        mut self,
        name: &str,
        desc: &str,
    ) -> Result<Self, SchemaError> {
        let import = import_schema::<T>()?;
        self.registry.merge(import.registry);
        self.input_fields
            .insert(name.to_string(), described(FieldInfo::new(import.root), desc));
        Ok(self)
    }

    /// Appends an output field whose type is described by its `schemars` schema.
    pub fn with_schema_output<T: JsonSchema>(
        mut self,
        name: &str,
        desc: &str,
    ) -> Result<Self, SchemaError> {
        let import = import_schema::<T>()?;
        self.registry.merge(import.registry);
        self.output_fields
            .insert(name.to_string(), described(FieldInfo::new(import.root), desc));
        Ok(self)
    }

    /// Inserts a prepared input field at `index`, shifting later fields back.
    pub fn insert_input(&mut self, index: usize, name: impl Into<String>, field: FieldInfo) {
        let index = index.min(self.input_fields.len());
        self.input_fields.shift_insert(index, name.into(), field);
    }

    /// Inserts a prepared output field at `index`, shifting later fields back.
    pub fn insert_output(&mut self, index: usize, name: impl Into<String>, field: FieldInfo) {
        let index = index.min(self.output_fields.len());
        self.output_fields.shift_insert(index, name.into(), field);
    }

    /// Makes `registry`'s models available to fields inserted by hand.
    pub fn register_models(&mut self, registry: ModelRegistry) {
        self.registry.merge(registry);
    }

    pub fn instruction(&self) -> &str {
        &self.instruction
    }

    pub fn input_fields(&self) -> &IndexMap<String, FieldInfo> {
        &self.input_fields
    }

    pub fn output_fields(&self) -> &IndexMap<String, FieldInfo> {
        &self.output_fields
    }

    pub fn registry(&self) -> &ModelRegistry {
        &self.registry
    }
}

fn described(field: FieldInfo, desc: &str) -> FieldInfo {
    if desc.trim().is_empty() {
        field
    } else {
        field.with_desc(desc)
    }
}
