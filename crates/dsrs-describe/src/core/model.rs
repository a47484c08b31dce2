use bon::Builder;
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use super::annotation::{ModelRef, TypeAnnotation};

/// Metadata for one declared field of a model or signature.
#[derive(Builder, Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldInfo {
    /// Declared type of the field.
    #[builder(into)]
    pub annotation: TypeAnnotation,
    /// Human-written description shown to the LM, if any.
    #[builder(into)]
    pub description: Option<String>,
    /// Whether the field can be omitted because it has a default value.
    #[builder(default)]
    #[serde(default)]
    pub has_default: bool,
}

impl FieldInfo {
    pub fn new(annotation: impl Into<TypeAnnotation>) -> Self {
        Self {
            annotation: annotation.into(),
            description: None,
            has_default: false,
        }
    }

    pub fn with_desc(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    pub fn with_default(mut self) -> Self {
        self.has_default = true;
        self
    }

    /// The description, treating an empty or whitespace-only one as absent.
    pub fn desc(&self) -> Option<&str> {
        self.description
            .as_deref()
            .map(str::trim)
            .filter(|desc| !desc.is_empty())
    }
}

/// A structured-data model: its identity plus its fields in declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelSchema {
    model: ModelRef,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    doc: Option<String>,
    fields: IndexMap<String, FieldInfo>,
}

impl ModelSchema {
    pub fn new(model: impl Into<ModelRef>) -> Self {
        Self {
            model: model.into(),
            doc: None,
            fields: IndexMap::new(),
        }
    }

    pub fn with_doc(mut self, doc: impl Into<String>) -> Self {
        let doc = doc.into();
        self.doc = (!doc.trim().is_empty()).then_some(doc);
        self
    }

    /// Appends a field. Re-declaring a name replaces the earlier field in place.
    pub fn with_field(mut self, name: impl Into<String>, field: FieldInfo) -> Self {
        self.fields.insert(name.into(), field);
        self
    }

    pub fn model_ref(&self) -> &ModelRef {
        &self.model
    }

    pub fn id(&self) -> &str {
        self.model.id()
    }

    /// Display name used in prompts.
    pub fn name(&self) -> &str {
        self.model.name()
    }

    pub fn doc(&self) -> Option<&str> {
        self.doc.as_deref()
    }

    pub fn fields(&self) -> &IndexMap<String, FieldInfo> {
        &self.fields
    }

    pub fn field(&self, name: &str) -> Option<&FieldInfo> {
        self.fields.get(name)
    }
}

/// Collection of every model reachable from some root type, keyed by
/// [`ModelRef::id`].
///
/// Field annotations only carry a [`ModelRef`]; the registry is where the walker
/// looks up that model's own fields.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ModelRegistry {
    models: IndexMap<String, ModelSchema>,
}

impl ModelRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Collects `T` and every model reachable from its fields.
    pub fn of<T: crate::Describe>() -> Self {
        let mut registry = Self::new();
        T::register(&mut registry);
        registry
    }

    /// Registers `T` (and, transitively, the models its fields use).
    pub fn register<T: crate::Describe>(&mut self) -> &mut Self {
        T::register(self);
        self
    }

    /// Inserts a model, returning the schema previously stored under the same id.
    pub fn insert(&mut self, model: ModelSchema) -> Option<ModelSchema> {
        self.models.insert(model.id().to_string(), model)
    }

    pub fn contains(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// Looks a model up by id, then by display name.
    ///
    /// The display-name fallback lets callers write `get("Person")` for a model
    /// registered under its full type path. When several registered models share
    /// that name the first one registered is returned; use [`resolve`](Self::resolve)
    /// with the field's [`ModelRef`] to get an exact match.
    pub fn get(&self, key: &str) -> Option<&ModelSchema> {
        self.models
            .get(key)
            .or_else(|| self.models.values().find(|model| model.name() == key))
    }

    /// Exact lookup by identity.
    pub fn resolve(&self, model: &ModelRef) -> Option<&ModelSchema> {
        self.models.get(model.id())
    }

    /// Adds every model from `other` not already present here.
    pub fn merge(&mut self, other: ModelRegistry) {
        for (id, model) in other.models {
            self.models.entry(id).or_insert(model);
        }
    }

    pub fn models(&self) -> impl Iterator<Item = &ModelSchema> {
        self.models.values()
    }

    pub fn len(&self) -> usize {
        self.models.len()
    }

    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Primitive;

    #[test]
    fn field_builder_defaults() {
        let field = FieldInfo::builder()
            .annotation(Primitive::Int)
            .description("grade level")
            .build();

        assert_eq!(field.annotation, TypeAnnotation::Primitive(Primitive::Int));
        assert_eq!(field.desc(), Some("grade level"));
        assert!(!field.has_default);
    }

    #[test]
    fn blank_description_reads_as_missing() {
        let field = FieldInfo::new(Primitive::String).with_desc("   ");
        assert_eq!(field.desc(), None);
    }

    #[test]
    fn model_keeps_declaration_order() {
        let model = ModelSchema::new("Person")
            .with_field("name", FieldInfo::new(Primitive::String))
            .with_field("age", FieldInfo::new(Primitive::Int))
            .with_field("email", FieldInfo::new(Primitive::String));

        let names: Vec<&str> = model.fields().keys().map(String::as_str).collect();
        assert_eq!(names, vec!["name", "age", "email"]);
    }

    #[test]
    fn registry_keeps_same_named_models_apart() {
        let mut registry = ModelRegistry::new();
        registry.insert(
            ModelSchema::new(ModelRef::with_id("billing::Item", "Item"))
                .with_field("sku", FieldInfo::new(Primitive::String)),
        );
        registry.insert(
            ModelSchema::new(ModelRef::with_id("catalog::Item", "Item"))
                .with_field("title", FieldInfo::new(Primitive::String)),
        );

        assert_eq!(registry.len(), 2);
        let listed = registry
            .resolve(&ModelRef::with_id("catalog::Item", "Item"))
            .expect("catalog item");
        assert!(listed.field("title").is_some());
        assert_eq!(registry.get("Item").map(ModelSchema::id), Some("billing::Item"));
        assert_eq!(registry.get("catalog::Item").map(ModelSchema::id), Some("catalog::Item"));
    }

    #[test]
    fn registry_merge_keeps_existing_entries() {
        let mut registry = ModelRegistry::new();
        registry.insert(ModelSchema::new("Item").with_doc("first"));

        let mut other = ModelRegistry::new();
        other.insert(ModelSchema::new("Item").with_doc("second"));
        other.insert(ModelSchema::new("Order"));
        registry.merge(other);

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.get("Item").and_then(ModelSchema::doc), Some("first"));
        assert!(registry.contains("Order"));
    }
}
