//! Model descriptions from JSON Schema.
//!
//! Types deriving [`schemars::JsonSchema`] already carry everything the describer
//! needs: doc comments become `description`s, `Option<T>` becomes a nullable
//! `anyOf`, collections become `array`/`additionalProperties`, and named structs land
//! in `$defs` and are referenced by `$ref`. This module maps that schema onto
//! [`TypeAnnotation`]s and a [`ModelRegistry`].
//!
//! ```
//! use dsrs_describe::{extract_field_descriptions, import_model};
//! use schemars::JsonSchema;
//!
//! #[derive(JsonSchema)]
//! struct SearchQuery {
//!     /// search term to extract topics from
//!     term: String,
//!     grade: i64,
//! }
//!
//! let import = import_model::<SearchQuery>().unwrap();
//! let text = extract_field_descriptions(&import.registry, "SearchQuery", 5);
//! assert_eq!(text, "term: search term to extract topics from\ngrade (int)");
//! ```

use std::collections::{HashSet, VecDeque};

use schemars::JsonSchema;
use serde_json::{Map, Value};
use tracing::{debug, warn};

use super::annotation::{ModelRef, Primitive, TypeAnnotation};
use super::classify::innermost_model;
use super::errors::SchemaError;
use super::model::{FieldInfo, ModelRegistry, ModelSchema};

const DEFS_REF_PREFIX: &str = "#/$defs/";
const DEFINITIONS_REF_PREFIX: &str = "#/definitions/";
const ROOT_REF: &str = "#";

/// Result of importing a JSON Schema.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SchemaImport {
    /// Every model reachable from the root.
    pub registry: ModelRegistry,
    /// Annotation for the schema's root type.
    pub root: TypeAnnotation,
}

impl SchemaImport {
    /// The model the root type holds, looking through optional/list/map layers.
    pub fn root_model(&self) -> Option<&ModelSchema> {
        innermost_model(&self.root).and_then(|model| self.registry.resolve(model))
    }
}

/// Imports the schema `schemars` generates for `T`.
pub fn import_schema<T: JsonSchema>() -> Result<SchemaImport, SchemaError> {
    let schema = schemars::schema_for!(T);
    let value = serde_json::to_value(&schema)?;
    Ok(import_json_schema(&value))
}

/// Like [`import_schema`], but requires `T` itself to be a model.
pub fn import_model<T: JsonSchema>() -> Result<SchemaImport, SchemaError> {
    let import = import_schema::<T>()?;
    match &import.root {
        TypeAnnotation::Model(_) => Ok(import),
        other => Err(SchemaError::RootNotModel {
            found: other.to_string(),
        }),
    }
}

/// Imports an already-generated JSON Schema document.
///
/// `$ref`s resolve against the document's `$defs` (or legacy `definitions`).
/// Unresolvable references and unknown shapes degrade to
/// [`TypeAnnotation::Other`] instead of failing.
pub fn import_json_schema(schema: &Value) -> SchemaImport {
    let defs = schema
        .get("$defs")
        .or_else(|| schema.get("definitions"))
        .and_then(Value::as_object);
    let root_name = model_title(schema);

    let mut importer = Importer {
        defs,
        root_name: root_name.clone(),
        registry: ModelRegistry::new(),
        queued: HashSet::new(),
        pending: VecDeque::new(),
        inlining: HashSet::new(),
    };

    let root = match root_name {
        Some(name) => {
            let model = ModelRef::new(name);
            importer.enqueue(&model, schema);
            TypeAnnotation::Model(model)
        }
        None => importer.annotation_of(schema),
    };
    importer.drain();

    debug!(models = importer.registry.len(), root = %root, "imported JSON schema");
    SchemaImport {
        registry: importer.registry,
        root,
    }
}

struct Importer<'a> {
    defs: Option<&'a Map<String, Value>>,
    root_name: Option<String>,
    registry: ModelRegistry,
    /// Ids of models already queued or registered.
    queued: HashSet<String>,
    pending: VecDeque<(ModelRef, &'a Value)>,
    /// Non-model definitions currently being inlined, to stop self-referencing aliases.
    inlining: HashSet<String>,
}

impl<'a> Importer<'a> {
    fn enqueue(&mut self, model: &ModelRef, schema: &'a Value) {
        if self.queued.insert(model.id().to_string()) {
            self.pending.push_back((model.clone(), schema));
        }
    }

    fn drain(&mut self) {
        while let Some((model_ref, schema)) = self.pending.pop_front() {
            let model = self.model(model_ref, schema);
            self.registry.insert(model);
        }
    }

    fn model(&mut self, model_ref: ModelRef, schema: &'a Value) -> ModelSchema {
        let mut model = ModelSchema::new(model_ref);
        if let Some(doc) = schema.get("description").and_then(Value::as_str) {
            model = model.with_doc(doc);
        }

        let required: HashSet<&str> = schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let Some(properties) = schema.get("properties").and_then(Value::as_object) else {
            return model;
        };

        for (field_name, property) in properties {
            let field = FieldInfo {
                annotation: self.annotation_of(property),
                description: property
                    .get("description")
                    .and_then(Value::as_str)
                    .map(str::to_string),
                has_default: property.get("default").is_some()
                    || !required.contains(field_name.as_str()),
            };
            model = model.with_field(field_name.clone(), field);
        }

        model
    }

    fn annotation_of(&mut self, schema: &'a Value) -> TypeAnnotation {
        let Some(object) = schema.as_object() else {
            return match schema {
                Value::Bool(false) => TypeAnnotation::other("never"),
                _ => TypeAnnotation::other("any"),
            };
        };

        if let Some(reference) = object.get("$ref").and_then(Value::as_str) {
            return self.reference(reference);
        }

        for key in ["anyOf", "oneOf"] {
            if let Some(members) = object.get(key).and_then(Value::as_array) {
                let members: Vec<TypeAnnotation> =
                    members.iter().map(|member| self.annotation_of(member)).collect();
                return TypeAnnotation::union(members);
            }
        }

        if let Some(all_of) = object.get("allOf").and_then(Value::as_array) {
            if let [single] = all_of.as_slice() {
                return self.annotation_of(single);
            }
        }

        if object.contains_key("enum") {
            return TypeAnnotation::other(
                object
                    .get("title")
                    .and_then(Value::as_str)
                    .unwrap_or("enum"),
            );
        }

        if let Some(constant) = object.get("const") {
            return const_annotation(constant);
        }

        match object.get("type") {
            Some(Value::String(kind)) => self.typed(kind, schema),
            Some(Value::Array(kinds)) => {
                let members: Vec<TypeAnnotation> = kinds
                    .iter()
                    .filter_map(Value::as_str)
                    .map(|kind| self.typed(kind, schema))
                    .collect();
                TypeAnnotation::union(members)
            }
            _ if object.contains_key("properties") => self.object_shape(schema),
            _ => TypeAnnotation::other("any"),
        }
    }

    fn typed(&mut self, kind: &str, schema: &'a Value) -> TypeAnnotation {
        match kind {
            "string" => Primitive::String.into(),
            "integer" => Primitive::Int.into(),
            "number" => Primitive::Float.into(),
            "boolean" => Primitive::Bool.into(),
            "null" => Primitive::Null.into(),
            "array" => match schema.get("items") {
                Some(items) => TypeAnnotation::sequence(self.annotation_of(items)),
                None => TypeAnnotation::other("list"),
            },
            "object" => self.object_shape(schema),
            other => TypeAnnotation::other(other),
        }
    }

    fn object_shape(&mut self, schema: &'a Value) -> TypeAnnotation {
        if schema.get("properties").is_some_and(Value::is_object) {
            return match model_title(schema) {
                Some(title) => {
                    let model = ModelRef::new(title);
                    self.enqueue(&model, schema);
                    TypeAnnotation::Model(model)
                }
                None => TypeAnnotation::other("object"),
            };
        }

        match schema.get("additionalProperties") {
            Some(value @ Value::Object(_)) | Some(value @ Value::Bool(true)) => {
                TypeAnnotation::mapping(Primitive::String.into(), self.annotation_of(value))
            }
            _ => TypeAnnotation::other("map"),
        }
    }

    fn reference(&mut self, reference: &str) -> TypeAnnotation {
        if reference == ROOT_REF {
            return match &self.root_name {
                Some(name) => TypeAnnotation::model(name.clone()),
                None => {
                    warn!(reference, "root reference to a schema that is not a model");
                    TypeAnnotation::other("object")
                }
            };
        }

        let Some(name) = reference
            .strip_prefix(DEFS_REF_PREFIX)
            .or_else(|| reference.strip_prefix(DEFINITIONS_REF_PREFIX))
        else {
            warn!(reference, "unsupported $ref; treating as opaque type");
            return TypeAnnotation::other(reference);
        };

        let Some(definition) = self.defs.and_then(|defs| defs.get(name)) else {
            warn!(reference, "unresolved $ref; treating as opaque type");
            return TypeAnnotation::other(name);
        };

        if is_model_schema(definition) {
            // `$defs` keys are unique per document; titles are not.
            let title = model_title(definition).unwrap_or_else(|| name.to_string());
            let model = ModelRef::with_id(name, title);
            self.enqueue(&model, definition);
            return TypeAnnotation::Model(model);
        }

        if definition.get("enum").is_some() || definition.get("oneOf").is_some() {
            return TypeAnnotation::other(name);
        }

        if !self.inlining.insert(name.to_string()) {
            return TypeAnnotation::other(name);
        }
        let annotation = self.annotation_of(definition);
        self.inlining.remove(name);
        annotation
    }
}

fn is_model_schema(schema: &Value) -> bool {
    let typed_object = match schema.get("type") {
        None => true,
        Some(Value::String(kind)) => kind == "object",
        Some(_) => false,
    };
    typed_object && schema.get("properties").is_some_and(Value::is_object)
}

fn model_title(schema: &Value) -> Option<String> {
    if !is_model_schema(schema) {
        return None;
    }
    schema
        .get("title")
        .and_then(Value::as_str)
        .map(str::to_string)
}

fn const_annotation(constant: &Value) -> TypeAnnotation {
    match constant {
        Value::String(_) => Primitive::String.into(),
        Value::Bool(_) => Primitive::Bool.into(),
        Value::Null => Primitive::Null.into(),
        Value::Number(number) if number.is_f64() => Primitive::Float.into(),
        Value::Number(_) => Primitive::Int.into(),
        Value::Array(_) | Value::Object(_) => TypeAnnotation::other("any"),
    }
}
