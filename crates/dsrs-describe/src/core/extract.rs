//! Flattened, depth-bounded descriptions of a model's fields.
//!
//! The walker visits fields in declaration order. A field whose type holds another
//! model is followed by that model's fields, qualified with the dotted path from the
//! top-level model (`address.street`) and indented one step per level. Expansion
//! stops at `max_depth` and at any model already being expanded higher up the same
//! path, so self-referencing and mutually-referencing models terminate.

use std::collections::HashSet;
use std::fmt;

use tracing::{trace, warn};

use super::annotation::ModelRef;
use super::classify::innermost_model;
use super::describe::Describe;
use super::model::{FieldInfo, ModelRegistry, ModelSchema};
use super::settings::{DEFAULT_MAX_DEPTH, DescribeOptions};

const INDENT: &str = "  ";

/// One rendered field of a [`FieldDescriptions`] listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldLine {
    path: Vec<String>,
    depth: usize,
    text: String,
}

impl FieldLine {
    /// Field names from the top-level model down to this field.
    pub fn path(&self) -> &[String] {
        &self.path
    }

    pub fn name(&self) -> &str {
        self.path.last().map(String::as_str).unwrap_or_default()
    }

    /// Dotted path, e.g. `address.street`.
    pub fn qualified_name(&self) -> String {
        self.path.join(".")
    }

    /// `1` for the top-level model's own fields.
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// The line without indentation.
    pub fn text(&self) -> &str {
        &self.text
    }
}

/// Ordered field lines for one model.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldDescriptions {
    model: ModelRef,
    lines: Vec<FieldLine>,
}

impl FieldDescriptions {
    fn empty(model: ModelRef) -> Self {
        Self {
            model,
            lines: Vec::new(),
        }
    }

    pub fn model(&self) -> &ModelRef {
        &self.model
    }

    pub fn lines(&self) -> &[FieldLine] {
        &self.lines
    }

    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    pub fn len(&self) -> usize {
        self.lines.len()
    }

    /// Renders every line, prefixing each with `base_indent` spaces on top of its
    /// own nesting indentation.
    pub fn render_indented(&self, base_indent: usize) -> String {
        let base = " ".repeat(base_indent);
        self.lines
            .iter()
            .map(|line| {
                format!(
                    "{base}{}{}",
                    INDENT.repeat(line.depth.saturating_sub(1)),
                    line.text
                )
            })
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl fmt::Display for FieldDescriptions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render_indented(0))
    }
}

/// Walks models in a [`ModelRegistry`] and describes their fields.
#[derive(Debug, Clone, Copy)]
pub struct FieldDescriber<'r> {
    registry: &'r ModelRegistry,
    max_depth: usize,
}

impl<'r> FieldDescriber<'r> {
    pub fn new(registry: &'r ModelRegistry) -> Self {
        Self {
            registry,
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }

    pub fn with_options(registry: &'r ModelRegistry, options: &DescribeOptions) -> Self {
        Self::new(registry).with_max_depth(options.max_depth)
    }

    pub fn with_max_depth(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn max_depth(&self) -> usize {
        self.max_depth
    }

    /// Describes the fields of the model with id or display name `model`.
    ///
    /// An unknown model or a `max_depth` of zero yields an empty listing.
    pub fn describe(&self, model: &str) -> FieldDescriptions {
        match self.registry.get(model) {
            Some(schema) => self.describe_schema(schema),
            None => {
                warn!(model, "model is not registered; no field descriptions");
                FieldDescriptions::empty(ModelRef::new(model))
            }
        }
    }

    /// Describes exactly the model `model` refers to.
    pub fn describe_ref(&self, model: &ModelRef) -> FieldDescriptions {
        match self.registry.resolve(model) {
            Some(schema) => self.describe_schema(schema),
            None => {
                warn!(model = model.id(), "model is not registered; no field descriptions");
                FieldDescriptions::empty(model.clone())
            }
        }
    }

    #[tracing::instrument(
        name = "dsrs.describe.fields",
        level = "trace",
        skip_all,
        fields(model = schema.id(), max_depth = self.max_depth)
    )]
    fn describe_schema(&self, schema: &'r ModelSchema) -> FieldDescriptions {
        if self.max_depth == 0 {
            return FieldDescriptions::empty(schema.model_ref().clone());
        }

        let mut walk = Walk {
            registry: self.registry,
            max_depth: self.max_depth,
            visited: HashSet::from([schema.id()]),
            lines: Vec::new(),
        };
        walk.fields(schema, &mut Vec::new(), 1);

        trace!(lines = walk.lines.len(), "described model fields");
        FieldDescriptions {
            model: schema.model_ref().clone(),
            lines: walk.lines,
        }
    }
}

struct Walk<'r> {
    registry: &'r ModelRegistry,
    max_depth: usize,
    /// Ids of the models being expanded on the current path.
    visited: HashSet<&'r str>,
    lines: Vec<FieldLine>,
}

impl<'r> Walk<'r> {
    fn fields(&mut self, schema: &'r ModelSchema, path: &mut Vec<String>, depth: usize) {
        for (name, field) in schema.fields() {
            path.push(name.clone());
            self.lines.push(FieldLine {
                text: field_text(&path.join("."), field),
                path: path.clone(),
                depth,
            });

            if let Some(nested) = innermost_model(&field.annotation) {
                self.descend(nested, path, depth);
            }
            path.pop();
        }
    }

    fn descend(&mut self, nested: &'r ModelRef, path: &mut Vec<String>, depth: usize) {
        if depth >= self.max_depth {
            trace!(model = nested.id(), depth, "depth limit reached; not expanding");
            return;
        }
        if self.visited.contains(nested.id()) {
            trace!(model = nested.id(), "model already expanded on this path; not expanding");
            return;
        }
        let Some(schema) = self.registry.resolve(nested) else {
            warn!(model = nested.id(), "nested model is not registered; not expanding");
            return;
        };

        self.visited.insert(nested.id());
        self.fields(schema, path, depth + 1);
        self.visited.remove(nested.id());
    }
}

fn field_text(name: &str, field: &FieldInfo) -> String {
    match field.desc() {
        Some(desc) => format!("{name}: {desc}"),
        None => format!("{name} ({})", field.annotation),
    }
}

/// Describes the fields of `model` (and nested models, up to `max_depth` levels) as
/// one newline-separated string.
pub fn extract_field_descriptions(
    registry: &ModelRegistry,
    model: &str,
    max_depth: usize,
) -> String {
    FieldDescriber::new(registry)
        .with_max_depth(max_depth)
        .describe(model)
        .to_string()
}

/// [`extract_field_descriptions`] for a [`Describe`] type.
///
/// Wrappers are looked through, so `Option<Vec<M>>` describes `M`. Types that hold
/// no model describe to an empty string.
pub fn extract_field_descriptions_for<T: Describe>(max_depth: usize) -> String {
    let annotation = T::annotation();
    let Some(model) = innermost_model(&annotation) else {
        return String::new();
    };

    let registry = ModelRegistry::of::<T>();
    FieldDescriber::new(&registry)
        .with_max_depth(max_depth)
        .describe_ref(model)
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Primitive, TypeAnnotation};

    fn chain() -> ModelRegistry {
        let mut registry = ModelRegistry::new();
        registry.insert(
            ModelSchema::new("A")
                .with_field("b", FieldInfo::new(TypeAnnotation::model("B")).with_desc("to b")),
        );
        registry.insert(
            ModelSchema::new("B")
                .with_field("a", FieldInfo::new(TypeAnnotation::model("A")))
                .with_field("n", FieldInfo::new(Primitive::Int)),
        );
        registry
    }

    #[test]
    fn mutual_reference_stops_at_first_repeat() {
        let registry = chain();
        let described = FieldDescriber::new(&registry).with_max_depth(10).describe("A");

        let names: Vec<String> = described.lines().iter().map(FieldLine::qualified_name).collect();
        assert_eq!(names, vec!["b", "b.a", "b.n"]);
        assert_eq!(described.to_string(), "b: to b\n  b.a (A)\n  b.n (int)");
    }

    #[test]
    fn zero_depth_is_empty() {
        let registry = chain();
        assert!(FieldDescriber::new(&registry).with_max_depth(0).describe("A").is_empty());
    }

    #[test]
    fn unknown_model_is_empty() {
        let registry = chain();
        let described = FieldDescriber::new(&registry).describe("Missing");
        assert!(described.is_empty());
        assert_eq!(described.model().name(), "Missing");
    }

    #[test]
    fn unregistered_nested_model_keeps_own_line() {
        let mut registry = ModelRegistry::new();
        registry.insert(
            ModelSchema::new("Outer")
                .with_field("inner", FieldInfo::new(TypeAnnotation::model("Ghost"))),
        );

        assert_eq!(extract_field_descriptions(&registry, "Outer", 3), "inner (Ghost)");
    }

    #[test]
    fn render_indented_adds_base_indent() {
        let registry = chain();
        let described = FieldDescriber::new(&registry).with_max_depth(2).describe("A");
        assert_eq!(described.render_indented(4), "    b: to b\n      b.a (A)\n      b.n (int)");
    }
}
