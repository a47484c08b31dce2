use indexmap::IndexMap;
use tracing::trace;

use super::classify::innermost_model;
use super::extract::FieldDescriber;
use super::model::{FieldInfo, ModelRegistry};
use super::settings::DescribeOptions;

const NESTED_HEADER_INDENT: usize = 4;
const NESTED_FIELD_INDENT: usize = 8;

/// Builds the numbered field list for one side of a signature.
///
/// Every field gets `` N. `name` (type): description ``. Fields whose type holds a
/// model are followed by a ``Fields of `Model`:`` block with that model's nested
/// field descriptions, so the LM can tell which nested fields belong to which
/// top-level field.
///
/// ```text
/// 1. `query` (SearchQuery): The search query
///     Fields of `SearchQuery`:
///         term: search term
///         grade: grade level
/// 2. `limit` (int)
/// ```
pub fn build_description_string(
    fields: &IndexMap<String, FieldInfo>,
    registry: &ModelRegistry,
    options: &DescribeOptions,
) -> String {
    let describer = FieldDescriber::with_options(registry, options);

    let mut lines = Vec::new();
    for (i, (name, field)) in fields.iter().enumerate() {
        let mut line = format!("{}. `{name}` ({})", i + 1, field.annotation);
        if let Some(desc) = field.desc() {
            line.push_str(": ");
            line.push_str(desc);
        }
        lines.push(line);

        let Some(model) = innermost_model(&field.annotation) else {
            continue;
        };

        let nested = describer.describe_ref(model);
        if nested.is_empty() {
            trace!(field = %name, model = %model, "no nested descriptions for model field");
            continue;
        }
        lines.push(format!(
            "{}Fields of `{model}`:",
            " ".repeat(NESTED_HEADER_INDENT)
        ));
        lines.push(nested.render_indented(NESTED_FIELD_INDENT));
    }

    lines.join("\n")
}
