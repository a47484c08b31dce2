/// Failure importing a model description from a JSON Schema.
///
/// Shapes the importer does not understand never fail; they degrade to
/// [`TypeAnnotation::Other`](crate::TypeAnnotation::Other). Only the boundary
/// itself can go wrong.
#[derive(Debug, thiserror::Error)]
pub enum SchemaError {
    /// The generated schema could not be turned into a JSON value.
    #[error("failed to serialize JSON schema")]
    Serialize(#[from] serde_json::Error),

    /// A model was required but the schema's root describes something else.
    #[error("schema root `{found}` is not a model with named properties")]
    RootNotModel { found: String },
}
