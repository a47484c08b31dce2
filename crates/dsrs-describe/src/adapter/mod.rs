//! Prompt-side consumers of field descriptions.
//!
//! The adapter turns a [`Signature`](crate::Signature) into the "Your input fields
//! are / Your output fields are" section of a system prompt. Nested model fields are
//! expanded through [`build_description_string`](crate::build_description_string),
//! so an LM sees the inner fields of a structured input, not just its type name.

pub mod chat;

pub use chat::*;

use crate::Signature;

/// Formats the field-description section of a prompt for a signature.
pub trait Adapter: Send + Sync + 'static {
    fn format_field_description(&self, signature: &Signature) -> String;
}
