//! Nested field descriptions for LM prompts.
//!
//! A signature field typed as a structured model is more than its type name to an
//! LM: the model's own fields (and the fields of models inside it) tell the LM what
//! to produce or how to read the input. This crate classifies field types, walks
//! model fields to a bounded depth without looping on self-referencing models, and
//! renders the result as prompt text.
//!
//! - [`is_model_type`]: does an annotation hold a model (through `Option`, unions,
//!   lists, and map values)?
//! - [`extract_field_descriptions`] / [`FieldDescriber`]: one line per field, nested
//!   fields qualified by their dotted path.
//! - [`build_description_string`]: the numbered per-signature listing used by
//!   [`ChatAdapter`].
//!
//! Types describe themselves through [`Describe`] (see [`describe_model!`]) or are
//! imported from their `schemars` JSON Schema with [`import_schema`].
//!
//! ```
//! use dsrs_describe::{describe_model, extract_field_descriptions_for};
//!
//! pub struct Address { pub street: String, pub city: String }
//! pub struct Person { pub name: String, pub address: Address }
//!
//! describe_model! {
//!     Address {
//!         street: String => "Street name",
//!         city: String => "City name",
//!     }
//! }
//!
//! describe_model! {
//!     Person {
//!         name: String => "Person's name",
//!         address: Address => "Person's address",
//!     }
//! }
//!
//! let text = extract_field_descriptions_for::<Person>(5);
//! assert_eq!(
//!     text,
//!     "name: Person's name\naddress: Person's address\n  address.street: Street name\n  address.city: City name"
//! );
//! ```

pub mod adapter;
pub mod core;
pub mod utils;

pub use adapter::*;
pub use core::*;
pub use utils::*;
