//! Compile-time type descriptions.
//!
//! [`Describe`] is the Rust-side reflection hook: every type that can appear in a
//! signature or model field reports its [`TypeAnnotation`], and model types also
//! register their field list in a [`ModelRegistry`]. Standard scalars and containers
//! are covered here; models implement it with [`describe_model!`](crate::describe_model).
//!
//! # Example
//!
//! ```
//! use dsrs_describe::{describe_model, Describe, ModelRegistry};
//!
//! pub struct Address {
//!     pub street: String,
//!     pub city: String,
//! }
//!
//! describe_model! {
//!     /// A postal address.
//!     Address {
//!         street: String => "Street name",
//!         city: String => "City name",
//!     }
//! }
//!
//! assert_eq!(Address::annotation().to_string(), "Address");
//! let registry = ModelRegistry::of::<Option<Vec<Address>>>();
//! assert!(registry.contains("Address"));
//! ```

use std::collections::{BTreeMap, BTreeSet, HashMap, HashSet, VecDeque};
use std::rc::Rc;
use std::sync::Arc;

use indexmap::{IndexMap, IndexSet};

use super::annotation::{Primitive, TypeAnnotation};
use super::model::ModelRegistry;

/// A type that can describe its own shape to the field-description walker.
pub trait Describe {
    /// The declared-type annotation for this type.
    fn annotation() -> TypeAnnotation;

    /// Registers every model reachable from this type.
    ///
    /// Scalars have nothing to register. Model implementations must insert
    /// themselves *before* registering their field types so that a model that
    /// refers back to itself stops at the second visit.
    fn register(_registry: &mut ModelRegistry) {}
}

macro_rules! impl_describe_for_primitive {
    ($primitive:expr => $($ty:ty),* $(,)?) => {
        $(
            impl Describe for $ty {
                fn annotation() -> TypeAnnotation {
                    TypeAnnotation::Primitive($primitive)
                }
            }
        )*
    };
}

impl_describe_for_primitive!(Primitive::String => String, &str, char);
impl_describe_for_primitive!(
    Primitive::Int => i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize
);
impl_describe_for_primitive!(Primitive::Float => f32, f64);
impl_describe_for_primitive!(Primitive::Bool => bool);
impl_describe_for_primitive!(Primitive::Null => ());

impl Describe for serde_json::Value {
    fn annotation() -> TypeAnnotation {
        TypeAnnotation::other("any")
    }
}

impl<T: Describe> Describe for Option<T> {
    fn annotation() -> TypeAnnotation {
        TypeAnnotation::union([T::annotation(), Primitive::Null.into()])
    }

    fn register(registry: &mut ModelRegistry) {
        T::register(registry);
    }
}

macro_rules! impl_describe_transparent {
    ($($wrapper:ident),* $(,)?) => {
        $(
            impl<T: Describe> Describe for $wrapper<T> {
                fn annotation() -> TypeAnnotation {
                    T::annotation()
                }

                fn register(registry: &mut ModelRegistry) {
                    T::register(registry);
                }
            }
        )*
    };
}

impl_describe_transparent!(Box, Arc, Rc);

macro_rules! impl_describe_for_sequence {
    ($($collection:ident),* $(,)?) => {
        $(
            impl<T: Describe> Describe for $collection<T> {
                fn annotation() -> TypeAnnotation {
                    TypeAnnotation::sequence(T::annotation())
                }

                fn register(registry: &mut ModelRegistry) {
                    T::register(registry);
                }
            }
        )*
    };
}

impl_describe_for_sequence!(Vec, VecDeque, HashSet, BTreeSet, IndexSet);

impl<T: Describe> Describe for [T] {
    fn annotation() -> TypeAnnotation {
        TypeAnnotation::sequence(T::annotation())
    }

    fn register(registry: &mut ModelRegistry) {
        T::register(registry);
    }
}

impl<T: Describe, const N: usize> Describe for [T; N] {
    fn annotation() -> TypeAnnotation {
        TypeAnnotation::sequence(T::annotation())
    }

    fn register(registry: &mut ModelRegistry) {
        T::register(registry);
    }
}

macro_rules! impl_describe_for_mapping {
    ($($map:ident),* $(,)?) => {
        $(
            impl<K: Describe, V: Describe> Describe for $map<K, V> {
                fn annotation() -> TypeAnnotation {
                    TypeAnnotation::mapping(K::annotation(), V::annotation())
                }

                fn register(registry: &mut ModelRegistry) {
                    K::register(registry);
                    V::register(registry);
                }
            }
        )*
    };
}

impl_describe_for_mapping!(HashMap, BTreeMap, IndexMap);

/// Implements [`Describe`] for a struct, declaring its fields for prompt descriptions.
///
/// Each field is `name: Type`, optionally followed by `=> "description"` and
/// optionally preceded by `#[default]` when the field may be omitted. Doc comments
/// on the model become the model's doc.
///
/// ```
/// use dsrs_describe::{describe_model, ModelRegistry};
///
/// pub struct Node {
///     pub value: i64,
///     pub next: Option<Box<Node>>,
/// }
///
/// describe_model! {
///     /// A linked-list node.
///     Node {
///         value: i64 => "Node value",
///         #[default] next: Option<Box<Node>> => "Next node",
///     }
/// }
///
/// let registry = ModelRegistry::of::<Node>();
/// assert_eq!(registry.len(), 1);
/// ```
///
/// The macro only needs the type to exist; it does not define the struct, so the
/// declared field list can be the subset worth showing to the LM.
///
/// The model is identified by its full type path and displayed by its bare name,
/// so same-named models from different modules never share a registry entry.
#[macro_export]
macro_rules! describe_model {
    (@desc) => { ::core::option::Option::None };
    (@desc $desc:literal) => {
        ::core::option::Option::Some(::std::string::String::from($desc))
    };
    (@default) => { false };
    (@default default) => { true };

    {
        $(#[doc = $doc:literal])*
        $model:ident {
            $(
                $(#[$flag:ident])?
                $field:ident : $ty:ty $(=> $desc:literal)?
            ),* $(,)?
        }
    } => {
        impl $crate::Describe for $model {
            fn annotation() -> $crate::TypeAnnotation {
                $crate::TypeAnnotation::Model($crate::ModelRef::of::<Self>(stringify!($model)))
            }

            fn register(registry: &mut $crate::ModelRegistry) {
                let model_ref = $crate::ModelRef::of::<Self>(stringify!($model));
                if registry.resolve(&model_ref).is_some() {
                    return;
                }

                let docs: &[&str] = &[$($doc),*];
                let doc = docs
                    .iter()
                    .map(|line| line.trim())
                    .filter(|line| !line.is_empty())
                    .collect::<::std::vec::Vec<_>>()
                    .join("\n");

                let model = $crate::ModelSchema::new(model_ref)
                    .with_doc(doc)
                    $(
                        .with_field(
                            stringify!($field),
                            $crate::FieldInfo {
                                annotation: <$ty as $crate::Describe>::annotation(),
                                description: $crate::describe_model!(@desc $($desc)?),
                                has_default: $crate::describe_model!(@default $($flag)?),
                            },
                        )
                    )*;
                registry.insert(model);

                $(
                    <$ty as $crate::Describe>::register(registry);
                )*
            }
        }
    };
}
