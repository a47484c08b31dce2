use std::fmt;

use serde::{Deserialize, Serialize};

/// Scalar leaf types a field can be declared as.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    String,
    Int,
    Float,
    Bool,
    Null,
}

impl Primitive {
    /// Name used in prompts (`string`, `int`, `float`, `bool`, `null`).
    pub const fn name(self) -> &'static str {
        match self {
            Self::String => "string",
            Self::Int => "int",
            Self::Float => "float",
            Self::Bool => "bool",
            Self::Null => "null",
        }
    }
}

impl fmt::Display for Primitive {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Identity of a model type.
///
/// `id` is what the [`ModelRegistry`](crate::ModelRegistry) and the walker's
/// visited set key on; `name` is what prompts show. Rust models use their full
/// type path as `id` (see [`ModelRef::of`]), so `billing::Item` and
/// `catalog::Item` stay distinct while both render as `Item`. Hand-built and
/// schema-imported refs use the same string for both.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ModelRef {
    id: String,
    name: String,
}

impl ModelRef {
    /// A ref whose identity is its name.
    pub fn new(name: impl Into<String>) -> Self {
        let name = name.into();
        Self {
            id: name.clone(),
            name,
        }
    }

    pub fn with_id(id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
        }
    }

    /// A ref identified by `T`'s full type path, displayed as `name`.
    pub fn of<T: ?Sized>(name: impl Into<String>) -> Self {
        Self::with_id(std::any::type_name::<T>(), name)
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }
}

impl fmt::Display for ModelRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.name)
    }
}

impl From<&str> for ModelRef {
    fn from(name: &str) -> Self {
        Self::new(name)
    }
}

impl From<String> for ModelRef {
    fn from(name: String) -> Self {
        Self::new(name)
    }
}

/// Declared type of a field.
///
/// A closed set of shapes, so classification and unwrapping are plain `match`es
/// instead of ad-hoc inspection at every call site. Anything that is not one of the
/// recognized wrappers (an enum, a bare `list` without an element type, an opaque
/// foreign type) is [`Other`](TypeAnnotation::Other) and carries only its name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", content = "of", rename_all = "snake_case")]
pub enum TypeAnnotation {
    Primitive(Primitive),
    Model(ModelRef),
    Optional(Box<TypeAnnotation>),
    Union(Vec<TypeAnnotation>),
    Sequence(Box<TypeAnnotation>),
    Mapping {
        key: Box<TypeAnnotation>,
        value: Box<TypeAnnotation>,
    },
    Other(String),
}

impl TypeAnnotation {
    pub fn model(name: impl Into<String>) -> Self {
        Self::Model(ModelRef::new(name))
    }

    pub fn optional(inner: TypeAnnotation) -> Self {
        Self::Optional(Box::new(inner))
    }

    pub fn sequence(element: TypeAnnotation) -> Self {
        Self::Sequence(Box::new(element))
    }

    pub fn mapping(key: TypeAnnotation, value: TypeAnnotation) -> Self {
        Self::Mapping {
            key: Box::new(key),
            value: Box::new(value),
        }
    }

    pub fn other(name: impl Into<String>) -> Self {
        Self::Other(name.into())
    }

    /// Builds a union, folding `null` members into [`Optional`](TypeAnnotation::Optional).
    ///
    /// `union([M, null])` is `Optional(M)`, `union([A, B, null])` is
    /// `Optional(Union[A, B])` and a single remaining member is returned unwrapped.
    pub fn union(members: impl IntoIterator<Item = TypeAnnotation>) -> Self {
        let mut nullable = false;
        let mut rest = Vec::new();
        for member in members {
            match member {
                Self::Primitive(Primitive::Null) => nullable = true,
                Self::Optional(inner) => {
                    nullable = true;
                    rest.push(*inner);
                }
                other => rest.push(other),
            }
        }

        let inner = match rest.len() {
            0 => return Self::Primitive(Primitive::Null),
            1 => rest.remove(0),
            _ => Self::Union(rest),
        };

        if nullable {
            Self::optional(inner)
        } else {
            inner
        }
    }

    pub fn is_optional(&self) -> bool {
        matches!(self, Self::Optional(_))
    }

    fn needs_parens(&self) -> bool {
        matches!(self, Self::Optional(_) | Self::Union(_))
    }
}

impl From<Primitive> for TypeAnnotation {
    fn from(primitive: Primitive) -> Self {
        Self::Primitive(primitive)
    }
}

impl From<ModelRef> for TypeAnnotation {
    fn from(model: ModelRef) -> Self {
        Self::Model(model)
    }
}

impl fmt::Display for TypeAnnotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Primitive(primitive) => write!(f, "{primitive}"),
            Self::Model(model) => write!(f, "{model}"),
            Self::Optional(inner) => write!(f, "{inner} or null"),
            Self::Union(members) => {
                for (i, member) in members.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" or ")?;
                    }
                    write!(f, "{member}")?;
                }
                Ok(())
            }
            Self::Sequence(element) if element.needs_parens() => write!(f, "({element})[]"),
            Self::Sequence(element) => write!(f, "{element}[]"),
            Self::Mapping { key, value } => write!(f, "map<{key}, {value}>"),
            Self::Other(name) => f.write_str(name),
        }
    }
}
