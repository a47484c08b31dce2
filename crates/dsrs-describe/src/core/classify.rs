use super::annotation::{ModelRef, TypeAnnotation};

/// Returns `true` if `annotation` is a model or wraps one.
///
/// Wrapping means an optional, any union member, a sequence element, or a mapping
/// *value*; mapping keys never count. Primitives, `null`, and
/// [`Other`](TypeAnnotation::Other) shapes (bare `list`/`map`, enums, unknown
/// generics) are not models.
pub fn is_model_type(annotation: &TypeAnnotation) -> bool {
    innermost_model(annotation).is_some()
}

/// Finds the model a field ultimately holds, unwrapping the same layers as
/// [`is_model_type`]. Returns `Some` exactly when `is_model_type` is `true`.
///
/// For a union with several model members the first one in declaration order wins.
pub fn innermost_model(annotation: &TypeAnnotation) -> Option<&ModelRef> {
    match annotation {
        TypeAnnotation::Model(model) => Some(model),
        TypeAnnotation::Optional(inner) | TypeAnnotation::Sequence(inner) => {
            innermost_model(inner)
        }
        TypeAnnotation::Union(members) => members.iter().find_map(innermost_model),
        TypeAnnotation::Mapping { value, .. } => innermost_model(value),
        TypeAnnotation::Primitive(_) | TypeAnnotation::Other(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Primitive;

    #[test]
    fn mapping_key_is_ignored() {
        let keyed_by_model =
            TypeAnnotation::mapping(TypeAnnotation::model("Key"), Primitive::String.into());
        assert!(!is_model_type(&keyed_by_model));
        assert_eq!(innermost_model(&keyed_by_model), None);
    }

    #[test]
    fn first_union_model_wins() {
        let union = TypeAnnotation::Union(vec![
            Primitive::Int.into(),
            TypeAnnotation::model("A"),
            TypeAnnotation::model("B"),
        ]);
        assert_eq!(innermost_model(&union).map(ModelRef::name), Some("A"));
    }

    #[test]
    fn innermost_through_layers() {
        let annotation = TypeAnnotation::optional(TypeAnnotation::sequence(
            TypeAnnotation::mapping(Primitive::String.into(), TypeAnnotation::model("Leaf")),
        ));
        assert_eq!(innermost_model(&annotation).map(ModelRef::name), Some("Leaf"));
    }
}
