#![allow(dead_code)]

use dsrs_describe::{
    DEFAULT_MAX_DEPTH, FieldDescriber, FieldLine, ModelRegistry, describe_model,
    extract_field_descriptions, extract_field_descriptions_for,
};
use indoc::indoc;
use pretty_assertions::assert_eq;
use rstest::*;

struct SearchQuery {
    term: String,
    grade: i64,
    country: String,
}

describe_model! {
    SearchQuery {
        term: String => "search term to extract topics from",
        grade: i64 => "grade level of the audience",
        country: String => "country of the audience",
    }
}

struct BasicModel {
    name: String,
    age: i64,
}

describe_model! {
    BasicModel {
        name: String,
        age: i64,
    }
}

struct Address {
    street: String,
    city: String,
}

describe_model! {
    Address {
        street: String => "Street name",
        city: String => "City name",
    }
}

struct Person {
    name: String,
    address: Address,
}

describe_model! {
    Person {
        name: String => "Person's name",
        address: Address => "Person's address",
    }
}

struct Node {
    value: i64,
    next: Option<Box<Node>>,
}

describe_model! {
    Node {
        value: i64 => "Node value",
        #[default] next: Option<Box<Node>> => "Next node",
    }
}

struct Level3 {
    field3: String,
}

struct Level2 {
    field2: String,
    nested: Level3,
}

struct Level1 {
    field1: String,
    nested: Level2,
}

describe_model! {
    Level3 {
        field3: String => "Level 3 field",
    }
}

describe_model! {
    Level2 {
        field2: String => "Level 2 field",
        nested: Level3,
    }
}

describe_model! {
    Level1 {
        field1: String => "Level 1 field",
        nested: Level2,
    }
}

struct Inner {
    value: String,
}

struct Outer {
    data: Option<Inner>,
}

describe_model! {
    Inner {
        value: String => "Inner value",
    }
}

describe_model! {
    Outer {
        data: Option<Inner> => "Optional inner data",
    }
}

struct Item {
    name: String,
}

struct Container {
    items: Vec<Item>,
}

describe_model! {
    Item {
        name: String => "Item name",
    }
}

describe_model! {
    Container {
        items: Vec<Item> => "List of items",
    }
}

struct Route {
    from: Address,
    to: Address,
}

describe_model! {
    Route {
        from: Address => "Start",
        to: Address => "Destination",
    }
}

mod billing {
    use dsrs_describe::describe_model;

    pub struct Item {
        pub sku: String,
        pub listed: super::catalog::Item,
    }

    describe_model! {
        Item {
            sku: String => "billing sku",
            listed: super::catalog::Item => "catalog entry",
        }
    }
}

mod catalog {
    use dsrs_describe::describe_model;

    pub struct Item {
        pub title: String,
    }

    describe_model! {
        Item {
            title: String => "catalog title",
        }
    }
}

struct Order {
    paid: billing::Item,
    listed: catalog::Item,
}

describe_model! {
    Order {
        paid: billing::Item => "paid",
        listed: catalog::Item => "listed",
    }
}

#[rstest]
fn described_fields_use_name_colon_description() {
    let result = extract_field_descriptions_for::<SearchQuery>(DEFAULT_MAX_DEPTH);

    assert_eq!(
        result,
        indoc! {"
            term: search term to extract topics from
            grade: grade level of the audience
            country: country of the audience"}
    );
}

#[rstest]
fn undescribed_fields_fall_back_to_type_name() {
    let result = extract_field_descriptions_for::<BasicModel>(DEFAULT_MAX_DEPTH);

    assert!(result.contains("name (string)"));
    assert!(result.contains("age (int)"));
}

#[rstest]
fn nested_model_fields_follow_their_parent() {
    let result = extract_field_descriptions_for::<Person>(DEFAULT_MAX_DEPTH);

    assert_eq!(
        result,
        indoc! {"
            name: Person's name
            address: Person's address
              address.street: Street name
              address.city: City name"}
    );
}

#[rstest]
fn circular_reference_terminates() {
    let result = extract_field_descriptions_for::<Node>(3);

    assert_eq!(result, "value: Node value\nnext: Next node");
}

#[rstest]
#[case::depth_one(1, vec!["field1", "nested"])]
#[case::depth_two(2, vec!["field1", "nested", "nested.field2", "nested.nested"])]
#[case::depth_three(
    3,
    vec!["field1", "nested", "nested.field2", "nested.nested", "nested.nested.field3"]
)]
fn max_depth_limits_expansion(#[case] max_depth: usize, #[case] expected: Vec<&str>) {
    let registry = ModelRegistry::of::<Level1>();
    let described = FieldDescriber::new(&registry)
        .with_max_depth(max_depth)
        .describe("Level1");

    let names: Vec<String> = described
        .lines()
        .iter()
        .map(FieldLine::qualified_name)
        .collect();
    assert_eq!(names, expected);
}

#[rstest]
fn max_depth_two_excludes_third_level() {
    let result = extract_field_descriptions_for::<Level1>(2);

    assert!(result.contains("field1"));
    assert!(result.contains("Level 1 field"));
    assert!(result.contains("field2"));
    assert!(result.contains("Level 2 field"));
    assert!(!result.contains("field3"));
    assert!(!result.contains("Level 3 field"));
}

#[rstest]
fn optional_model_field_expands() {
    let result = extract_field_descriptions_for::<Outer>(DEFAULT_MAX_DEPTH);

    assert_eq!(result, "data: Optional inner data\n  data.value: Inner value");
}

#[rstest]
fn list_of_models_field_expands() {
    let result = extract_field_descriptions_for::<Container>(DEFAULT_MAX_DEPTH);

    assert_eq!(result, "items: List of items\n  items.name: Item name");
}

#[rstest]
fn sibling_fields_sharing_a_model_both_expand() {
    let registry = ModelRegistry::of::<Route>();
    let result = extract_field_descriptions(&registry, "Route", DEFAULT_MAX_DEPTH);

    assert_eq!(
        result,
        indoc! {"
            from: Start
              from.street: Street name
              from.city: City name
            to: Destination
              to.street: Street name
              to.city: City name"}
    );
}

#[rstest]
fn field_lines_carry_path_and_depth() {
    let registry = ModelRegistry::of::<Person>();
    let described = FieldDescriber::new(&registry).describe("Person");

    let street = &described.lines()[2];
    assert_eq!(street.path(), ["address".to_string(), "street".to_string()]);
    assert_eq!(street.name(), "street");
    assert_eq!(street.depth(), 2);
    assert_eq!(street.text(), "address.street: Street name");
}

#[rstest]
fn wrapped_root_type_describes_inner_model() {
    let result = extract_field_descriptions_for::<Option<Vec<Address>>>(DEFAULT_MAX_DEPTH);

    assert_eq!(result, "street: Street name\ncity: City name");
}

#[rstest]
fn non_model_type_describes_to_empty() {
    assert_eq!(extract_field_descriptions_for::<Vec<String>>(DEFAULT_MAX_DEPTH), "");
}

#[rstest]
fn same_named_models_are_described_separately() {
    let registry = ModelRegistry::of::<Order>();
    assert_eq!(registry.len(), 3);

    assert_eq!(
        extract_field_descriptions_for::<Order>(DEFAULT_MAX_DEPTH),
        indoc! {"
            paid: paid
              paid.sku: billing sku
              paid.listed: catalog entry
                paid.listed.title: catalog title
            listed: listed
              listed.title: catalog title"}
    );
}

#[rstest]
fn same_named_nested_model_is_not_mistaken_for_a_cycle() {
    let result = extract_field_descriptions_for::<billing::Item>(DEFAULT_MAX_DEPTH);

    assert_eq!(
        result,
        "sku: billing sku\nlisted: catalog entry\n  listed.title: catalog title"
    );
}
