use oas3::spec::{ObjectOrReference, ObjectSchema, Spec};
use oas3_extract_model::{
  ArrayModel, CompositionKind, CompositionModel, EnumModel, InMemoryModelRepository, ModelRepository, Modifier,
  ObjectModel, PrimitiveKind,
};
use serde_json::json;

use super::{Resolution, SchemaResolver};
use crate::{cancellation::CancellationToken, diagnostics::Diagnostic};

fn spec_with_components(schemas: serde_json::Value) -> Spec {
  oas3::from_json(
    json!({
      "openapi": "3.1.0",
      "info": { "title": "Test", "version": "1.0.0" },
      "paths": {},
      "components": { "schemas": schemas }
    })
    .to_string(),
  )
  .expect("failed to parse test spec")
}

fn empty_spec() -> Spec {
  spec_with_components(json!({}))
}

fn node(value: serde_json::Value) -> ObjectOrReference<ObjectSchema> {
  serde_json::from_value(value).expect("invalid schema node")
}

fn names(resolution: &Resolution) -> Vec<&str> {
  resolution.references.iter().map(|reference| reference.as_str()).collect()
}

#[test]
fn test_array_of_objects_registers_three_models() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(
    &node(json!({
      "type": "array",
      "items": { "type": "object", "properties": { "id": { "type": "integer" } } }
    })),
    "H",
  );

  assert!(resolution.succeeded);
  assert_eq!(names(&resolution), vec!["H"]);

  let repository = resolver.repository();
  assert_eq!(repository.len(), 3, "integer primitive, array and item object");
  assert!(repository.is_known(PrimitiveKind::Integer.canonical_name()));

  let array = repository.get_as::<ArrayModel>("H").unwrap();
  assert_eq!(array.item_references, vec!["H[]"]);

  let item = repository.get_as::<ObjectModel>("H[]").unwrap();
  let id = &item.properties["id"];
  assert_eq!(id.references, vec![PrimitiveKind::Integer.canonical_name()]);
  assert_eq!(id.modifier, Modifier::Optional);
}

#[test]
fn test_nullable_string_yields_two_references_without_enum() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(&node(json!({ "type": ["string", "null"] })), "Name");

  assert!(resolution.succeeded);
  assert_eq!(names(&resolution), vec!["#/primitive/string", "#/primitive/null"]);
  assert!(
    resolver.repository().models().all(|model| model.kind() != oas3_extract_model::ModelKind::Enum),
    "no enum model expected"
  );
  assert_eq!(resolver.repository().len(), 2);
}

#[test]
fn test_flags_follow_canonical_order() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(
    &node(json!({ "type": ["null", "boolean", "number", "integer", "string"] })),
    "Everything",
  );

  assert_eq!(
    names(&resolution),
    vec![
      "#/primitive/string",
      "#/primitive/integer",
      "#/primitive/number",
      "#/primitive/boolean",
      "#/primitive/null",
    ]
  );
}

#[test]
fn test_string_enum_keeps_plain_string_reference() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(
    &node(json!({ "type": "string", "enum": ["available", "pending", null, 3, "sold"] })),
    "Status",
  );

  assert!(resolution.succeeded);
  assert_eq!(names(&resolution), vec!["#/primitive/string", "Status?"]);

  let model = resolver.repository().get_as::<EnumModel>("Status?").unwrap();
  assert!(model.nullable);
  assert_eq!(model.values, vec!["available", "pending", "sold"]);
}

#[test]
fn test_enum_without_null_keeps_hint() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(&node(json!({ "type": "string", "enum": ["a", "b"] })), "Letter");
  assert_eq!(names(&resolution), vec!["#/primitive/string", "Letter"]);
  assert!(!resolver.repository().get_as::<EnumModel>("Letter").unwrap().nullable);
}

#[test]
fn test_all_of_registers_branches_and_composition_once() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());
  let schema = node(json!({
    "allOf": [
      { "type": "object", "properties": { "name": { "type": "string" } }, "required": ["name"] },
      { "type": "object", "properties": { "age": { "type": "integer" } } }
    ]
  }));

  let first = resolver.resolve(&schema, "Person");
  let count = resolver.repository().len();
  let second = resolver.resolve(&schema, "Person");

  assert_eq!(first, second);
  assert_eq!(names(&first), vec!["Person"]);
  assert_eq!(resolver.repository().len(), count, "re-resolving must not add models");
  assert_eq!(count, 5, "two primitives, two branches, one composition");

  let composition = resolver.repository().get_as::<CompositionModel>("Person").unwrap();
  assert_eq!(composition.kind, CompositionKind::AllOf);
  assert_eq!(composition.members, vec!["Person#0", "Person#1"]);

  let branch = resolver.repository().get_as::<ObjectModel>("Person#0").unwrap();
  assert_eq!(branch.properties["name"].modifier, Modifier::Required);
}

#[test]
fn test_shared_reference_registers_one_model() {
  let spec = spec_with_components(json!({
    "Pet": { "type": "object", "properties": { "name": { "type": "string" } } }
  }));
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());
  let reference = node(json!({ "$ref": "#/components/schemas/Pet" }));

  let first = resolver.resolve(&reference, "/pets/GET/200/application/json");
  let second = resolver.resolve(&reference, "/pets/POST/request/application/json");

  assert_eq!(names(&first), vec!["Pet"]);
  assert_eq!(first, second);
  assert!(resolver.repository().is_known("Pet"));
  assert!(!resolver.repository().is_known("/pets/GET/200/application/json"));
  assert_eq!(resolver.repository().len(), 2);
  assert!(resolver.resolve_component("Pet", &reference).is_none());
}

#[test]
fn test_self_referencing_component_terminates() {
  let spec = spec_with_components(json!({
    "Node": {
      "type": "object",
      "properties": {
        "value": { "type": "integer" },
        "next": { "$ref": "#/components/schemas/Node" },
        "children": { "type": "array", "items": { "$ref": "#/components/schemas/Node" } }
      }
    }
  }));
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(&node(json!({ "$ref": "#/components/schemas/Node" })), "root");

  assert!(resolution.succeeded);
  let model = resolver.repository().get_as::<ObjectModel>("Node").unwrap();
  assert_eq!(model.properties["next"].references, vec!["Node"]);
  assert_eq!(model.properties["children"].references, vec!["Node.children"]);
  let children = resolver.repository().get_as::<ArrayModel>("Node.children").unwrap();
  assert_eq!(children.item_references, vec!["Node"]);
}

#[test]
fn test_any_of_null_branch_marks_siblings_nullable() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(
    &node(json!({ "anyOf": [{ "type": "string" }, { "type": "null" }] })),
    "Nick",
  );

  assert!(resolution.succeeded);
  let composition = resolver.repository().get_as::<CompositionModel>("Nick").unwrap();
  assert_eq!(composition.kind, CompositionKind::AnyOf);
  assert_eq!(
    composition.members,
    vec!["#/primitive/string", "#/primitive/null", "#/primitive/null"]
  );
  assert!(!resolver.repository().is_known("Nick#1"), "null branch registers no named facet");
}

#[test]
fn test_one_of_member_failure_keeps_processing() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(
    &node(json!({ "oneOf": [{ "description": "untyped" }, { "type": "boolean" }] })),
    "Choice",
  );

  assert!(!resolution.succeeded);
  assert_eq!(names(&resolution), vec!["Choice"]);
  let composition = resolver.repository().get_as::<CompositionModel>("Choice").unwrap();
  assert_eq!(composition.members, vec!["#/primitive/boolean"]);
  assert_eq!(
    resolver.diagnostics(),
    &[Diagnostic::MissingType {
      hint: "Choice#0".to_string()
    }]
  );
}

#[test]
fn test_object_with_failed_property_is_still_registered() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(
    &node(json!({
      "type": "object",
      "properties": {
        "tags": { "type": "array" },
        "name": { "type": "string" }
      }
    })),
    "Item",
  );

  assert!(!resolution.succeeded);
  assert_eq!(names(&resolution), vec!["Item"]);
  let object = resolver.repository().get_as::<ObjectModel>("Item").unwrap();
  assert!(object.properties.contains_key("name"));
  assert!(!object.properties.contains_key("tags"));
  assert!(!resolver.repository().is_known("Item.tags"), "array without items is not registered");
  assert_eq!(
    resolver.diagnostics(),
    &[Diagnostic::MissingArrayItems {
      hint: "Item.tags".to_string()
    }]
  );
}

#[test]
fn test_missing_type_fails_without_models() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(&node(json!({ "properties": { "a": { "type": "string" } } })), "Loose");

  assert_eq!(resolution, Resolution::failure(vec![]));
  assert!(resolver.repository().is_empty());
}

#[test]
fn test_unknown_reference_is_recorded() {
  let spec = empty_spec();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());

  let resolution = resolver.resolve(&node(json!({ "$ref": "#/components/schemas/Missing" })), "hint");

  assert!(!resolution.succeeded);
  assert!(matches!(
    resolver.diagnostics(),
    [Diagnostic::UnresolvedReference { hint, reference, .. }]
      if hint == "hint" && reference == "#/components/schemas/Missing"
  ));
}

#[test]
fn test_component_pass_skips_known_ids() {
  let spec = spec_with_components(json!({
    "Color": { "type": "string", "enum": ["red", "green"] }
  }));
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new());
  let schema = spec.components.as_ref().unwrap().schemas["Color"].clone();

  let first = resolver.resolve_component("Color", &schema).unwrap();
  assert_eq!(names(&first), vec!["#/primitive/string", "Color"]);
  assert!(resolver.resolve_component("Color", &schema).is_none());
}

#[test]
fn test_cancelled_resolution_registers_nothing() {
  let spec = empty_spec();
  let token = CancellationToken::new();
  token.cancel();
  let mut resolver = SchemaResolver::new(&spec, InMemoryModelRepository::new()).with_cancellation(token);

  let resolution = resolver.resolve(&node(json!({ "type": "object", "properties": {} })), "Skipped");

  assert!(!resolution.succeeded);
  assert!(resolver.repository().is_empty());
  assert!(resolver.diagnostics().is_empty());
}
