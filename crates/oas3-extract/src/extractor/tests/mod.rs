use oas3::Spec;
use oas3_extract_model::{
  HttpMethod, InMemoryModelRepository, Modifier, ModelReference, ModelRepository, ObjectModel, ParameterLocation,
  PathIndex, PathPartId, StatusKey,
};
use serde_json::json;

use super::{EndpointExtractor, SchemaBindings, extract_components};
use crate::{
  diagnostics::{Diagnostic, DiagnosticKind},
  resolver::SchemaResolver,
};

fn parse_spec(paths: serde_json::Value, schemas: serde_json::Value) -> Spec {
  oas3::from_json(
    json!({
      "openapi": "3.1.0",
      "info": { "title": "Test", "version": "1.0.0" },
      "paths": paths,
      "components": { "schemas": schemas }
    })
    .to_string(),
  )
  .expect("failed to parse test spec")
}

struct Extracted {
  index: PathIndex,
  bindings: SchemaBindings,
  repository: InMemoryModelRepository,
  diagnostics: Vec<Diagnostic>,
}

fn extract(spec: &Spec) -> Extracted {
  let mut resolver = SchemaResolver::new(spec, InMemoryModelRepository::new());
  let mut extractor = EndpointExtractor::new(&mut resolver);
  extractor.extract_paths();
  let (index, bindings) = extractor.into_parts();
  extract_components(&mut resolver);
  let (repository, diagnostics) = resolver.into_parts();
  Extracted {
    index,
    bindings,
    repository,
    diagnostics,
  }
}

fn id_parameter(name: &str) -> serde_json::Value {
  json!({ "name": name, "in": "path", "required": true, "schema": { "type": "integer" } })
}

#[test]
fn test_path_parameter_binds_trie_node() {
  let spec = parse_spec(
    json!({
      "/users/{id}": {
        "get": { "parameters": [id_parameter("id")], "responses": { "204": { "description": "ok" } } }
      }
    }),
    json!({}),
  );

  let extracted = extract(&spec);
  assert!(extracted.diagnostics.is_empty(), "{:?}", extracted.diagnostics);

  let node = extracted.index.find("/users/{id}").expect("parameter node");
  let part = extracted.index.part(node);
  assert_eq!(part.model_ref(), Some(&ModelReference::from("/users/{id}/.id")));

  let endpoint = part.endpoint(HttpMethod::Get).expect("GET endpoint");
  let parameter = &endpoint.parameters["id"];
  assert_eq!(parameter.location, ParameterLocation::Path);
  assert_eq!(parameter.modifier, Modifier::Required);
  assert_eq!(parameter.schema, "/users/{id}/.id");
  assert_eq!(
    extracted.bindings[&ModelReference::from("/users/{id}/.id")],
    vec![ModelReference::from("#/primitive/integer")]
  );
  assert!(endpoint.responses[&StatusKey::Code(204)].schemas.is_empty());
}

#[test]
fn test_mismatched_path_parameter_is_not_bound() {
  let spec = parse_spec(
    json!({
      "/users/{id}": {
        "get": { "parameters": [id_parameter("userId")], "responses": {} }
      }
    }),
    json!({}),
  );

  let extracted = extract(&spec);

  let node = extracted.index.find("/users/{id}").unwrap();
  assert_eq!(extracted.index.part(node).model_ref(), None);
  assert_eq!(
    extracted.diagnostics,
    vec![Diagnostic::UnboundPathParameter {
      path: "/users/{id}".to_string(),
      method: HttpMethod::Get,
      parameter: "userId".to_string(),
    }]
  );
  assert_eq!(extracted.diagnostics[0].kind(), DiagnosticKind::StructuralPath);
  assert!(
    extracted.index.part(node).endpoint(HttpMethod::Get).is_some(),
    "operation is still recorded"
  );
}

#[test]
fn test_duplicate_method_keeps_first_operation() {
  let spec = parse_spec(
    json!({
      "/users": { "get": { "operationId": "first", "responses": {} } },
      "/users/": { "get": { "operationId": "second", "parameters": [
        { "name": "page", "in": "query", "schema": { "type": "integer" } }
      ], "responses": {} } }
    }),
    json!({}),
  );

  let extracted = extract(&spec);

  assert_eq!(
    extracted.diagnostics,
    vec![Diagnostic::DuplicateMethod {
      path: "/users/".to_string(),
      method: HttpMethod::Get,
    }]
  );
  let node = extracted.index.find("/users").unwrap();
  let endpoint = extracted.index.part(node).endpoint(HttpMethod::Get).unwrap();
  assert!(endpoint.parameters.is_empty(), "first definition wins");
}

#[test]
fn test_request_and_response_schemas_use_contextual_names() {
  let spec = parse_spec(
    json!({
      "/users": {
        "get": {
          "parameters": [{ "name": "limit", "in": "query", "schema": { "type": "integer" } }],
          "responses": {
            "200": {
              "description": "ok",
              "content": {
                "application/json": {
                  "schema": { "type": "array", "items": { "$ref": "#/components/schemas/User" } }
                }
              }
            },
            "default": {
              "description": "error",
              "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Error" } } }
            }
          }
        },
        "post": {
          "requestBody": {
            "content": {
              "application/json": {
                "schema": { "type": "object", "properties": { "name": { "type": "string" } } }
              }
            }
          },
          "responses": { "201": { "description": "created" } }
        }
      }
    }),
    json!({
      "User": { "type": "object", "properties": { "name": { "type": "string" } } },
      "Error": { "type": "object", "properties": { "message": { "type": "string" } } }
    }),
  );

  let extracted = extract(&spec);
  assert!(extracted.diagnostics.is_empty(), "{:?}", extracted.diagnostics);

  let part = extracted.index.part(extracted.index.find("/users").unwrap());
  let get = part.endpoint(HttpMethod::Get).unwrap();
  assert_eq!(get.parameters["limit"].location, ParameterLocation::Query);
  assert_eq!(get.parameters["limit"].modifier, Modifier::Optional);
  assert_eq!(get.parameters["limit"].schema, "/users/.limit");

  let ok = &get.responses[&StatusKey::Code(200)];
  assert_eq!(ok.schemas["application/json"], "/users/GET/200/application/json");
  assert!(extracted.repository.is_known("/users/GET/200/application/json"));

  let fallback = &get.responses[&StatusKey::Default];
  assert_eq!(fallback.schemas["application/json"], "/users/GET/default/application/json");
  assert_eq!(
    extracted.bindings[&ModelReference::from("/users/GET/default/application/json")],
    vec![ModelReference::from("Error")]
  );

  let post = part.endpoint(HttpMethod::Post).unwrap();
  let body = &post.request_bodies["application/json"];
  assert_eq!(body, "/users/POST/request/application/json");
  assert!(extracted.repository.get_as::<ObjectModel>(body.as_str()).is_ok());
}

#[test]
fn test_path_item_parameters_are_inherited_and_overridden() {
  let spec = parse_spec(
    json!({
      "/orgs/{org}/members": {
        "parameters": [
          { "name": "org", "in": "path", "required": true, "schema": { "type": "string" } },
          { "name": "verbose", "in": "query", "schema": { "type": "boolean" } }
        ],
        "get": {
          "parameters": [{ "name": "verbose", "in": "header", "required": true, "schema": { "type": "boolean" } }],
          "responses": {}
        },
        "delete": { "responses": {} }
      }
    }),
    json!({}),
  );

  let extracted = extract(&spec);
  assert!(extracted.diagnostics.is_empty(), "{:?}", extracted.diagnostics);

  let part = extracted.index.part(extracted.index.find("/orgs/{org}/members").unwrap());
  let get = part.endpoint(HttpMethod::Get).unwrap();
  assert_eq!(get.parameters.len(), 2);
  assert_eq!(get.parameters["verbose"].location, ParameterLocation::Header);

  let delete = part.endpoint(HttpMethod::Delete).unwrap();
  assert_eq!(delete.parameters["verbose"].location, ParameterLocation::Query);

  let org = extracted.index.find("/orgs/{org}").unwrap();
  assert_eq!(
    extracted.index.part(org).model_ref(),
    Some(&ModelReference::from("/orgs/{org}/members/.org"))
  );
}

#[test]
fn test_differently_named_parameters_are_sibling_nodes() {
  let spec = parse_spec(
    json!({
      "/items/{id}": { "get": { "parameters": [id_parameter("id")], "responses": {} } },
      "/items/{itemId}": { "put": { "parameters": [id_parameter("itemId")], "responses": {} } }
    }),
    json!({}),
  );

  let extracted = extract(&spec);

  assert!(extracted.diagnostics.is_empty(), "{:?}", extracted.diagnostics);
  let items = extracted.index.find("/items").unwrap();
  let segments = extracted
    .index
    .children(items)
    .map(|(_, part)| part.segment.as_str())
    .collect::<Vec<_>>();
  assert_eq!(segments, vec!["{id}", "{itemId}"]);

  let by_item_id = extracted.index.find("/items/{itemId}").unwrap();
  assert_eq!(
    extracted.index.part(by_item_id).model_ref(),
    Some(&ModelReference::from("/items/{itemId}/.itemId"))
  );
}

#[test]
fn test_repeated_parameter_segment_is_rejected() {
  let spec = parse_spec(
    json!({
      "/a/{id}/b/{id}": { "get": { "responses": {} } }
    }),
    json!({}),
  );

  let extracted = extract(&spec);

  assert_eq!(
    extracted.diagnostics,
    vec![Diagnostic::DuplicateParameterSegment {
      path: "/a/{id}/b/{id}".to_string(),
      segment: "{id}".to_string(),
    }]
  );
  let b = extracted.index.find("/a/{id}/b").unwrap();
  assert!(extracted.index.part(b).children.is_empty());
}

#[test]
fn test_root_template_attaches_to_root() {
  let spec = parse_spec(json!({ "/": { "get": { "responses": {} } } }), json!({}));

  let extracted = extract(&spec);

  assert!(extracted.diagnostics.is_empty());
  assert_eq!(extracted.index.find("/"), Some(PathPartId::ROOT));
  assert!(extracted.index.root().endpoint(HttpMethod::Get).is_some());
}

#[test]
fn test_invalid_status_key_is_recorded() {
  let spec = parse_spec(
    json!({ "/ping": { "get": { "responses": { "ok": { "description": "fine" }, "200": { "description": "fine" } } } } }),
    json!({}),
  );

  let extracted = extract(&spec);

  assert_eq!(
    extracted.diagnostics,
    vec![Diagnostic::InvalidStatusKey {
      path: "/ping".to_string(),
      method: HttpMethod::Get,
      status: "ok".to_string(),
    }]
  );
  let part = extracted.index.part(extracted.index.find("/ping").unwrap());
  let endpoint = part.endpoint(HttpMethod::Get).unwrap();
  assert_eq!(endpoint.responses.keys().copied().collect::<Vec<_>>(), vec![StatusKey::Code(200)]);
}

#[test]
fn test_components_resolve_after_paths_and_skip_known() {
  let spec = parse_spec(
    json!({
      "/pets": {
        "get": {
          "responses": {
            "200": { "description": "ok", "content": { "application/json": { "schema": { "$ref": "#/components/schemas/Pet" } } } }
          }
        }
      }
    }),
    json!({
      "Pet": { "type": "object", "properties": { "name": { "type": "string" } } },
      "Unused": { "type": "string", "enum": ["x"] }
    }),
  );

  let extracted = extract(&spec);

  assert!(extracted.diagnostics.is_empty(), "{:?}", extracted.diagnostics);
  let names = extracted.repository.names().collect::<Vec<_>>();
  assert_eq!(names, vec!["#/primitive/string", "Pet", "Unused"]);
}

#[test]
fn test_unnamed_parameter_is_skipped() {
  let spec = parse_spec(
    json!({
      "/search": {
        "get": {
          "parameters": [
            { "name": "", "in": "query", "schema": { "type": "string" } },
            { "name": "q", "in": "query", "schema": { "type": "string" } }
          ],
          "responses": {}
        }
      }
    }),
    json!({}),
  );

  let extracted = extract(&spec);

  assert_eq!(
    extracted.diagnostics,
    vec![Diagnostic::UnnamedParameter {
      path: "/search".to_string(),
      index: 0,
    }]
  );
  let part = extracted.index.part(extracted.index.find("/search").unwrap());
  let endpoint = part.endpoint(HttpMethod::Get).unwrap();
  assert_eq!(endpoint.parameters.keys().collect::<Vec<_>>(), vec!["q"]);
}
