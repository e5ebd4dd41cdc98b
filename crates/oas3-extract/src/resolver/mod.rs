//! Recursive schema resolution.
//!
//! A schema node resolves to the list of model names it denotes. Named facets (objects,
//! arrays, enums, compositions) are registered in the repository on first sight and shared by
//! name afterwards; primitives collapse onto their canonical models.

mod type_flags;

use std::collections::{HashMap, HashSet};

use indexmap::IndexMap;
use oas3::{
  Spec,
  spec::{ObjectOrReference, ObjectSchema, Schema},
};
use oas3_extract_model::{
  ArrayModel, CompositionKind, CompositionModel, EnumModel, ModelProperty, ModelReference, ModelRepository, Modifier,
  ObjectModel, PrimitiveKind, PrimitiveModel,
};

pub use self::type_flags::TypeFlags;
use crate::{cancellation::CancellationToken, diagnostics::Diagnostic, naming, utils::component_name};

const PRIMITIVE_ORDER: [(TypeFlags, PrimitiveKind); 5] = [
  (TypeFlags::STRING, PrimitiveKind::String),
  (TypeFlags::INTEGER, PrimitiveKind::Integer),
  (TypeFlags::NUMBER, PrimitiveKind::Number),
  (TypeFlags::BOOLEAN, PrimitiveKind::Boolean),
  (TypeFlags::NULL, PrimitiveKind::Null),
];

/// Outcome of resolving one schema node.
///
/// A failed resolution still carries whatever references were produced before the failure;
/// callers that aggregate results drop them.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Resolution {
  pub references: Vec<ModelReference>,
  pub succeeded: bool,
}

impl Resolution {
  #[must_use]
  pub fn success(references: Vec<ModelReference>) -> Self {
    Self {
      references,
      succeeded: true,
    }
  }

  #[must_use]
  pub fn failure(references: Vec<ModelReference>) -> Self {
    Self {
      references,
      succeeded: false,
    }
  }

  #[must_use]
  pub fn single(reference: impl Into<ModelReference>, succeeded: bool) -> Self {
    Self {
      references: vec![reference.into()],
      succeeded,
    }
  }
}

pub struct SchemaResolver<'s, R: ModelRepository> {
  spec: &'s Spec,
  repository: R,
  cancellation: CancellationToken,
  diagnostics: Vec<Diagnostic>,
  in_progress: HashSet<String>,
  resolved_references: HashMap<String, Resolution>,
}

impl<'s, R: ModelRepository> SchemaResolver<'s, R> {
  pub fn new(spec: &'s Spec, repository: R) -> Self {
    Self {
      spec,
      repository,
      cancellation: CancellationToken::new(),
      diagnostics: vec![],
      in_progress: HashSet::new(),
      resolved_references: HashMap::new(),
    }
  }

  #[must_use]
  pub fn with_cancellation(mut self, cancellation: CancellationToken) -> Self {
    self.cancellation = cancellation;
    self
  }

  #[must_use]
  pub const fn spec(&self) -> &'s Spec {
    self.spec
  }

  pub const fn repository(&self) -> &R {
    &self.repository
  }

  pub fn diagnostics(&self) -> &[Diagnostic] {
    &self.diagnostics
  }

  #[must_use]
  pub fn is_cancelled(&self) -> bool {
    self.cancellation.is_cancelled()
  }

  pub fn record(&mut self, diagnostic: Diagnostic) {
    self.diagnostics.push(diagnostic);
  }

  pub fn into_parts(self) -> (R, Vec<Diagnostic>) {
    (self.repository, self.diagnostics)
  }

  /// Resolves a schema node under `hint`. References ignore the hint and resolve under their
  /// component id.
  pub fn resolve(&mut self, schema: &ObjectOrReference<ObjectSchema>, hint: &str) -> Resolution {
    self.resolve_node(schema, hint, false)
  }

  /// Resolves a component schema under its own id. Returns `None` when the id was already
  /// registered or resolved through a reference.
  pub fn resolve_component(&mut self, id: &str, schema: &ObjectOrReference<ObjectSchema>) -> Option<Resolution> {
    let name = naming::reference_name(id);
    if self.repository.is_known(&name) || self.resolved_references.contains_key(&name) {
      return None;
    }

    self.in_progress.insert(name.clone());
    let resolution = self.resolve_node(schema, &name, false);
    self.in_progress.remove(&name);
    if !self.is_cancelled() {
      self.resolved_references.insert(name, resolution.clone());
    }
    Some(resolution)
  }

  fn resolve_node(&mut self, schema: &ObjectOrReference<ObjectSchema>, hint: &str, legacy_null: bool) -> Resolution {
    if self.is_cancelled() {
      return Resolution::failure(vec![]);
    }

    match schema {
      ObjectOrReference::Ref { ref_path, .. } => self.resolve_reference(schema, ref_path, hint),
      ObjectOrReference::Object(inline) => self.resolve_inline(inline, hint, legacy_null),
    }
  }

  fn resolve_reference(&mut self, schema: &ObjectOrReference<ObjectSchema>, ref_path: &str, hint: &str) -> Resolution {
    let Some(id) = component_name(ref_path) else {
      self.record(Diagnostic::UnresolvedReference {
        hint: hint.to_string(),
        reference: ref_path.to_string(),
        error: "not an internal component reference".to_string(),
      });
      return Resolution::failure(vec![]);
    };

    let name = naming::reference_name(&id);
    if let Some(resolved) = self.resolved_references.get(&name) {
      return resolved.clone();
    }
    if self.in_progress.contains(&name) {
      return Resolution::single(name, true);
    }

    let target = match schema.resolve(self.spec) {
      Ok(target) => target,
      Err(error) => {
        self.record(Diagnostic::UnresolvedReference {
          hint: hint.to_string(),
          reference: ref_path.to_string(),
          error: error.to_string(),
        });
        return Resolution::failure(vec![]);
      }
    };

    self.in_progress.insert(name.clone());
    let resolution = self.resolve_inline(&target, &name, false);
    self.in_progress.remove(&name);
    if !self.is_cancelled() {
      self.resolved_references.insert(name, resolution.clone());
    }
    resolution
  }

  fn resolve_inline(&mut self, schema: &ObjectSchema, hint: &str, legacy_null: bool) -> Resolution {
    if !schema.one_of.is_empty() {
      self.resolve_composition(CompositionKind::OneOf, &schema.one_of, hint)
    } else if !schema.all_of.is_empty() {
      self.resolve_composition(CompositionKind::AllOf, &schema.all_of, hint)
    } else if !schema.any_of.is_empty() {
      self.resolve_composition(CompositionKind::AnyOf, &schema.any_of, hint)
    } else {
      self.resolve_typed(schema, hint, legacy_null)
    }
  }

  fn resolve_composition(
    &mut self,
    kind: CompositionKind,
    members: &[ObjectOrReference<ObjectSchema>],
    hint: &str,
  ) -> Resolution {
    let nullable_union = kind == CompositionKind::AnyOf && members.iter().any(|member| self.admits_null(member));

    let mut references = vec![];
    let mut succeeded = true;
    for (index, member) in members.iter().enumerate() {
      if self.is_cancelled() {
        return Resolution::single(hint, false);
      }

      let legacy_null = nullable_union && is_single_non_null_inline(member);
      let resolution = self.resolve_node(member, &naming::member_name(hint, index), legacy_null);
      if resolution.succeeded {
        references.extend(resolution.references);
      } else {
        succeeded = false;
      }
    }

    self.repository.register_if_absent(
      CompositionModel {
        name: hint.to_string(),
        kind,
        members: references,
      }
      .into(),
    );
    Resolution::single(hint, succeeded)
  }

  fn resolve_typed(&mut self, schema: &ObjectSchema, hint: &str, legacy_null: bool) -> Resolution {
    let mut flags = TypeFlags::of(schema);
    if flags.is_empty() {
      self.record(Diagnostic::MissingType { hint: hint.to_string() });
      return Resolution::failure(vec![]);
    }
    if legacy_null {
      flags |= TypeFlags::NULL;
    }

    let mut references = vec![];
    let mut succeeded = true;

    for (flag, kind) in PRIMITIVE_ORDER {
      if flags.contains(flag) {
        self.repository.register_if_absent(PrimitiveModel::new(kind).into());
        references.push(kind.reference());
      }
    }

    if flags.contains(TypeFlags::STRING) && !schema.enum_values.is_empty() {
      references.push(self.register_enum(schema, hint));
    }

    if flags.contains(TypeFlags::OBJECT) {
      succeeded &= self.register_object(schema, hint);
      references.push(ModelReference::from(hint));
    }

    if flags.contains(TypeFlags::ARRAY) {
      succeeded &= self.register_array(schema, hint);
      references.push(ModelReference::from(hint));
    }

    Resolution { references, succeeded }
  }

  fn register_enum(&mut self, schema: &ObjectSchema, hint: &str) -> ModelReference {
    let nullable = schema.enum_values.iter().any(serde_json::Value::is_null);
    let name = naming::enum_name(hint, nullable);
    if !self.repository.is_known(&name) {
      let values = schema
        .enum_values
        .iter()
        .filter_map(serde_json::Value::as_str)
        .map(str::to_string)
        .collect();
      self.repository.register_if_absent(
        EnumModel {
          name: name.clone(),
          values,
          nullable,
        }
        .into(),
      );
    }
    ModelReference::from(name)
  }

  /// Registers the object even when some properties fail; failed properties are left out.
  fn register_object(&mut self, schema: &ObjectSchema, hint: &str) -> bool {
    if self.repository.is_known(hint) {
      return true;
    }

    let mut properties = IndexMap::with_capacity(schema.properties.len());
    let mut succeeded = true;
    for (property, property_schema) in &schema.properties {
      let resolution = self.resolve_node(property_schema, &naming::property_name(hint, property), false);
      if !resolution.succeeded {
        succeeded = false;
        continue;
      }

      let modifier = Modifier::from_required(schema.required.contains(property));
      properties.insert(
        property.clone(),
        ModelProperty::new(property.clone(), resolution.references, modifier),
      );
    }

    if self.is_cancelled() {
      return false;
    }

    self.repository.register_if_absent(
      ObjectModel {
        name: hint.to_string(),
        properties,
      }
      .into(),
    );
    succeeded
  }

  fn register_array(&mut self, schema: &ObjectSchema, hint: &str) -> bool {
    if self.repository.is_known(hint) {
      return true;
    }

    let Some(items) = schema.items.as_deref() else {
      self.record(Diagnostic::MissingArrayItems { hint: hint.to_string() });
      return false;
    };

    let item_hint = naming::array_item_name(hint);
    let resolution = match items {
      Schema::Object(node) => self.resolve_node(node, &item_hint, false),
      Schema::Boolean(_) => {
        self.record(Diagnostic::BooleanSchema { hint: item_hint });
        return false;
      }
    };
    if !resolution.succeeded {
      return false;
    }

    self.repository.register_if_absent(
      ArrayModel {
        name: hint.to_string(),
        item_references: resolution.references,
      }
      .into(),
    );
    true
  }

  /// Whether a union member's type set contains `null`, looking through references.
  fn admits_null(&self, member: &ObjectOrReference<ObjectSchema>) -> bool {
    match member {
      ObjectOrReference::Object(schema) => TypeFlags::of(schema).contains(TypeFlags::NULL),
      ObjectOrReference::Ref { .. } => member
        .resolve(self.spec)
        .is_ok_and(|schema| TypeFlags::of(&schema).contains(TypeFlags::NULL)),
    }
  }
}

/// Inline member naming exactly one non-null type, the shape that receives an implicit `null`
/// when a sibling in the same `anyOf` is nullable.
fn is_single_non_null_inline(member: &ObjectOrReference<ObjectSchema>) -> bool {
  match member {
    ObjectOrReference::Object(schema) => {
      let flags = TypeFlags::of(schema);
      flags.bits().count_ones() == 1 && !flags.contains(TypeFlags::NULL)
    }
    ObjectOrReference::Ref { .. } => false,
  }
}

#[cfg(test)]
mod tests;
