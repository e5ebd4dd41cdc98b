use std::{
  borrow::Borrow,
  fmt::{Display, Formatter},
};

use indexmap::IndexMap;
use serde::Serialize;
use strum::Display as StrumDisplay;

/// Name of a registered model. Models reference each other only through these names.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
#[serde(transparent)]
pub struct ModelReference(String);

impl ModelReference {
  pub fn new(name: impl Into<String>) -> Self {
    Self(name.into())
  }

  #[must_use]
  pub fn as_str(&self) -> &str {
    &self.0
  }
}

impl Display for ModelReference {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    f.write_str(&self.0)
  }
}

impl AsRef<str> for ModelReference {
  fn as_ref(&self) -> &str {
    &self.0
  }
}

impl Borrow<str> for ModelReference {
  fn borrow(&self) -> &str {
    &self.0
  }
}

impl From<&str> for ModelReference {
  fn from(value: &str) -> Self {
    Self(value.to_string())
  }
}

impl From<String> for ModelReference {
  fn from(value: String) -> Self {
    Self(value)
  }
}

impl From<&String> for ModelReference {
  fn from(value: &String) -> Self {
    Self(value.clone())
  }
}

impl PartialEq<str> for ModelReference {
  fn eq(&self, other: &str) -> bool {
    self.0 == other
  }
}

impl PartialEq<&str> for ModelReference {
  fn eq(&self, other: &&str) -> bool {
    self.0 == *other
  }
}

/// The JSON primitive kinds that collapse onto a single shared model each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, StrumDisplay)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum PrimitiveKind {
  String,
  Integer,
  Number,
  Boolean,
  Null,
}

impl PrimitiveKind {
  pub const STRING_NAME: &'static str = "#/primitive/string";
  pub const INTEGER_NAME: &'static str = "#/primitive/integer";
  pub const NUMBER_NAME: &'static str = "#/primitive/number";
  pub const BOOLEAN_NAME: &'static str = "#/primitive/boolean";
  pub const NULL_NAME: &'static str = "#/primitive/null";

  /// The fixed, document-independent name of this primitive's model.
  #[must_use]
  pub const fn canonical_name(self) -> &'static str {
    match self {
      Self::String => Self::STRING_NAME,
      Self::Integer => Self::INTEGER_NAME,
      Self::Number => Self::NUMBER_NAME,
      Self::Boolean => Self::BOOLEAN_NAME,
      Self::Null => Self::NULL_NAME,
    }
  }

  #[must_use]
  pub fn reference(self) -> ModelReference {
    ModelReference::from(self.canonical_name())
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, StrumDisplay)]
#[serde(rename_all = "camelCase")]
pub enum CompositionKind {
  #[strum(to_string = "oneOf")]
  OneOf,
  #[strum(to_string = "anyOf")]
  AnyOf,
  #[strum(to_string = "allOf")]
  AllOf,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Modifier {
  Required,
  Optional,
}

impl Modifier {
  #[must_use]
  pub const fn from_required(required: bool) -> Self {
    if required { Self::Required } else { Self::Optional }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct PrimitiveModel {
  pub kind: PrimitiveKind,
}

impl PrimitiveModel {
  #[must_use]
  pub const fn new(kind: PrimitiveKind) -> Self {
    Self { kind }
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EnumModel {
  pub name: String,
  pub values: Vec<String>,
  pub nullable: bool,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModelProperty {
  pub name: String,
  pub references: Vec<ModelReference>,
  pub modifier: Modifier,
}

impl ModelProperty {
  pub fn new(name: impl Into<String>, references: Vec<ModelReference>, modifier: Modifier) -> Self {
    Self {
      name: name.into(),
      references,
      modifier,
    }
  }
}

/// Property order carries no meaning; equality ignores it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ObjectModel {
  pub name: String,
  pub properties: IndexMap<String, ModelProperty>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ArrayModel {
  pub name: String,
  /// More than one entry only when the items schema is itself a union.
  pub item_references: Vec<ModelReference>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CompositionModel {
  pub name: String,
  pub kind: CompositionKind,
  pub members: Vec<ModelReference>,
}

/// Discriminant of [`Model`], used in lookup errors and statistics.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, StrumDisplay)]
#[strum(serialize_all = "lowercase")]
pub enum ModelKind {
  Primitive,
  Enum,
  Object,
  Array,
  Composition,
}

/// A resolved type model.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "model", rename_all = "lowercase")]
pub enum Model {
  Primitive(PrimitiveModel),
  Enum(EnumModel),
  Object(ObjectModel),
  Array(ArrayModel),
  Composition(CompositionModel),
}

impl Model {
  #[must_use]
  pub fn name(&self) -> &str {
    match self {
      Self::Primitive(model) => model.kind.canonical_name(),
      Self::Enum(model) => &model.name,
      Self::Object(model) => &model.name,
      Self::Array(model) => &model.name,
      Self::Composition(model) => &model.name,
    }
  }

  #[must_use]
  pub const fn kind(&self) -> ModelKind {
    match self {
      Self::Primitive(_) => ModelKind::Primitive,
      Self::Enum(_) => ModelKind::Enum,
      Self::Object(_) => ModelKind::Object,
      Self::Array(_) => ModelKind::Array,
      Self::Composition(_) => ModelKind::Composition,
    }
  }

  /// Every model name this model points at, in declaration order.
  #[must_use]
  pub fn references(&self) -> Box<dyn Iterator<Item = &ModelReference> + '_> {
    match self {
      Self::Primitive(_) | Self::Enum(_) => Box::new(std::iter::empty()),
      Self::Object(model) => Box::new(model.properties.values().flat_map(|prop| prop.references.iter())),
      Self::Array(model) => Box::new(model.item_references.iter()),
      Self::Composition(model) => Box::new(model.members.iter()),
    }
  }
}

impl From<PrimitiveModel> for Model {
  fn from(value: PrimitiveModel) -> Self {
    Self::Primitive(value)
  }
}

impl From<EnumModel> for Model {
  fn from(value: EnumModel) -> Self {
    Self::Enum(value)
  }
}

impl From<ObjectModel> for Model {
  fn from(value: ObjectModel) -> Self {
    Self::Object(value)
  }
}

impl From<ArrayModel> for Model {
  fn from(value: ArrayModel) -> Self {
    Self::Array(value)
  }
}

impl From<CompositionModel> for Model {
  fn from(value: CompositionModel) -> Self {
    Self::Composition(value)
  }
}

/// Typed access to one [`Model`] variant without downcasting.
pub trait ModelVariant: Sized {
  const KIND: ModelKind;

  fn from_model(model: &Model) -> Option<&Self>;
}

macro_rules! model_variant {
  ($ty:ty, $variant:ident) => {
    impl ModelVariant for $ty {
      const KIND: ModelKind = ModelKind::$variant;

      fn from_model(model: &Model) -> Option<&Self> {
        match model {
          Model::$variant(inner) => Some(inner),
          _ => None,
        }
      }
    }
  };
}

model_variant!(PrimitiveModel, Primitive);
model_variant!(EnumModel, Enum);
model_variant!(ObjectModel, Object);
model_variant!(ArrayModel, Array);
model_variant!(CompositionModel, Composition);
