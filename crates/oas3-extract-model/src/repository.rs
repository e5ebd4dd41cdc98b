use indexmap::IndexMap;
use serde::Serialize;
use thiserror::Error;

use crate::models::{Model, ModelKind, ModelReference, ModelVariant};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RepositoryError {
  /// Registering a name twice is a caller bug: check `is_known` or use `register_if_absent`.
  #[error("model '{name}' is already registered")]
  DuplicateModel { name: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
  #[error("model '{name}' is not registered")]
  NotFound { name: String },
  #[error("model '{name}' is a {actual} model, expected {expected}")]
  KindMismatch {
    name: String,
    expected: ModelKind,
    actual: ModelKind,
  },
}

/// Name-keyed store of resolved models.
///
/// Written by a single extraction pass, read by any number of consumers afterwards.
/// There is no update or delete: the first registration of a name is final.
pub trait ModelRepository {
  fn is_known(&self, name: &str) -> bool;

  /// Registers `model` under its own name.
  ///
  /// # Errors
  ///
  /// Returns [`RepositoryError::DuplicateModel`] when the name is already taken.
  fn add(&mut self, model: Model) -> Result<(), RepositoryError>;

  fn get(&self, name: &str) -> Option<&Model>;

  fn len(&self) -> usize;

  fn models(&self) -> Box<dyn Iterator<Item = &Model> + '_>;

  fn is_empty(&self) -> bool {
    self.len() == 0
  }

  /// Atomic check-and-insert. Returns `true` when `model` was stored, `false` when the
  /// name was already registered (the existing definition is kept).
  fn register_if_absent(&mut self, model: Model) -> bool {
    if self.is_known(model.name()) {
      return false;
    }
    self.add(model).is_ok()
  }

  fn resolve(&self, reference: &ModelReference) -> Option<&Model> {
    self.get(reference.as_str())
  }

  /// Looks up `name` and narrows it to the variant `T`.
  ///
  /// # Errors
  ///
  /// [`LookupError::NotFound`] for unknown names, [`LookupError::KindMismatch`] when the
  /// registered model is a different variant.
  fn get_as<T: ModelVariant>(&self, name: &str) -> Result<&T, LookupError>
  where
    Self: Sized,
  {
    let model = self.get(name).ok_or_else(|| LookupError::NotFound { name: name.to_string() })?;
    T::from_model(model).ok_or_else(|| LookupError::KindMismatch {
      name: name.to_string(),
      expected: T::KIND,
      actual: model.kind(),
    })
  }
}

/// Registration-ordered in-memory repository.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct InMemoryModelRepository {
  models: IndexMap<String, Model>,
}

impl InMemoryModelRepository {
  #[must_use]
  pub fn new() -> Self {
    Self::default()
  }

  pub fn names(&self) -> impl Iterator<Item = &str> {
    self.models.keys().map(String::as_str)
  }
}

impl ModelRepository for InMemoryModelRepository {
  fn is_known(&self, name: &str) -> bool {
    self.models.contains_key(name)
  }

  fn add(&mut self, model: Model) -> Result<(), RepositoryError> {
    match self.models.entry(model.name().to_string()) {
      indexmap::map::Entry::Occupied(entry) => Err(RepositoryError::DuplicateModel {
        name: entry.key().clone(),
      }),
      indexmap::map::Entry::Vacant(entry) => {
        entry.insert(model);
        Ok(())
      }
    }
  }

  fn get(&self, name: &str) -> Option<&Model> {
    self.models.get(name)
  }

  fn len(&self) -> usize {
    self.models.len()
  }

  fn models(&self) -> Box<dyn Iterator<Item = &Model> + '_> {
    Box::new(self.models.values())
  }

  fn register_if_absent(&mut self, model: Model) -> bool {
    match self.models.entry(model.name().to_string()) {
      indexmap::map::Entry::Occupied(_) => false,
      indexmap::map::Entry::Vacant(entry) => {
        entry.insert(model);
        true
      }
    }
  }
}
