use indexmap::{IndexMap, map::Entry};
use serde::{Serialize, Serializer, ser::SerializeMap};
use thiserror::Error;

use crate::{
  endpoints::{Endpoint, HttpMethod},
  models::ModelReference,
};

/// Index of a node inside a [`PathIndex`] arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PathPartId(usize);

impl PathPartId {
  pub const ROOT: Self = Self(0);

  #[must_use]
  pub const fn index(self) -> usize {
    self.0
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PathSegmentKind {
  Constant,
  Parameter { model_ref: Option<ModelReference> },
}

impl PathSegmentKind {
  #[must_use]
  pub const fn is_parameter(&self) -> bool {
    matches!(self, Self::Parameter { .. })
  }

  #[must_use]
  pub const fn as_str(&self) -> &'static str {
    match self {
      Self::Constant => "constant",
      Self::Parameter { .. } => "parameter",
    }
  }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathPart {
  pub segment: String,
  pub kind: PathSegmentKind,
  pub children: IndexMap<String, PathPartId>,
  pub endpoints: Option<IndexMap<HttpMethod, Endpoint>>,
}

impl PathPart {
  fn new(segment: impl Into<String>, kind: PathSegmentKind) -> Self {
    Self {
      segment: segment.into(),
      kind,
      children: IndexMap::new(),
      endpoints: None,
    }
  }

  #[must_use]
  pub fn model_ref(&self) -> Option<&ModelReference> {
    match &self.kind {
      PathSegmentKind::Parameter { model_ref } => model_ref.as_ref(),
      PathSegmentKind::Constant => None,
    }
  }

  #[must_use]
  pub fn endpoint(&self, method: HttpMethod) -> Option<&Endpoint> {
    self.endpoints.as_ref().and_then(|endpoints| endpoints.get(&method))
  }

  #[must_use]
  pub fn endpoint_count(&self) -> usize {
    self.endpoints.as_ref().map_or(0, IndexMap::len)
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum PathIndexError {
  #[error("segment '{segment}' already exists as a {existing} node")]
  KindMismatch { segment: String, existing: &'static str },
  #[error("method {method} is already defined on segment '{segment}'")]
  DuplicateMethod { segment: String, method: HttpMethod },
  #[error("segment '{segment}' is not a parameter node")]
  NotAParameter { segment: String },
}

/// Whether a segment is written as `{name}`.
#[must_use]
pub fn is_parameter_segment(segment: &str) -> bool {
  segment.len() >= 2 && segment.starts_with('{') && segment.ends_with('}')
}

/// Trie of path segments, stored as an arena addressed by [`PathPartId`].
///
/// The root is an implicit constant node at [`PathPartId::ROOT`]; the first real segment of
/// every template is one of its children.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathIndex {
  parts: Vec<PathPart>,
}

impl Default for PathIndex {
  fn default() -> Self {
    Self::new()
  }
}

impl PathIndex {
  #[must_use]
  pub fn new() -> Self {
    Self {
      parts: vec![PathPart::new("/", PathSegmentKind::Constant)],
    }
  }

  /// # Panics
  ///
  /// Ids are only handed out by this index, so a foreign id indexes out of bounds.
  #[must_use]
  pub fn part(&self, id: PathPartId) -> &PathPart {
    &self.parts[id.0]
  }

  #[must_use]
  pub fn root(&self) -> &PathPart {
    self.part(PathPartId::ROOT)
  }

  pub fn children(&self, id: PathPartId) -> impl Iterator<Item = (PathPartId, &PathPart)> {
    self.part(id).children.values().map(|&child| (child, self.part(child)))
  }

  /// Number of nodes, the implicit root excluded.
  #[must_use]
  pub fn len(&self) -> usize {
    self.parts.len() - 1
  }

  #[must_use]
  pub fn is_empty(&self) -> bool {
    self.len() == 0
  }

  pub fn get_or_add_constant(&mut self, parent: PathPartId, segment: &str) -> Result<PathPartId, PathIndexError> {
    self.get_or_add(parent, segment, PathSegmentKind::Constant)
  }

  pub fn get_or_add_parameter(&mut self, parent: PathPartId, segment: &str) -> Result<PathPartId, PathIndexError> {
    self.get_or_add(parent, segment, PathSegmentKind::Parameter { model_ref: None })
  }

  fn get_or_add(
    &mut self,
    parent: PathPartId,
    segment: &str,
    kind: PathSegmentKind,
  ) -> Result<PathPartId, PathIndexError> {
    if let Some(&existing) = self.part(parent).children.get(segment) {
      let existing_kind = &self.part(existing).kind;
      if existing_kind.is_parameter() != kind.is_parameter() {
        return Err(PathIndexError::KindMismatch {
          segment: segment.to_string(),
          existing: existing_kind.as_str(),
        });
      }
      return Ok(existing);
    }

    let id = PathPartId(self.parts.len());
    self.parts.push(PathPart::new(segment, kind));
    self.parts[parent.0].children.insert(segment.to_string(), id);
    Ok(id)
  }

  /// Binds a parameter node to its schema. The first binding is kept; the bound reference
  /// is returned either way.
  pub fn bind_parameter(&mut self, id: PathPartId, reference: ModelReference) -> Result<&ModelReference, PathIndexError> {
    let part = &mut self.parts[id.0];
    match &mut part.kind {
      PathSegmentKind::Parameter { model_ref } => Ok(&*model_ref.get_or_insert(reference)),
      PathSegmentKind::Constant => Err(PathIndexError::NotAParameter {
        segment: part.segment.clone(),
      }),
    }
  }

  pub fn insert_endpoint(&mut self, id: PathPartId, endpoint: Endpoint) -> Result<(), PathIndexError> {
    let part = &mut self.parts[id.0];
    match part.endpoints.get_or_insert_with(IndexMap::new).entry(endpoint.method) {
      Entry::Occupied(entry) => Err(PathIndexError::DuplicateMethod {
        segment: part.segment.clone(),
        method: *entry.key(),
      }),
      Entry::Vacant(entry) => {
        entry.insert(endpoint);
        Ok(())
      }
    }
  }

  /// Walks `template` without creating nodes.
  #[must_use]
  pub fn find(&self, template: &str) -> Option<PathPartId> {
    template
      .split('/')
      .filter(|segment| !segment.is_empty())
      .try_fold(PathPartId::ROOT, |current, segment| {
        self.part(current).children.get(segment).copied()
      })
  }

  /// Depth-first walk yielding every node with its reconstructed template, root first.
  #[must_use]
  pub fn walk(&self) -> Vec<(String, PathPartId)> {
    let mut out = Vec::with_capacity(self.parts.len());
    let mut stack = vec![(String::from("/"), PathPartId::ROOT)];
    while let Some((template, id)) = stack.pop() {
      let part = self.part(id);
      for &child in part.children.values().rev() {
        let child_template = if template.ends_with('/') {
          format!("{template}{}", self.part(child).segment)
        } else {
          format!("{template}/{}", self.part(child).segment)
        };
        stack.push((child_template, child));
      }
      out.push((template, id));
    }
    out
  }

  pub fn endpoints(&self) -> impl Iterator<Item = &Endpoint> {
    self
      .parts
      .iter()
      .filter_map(|part| part.endpoints.as_ref())
      .flat_map(IndexMap::values)
  }
}

struct PartView<'a> {
  index: &'a PathIndex,
  id: PathPartId,
}

impl Serialize for PartView<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let part = self.index.part(self.id);
    let mut map = serializer.serialize_map(None)?;
    map.serialize_entry("segment", &part.segment)?;
    map.serialize_entry("kind", part.kind.as_str())?;
    if let Some(model_ref) = part.model_ref() {
      map.serialize_entry("model_ref", model_ref)?;
    }
    if let Some(endpoints) = &part.endpoints {
      map.serialize_entry("endpoints", endpoints)?;
    }
    if !part.children.is_empty() {
      map.serialize_entry("children", &ChildrenView { index: self.index, id: self.id })?;
    }
    map.end()
  }
}

struct ChildrenView<'a> {
  index: &'a PathIndex,
  id: PathPartId,
}

impl Serialize for ChildrenView<'_> {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    let children = &self.index.part(self.id).children;
    let mut map = serializer.serialize_map(Some(children.len()))?;
    for (segment, &child) in children {
      map.serialize_entry(segment, &PartView { index: self.index, id: child })?;
    }
    map.end()
  }
}

/// Serializes as the nested tree under the root node.
impl Serialize for PathIndex {
  fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    PartView {
      index: self,
      id: PathPartId::ROOT,
    }
    .serialize(serializer)
  }
}
