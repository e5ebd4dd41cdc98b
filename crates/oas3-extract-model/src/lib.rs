//! Backend-facing data model produced by OpenAPI extraction: named type models, the
//! repository holding them, and the path trie carrying endpoint definitions.
//!
//! Every structure here references models by name only; nothing is aliased.

pub mod endpoints;
pub mod models;
pub mod paths;
pub mod repository;

pub use endpoints::{
  Endpoint, EndpointParameter, EndpointResponse, HttpMethod, InvalidStatusKey, ParameterLocation, StatusKey,
  UnsupportedMethod,
};
pub use models::{
  ArrayModel, CompositionKind, CompositionModel, EnumModel, Model, ModelKind, ModelProperty, ModelReference,
  ModelVariant, Modifier, ObjectModel, PrimitiveKind, PrimitiveModel,
};
pub use paths::{PathIndex, PathIndexError, PathPart, PathPartId, PathSegmentKind, is_parameter_segment};
pub use repository::{InMemoryModelRepository, LookupError, ModelRepository, RepositoryError};
