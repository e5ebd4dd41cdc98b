//! Deterministic names for schema facets.
//!
//! Component schemas keep their own id wherever they are referenced from, so repeated
//! references collapse onto one model. Inline facets derive their name from the hint of the
//! enclosing node plus a marker, which keeps them distinct from each other and from the parent.

pub(crate) mod constants;

use oas3_extract_model::{HttpMethod, StatusKey};

use self::constants::{
  ARRAY_ITEM_MARKER, MEMBER_MARKER, NULLABLE_MARKER, PARAMETER_SEPARATOR, PROPERTY_SEPARATOR, REQUEST_SEGMENT,
};

#[must_use]
pub fn path_parameter_name(path: &str, parameter: &str) -> String {
  format!("{path}{PARAMETER_SEPARATOR}{parameter}")
}

#[must_use]
pub fn enum_name(hint: &str, nullable: bool) -> String {
  if nullable {
    format!("{hint}{NULLABLE_MARKER}")
  } else {
    hint.to_string()
  }
}

/// Global identifier of a component schema. Independent of the call site.
#[must_use]
pub fn reference_name(schema_id: &str) -> String {
  schema_id.to_string()
}

#[must_use]
pub fn property_name(hint: &str, property: &str) -> String {
  format!("{hint}{PROPERTY_SEPARATOR}{property}")
}

/// Name of the `index`-th member of a `oneOf`, `anyOf` or `allOf`. All three combinators share
/// the marker since a node resolves through at most one of them.
#[must_use]
pub fn member_name(hint: &str, index: usize) -> String {
  format!("{hint}{MEMBER_MARKER}{index}")
}

#[must_use]
pub fn array_item_name(hint: &str) -> String {
  format!("{hint}{ARRAY_ITEM_MARKER}")
}

#[must_use]
pub fn request_body_name(path: &str, method: HttpMethod, mime_type: &str) -> String {
  format!("{path}/{method}/{REQUEST_SEGMENT}/{mime_type}")
}

#[must_use]
pub fn response_name(path: &str, method: HttpMethod, status: StatusKey, mime_type: &str) -> String {
  format!("{path}/{method}/{status}/{mime_type}")
}
