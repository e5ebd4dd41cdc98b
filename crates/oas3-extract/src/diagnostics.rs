use oas3_extract_model::HttpMethod;
use serde::Serialize;
use strum::Display;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Display)]
#[serde(rename_all = "snake_case")]
pub enum DiagnosticKind {
  #[strum(to_string = "structural")]
  StructuralPath,
  #[strum(to_string = "schema")]
  SchemaResolution,
}

/// A recoverable problem found in the document. The affected path, operation or schema
/// subtree is skipped and extraction continues.
#[derive(Debug, Clone, PartialEq, Eq, Display)]
pub enum Diagnostic {
  #[strum(to_string = "Path '{path}': segment '{segment}' already exists as a {existing} segment")]
  SegmentKindMismatch {
    path: String,
    segment: String,
    existing: &'static str,
  },
  #[strum(to_string = "Path '{path}': parameter segment '{segment}' appears more than once")]
  DuplicateParameterSegment { path: String, segment: String },
  #[strum(to_string = "Path '{path}': method {method} is already defined for this path")]
  DuplicateMethod { path: String, method: HttpMethod },
  #[strum(to_string = "Path '{path}': unsupported method {method}")]
  UnsupportedMethod { path: String, method: String },
  #[strum(to_string = "[{method} {path}] path parameter '{parameter}' has no matching segment")]
  UnboundPathParameter {
    path: String,
    method: HttpMethod,
    parameter: String,
  },
  #[strum(to_string = "[{method} {path}] invalid response status key '{status}'")]
  InvalidStatusKey {
    path: String,
    method: HttpMethod,
    status: String,
  },
  #[strum(to_string = "Path '{path}': parameter #{index} has no name")]
  UnnamedParameter { path: String, index: usize },
  #[strum(to_string = "Path '{path}': parameter '{parameter}' declares no schema")]
  ParameterWithoutSchema { path: String, parameter: String },
  #[strum(to_string = "Schema '{hint}' has no type")]
  MissingType { hint: String },
  #[strum(to_string = "Schema '{hint}' is a boolean schema")]
  BooleanSchema { hint: String },
  #[strum(to_string = "Array schema '{hint}' has no items")]
  MissingArrayItems { hint: String },
  #[strum(to_string = "Failed to resolve reference '{reference}' for '{hint}': {error}")]
  UnresolvedReference {
    hint: String,
    reference: String,
    error: String,
  },
}

impl Diagnostic {
  #[must_use]
  pub const fn kind(&self) -> DiagnosticKind {
    match self {
      Self::SegmentKindMismatch { .. }
      | Self::DuplicateParameterSegment { .. }
      | Self::DuplicateMethod { .. }
      | Self::UnsupportedMethod { .. }
      | Self::UnboundPathParameter { .. }
      | Self::InvalidStatusKey { .. } => DiagnosticKind::StructuralPath,
      Self::UnnamedParameter { .. }
      | Self::ParameterWithoutSchema { .. }
      | Self::MissingType { .. }
      | Self::BooleanSchema { .. }
      | Self::MissingArrayItems { .. }
      | Self::UnresolvedReference { .. } => DiagnosticKind::SchemaResolution,
    }
  }

  #[must_use]
  pub const fn is_structural(&self) -> bool {
    matches!(self.kind(), DiagnosticKind::StructuralPath)
  }
}

impl Serialize for Diagnostic {
  fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
    use serde::ser::SerializeStruct;

    let mut state = serializer.serialize_struct("Diagnostic", 2)?;
    state.serialize_field("kind", &self.kind())?;
    state.serialize_field("message", &self.to_string())?;
    state.end()
  }
}
