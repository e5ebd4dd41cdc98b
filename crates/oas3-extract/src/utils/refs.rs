use oas3::spec::{ObjectOrReference, Ref};

/// Extracts the component name from an internal `$ref` such as `#/components/schemas/Pet`.
///
/// External documents and malformed pointers yield `None`.
pub fn component_name(ref_path: &str) -> Option<String> {
  if !ref_path.starts_with("#/components") {
    return None;
  }

  ref_path.parse::<Ref>().ok().map(|component| component.name)
}

/// The `$ref` path of a reference node, `None` for inline objects.
pub fn reference_target<T>(node: &ObjectOrReference<T>) -> Option<&str> {
  match node {
    ObjectOrReference::Ref { ref_path, .. } => Some(ref_path.as_str()),
    ObjectOrReference::Object(_) => None,
  }
}
