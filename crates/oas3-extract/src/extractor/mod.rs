//! Builds the endpoint path trie from the document's paths and drives schema resolution for
//! parameters, request bodies and responses along the way.

use indexmap::IndexMap;
use oas3::spec::{MediaType, ObjectOrReference, ObjectSchema, Operation, Parameter, ParameterIn, PathItem};
use oas3_extract_model::{
  Endpoint, EndpointParameter, EndpointResponse, HttpMethod, ModelReference, ModelRepository, Modifier,
  ParameterLocation, PathIndex, PathIndexError, PathPartId, StatusKey, is_parameter_segment,
};

use crate::{diagnostics::Diagnostic, naming, resolver::SchemaResolver, utils::reference_target};

/// Endpoint-derived schema names mapped to the model references their schema resolved to.
///
/// Endpoint entries carry contextual names; a name resolving to a shared component or a
/// primitive is never registered itself, so consumers follow it through this table.
pub type SchemaBindings = IndexMap<ModelReference, Vec<ModelReference>>;

pub struct EndpointExtractor<'r, 's, R: ModelRepository> {
  resolver: &'r mut SchemaResolver<'s, R>,
  index: PathIndex,
  bindings: SchemaBindings,
}

/// Result of walking one path template.
struct WalkedPath {
  terminal: PathPartId,
  parameter_segments: IndexMap<String, PathPartId>,
}

impl<'r, 's, R: ModelRepository> EndpointExtractor<'r, 's, R> {
  pub fn new(resolver: &'r mut SchemaResolver<'s, R>) -> Self {
    Self {
      resolver,
      index: PathIndex::new(),
      bindings: SchemaBindings::new(),
    }
  }

  /// Walks every path template in document order. Errors are recorded on the resolver and the
  /// affected template or operation is skipped.
  pub fn extract_paths(&mut self) {
    let spec = self.resolver.spec();
    let Some(paths) = spec.paths.as_ref() else {
      return;
    };

    for (template, item) in paths {
      if self.resolver.is_cancelled() {
        return;
      }
      self.extract_path(template, item);
    }
  }

  pub fn into_parts(self) -> (PathIndex, SchemaBindings) {
    (self.index, self.bindings)
  }

  fn extract_path(&mut self, template: &str, item: &PathItem) {
    let shared_parameters = self.collect_parameters(template, &item.parameters);

    let Some(walked) = self.walk(template) else {
      return;
    };

    for (method, operation) in item.methods() {
      if self.resolver.is_cancelled() {
        return;
      }

      let Ok(method) = HttpMethod::try_from(&method) else {
        self.resolver.record(Diagnostic::UnsupportedMethod {
          path: template.to_string(),
          method: method.to_string(),
        });
        continue;
      };

      if self.index.part(walked.terminal).endpoint(method).is_some() {
        self.resolver.record(Diagnostic::DuplicateMethod {
          path: template.to_string(),
          method,
        });
        continue;
      }

      let endpoint = self.build_endpoint(template, method, operation, &shared_parameters, &walked);
      if let Err(err) = self.index.insert_endpoint(walked.terminal, endpoint) {
        self.resolver.record(structural_diagnostic(template, err));
      }
    }
  }

  fn walk(&mut self, template: &str) -> Option<WalkedPath> {
    let mut current = PathPartId::ROOT;
    let mut parameter_segments = IndexMap::new();

    for segment in template.split('/').filter(|segment| !segment.is_empty()) {
      let next = if is_parameter_segment(segment) {
        let name = segment
          .strip_prefix('{')
          .and_then(|inner| inner.strip_suffix('}'))
          .unwrap_or(segment);
        if parameter_segments.contains_key(name) {
          self.resolver.record(Diagnostic::DuplicateParameterSegment {
            path: template.to_string(),
            segment: segment.to_string(),
          });
          return None;
        }
        let added = self.index.get_or_add_parameter(current, segment);
        if let Ok(id) = added {
          parameter_segments.insert(name.to_string(), id);
        }
        added
      } else {
        self.index.get_or_add_constant(current, segment)
      };

      match next {
        Ok(id) => current = id,
        Err(err) => {
          self.resolver.record(structural_diagnostic(template, err));
          return None;
        }
      }
    }

    Some(WalkedPath {
      terminal: current,
      parameter_segments,
    })
  }

  /// Dereferences and resolves a parameter list. Unusable entries are recorded and dropped.
  fn collect_parameters(
    &mut self,
    template: &str,
    parameters: &[ObjectOrReference<Parameter>],
  ) -> IndexMap<String, EndpointParameter> {
    let spec = self.resolver.spec();
    let mut collected = IndexMap::with_capacity(parameters.len());

    for (index, parameter_ref) in parameters.iter().enumerate() {
      if self.resolver.is_cancelled() {
        break;
      }

      let parameter = match parameter_ref.resolve(spec) {
        Ok(parameter) => parameter,
        Err(err) => {
          self.resolver.record(Diagnostic::UnresolvedReference {
            hint: format!("{template} parameter #{index}"),
            reference: reference_target(parameter_ref).unwrap_or_default().to_string(),
            error: err.to_string(),
          });
          continue;
        }
      };

      if parameter.name.trim().is_empty() {
        self.resolver.record(Diagnostic::UnnamedParameter {
          path: template.to_string(),
          index,
        });
        continue;
      }

      let Some(schema) = parameter_schema(&parameter) else {
        self.resolver.record(Diagnostic::ParameterWithoutSchema {
          path: template.to_string(),
          parameter: parameter.name.clone(),
        });
        continue;
      };

      let name = naming::path_parameter_name(template, &parameter.name);
      self.resolve_bound(schema, &name);

      collected.insert(
        parameter.name.clone(),
        EndpointParameter {
          name: parameter.name.clone(),
          schema: ModelReference::from(name),
          location: parameter_location(&parameter.location),
          modifier: Modifier::from_required(parameter.required.unwrap_or(false)),
        },
      );
    }

    collected
  }

  fn build_endpoint(
    &mut self,
    template: &str,
    method: HttpMethod,
    operation: &Operation,
    shared_parameters: &IndexMap<String, EndpointParameter>,
    walked: &WalkedPath,
  ) -> Endpoint {
    let mut endpoint = Endpoint::new(method);

    endpoint.parameters.clone_from(shared_parameters);
    for (name, parameter) in self.collect_parameters(template, &operation.parameters) {
      endpoint.parameters.insert(name, parameter);
    }
    self.bind_path_parameters(template, method, &endpoint, walked);

    self.collect_request_bodies(template, method, operation, &mut endpoint);
    self.collect_responses(template, method, operation, &mut endpoint);
    endpoint
  }

  fn bind_path_parameters(&mut self, template: &str, method: HttpMethod, endpoint: &Endpoint, walked: &WalkedPath) {
    let path_parameters = endpoint
      .parameters
      .values()
      .filter(|parameter| parameter.location == ParameterLocation::Path);

    for parameter in path_parameters {
      let bound = walked
        .parameter_segments
        .get(&parameter.name)
        .is_some_and(|&id| self.index.bind_parameter(id, parameter.schema.clone()).is_ok());

      if !bound {
        self.resolver.record(Diagnostic::UnboundPathParameter {
          path: template.to_string(),
          method,
          parameter: parameter.name.clone(),
        });
      }
    }
  }

  fn collect_request_bodies(&mut self, template: &str, method: HttpMethod, operation: &Operation, endpoint: &mut Endpoint) {
    let Some(body_ref) = operation.request_body.as_ref() else {
      return;
    };

    let body = match body_ref.resolve(self.resolver.spec()) {
      Ok(body) => body,
      Err(err) => {
        self.resolver.record(Diagnostic::UnresolvedReference {
          hint: format!("{method} {template} request body"),
          reference: reference_target(body_ref).unwrap_or_default().to_string(),
          error: err.to_string(),
        });
        return;
      }
    };

    for (mime_type, media_type) in &body.content {
      let Some(schema) = media_type.schema.as_ref() else {
        continue;
      };
      let name = naming::request_body_name(template, method, mime_type);
      self.resolve_bound(schema, &name);
      endpoint.request_bodies.insert(mime_type.clone(), ModelReference::from(name));
    }
  }

  fn collect_responses(&mut self, template: &str, method: HttpMethod, operation: &Operation, endpoint: &mut Endpoint) {
    let Some(responses) = operation.responses.as_ref() else {
      return;
    };

    for (key, response_ref) in responses {
      if self.resolver.is_cancelled() {
        return;
      }

      let Ok(status) = key.parse::<StatusKey>() else {
        self.resolver.record(Diagnostic::InvalidStatusKey {
          path: template.to_string(),
          method,
          status: key.clone(),
        });
        continue;
      };

      let response = match response_ref.resolve(self.resolver.spec()) {
        Ok(response) => response,
        Err(err) => {
          self.resolver.record(Diagnostic::UnresolvedReference {
            hint: format!("{method} {template} response {status}"),
            reference: reference_target(response_ref).unwrap_or_default().to_string(),
            error: err.to_string(),
          });
          continue;
        }
      };

      let mut entry = EndpointResponse::new(status);
      for (mime_type, media_type) in &response.content {
        let Some(schema) = media_type.schema.as_ref() else {
          continue;
        };
        let name = naming::response_name(template, method, status, mime_type);
        self.resolve_bound(schema, &name);
        entry.schemas.insert(mime_type.clone(), ModelReference::from(name));
      }
      endpoint.responses.insert(status, entry);
    }
  }

  /// Resolves `schema` under an endpoint-derived name and remembers what the name stands for.
  fn resolve_bound(&mut self, schema: &ObjectOrReference<ObjectSchema>, name: &str) {
    let resolution = self.resolver.resolve(schema, name);
    if resolution.succeeded {
      self
        .bindings
        .entry(ModelReference::from(name))
        .or_insert(resolution.references);
    }
  }
}

/// Resolves every component schema not already reached through a path.
pub fn extract_components<R: ModelRepository>(resolver: &mut SchemaResolver<'_, R>) {
  let spec = resolver.spec();
  let Some(components) = spec.components.as_ref() else {
    return;
  };

  for (id, schema) in &components.schemas {
    if resolver.is_cancelled() {
      return;
    }
    resolver.resolve_component(id, schema);
  }
}

/// Maps trie errors onto diagnostics. The extractor keys nodes by literal segment text, so the
/// trie never sees one segment as both kinds; `KindMismatch` and `NotAParameter` arrive only
/// through direct `PathIndex` use.
fn structural_diagnostic(template: &str, err: PathIndexError) -> Diagnostic {
  match err {
    PathIndexError::KindMismatch { segment, existing } => Diagnostic::SegmentKindMismatch {
      path: template.to_string(),
      segment,
      existing,
    },
    PathIndexError::DuplicateMethod { method, .. } => Diagnostic::DuplicateMethod {
      path: template.to_string(),
      method,
    },
    PathIndexError::NotAParameter { segment } => Diagnostic::SegmentKindMismatch {
      path: template.to_string(),
      segment,
      existing: "constant",
    },
  }
}

fn parameter_schema(parameter: &Parameter) -> Option<&ObjectOrReference<ObjectSchema>> {
  parameter.schema.as_ref().or_else(|| {
    parameter
      .content
      .as_ref()
      .and_then(|content| content.values().find_map(|media: &MediaType| media.schema.as_ref()))
  })
}

const fn parameter_location(location: &ParameterIn) -> ParameterLocation {
  match location {
    ParameterIn::Query => ParameterLocation::Query,
    ParameterIn::Header => ParameterLocation::Header,
    ParameterIn::Path => ParameterLocation::Path,
    ParameterIn::Cookie => ParameterLocation::Cookie,
  }
}

#[cfg(test)]
mod tests;
