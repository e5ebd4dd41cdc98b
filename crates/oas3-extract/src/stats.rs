use oas3_extract_model::{Endpoint, Model, PathIndex};
use serde::Serialize;

use crate::{diagnostics::Diagnostic, graph::DanglingReference};

#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct AnalysisStats {
  pub models_registered: usize,
  pub primitives: usize,
  pub enums: usize,
  pub objects: usize,
  pub arrays: usize,
  pub compositions: usize,
  pub path_parts: usize,
  pub endpoints: usize,
  pub parameters: usize,
  pub request_bodies: usize,
  pub responses: usize,
  pub cycles_detected: usize,
  pub cycle_details: Vec<Vec<String>>,
  pub dangling_references: usize,
  pub structural_diagnostics: usize,
  pub schema_diagnostics: usize,
}

impl AnalysisStats {
  pub fn record_model(&mut self, model: &Model) {
    self.models_registered += 1;
    match model {
      Model::Primitive(_) => self.primitives += 1,
      Model::Enum(_) => self.enums += 1,
      Model::Object(_) => self.objects += 1,
      Model::Array(_) => self.arrays += 1,
      Model::Composition(_) => self.compositions += 1,
    }
  }

  pub fn record_models<'a>(&mut self, models: impl IntoIterator<Item = &'a Model>) {
    for model in models {
      self.record_model(model);
    }
  }

  pub fn record_endpoint(&mut self, endpoint: &Endpoint) {
    self.endpoints += 1;
    self.parameters += endpoint.parameters.len();
    self.request_bodies += endpoint.request_bodies.len();
    self.responses += endpoint.responses.len();
  }

  pub fn record_paths(&mut self, index: &PathIndex) {
    self.path_parts = index.len();
    for endpoint in index.endpoints() {
      self.record_endpoint(endpoint);
    }
  }

  pub fn record_cycle(&mut self, cycle: Vec<String>) {
    self.cycles_detected += 1;
    self.cycle_details.push(cycle);
  }

  pub fn record_cycles(&mut self, cycles: Vec<Vec<String>>) {
    for cycle in cycles {
      self.record_cycle(cycle);
    }
  }

  pub fn record_dangling<'a>(&mut self, references: impl IntoIterator<Item = &'a DanglingReference>) {
    self.dangling_references += references.into_iter().count();
  }

  pub fn record_diagnostic(&mut self, diagnostic: &Diagnostic) {
    if diagnostic.is_structural() {
      self.structural_diagnostics += 1;
    } else {
      self.schema_diagnostics += 1;
    }
  }

  pub fn record_diagnostics<'a>(&mut self, diagnostics: impl IntoIterator<Item = &'a Diagnostic>) {
    for diagnostic in diagnostics {
      self.record_diagnostic(diagnostic);
    }
  }
}
