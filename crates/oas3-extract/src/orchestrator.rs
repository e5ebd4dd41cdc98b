//! Drives a complete extraction over one document.
//!
//! ```no_run
//! use oas3_extract::orchestrator::{AnalysisOptions, Analyzer};
//! use oas3_extract_model::ModelRepository;
//!
//! # fn example() -> anyhow::Result<()> {
//! let spec = oas3::from_json(std::fs::read_to_string("openapi.json")?)?;
//! let output = Analyzer::new(&spec, AnalysisOptions::default()).analyze()?;
//!
//! println!("{} models, {} endpoints", output.models.len(), output.stats.endpoints);
//! # Ok(())
//! # }
//! ```

use oas3::Spec;
use oas3_extract_model::{InMemoryModelRepository, ModelRepository, PathIndex};
use serde::Serialize;
use thiserror::Error;

use crate::{
  cancellation::CancellationToken,
  diagnostics::Diagnostic,
  extractor::{EndpointExtractor, SchemaBindings, extract_components},
  graph::ModelGraph,
  resolver::SchemaResolver,
  stats::AnalysisStats,
};

#[derive(Debug, Clone, bon::Builder)]
pub struct AnalysisOptions {
  #[builder(default)]
  pub cancellation: CancellationToken,
  /// Resolve component schemas that no path reached.
  #[builder(default = true)]
  pub include_components: bool,
}

impl Default for AnalysisOptions {
  fn default() -> Self {
    Self::builder().build()
  }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ExtractionError {
  #[error("extraction was cancelled")]
  Cancelled,
}

/// Everything a backend needs: the registered models, the endpoint trie, what each
/// endpoint-derived schema name resolved to, and the problems met along the way.
#[derive(Debug, Serialize)]
pub struct AnalysisOutput<R = InMemoryModelRepository> {
  pub models: R,
  pub paths: PathIndex,
  pub bindings: SchemaBindings,
  pub diagnostics: Vec<Diagnostic>,
  pub stats: AnalysisStats,
}

impl<R> AnalysisOutput<R> {
  /// True when the document produced no diagnostics at all.
  #[must_use]
  pub fn succeeded(&self) -> bool {
    self.diagnostics.is_empty()
  }

  pub fn structural_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
    self.diagnostics.iter().filter(|diagnostic| diagnostic.is_structural())
  }

  pub fn schema_diagnostics(&self) -> impl Iterator<Item = &Diagnostic> {
    self.diagnostics.iter().filter(|diagnostic| !diagnostic.is_structural())
  }
}

pub struct Analyzer<'s> {
  spec: &'s Spec,
  options: AnalysisOptions,
}

impl<'s> Analyzer<'s> {
  #[must_use]
  pub const fn new(spec: &'s Spec, options: AnalysisOptions) -> Self {
    Self { spec, options }
  }

  /// Runs the extraction into a fresh in-memory repository.
  ///
  /// # Errors
  ///
  /// Returns [`ExtractionError::Cancelled`] when the cancellation token fired during the run.
  pub fn analyze(&self) -> Result<AnalysisOutput, ExtractionError> {
    self.analyze_into(InMemoryModelRepository::new())
  }

  /// Runs the extraction, registering models into `repository`.
  ///
  /// Paths are walked first so path-derived schemas claim their contextual names; component
  /// schemas nothing reached are resolved afterwards under their own ids.
  ///
  /// # Errors
  ///
  /// Returns [`ExtractionError::Cancelled`] when the cancellation token fired during the run.
  pub fn analyze_into<R: ModelRepository>(&self, repository: R) -> Result<AnalysisOutput<R>, ExtractionError> {
    let mut resolver =
      SchemaResolver::new(self.spec, repository).with_cancellation(self.options.cancellation.clone());

    let mut extractor = EndpointExtractor::new(&mut resolver);
    extractor.extract_paths();
    let (paths, bindings) = extractor.into_parts();

    if self.options.include_components {
      extract_components(&mut resolver);
    }

    if self.options.cancellation.is_cancelled() {
      return Err(ExtractionError::Cancelled);
    }

    let (models, diagnostics) = resolver.into_parts();

    let mut stats = AnalysisStats::default();
    {
      let graph = ModelGraph::build(&models, &bindings);
      stats.record_cycles(graph.cycles());
      stats.record_dangling(graph.dangling());
    }
    stats.record_models(models.models());
    stats.record_paths(&paths);
    stats.record_diagnostics(&diagnostics);

    Ok(AnalysisOutput {
      models,
      paths,
      bindings,
      diagnostics,
      stats,
    })
  }
}
