//! Analysis front-end for OpenAPI 3.x documents.
//!
//! Walks a parsed document once and produces what code-generation backends consume: a
//! repository of named type models and a trie of endpoint path templates whose nodes carry
//! the operations defined on them. Problems found along the way are recorded as
//! [`Diagnostic`]s rather than aborting the run.

pub mod cancellation;
pub mod diagnostics;
pub mod extractor;
pub mod graph;
pub mod naming;
pub mod orchestrator;
pub mod resolver;
pub mod stats;
pub mod utils;

pub use cancellation::CancellationToken;
pub use diagnostics::{Diagnostic, DiagnosticKind};
pub use extractor::{EndpointExtractor, SchemaBindings};
pub use oas3_extract_model as model;
pub use orchestrator::{AnalysisOptions, AnalysisOutput, Analyzer, ExtractionError};
pub use resolver::{Resolution, SchemaResolver};
pub use stats::AnalysisStats;
