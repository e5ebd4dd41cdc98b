use std::collections::BTreeSet;

use oas3_extract_model::ModelRepository;
use petgraph::{algo::kosaraju_scc, graphmap::DiGraphMap};

use crate::extractor::SchemaBindings;

/// A reference whose target was never registered.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord)]
pub struct DanglingReference {
  pub from: String,
  pub to: String,
}

/// Reference structure of the resolved models.
pub struct ModelGraph<'a> {
  graph: DiGraphMap<&'a str, ()>,
  dangling: BTreeSet<DanglingReference>,
}

impl<'a> ModelGraph<'a> {
  pub fn build<R: ModelRepository>(repository: &'a R, bindings: &'a SchemaBindings) -> Self {
    let mut graph = DiGraphMap::<&str, ()>::new();
    let mut dangling = BTreeSet::new();

    for model in repository.models() {
      graph.add_node(model.name());
    }

    for model in repository.models() {
      for reference in model.references() {
        if repository.is_known(reference.as_str()) {
          graph.add_edge(model.name(), reference.as_str(), ());
        } else {
          dangling.insert(DanglingReference {
            from: model.name().to_string(),
            to: reference.to_string(),
          });
        }
      }
    }

    for (name, references) in bindings {
      for reference in references {
        if !repository.is_known(reference.as_str()) {
          dangling.insert(DanglingReference {
            from: name.to_string(),
            to: reference.to_string(),
          });
        }
      }
    }

    Self { graph, dangling }
  }

  /// Strongly connected groups of models that reach themselves. Each cycle is sorted by name,
  /// and cycles are ordered by their first member.
  #[must_use]
  pub fn cycles(&self) -> Vec<Vec<String>> {
    let mut cycles = kosaraju_scc(&self.graph)
      .into_iter()
      .filter(|scc| scc.len() > 1 || self.graph.contains_edge(scc[0], scc[0]))
      .map(|scc| {
        let mut cycle = scc.into_iter().map(String::from).collect::<Vec<_>>();
        cycle.sort();
        cycle
      })
      .collect::<Vec<_>>();
    cycles.sort();
    cycles
  }

  pub fn dangling(&self) -> impl Iterator<Item = &DanglingReference> {
    self.dangling.iter()
  }
}
