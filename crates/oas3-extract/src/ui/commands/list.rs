use std::path::Path;

use comfy_table::{Attribute, Cell, CellAlignment, ContentArrangement, Row, Table};
use itertools::Itertools;
use oas3_extract::{AnalysisOptions, AnalysisOutput, Analyzer, model::ModelRepository, utils::SpecLoader};

use crate::ui::{Colors, colors::IntoComfyColor, term_width};

async fn load_and_analyze(input: &Path) -> anyhow::Result<AnalysisOutput> {
  let spec = SpecLoader::open(input).await?.parse()?;
  Ok(Analyzer::new(&spec, AnalysisOptions::default()).analyze()?)
}

fn new_table(headers: &[&str], colors: &Colors) -> Table {
  let mut table = Table::new();
  table
    .load_preset("  ── ──            ")
    .set_content_arrangement(ContentArrangement::Dynamic)
    .set_width(term_width());

  let mut row = Row::new();
  for header in headers {
    row.add_cell(Cell::new(header).fg(IntoComfyColor::into(colors.label())));
  }
  table.set_header(row);
  table
}

pub async fn list_models(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let output = load_and_analyze(input).await?;
  let mut table = new_table(&["MODEL", "KIND", "REFERENCES"], colors);

  for model in output.models.models() {
    let references = model.references().join(", ");

    let mut row = Row::new();
    row.add_cell(
      Cell::new(model.name())
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(
      Cell::new(model.kind())
        .fg(IntoComfyColor::into(colors.accent()))
        .set_alignment(CellAlignment::Right),
    );
    row.add_cell(Cell::new(references).fg(IntoComfyColor::into(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}

pub async fn list_paths(input: &Path, colors: &Colors) -> anyhow::Result<()> {
  let output = load_and_analyze(input).await?;
  let mut table = new_table(&["PATH", "METHODS", "PARAMETER SCHEMA"], colors);

  for (template, id) in output.paths.walk() {
    let part = output.paths.part(id);
    let Some(endpoints) = &part.endpoints else {
      continue;
    };

    let methods = endpoints.keys().join(" ");
    let parameter = part.model_ref().map(ToString::to_string).unwrap_or_default();

    let mut row = Row::new();
    row.add_cell(
      Cell::new(template)
        .fg(IntoComfyColor::into(colors.value()))
        .add_attribute(Attribute::Bold),
    );
    row.add_cell(Cell::new(methods).fg(IntoComfyColor::into(colors.accent())));
    row.add_cell(Cell::new(parameter).fg(IntoComfyColor::into(colors.primary())));
    table.add_row(row);
  }

  println!("{table}");

  Ok(())
}
