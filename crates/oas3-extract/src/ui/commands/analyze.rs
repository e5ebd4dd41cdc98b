use std::path::{Path, PathBuf};

use chrono::{Local, Timelike};
use crossterm::style::Stylize;
use oas3_extract::{
  AnalysisOptions, AnalysisOutput, AnalysisStats, Analyzer, CancellationToken, Diagnostic, utils::SpecLoader,
};
use serde::Deserialize;

use crate::ui::{AnalyzeCommand, Colors};

fn format_timestamp() -> String {
  let now = Local::now();
  format!("[{:02}:{:02}:{:02}]", now.hour(), now.minute(), now.second())
}

#[derive(Debug, Clone)]
pub struct AnalyzeConfig {
  pub input: PathBuf,
  pub output: Option<PathBuf>,
  pub verbose: bool,
  pub quiet: bool,
}

impl AnalyzeConfig {
  /// Merges the optional config file with the command line; flags win.
  pub async fn load(command: AnalyzeCommand) -> anyhow::Result<Self> {
    let AnalyzeCommand {
      input,
      output,
      config,
      verbose,
      quiet,
    } = command;

    let file = match config {
      Some(path) => AnalyzeConfigFile::read(&path).await?,
      None => AnalyzeConfigFile::default(),
    };

    let input = input
      .or(file.input)
      .ok_or_else(|| anyhow::anyhow!("Input path (-i) is required, either as a flag or in the config file"))?;
    let output = output.or(file.output);

    Ok(Self {
      input,
      output,
      verbose,
      quiet,
    })
  }

  async fn write_output(&self, output: &AnalysisOutput) -> anyhow::Result<bool> {
    let Some(path) = &self.output else {
      return Ok(false);
    };
    if let Some(parent) = path.parent()
      && !parent.as_os_str().is_empty()
    {
      tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, serde_json::to_string_pretty(output)?).await?;
    Ok(true)
  }
}

/// Contents of the `--config` TOML file.
#[derive(Debug, Default, Deserialize)]
#[serde(deny_unknown_fields)]
struct AnalyzeConfigFile {
  input: Option<PathBuf>,
  output: Option<PathBuf>,
}

impl AnalyzeConfigFile {
  async fn read(path: &Path) -> anyhow::Result<Self> {
    let contents = tokio::fs::read_to_string(path)
      .await
      .map_err(|err| anyhow::anyhow!("Failed to read config file '{}': {err}", path.display()))?;
    Self::parse(&contents).map_err(|err| anyhow::anyhow!("Invalid config file '{}': {err}", path.display()))
  }

  fn parse(contents: &str) -> Result<Self, toml::de::Error> {
    toml::from_str(contents)
  }
}

struct AnalyzeLogger<'a> {
  config: &'a AnalyzeConfig,
  colors: &'a Colors,
}

impl<'a> AnalyzeLogger<'a> {
  fn new(config: &'a AnalyzeConfig, colors: &'a Colors) -> Self {
    Self { config, colors }
  }

  fn info(&self, message: &str) {
    if !self.config.quiet {
      println!("{} {message}", format_timestamp().with(self.colors.timestamp()));
    }
  }

  fn stat(&self, label: &str, value: String) {
    if !self.config.quiet {
      println!(
        "            {:<25} {}",
        label.with(self.colors.label()),
        value.with(self.colors.value())
      );
    }
  }

  fn log_loading(&self) {
    self.info(
      &format!("Loading OpenAPI document from: {}", self.config.input.display())
        .with(self.colors.primary())
        .to_string(),
    );
  }

  fn log_analyzing(&self) {
    self.info(&"Extracting models and endpoints...".with(self.colors.primary()).to_string());
  }

  fn print_statistics(&self, stats: &AnalysisStats) {
    if self.config.quiet {
      return;
    }

    self.stat("Models registered:", stats.models_registered.to_string());
    self.stat("", format!("{} primitives", stats.primitives));
    self.stat("", format!("{} objects", stats.objects));
    self.stat("", format!("{} arrays", stats.arrays));
    self.stat("", format!("{} enums", stats.enums));
    self.stat("", format!("{} compositions", stats.compositions));
    self.stat("Path nodes:", stats.path_parts.to_string());
    self.stat("Endpoints:", stats.endpoints.to_string());
    self.stat(
      "",
      format!(
        "{} parameters, {} request bodies, {} responses",
        stats.parameters, stats.request_bodies, stats.responses
      ),
    );
    if stats.dangling_references > 0 {
      self.stat("Dangling references:", stats.dangling_references.to_string());
    }
    self.print_cycles(stats);

    let diagnostics = stats.structural_diagnostics + stats.schema_diagnostics;
    if diagnostics > 0 {
      self.stat(
        "Diagnostics:",
        format!(
          "{diagnostics} ({} structural, {} schema)",
          stats.structural_diagnostics, stats.schema_diagnostics
        ),
      );
    }
  }

  fn print_cycles(&self, stats: &AnalysisStats) {
    if stats.cycles_detected == 0 {
      return;
    }

    self.stat("Cycles:", stats.cycles_detected.to_string());

    if self.config.verbose {
      for (i, cycle) in stats.cycle_details.iter().enumerate() {
        println!(
          "              {}: {}",
          format!("Cycle {}", i + 1).with(self.colors.accent()),
          cycle.join(" -> ").with(self.colors.primary())
        );
      }
    }
  }

  /// Structural problems are always shown; schema problems only with `--verbose`.
  fn print_diagnostics(&self, diagnostics: &[Diagnostic]) {
    if self.config.quiet {
      return;
    }

    let mut printed_header = false;
    for diagnostic in diagnostics {
      if !diagnostic.is_structural() && !self.config.verbose {
        continue;
      }

      if !printed_header {
        println!();
        printed_header = true;
      }

      let kind = diagnostic.kind();
      eprintln!(
        "{} {}",
        format!("[{kind}]").with(self.colors.diagnostic(kind)),
        diagnostic.to_string().with(self.colors.primary())
      );
    }
  }

  fn log_written(&self) {
    if let Some(output) = &self.config.output {
      self.info(
        &format!("Wrote models and paths to: {}", output.display())
          .with(self.colors.primary())
          .to_string(),
      );
    }
  }

  fn log_success(&self) {
    if !self.config.quiet {
      println!();
      println!(
        "{} {}",
        format_timestamp().with(self.colors.timestamp()),
        "Extraction completed without diagnostics".with(self.colors.success())
      );
    }
  }
}

pub async fn analyze(config: AnalyzeConfig, colors: &Colors) -> anyhow::Result<()> {
  let logger = AnalyzeLogger::new(&config, colors);

  logger.log_loading();
  let spec = SpecLoader::open(&config.input).await?.parse()?;

  logger.log_analyzing();
  let cancellation = CancellationToken::new();
  let interrupt = {
    let cancellation = cancellation.clone();
    tokio::spawn(async move {
      if tokio::signal::ctrl_c().await.is_ok() {
        cancellation.cancel();
      }
    })
  };

  let options = AnalysisOptions::builder().cancellation(cancellation).build();
  let result = tokio::task::spawn_blocking(move || Analyzer::new(&spec, options).analyze()).await;
  interrupt.abort();
  let output = result??;

  logger.print_statistics(&output.stats);
  logger.print_diagnostics(&output.diagnostics);

  if config.write_output(&output).await? {
    logger.log_written();
  }

  if !output.succeeded() {
    anyhow::bail!(
      "Extraction reported {} diagnostic(s) in {}",
      output.diagnostics.len(),
      config.input.display()
    );
  }

  logger.log_success();
  Ok(())
}
