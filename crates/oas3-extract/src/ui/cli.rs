use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use super::colors::{ColorMode, Colors, ThemeMode};

#[derive(Parser, Debug)]
#[command(name = "oas3-extract")]
#[command(author, version, about = "Extracts type models and endpoint paths from OpenAPI documents")]
#[command(styles = Colors::clap_styles())]
pub struct Cli {
  #[command(subcommand)]
  pub command: Commands,

  /// Control color output
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub color: ColorMode,

  /// Terminal theme (dark or light background)
  #[arg(long, value_enum, default_value = "auto", global = true)]
  pub theme: ThemeMode,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
  /// List models or endpoint paths found in an OpenAPI document
  List {
    #[command(subcommand)]
    list_command: ListCommands,
  },
  /// Run the full extraction and report models, endpoints and diagnostics
  Analyze(AnalyzeCommand),
}

#[derive(Args, Debug, Default)]
pub struct AnalyzeCommand {
  /// Path to the OpenAPI document (JSON or YAML)
  #[arg(short, long, value_name = "FILE")]
  pub input: Option<PathBuf>,

  /// Where to write the JSON dump of models and paths
  #[arg(short, long, value_name = "FILE")]
  pub output: Option<PathBuf>,

  /// Read `input` and `output` from a key = value file; flags take precedence
  #[arg(short, long, value_name = "FILE")]
  pub config: Option<PathBuf>,

  /// Print every diagnostic and the members of each reference cycle
  #[arg(short, long, default_value_t = false)]
  pub verbose: bool,

  /// Suppress non-essential output (errors only)
  #[arg(short, long, default_value_t = false, conflicts_with = "verbose")]
  pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum ListCommands {
  /// List every registered model with its kind and references
  Models {
    /// Path to the OpenAPI document (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
  /// List every path template carrying operations
  Paths {
    /// Path to the OpenAPI document (JSON or YAML)
    #[arg(short, long, value_name = "FILE")]
    input: PathBuf,
  },
}
