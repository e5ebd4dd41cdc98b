#![allow(clippy::missing_errors_doc)]
use clap::Parser;

use crate::ui::{Cli, Colors, Commands, ListCommands, colors};

mod ui;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
  let cli = Cli::parse();
  let colors = Colors::new(colors::colors_enabled(cli.color), colors::detect_theme(cli.theme));

  match cli.command {
    Commands::List { list_command } => match list_command {
      ListCommands::Models { input } => ui::commands::list_models(&input, &colors).await?,
      ListCommands::Paths { input } => ui::commands::list_paths(&input, &colors).await?,
    },
    Commands::Analyze(command) => {
      let config = ui::commands::AnalyzeConfig::load(command).await?;
      ui::commands::analyze(config, &colors).await?;
    }
  }

  Ok(())
}
