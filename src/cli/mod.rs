pub mod completions;
pub mod palette;
pub mod render;

use clap::{Parser, Subcommand};

/// muzovano - Release preview card generator
#[derive(Parser, Debug)]
#[command(name = "muzovano")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Show more log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render a preview card for a release
    Render(render::RenderArgs),

    /// Print the swatch palette extracted from an image
    Palette(palette::PaletteArgs),

    /// Generate shell completions
    Completions(completions::CompletionsArgs),
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_consistent() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_verbose_is_global() {
        let cli = Cli::parse_from(["muzovano", "palette", "cover.png", "-vv"]);
        assert_eq!(cli.verbose, 2);
        assert!(matches!(cli.command, Commands::Palette(_)));
    }
}
