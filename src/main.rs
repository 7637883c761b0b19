use clap::Parser;
use miette::Result;
use muzovano::cli::{Cli, Commands};
use muzovano::output::Printer;
use tracing::Level;

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };
    tracing_subscriber::fmt()
        .with_max_level(level)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    let printer = Printer::new();

    match cli.command {
        Commands::Render(args) => muzovano::cli::render::run(args, &printer)?,
        Commands::Palette(args) => muzovano::cli::palette::run(args, &printer)?,
        Commands::Completions(args) => muzovano::cli::completions::run(args)?,
    }

    Ok(())
}
