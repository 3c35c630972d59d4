use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands {
    pub mod mask;
    pub mod number;
    pub mod render;
    pub mod roundtrip;
}
mod util;

#[derive(Parser)]
#[command(name = "dynform", about = "Render and exercise dynform schemas")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render a schema, optionally populated, as HTML
    Render(commands::render::Args),
    /// Populate a form with a value and collect it back as JSON
    Roundtrip(commands::roundtrip::Args),
    /// Check whether an address lies in the network of a mask
    Mask(commands::mask::Args),
    /// Filter text the way a numeric control does
    Number(commands::number::Args),
}

fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    match cli.command {
        Commands::Render(args) => commands::render::run(args),
        Commands::Roundtrip(args) => commands::roundtrip::run(args),
        Commands::Mask(args) => commands::mask::run(args),
        Commands::Number(args) => commands::number::run(args),
    }
}
