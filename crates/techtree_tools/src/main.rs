//! Tech tree generator.
//!
//! # Usage
//!
//! ```bash
//! # Resolve the five stock layers under ./mods and write the exports here
//! cargo run -p techtree_tools -- generate --root /data/sc2 --output out/
//!
//! # Check that the data converges and list stable ID collisions
//! cargo run -p techtree_tools -- validate --root /data/sc2 --config techtree.ron
//! ```

use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use techtree_tools::{
    output::write_outputs, pipeline::Generation, validate::validate_data_directory,
    GeneratorConfig,
};

#[derive(Parser)]
#[command(name = "techtree-tools")]
#[command(about = "Layered catalog resolution and tech tree export")]
#[command(version)]
struct Cli {
    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Resolve all layers and write the exports
    Generate {
        /// Data root holding `mods/` and the stable ID listing
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// RON config file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Output directory
        #[arg(short, long, default_value = ".")]
        output: PathBuf,
    },
    /// Resolve all layers and report stable ID collisions
    Validate {
        /// Data root holding `mods/` and the stable ID listing
        #[arg(short, long, default_value = ".")]
        root: PathBuf,

        /// RON config file (defaults apply when omitted)
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

fn main() {
    let cli = Cli::parse();

    let filter = if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(filter)
        .init();

    let result = match cli.command {
        Commands::Generate {
            root,
            config,
            output,
        } => cmd_generate(&root, config.as_deref(), &output),
        Commands::Validate { root, config } => cmd_validate(&root, config.as_deref()),
    };

    if let Err(e) = result {
        tracing::error!("{e}");
        std::process::exit(1);
    }
}

fn cmd_generate(root: &Path, config: Option<&Path>, output: &Path) -> techtree_tools::Result<()> {
    let config = GeneratorConfig::load_or_default(config)?;
    tracing::info!("Generating from {} ({} layers)", root.display(), config.layers.len());
    let generation = Generation::run(root, &config)?;
    let written = write_outputs(&generation, &config, output)?;
    tracing::info!("Wrote {} files to {}", written.len(), output.display());
    Ok(())
}

fn cmd_validate(root: &Path, config: Option<&Path>) -> techtree_tools::Result<()> {
    let config = GeneratorConfig::load_or_default(config)?;
    tracing::info!("Validating data in: {}", root.display());
    let report = validate_data_directory(root, &config)?;

    for collision in &report.collisions {
        let commands: Vec<&str> = collision.commands.iter().map(String::as_str).collect();
        println!("{}: {}", collision.id, commands.join(" "));
    }
    if report.is_clean() {
        tracing::info!("Validation passed: {} layers", report.layers.len());
    } else {
        tracing::info!(
            "Validation passed with {} stable ID collisions",
            report.collisions.len()
        );
    }
    Ok(())
}
