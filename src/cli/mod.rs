use std::path::PathBuf;

use clap::{Parser, Subcommand};

use crate::config::{parse_config, parse_config_from_file, Config, Layout};

mod cells;
mod inspect;

pub enum CliRes {
    Ok,
    Err,
}

pub trait Cli {
    /// Each command gets the config after command-line overrides.
    fn cli(&self, config: &Config) -> CliRes;
}

#[derive(Debug, Parser)]
#[command(version, about = "Inspect DCC sprite containers", long_about = None)]
struct DccToolCli {
    /// Path to a config file. Defaults to `dcctool.toml` next to the binary
    #[arg(long, global = true)]
    config: Option<PathBuf>,
    /// Layout of the direction bit-width descriptors
    #[arg(long, global = true, value_enum)]
    layout: Option<Layout>,
    /// Decode directions one after another instead of in parallel
    #[arg(long, global = true)]
    sequential: bool,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Subcommand)]
enum Commands {
    /// Prints container, direction and frame headers
    Inspect {
        /// Path to .dcc file
        path: PathBuf,
        /// Prints JSON instead of text
        #[arg(long)]
        json: bool,
    },
    /// Prints the cell grid of one frame
    Cells {
        /// Path to .dcc file
        path: PathBuf,
        #[arg(short, long)]
        direction: usize,
        #[arg(short, long)]
        frame: usize,
        /// Prints JSON instead of text
        #[arg(long)]
        json: bool,
    },
}

fn load_config(cli: &DccToolCli) -> eyre::Result<Config> {
    let mut config = match &cli.config {
        Some(path) => parse_config_from_file(path)?,
        None => parse_config()?,
    };

    if let Some(layout) = cli.layout {
        config.layout = layout;
    }

    if cli.sequential {
        config.parallel = false;
    }

    Ok(config)
}

/// Runs command-line options
pub fn cli() -> CliRes {
    let cli = DccToolCli::parse();

    let config = match load_config(&cli) {
        Ok(config) => config,
        Err(err) => {
            eprintln!("Cannot load config: {}", err);
            return CliRes::Err;
        }
    };

    log::debug!("{:?}", config);

    let command: Box<dyn Cli> = match cli.command {
        Commands::Inspect { path, json } => Box::new(inspect::Inspect { path, json }),
        Commands::Cells {
            path,
            direction,
            frame,
            json,
        } => Box::new(cells::Cells {
            path,
            direction,
            frame,
            json,
        }),
    };

    command.cli(&config)
}
