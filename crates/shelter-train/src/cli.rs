use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "shelter-train")]
#[command(author, version, about = "Train the adoption-likelihood classifier")]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Fit the model on stored records and write the artifact
    Train {
        /// Training configuration file
        #[arg(short, long, default_value = "./train.yaml")]
        config: PathBuf,

        /// Artifact output path
        #[arg(short, long)]
        output: Option<PathBuf>,

        /// Data directory of the JSON-lines store
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Database name
        #[arg(long)]
        database: Option<String>,

        /// Collection name
        #[arg(long)]
        collection: Option<String>,

        /// Shuffle seed
        #[arg(long)]
        seed: Option<u64>,

        /// Held-out fraction
        #[arg(long)]
        test_ratio: Option<f64>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },

    /// Load records from a JSON array or JSON-lines file into the store
    Import {
        /// Input file
        file: PathBuf,

        /// Training configuration file (its store section is used)
        #[arg(short, long, default_value = "./train.yaml")]
        config: PathBuf,

        /// Data directory of the JSON-lines store
        #[arg(long)]
        data_dir: Option<PathBuf>,

        /// Enable verbose logging
        #[arg(short, long)]
        verbose: bool,
    },
}

/// Log filter: `-v` forces debug output, otherwise `RUST_LOG` or info
pub fn log_filter(verbose: bool) -> EnvFilter {
    if verbose {
        EnvFilter::new("shelter=debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("shelter=info"))
    }
}
