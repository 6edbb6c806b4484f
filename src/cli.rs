use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "clipforged")]
#[command(author, version, about = "Clip review server and pipeline orchestrator")]
pub struct Cli {
    /// Path to config file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the media delivery server
    Start {
        /// Host to bind to
        #[arg(long, default_value = "0.0.0.0")]
        host: String,

        /// Port to listen on
        #[arg(short, long, default_value = "8750")]
        port: u16,
    },

    /// Run the clip pipeline over one folder and print the report
    Run {
        /// Input folder, relative to the library root
        #[arg(required = true)]
        input: String,

        /// Output folder, relative to the library root
        /// (defaults to <input>/Viral_Clips)
        #[arg(long)]
        output: Option<String>,
    },

    /// Check that the configured pipeline program is available
    CheckTools,

    /// Validate configuration file
    Validate {
        /// Config file to validate (uses default if not specified)
        config: Option<PathBuf>,
    },

    /// Display version information
    Version,
}
