mod cli;

use clipforged::{config, library::Library, pipeline::PipelineRunner, server};

use anyhow::Result;
use clap::Parser;
use cli::{Cli, Commands};

async fn start_server(host: String, port: u16, config_path: Option<&std::path::Path>) -> Result<()> {
    // Load config
    let mut config = config::load_config_or_default(config_path)?;

    // Override host/port from CLI if specified
    config.server.host = host;
    config.server.port = port;

    tracing::info!("Starting Clipforged server");
    tracing::info!(
        "Server will listen on {}:{}",
        config.server.host,
        config.server.port
    );

    server::start_server(config).await
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    // Respect RUST_LOG env var if set, otherwise use defaults based on verbose flag
    let env_filter = std::env::var("RUST_LOG").unwrap_or_else(|_| {
        if cli.verbose {
            "clipforged=trace,tower_http=debug".to_string()
        } else {
            "clipforged=debug,tower_http=info".to_string()
        }
    });

    tracing_subscriber::fmt()
        .with_env_filter(&env_filter)
        .init();

    match cli.command {
        Commands::Start { host, port } => {
            // Create tokio runtime
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(start_server(host, port, cli.config.as_deref()))
        }
        Commands::Run { input, output } => {
            let rt = tokio::runtime::Runtime::new()?;
            rt.block_on(run_folder(&input, output.as_deref(), cli.config.as_deref()))
        }
        Commands::CheckTools => check_tools(cli.config.as_deref()),
        Commands::Validate {
            config: config_path,
        } => {
            let path = config_path.or(cli.config);
            validate_config(path.as_deref())
        }
        Commands::Version => {
            println!("clipforged {}", env!("CARGO_PKG_VERSION"));
            Ok(())
        }
    }
}

async fn run_folder(
    input: &str,
    output: Option<&str>,
    config_path: Option<&std::path::Path>,
) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    let library = Library::new(
        config.library.root.clone(),
        config.server.effective_base_url(),
    );
    let runner = PipelineRunner::from_config(&config.pipeline);

    tracing::info!("Processing folder: {}", input);

    let report = runner.run_job(&library, input, output).await?;

    println!("Input:  {}", report.input_dir.display());
    println!("Output: {}", report.output_dir.display());
    match report.exit_code {
        Some(code) => println!("Exit code: {}", code),
        None => println!("Exit code: killed by signal"),
    }

    match report.outcome {
        clipforged::pipeline::JobOutcome::Success => {
            println!("\nProcessing complete!");
            if !report.stdout.is_empty() {
                println!("{}", report.stdout.trim_end());
            }
            Ok(())
        }
        clipforged::pipeline::JobOutcome::Failure => {
            eprintln!("\nPipeline reported failure:");
            eprintln!("{}", report.stderr.trim_end());
            anyhow::bail!("pipeline job failed")
        }
    }
}

fn check_tools(config_path: Option<&std::path::Path>) -> Result<()> {
    let config = config::load_config_or_default(config_path)?;

    println!("Checking pipeline program...\n");

    match which::which(&config.pipeline.program) {
        Ok(path) => {
            println!("✓ {} - {}", config.pipeline.program, path.display());
            println!("\nPipeline program is available!");
        }
        Err(_) => {
            println!("✗ {}", config.pipeline.program);
            println!("\nPipeline program not found on PATH. Install it or update [pipeline] in the config.");
        }
    }

    Ok(())
}

fn validate_config(path: Option<&std::path::Path>) -> Result<()> {
    match path {
        Some(p) => {
            println!("Validating config: {:?}", p);
            let config = config::load_config(p)?;
            println!("✓ Configuration is valid");
            println!("  Server: {}:{}", config.server.host, config.server.port);
            println!("  Base URL: {}", config.server.effective_base_url());
            println!("  Library root: {:?}", config.library.root);
            println!(
                "  Pipeline: {} {:?}",
                config.pipeline.program, config.pipeline.args
            );
        }
        None => {
            println!("No config file specified, using defaults");
            let config = config::Config::default();
            println!("Default config:");
            println!("  Server: {}:{}", config.server.host, config.server.port);
        }
    }

    Ok(())
}
