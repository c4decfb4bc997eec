use clap::Parser;

use appreload::Settings;
use appreload::cli::commands::{check, init, serve};
use appreload::cli::{Cli, Commands};

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => Settings::load_from(path),
        None => Settings::load(),
    }
    .unwrap_or_else(|e| {
        eprintln!("Configuration error: {e}");
        Settings::default()
    });

    appreload::logging::init_with_config(&config.logging);

    match cli.command {
        Commands::Init { force } => init::run_init(force),

        Commands::Config => init::run_config(&config),

        Commands::Check => {
            if !check::run(&config).await {
                std::process::exit(1);
            }
        }

        Commands::Serve { bind, no_watch } => {
            let args = serve::ServeArgs { bind, no_watch };
            if let Err(e) = serve::run(args, config).await {
                eprintln!("Error: {e}");
                std::process::exit(1);
            }
        }
    }
}
