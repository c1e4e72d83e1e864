
use clap::{Command, Arg};
use std::process;
use tracing_subscriber::{EnvFilter, fmt};


#[tokio::main]
async fn main() {
    fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let matches = Command::new("City Store")
        .version("1.0")
        .about("Serves the city catalog over HTTP")
        .subcommand(
            Command::new("serve")
                .about("Run the catalog API server")
                .arg(
                    Arg::new("config")
                        .short('c')
                        .long("config")
                        .value_name("FILE")
                        .help("Sets a custom config file"),
                ),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("serve", serve_matches)) => {
            let config_path = serve_matches.get_one::<String>("config")
                .map(|s| s.as_str())
                .unwrap_or("config/catalog.toml");
            tracing::info!("Starting store with config: {}", config_path);

            if let Err(e) = store::run_store(config_path).await {
                eprintln!("Store error: {}", e);
                process::exit(1);
            }
        }
        _ => {
            println!("No subcommand specified. Use --help for usage information.");
            process::exit(1);
        }
    }
}
