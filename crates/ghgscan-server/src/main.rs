//! ghgscan: sustainability report analysis server and CLI.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use ghgscan_core::GhgScanConfig;
use ghgscan_server::{cli, routes, AppState};
use tracing::info;
use tracing_subscriber::EnvFilter;

fn resolve_data_dir() -> PathBuf {
    std::env::var_os("GHGSCAN_DATA_DIR")
        .map(PathBuf::from)
        .unwrap_or_else(|| PathBuf::from("data"))
}

fn print_usage() {
    println!("ghgscan: sustainability report analysis");
    println!();
    println!("Usage: ghgscan [command]");
    println!();
    println!("Commands:");
    println!("  (none)                      Start the server");
    println!("  analyze <file> [--summary]  Analyze a PDF or image and print the result as JSON");
    println!("  help                        Show this help message");
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `analyze` output stays pipeable
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args: Vec<String> = std::env::args().collect();

    if args.len() > 1 {
        match args[1].as_str() {
            "analyze" => {
                let Some(file) = args.get(2) else {
                    eprintln!("Usage: ghgscan analyze <file> [--summary]");
                    std::process::exit(1);
                };
                let include_summary = args[3..].iter().any(|a| a == "--summary");
                let config = GhgScanConfig::from_env(resolve_data_dir())?;

                match cli::analyze_file(&config, Path::new(file), include_summary).await {
                    Ok(result) => {
                        println!("{}", serde_json::to_string_pretty(&result)?);
                        return Ok(());
                    }
                    Err(e) => {
                        eprintln!("Analysis failed: {}", e);
                        std::process::exit(1);
                    }
                }
            }
            "--help" | "-h" | "help" => {
                print_usage();
                return Ok(());
            }
            _ => {
                eprintln!("Unknown command: {}. Use 'ghgscan help' for usage.", args[1]);
                std::process::exit(1);
            }
        }
    }

    let data_dir = resolve_data_dir();
    info!("Data directory: {}", data_dir.display());

    let config = GhgScanConfig::from_env(&data_dir)?;
    let port = config.port;

    let state = Arc::new(AppState::new(config));
    let app = routes::build_router(state);

    let addr = format!("0.0.0.0:{}", port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;
    info!("ghgscan server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
