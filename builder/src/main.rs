use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

mod config;
mod icon;
mod targets;

#[derive(Debug, Parser)]
#[command(
    name = "icon-builder",
    about = "Generates mobile launcher icons and asset images from SVG sources",
    version
)]
struct Args {
    /// Path to the JSON configuration file
    config: PathBuf,
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    // Set up logging using tracing
    tracing_subscriber::registry()
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .init();

    let args = Args::parse();

    tracing::info!(
        "{} version {}",
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION")
    );
    tracing::info!("Building icons from {}", args.config.display());

    let config = match config::load_config(&args.config) {
        Ok(v) => v,
        Err(err) => {
            eprintln!("Failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    let written = match targets::generate_all(&config).await {
        Ok(v) => v,
        Err(err) => {
            eprintln!("Failed: {}", err);
            return ExitCode::FAILURE;
        }
    };

    if written.is_empty() {
        println!("No files written.");
    } else {
        println!("Wrote files:");
        for file in &written {
            println!("- {}", file.display());
        }
    }

    ExitCode::SUCCESS
}
