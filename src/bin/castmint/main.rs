//! castmint CLI entry point.

mod cli;

use castmint::config::default_config_path;
use castmint::{ContentId, MintRequest, MintService, ServiceBuilder, ServiceConfig};
use clap::Parser;
use cli::{Cli, Command};
use std::path::PathBuf;
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    // Parse CLI arguments
    let cli = Cli::parse();
    let config = cli.to_config()?;

    // Initialize tracing
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    if cli.json_logs {
        tracing_subscriber::registry()
            .with(fmt::layer().json())
            .with(filter)
            .init();
    } else {
        tracing_subscriber::registry()
            .with(fmt::layer().with_writer(std::io::stderr))
            .with(filter)
            .init();
    }

    info!("castmint v{}", env!("CARGO_PKG_VERSION"));

    match run(cli.command, config).await {
        Ok(()) => Ok(()),
        // Bad arguments get a one-line message, not a report
        Err(e) if e.is_input_error() => {
            eprintln!("error: {e}");
            std::process::exit(cli::INPUT_ERROR_EXIT_CODE);
        }
        Err(e) => Err(e.into()),
    }
}

async fn run(command: Command, config: ServiceConfig) -> castmint::Result<()> {
    // Built once, and only for commands that talk to the chain
    let build = || ServiceBuilder::new(config).build();

    let service = match command {
        Command::InitConfig { path } => return init_config(path),
        Command::TokenId { content_id } => {
            let service = build()?;
            let token_id = service.resolve_token_id(&ContentId::new(content_id)).await?;
            println!("{token_id}");
            service
        }
        Command::Generate { content_id } => {
            let service = build()?;
            let token_id = service.generate_token_id(&ContentId::new(content_id)).await?;
            println!("{token_id}");
            service
        }
        Command::ContentId { token_id } => {
            let service = build()?;
            let content_id = service.resolve_content_id(token_id).await?;
            println!("{content_id}");
            service
        }
        Command::Mint {
            to,
            token_id,
            quantity,
        } => {
            let service = build()?;
            let request = MintRequest::new(to, token_id, quantity);
            match service.mint(&request).await? {
                Some(receipt) => println!("{receipt}"),
                None => println!("confirmed (no receipt)"),
            }
            service
        }
        Command::Price => {
            let service = build()?;
            println!("{}", service.mint_price().await?);
            service
        }
        Command::Limit => {
            let service = build()?;
            println!("{}", service.max_mint_limit().await?);
            service
        }
        Command::MintCount { token_id } => {
            let service = build()?;
            println!("{}", service.token_mint_count(token_id).await?);
            service
        }
    };

    log_cache_stats(&service);
    Ok(())
}

fn init_config(path: Option<PathBuf>) -> castmint::Result<()> {
    let path = path.unwrap_or_else(default_config_path);
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }
    ServiceConfig::default().to_file(&path)?;
    println!("Wrote default configuration to {}", path.display());
    Ok(())
}

fn log_cache_stats(service: &MintService) {
    if let Some(stats) = service.cache_stats() {
        info!(
            "Cache: {} hits, {} misses ({:.1}% hit rate)",
            stats.hits,
            stats.misses,
            stats.hit_rate()
        );
    }
}
