/// Cascade Server - catalog API and web player host
use anyhow::Context;
use cascade_catalog::{Catalog, CatalogFormat};
use cascade_server::{config::ServerConfig, create_router, state::AppState};
use clap::{Parser, Subcommand};
use std::{collections::HashSet, net::SocketAddr, path::PathBuf, sync::Arc};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "cascade-server")]
#[command(about = "Cascade music player server", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Start the HTTP server
    Serve {
        /// Configuration file path
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Load a catalog file and print a summary
    Inspect {
        /// Catalog file (CSV or JSON)
        path: PathBuf,
        /// Override format detection
        #[arg(short, long, value_enum)]
        format: Option<CatalogFormat>,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                "cascade_server=info,cascade_catalog=info,tower_http=info".into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Serve { config } => {
            serve(config).await?;
        }
        Commands::Inspect { path, format } => {
            inspect(&path, format)?;
        }
    }

    Ok(())
}

async fn serve(config_path: Option<PathBuf>) -> anyhow::Result<()> {
    // Load configuration
    let config = ServerConfig::load(config_path.as_deref())?;
    config.validate()?;

    tracing::info!("Starting Cascade Server");
    tracing::info!("Host: {}", config.server.host);
    tracing::info!("Port: {}", config.server.port);

    let catalog = Catalog::load(&config.catalog.path, config.catalog.format)
        .with_context(|| format!("Failed to load catalog {:?}", config.catalog.path))?;
    if catalog.is_empty() {
        tracing::warn!("Catalog is empty, the player will have nothing to play");
    }

    let app_state = AppState::new(Arc::new(catalog));
    let app = create_router(app_state, config.web.dir.clone());

    let addr = SocketAddr::from((
        config.server.host.parse::<std::net::IpAddr>()?,
        config.server.port,
    ));

    tracing::info!("Server listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

fn inspect(path: &std::path::Path, format: Option<CatalogFormat>) -> anyhow::Result<()> {
    let catalog = Catalog::load(path, format)?;

    let artists: HashSet<&str> = catalog
        .songs()
        .iter()
        .flat_map(|s| s.artists.iter().map(String::as_str))
        .collect();
    let playable = catalog
        .songs()
        .iter()
        .filter(|s| s.is_playable())
        .count();
    let with_recommendations = catalog
        .songs()
        .iter()
        .filter(|s| !s.recommendations.is_empty())
        .count();
    let dangling = catalog
        .songs()
        .iter()
        .flat_map(|s| s.recommendations.iter())
        .filter(|r| catalog.get(&r.song_id).is_none())
        .count();

    println!("Catalog: {}", path.display());
    println!("  Songs:                {}", catalog.len());
    println!("  Artists:              {}", artists.len());
    println!("  With audio:           {}", playable);
    println!("  With recommendations: {}", with_recommendations);
    println!("  Dangling edges:       {}", dangling);

    let top = catalog.popular_artists(5);
    if !top.is_empty() {
        println!("Top artists:");
        for artist in top {
            println!("  {} ({})", artist.name, artist.song_count);
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn inspect_parses_format() {
        let cli = Cli::try_parse_from([
            "cascade-server",
            "inspect",
            "songs.dat",
            "--format",
            "json",
        ])
        .unwrap();
        match cli.command {
            Commands::Inspect { path, format } => {
                assert_eq!(path, PathBuf::from("songs.dat"));
                assert_eq!(format, Some(CatalogFormat::Json));
            }
            Commands::Serve { .. } => panic!("expected inspect"),
        }
    }

    #[test]
    fn inspect_rejects_unknown_format() {
        let result =
            Cli::try_parse_from(["cascade-server", "inspect", "songs.dat", "--format", "xml"]);
        assert!(result.is_err());
    }

    #[test]
    fn inspect_format_is_optional() {
        let cli = Cli::try_parse_from(["cascade-server", "inspect", "songs.csv"]).unwrap();
        assert!(matches!(cli.command, Commands::Inspect { format: None, .. }));
    }
}
