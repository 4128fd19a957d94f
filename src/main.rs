use appstore_catalog::app::catalog_use_case::CatalogService;
use appstore_catalog::app::ports::{CatalogPort, InstalledAppsPort};
use appstore_catalog::app::registry::AppStoreRegistry;
use appstore_catalog::config::Config;
use appstore_catalog::infra::{HttpAppStoreLoader, SnapshotCatalog};
use appstore_catalog::server::{self, AppState};
use appstore_catalog::{logging, metrics};
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use tracing::info;

#[derive(Parser)]
#[command(name = "appstore_catalog")]
#[command(about = "App store registry and compose app catalog API")]
#[command(version = "0.1.0")]
struct Cli {
    /// Path to the TOML configuration file (defaults to ./config.toml when present)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Serve the catalog HTTP API
    Serve {
        /// Port to run the server on (overrides the configuration)
        #[arg(short, long)]
        port: Option<u16>,
    },
    /// Print the aggregated category list as JSON
    Categories,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let cli = Cli::parse();
    let config = Config::load(cli.config.as_deref())?;

    let _guard = logging::init_logging(&config.logging);

    let snapshot = Arc::new(SnapshotCatalog::new(config.catalog.snapshot_path.clone()));
    let catalog_port: Arc<dyn CatalogPort> = snapshot.clone();
    let installed_port: Arc<dyn InstalledAppsPort> = snapshot;
    let catalog = Arc::new(CatalogService::new(catalog_port, installed_port));

    match cli.command {
        Commands::Serve { port } => {
            let port = port.unwrap_or(config.server.port);

            let loader = Arc::new(HttpAppStoreLoader::new(
                config.appstore.sources_file.clone(),
                config.appstore.default_url.clone(),
            ));
            let registry = Arc::new(
                AppStoreRegistry::load(loader, config.appstore.registration_timeout()).await?,
            );

            let metrics = if config.metrics.enabled {
                metrics::init_metrics()
            } else {
                None
            };

            info!(
                snapshot = %config.catalog.snapshot_path.display(),
                sources_file = %config.appstore.sources_file.display(),
                "Starting app store catalog on port {}",
                port
            );

            let state = AppState {
                registry,
                catalog,
                log_file: config.logging.log_file_path().display().to_string(),
                metrics,
            };
            server::start_server(state, port).await?;
        }
        Commands::Categories => {
            let categories = catalog.categories().await?;
            println!("{}", serde_json::to_string_pretty(&categories)?);
        }
    }

    Ok(())
}
