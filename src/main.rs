use tracing::{error, info};

use socialnet::{Config, Database, WebServer};

#[tokio::main]
async fn main() {
    let mut config = match Config::load("config.toml") {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load config.toml: {e}");
            eprintln!("Using default configuration.");
            Config::default()
        }
    };
    config.apply_env_overrides();

    if let Err(e) = socialnet::logging::init(&config.logging) {
        eprintln!("Failed to initialize logging: {e}");
        socialnet::logging::init_console_only(&config.logging.level);
    }

    info!("{} starting", config.server.name);

    if let Err(e) = run(config).await {
        error!("{}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> socialnet::Result<()> {
    config.validate()?;

    let db =
        Database::open_with_pool_size(&config.database.path, config.database.max_connections)
            .await?;
    info!(
        "Database ready (schema version {})",
        db.schema_version().await?
    );

    let server = WebServer::new(&config.web, db)?;
    info!("Serving on {}", server.addr());
    server.run().await
}
