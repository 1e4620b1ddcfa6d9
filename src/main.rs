use solve_relay::{logger, server, Config, SolveRelay};

#[actix_web::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env before reading any configuration
    let dotenv_loaded = dotenv::dotenv().is_ok();

    let config = Config::from_env();

    let mut logger_config = config.logger.clone();
    if let Some(key) = config.gemini.credential() {
        logger_config = logger_config.with_secret(key);
    }
    logger::init_with_config(logger_config)?;

    if dotenv_loaded {
        log::info!("✅ .env file loaded successfully");
    } else {
        log::warn!("⚠️  No .env file found, using system environment variables");
    }

    let relay = match SolveRelay::from_config(&config) {
        Ok(relay) => relay,
        Err(e) => {
            log::error!("❌ Failed to initialize relay: {}", e);
            return Err(e.into());
        }
    };

    logger::log_startup_info(
        env!("CARGO_PKG_NAME"),
        env!("CARGO_PKG_VERSION"),
        &config.bind_address(),
    );
    logger::log_config_info(&config, relay.provider_name());

    if !config.gemini.has_credential() {
        log::warn!("⚠️  Solve requests will fail until the API key is configured");
    }

    server::run(config, relay).await?;
    Ok(())
}
