use dotenvy::dotenv;
use openrouter_relay_bot::config::Settings;
use openrouter_relay_bot::logging::{init_logging, RedactionPatterns};
use openrouter_relay_bot::runner::run_bot;
use std::sync::Arc;
use tracing::{error, info};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load .env file
    dotenv().ok();

    // Redaction patterns must exist before the first log line
    let patterns = Arc::new(RedactionPatterns::new().map_err(|e| {
        eprintln!("Failed to compile regex patterns: {e}");
        e
    })?);

    init_logging(patterns);

    info!("Starting OpenRouter relay bot...");

    let settings = init_settings();

    run_bot(settings).await;

    Ok(())
}

fn init_settings() -> Arc<Settings> {
    match Settings::new() {
        Ok(s) => {
            info!("Configuration loaded successfully.");
            Arc::new(s)
        }
        Err(e) => {
            error!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    }
}
