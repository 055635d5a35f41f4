//! SecureAuth Server – Einstiegspunkt
//!
//! Laedt die Konfiguration, initialisiert das Logging und startet den Server.

use anyhow::Result;
use secureauth_observability::logging_initialisieren;
use secureauth_server::{config::ServerConfig, Server};

#[tokio::main]
async fn main() -> Result<()> {
    // Konfigurationsdatei-Pfad aus Umgebungsvariable oder Standard
    let config_pfad = std::env::var("SECUREAUTH_CONFIG").unwrap_or_else(|_| "config.toml".into());

    // Standardwerte falls Datei fehlt
    let config = ServerConfig::laden(&config_pfad)?;

    let log = logging_initialisieren(&config.logging.level, &config.logging.format)?;

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        config = %config_pfad,
        log_filter = %log.filter,
        "SecureAuth Server wird initialisiert"
    );

    Server::neu(config).starten().await
}
