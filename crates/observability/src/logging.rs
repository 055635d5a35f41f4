//! Structured Logging Setup via tracing-subscriber
//!
//! Konfigurierbar per Umgebungsvariable (hat Vorrang vor der Konfigurationsdatei):
//! - `SA_LOG_LEVEL`: Filter-Direktive (z.B. `info` oder `info,sqlx=warn`), Standard: info
//! - `SA_LOG_FORMAT`: Format (text/json), Standard: text

use std::str::FromStr;

use thiserror::Error;
use tracing_subscriber::{fmt, EnvFilter};

pub const ENV_LEVEL: &str = "SA_LOG_LEVEL";
pub const ENV_FORMAT: &str = "SA_LOG_FORMAT";

#[derive(Debug, Error)]
pub enum LoggingFehler {
    #[error("Unbekanntes Log-Format '{0}' (erlaubt: text, json)")]
    UnbekanntesFormat(String),

    #[error("Log-Subscriber konnte nicht installiert werden: {0}")]
    Installation(String),
}

/// Ausgabeformat der Logzeilen
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

impl FromStr for LogFormat {
    type Err = LoggingFehler;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            andere => Err(LoggingFehler::UnbekanntesFormat(andere.to_string())),
        }
    }
}

/// Aufgeloeste Logging-Einstellung (Umgebung vor Konfiguration)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogEinstellung {
    pub filter: String,
    pub format: LogFormat,
}

impl LogEinstellung {
    /// Kombiniert Konfigurationswerte mit optionalen Umgebungswerten
    ///
    /// Ungueltige Werte fallen auf `info` bzw. `text` zurueck.
    pub fn aufloesen(
        level: &str,
        format: &str,
        env_level: Option<String>,
        env_format: Option<String>,
    ) -> Self {
        let filter = env_level
            .filter(|l| EnvFilter::try_new(l).is_ok())
            .or_else(|| EnvFilter::try_new(level).is_ok().then(|| level.to_string()))
            .unwrap_or_else(|| "info".to_string());

        let format = env_format
            .as_deref()
            .unwrap_or(format)
            .parse()
            .unwrap_or_default();

        Self { filter, format }
    }

    /// Liest `SA_LOG_LEVEL` und `SA_LOG_FORMAT` aus der Umgebung
    pub fn aus_umgebung(level: &str, format: &str) -> Self {
        Self::aufloesen(
            level,
            format,
            std::env::var(ENV_LEVEL).ok(),
            std::env::var(ENV_FORMAT).ok(),
        )
    }
}

/// Initialisiert das Logging-System.
///
/// Darf pro Prozess nur einmal erfolgreich aufgerufen werden.
pub fn logging_initialisieren(level: &str, format: &str) -> Result<LogEinstellung, LoggingFehler> {
    let einstellung = LogEinstellung::aus_umgebung(level, format);
    let filter = EnvFilter::new(&einstellung.filter);

    let ergebnis = match einstellung.format {
        LogFormat::Json => fmt()
            .json()
            .with_env_filter(filter)
            .with_target(true)
            .with_current_span(true)
            .try_init(),
        LogFormat::Text => fmt().with_env_filter(filter).with_target(true).try_init(),
    };
    ergebnis.map_err(|e| LoggingFehler::Installation(e.to_string()))?;

    Ok(einstellung)
}
