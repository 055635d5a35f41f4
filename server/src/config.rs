//! Server-Konfiguration
//!
//! Wird beim Start aus einer TOML-Datei geladen. Alle Felder haben
//! Standardwerte, sodass der Server ohne Konfigurationsdatei lauffaehig ist.
//! Der Datenbankpfad kommt ausschliesslich von hier, nie aus Benutzereingaben.

use serde::{Deserialize, Serialize};

use secureauth_auth::VerlaufLimits;
use secureauth_db::DatabaseConfig;

/// Vollstaendige Server-Konfiguration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerConfig {
    pub server: ServerEinstellungen,
    pub datenbank: DatenbankEinstellungen,
    pub logging: LoggingEinstellungen,
    /// Obergrenzen fuer Verlaufslisten in Dashboard und Admin-Bereich
    pub verlauf: VerlaufEinstellungen,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ServerEinstellungen {
    /// Anzeigename im Log
    pub name: String,
}

impl Default for ServerEinstellungen {
    fn default() -> Self {
        Self {
            name: "SecureAuth".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DatenbankEinstellungen {
    /// Verbindungs-URL
    pub url: String,
    /// Maximale Verbindungspool-Groesse
    pub max_verbindungen: u32,
    pub sqlite_wal: bool,
}

impl Default for DatenbankEinstellungen {
    fn default() -> Self {
        let standard = DatabaseConfig::default();
        Self {
            url: standard.url,
            max_verbindungen: standard.max_verbindungen,
            sqlite_wal: standard.sqlite_wal,
        }
    }
}

impl DatenbankEinstellungen {
    pub fn als_db_config(&self) -> DatabaseConfig {
        DatabaseConfig {
            url: self.url.clone(),
            max_verbindungen: self.max_verbindungen,
            sqlite_wal: self.sqlite_wal,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingEinstellungen {
    /// Log-Level oder Filter-Direktive, z.B. "info" oder "info,sqlx=warn"
    pub level: String,
    /// Format: "json" oder "text"
    pub format: String,
}

impl Default for LoggingEinstellungen {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct VerlaufEinstellungen {
    pub eigene_sessions: i64,
    pub eigenes_audit: i64,
    pub admin_listen: i64,
}

impl Default for VerlaufEinstellungen {
    fn default() -> Self {
        let standard = VerlaufLimits::default();
        Self {
            eigene_sessions: standard.eigene_sessions,
            eigenes_audit: standard.eigenes_audit,
            admin_listen: standard.admin_listen,
        }
    }
}

impl From<&VerlaufEinstellungen> for VerlaufLimits {
    fn from(v: &VerlaufEinstellungen) -> Self {
        Self {
            eigene_sessions: v.eigene_sessions,
            eigenes_audit: v.eigenes_audit,
            admin_listen: v.admin_listen,
        }
    }
}

impl ServerConfig {
    /// Laedt die Konfiguration aus einer TOML-Datei.
    /// Gibt die Standardkonfiguration zurueck wenn die Datei nicht existiert.
    pub fn laden(pfad: &str) -> anyhow::Result<Self> {
        match std::fs::read_to_string(pfad) {
            Ok(inhalt) => {
                let config: Self = toml::from_str(&inhalt)
                    .map_err(|e| anyhow::anyhow!("Konfigurationsfehler in '{pfad}': {e}"))?;
                config.pruefen()?;
                Ok(config)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::warn!(
                    pfad = pfad,
                    "Konfigurationsdatei nicht gefunden, verwende Standardwerte"
                );
                Ok(Self::default())
            }
            Err(e) => Err(anyhow::anyhow!(
                "Konfigurationsdatei '{pfad}' nicht lesbar: {e}"
            )),
        }
    }

    /// Weist Werte zurueck, mit denen der Server nicht sinnvoll laeuft
    pub fn pruefen(&self) -> anyhow::Result<()> {
        if self.datenbank.url.trim().is_empty() {
            anyhow::bail!("datenbank.url darf nicht leer sein");
        }
        if self.datenbank.max_verbindungen == 0 {
            anyhow::bail!("datenbank.max_verbindungen muss mindestens 1 sein");
        }
        let v = &self.verlauf;
        if v.eigene_sessions < 1 || v.eigenes_audit < 1 || v.admin_listen < 1 {
            anyhow::bail!("verlauf-Limits muessen positiv sein");
        }
        Ok(())
    }
}
