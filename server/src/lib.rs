//! secureauth-server – Bibliotheks-Root
//!
//! Verdrahtet Konfiguration, Datenbank und Auth-Kern. Die Web-Schicht
//! (Formulare, Client-Tokens, Datei-Uploads) setzt auf [`Laufzeit::auth`] auf.

pub mod config;

use std::sync::Arc;

use anyhow::Result;
use config::ServerConfig;
use secureauth_auth::{AuthService, VerlaufLimits};
use secureauth_db::{SqliteDb, StatistikRepository};

/// Auth-Service ueber einer gemeinsamen SQLite-Datenbank
pub type SqliteAuthService = AuthService<SqliteDb, SqliteDb, SqliteDb>;

/// Geoeffnete Ressourcen eines laufenden Servers
pub struct Laufzeit {
    pub db: Arc<SqliteDb>,
    pub auth: SqliteAuthService,
}

/// Haelt den laufenden Server-Zustand zusammen
pub struct Server {
    pub config: ServerConfig,
}

impl Server {
    /// Erstellt einen neuen Server aus der gegebenen Konfiguration
    pub fn neu(config: ServerConfig) -> Self {
        Self { config }
    }

    /// Oeffnet die Datenbank (inkl. Migrationen) und baut den Auth-Service
    pub async fn vorbereiten(&self) -> Result<Laufzeit> {
        let db = Arc::new(SqliteDb::oeffnen(&self.config.datenbank.als_db_config()).await?);

        let statistik = db.statistik().await?;
        tracing::info!(
            benutzer = statistik.benutzer,
            rollen = statistik.rollen,
            sessions = statistik.sessions,
            audit = statistik.audit_eintraege,
            "Datenbank bereit"
        );

        if !secureauth_auth::vergleichs_hash_vorbereiten() {
            tracing::warn!("Vergleichshash fuer unbekannte Benutzer nicht erzeugt");
        }

        let auth = AuthService::mit_sqlite(Arc::clone(&db))
            .mit_limits(VerlaufLimits::from(&self.config.verlauf));

        Ok(Laufzeit { db, auth })
    }

    /// Startet den Server und laeuft bis zum Shutdown-Signal
    ///
    /// Reihenfolge:
    /// 1. Datenbank oeffnen, Schema und Rollen anlegen
    /// 2. Auth-Service aufbauen
    /// 3. Auf Ctrl-C warten
    /// 4. Pool schliessen
    pub async fn starten(self) -> Result<()> {
        tracing::info!(
            server_name = %self.config.server.name,
            datenbank = %self.config.datenbank.url,
            "Server startet"
        );

        let laufzeit = self.vorbereiten().await?;

        tracing::info!("Server laeuft. Warte auf Shutdown-Signal (Ctrl-C)...");
        tokio::signal::ctrl_c().await?;
        tracing::info!("Shutdown-Signal empfangen, Server wird beendet");

        laufzeit.db.schliessen().await;
        Ok(())
    }
}
