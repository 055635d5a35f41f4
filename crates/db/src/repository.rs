//! Repository-Trait-Definitionen
//!
//! Das Repository-Pattern entkoppelt den Auth-Kern von der konkreten
//! Datenbank-Implementierung. Jeder Aufruf ist eine eigenstaendige
//! Arbeitseinheit; es gibt keine Transaktionen ueber mehrere Aufrufe.

use secureauth_core::{RoleId, SessionId, UserId};

use crate::error::DbError;
use crate::models::{
    AuditLogFilter, AuditLogRecord, BenutzerRecord, NeuerBenutzer, ProfilUpdate, RolleRecord,
    SessionMitBenutzer, SessionRecord, Statistik,
};

/// Result-Alias fuer Datenbankoperationen
pub type DbResult<T> = Result<T, DbError>;

/// Konfiguration fuer die Datenbankverbindung
#[derive(Debug, Clone)]
pub struct DatabaseConfig {
    /// Verbindungs-URL (z.B. "sqlite://secureauth.db")
    pub url: String,
    /// Maximale Anzahl gleichzeitiger Verbindungen im Pool
    pub max_verbindungen: u32,
    /// Ob WAL-Modus bei SQLite aktiviert werden soll
    pub sqlite_wal: bool,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: "sqlite://secureauth.db".into(),
            max_verbindungen: 5,
            sqlite_wal: true,
        }
    }
}

/// Credential Store – Benutzer-Datenzugriffe
///
/// Alle Lookups liefern den Rollennamen mit. Fehlende Datensaetze sind
/// `Ok(None)`, kein Fehler.
#[allow(async_fn_in_trait)]
pub trait UserRepository: Send + Sync {
    /// Legt einen Benutzer an und gibt die neue ID zurueck.
    ///
    /// Schlaegt mit `DbError::Eindeutigkeit("username" | "email")` fehl,
    /// wenn einer der Werte bereits existiert.
    async fn create(&self, data: NeuerBenutzer<'_>) -> DbResult<UserId>;

    async fn get_by_id(&self, id: UserId) -> DbResult<Option<BenutzerRecord>>;

    async fn get_by_username(&self, username: &str) -> DbResult<Option<BenutzerRecord>>;

    async fn get_by_email(&self, email: &str) -> DbResult<Option<BenutzerRecord>>;

    /// Alle Benutzer, neueste Registrierung zuerst
    async fn list(&self) -> DbResult<Vec<BenutzerRecord>>;

    /// `DbError::NichtGefunden` wenn die ID nicht existiert
    async fn update_profile(&self, id: UserId, data: ProfilUpdate) -> DbResult<()>;

    /// `DbError::NichtGefunden` wenn die ID nicht existiert
    async fn update_role(&self, id: UserId, role_id: RoleId) -> DbResult<()>;

    /// Hartes Loeschen ohne Kaskade. `DbError::NichtGefunden` wenn die ID nicht existiert.
    async fn delete(&self, id: UserId) -> DbResult<()>;
}

/// Rollen-Lookups (Rollen werden nur per Migration angelegt)
#[allow(async_fn_in_trait)]
pub trait RoleRepository: Send + Sync {
    async fn get_role(&self, id: RoleId) -> DbResult<Option<RolleRecord>>;

    async fn get_role_by_name(&self, name: &str) -> DbResult<Option<RolleRecord>>;

    async fn list_roles(&self) -> DbResult<Vec<RolleRecord>>;

    /// ID der `User`-Rolle; faellt auf `RoleId::FALLBACK_STANDARD` zurueck
    /// wenn die Rolle fehlt.
    async fn default_role_id(&self) -> DbResult<RoleId> {
        Ok(self
            .get_role_by_name("User")
            .await?
            .map(|r| r.id)
            .unwrap_or(RoleId::FALLBACK_STANDARD))
    }
}

/// Session-Ledger-Speicher
#[allow(async_fn_in_trait)]
pub trait SessionRepository: Send + Sync {
    /// Legt einen offenen Eintrag mit `login_time = jetzt` an
    async fn open_session(
        &self,
        user_id: UserId,
        client_address: Option<&str>,
        client_agent: Option<&str>,
    ) -> DbResult<SessionId>;

    /// Setzt `logout_time = jetzt`. Ein zweiter Aufruf ueberschreibt den Wert.
    async fn close_session(&self, id: SessionId) -> DbResult<()>;

    async fn get_session(&self, id: SessionId) -> DbResult<Option<SessionRecord>>;

    /// Sessions eines Benutzers, neueste zuerst
    async fn list_for_user(&self, user_id: UserId, limit: i64) -> DbResult<Vec<SessionRecord>>;

    /// Alle Sessions mit Benutzername, neueste zuerst
    async fn list_all(&self, limit: i64) -> DbResult<Vec<SessionMitBenutzer>>;
}

/// Audit-Log-Speicher (nur anhaengen)
#[allow(async_fn_in_trait)]
pub trait AuditLogRepository: Send + Sync {
    async fn log_event(&self, user_id: Option<UserId>, action: &str) -> DbResult<AuditLogRecord>;

    /// Eintraege, neueste zuerst
    async fn list_events(&self, filter: AuditLogFilter) -> DbResult<Vec<AuditLogRecord>>;
}

/// Zaehlerstaende ueber alle Tabellen
#[allow(async_fn_in_trait)]
pub trait StatistikRepository: Send + Sync {
    async fn statistik(&self) -> DbResult<Statistik>;
}
