//! Datenbankmodelle fuer SecureAuth
//!
//! Diese Typen repraesentieren Datensaetze aus der Datenbank.
//! Sie sind vom Principal der Web-Schicht getrennt und dienen als reine
//! Datenuebertragungsobjekte.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use secureauth_core::{RoleId, SessionId, UserId};

// ---------------------------------------------------------------------------
// Benutzer
// ---------------------------------------------------------------------------

/// Benutzer-Datensatz inkl. aufgeloestem Rollennamen (LEFT JOIN auf `roles`)
///
/// Nur serialisierbar: der Passwort-Hash verlaesst den Speicher nie.
#[derive(Debug, Clone, Serialize)]
pub struct BenutzerRecord {
    pub id: UserId,
    pub username: String,
    pub email: String,
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
    pub role_id: Option<RoleId>,
    /// `None` wenn `role_id` fehlt oder auf keine Rolle zeigt
    pub role_name: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Daten zum Erstellen eines neuen Benutzers
#[derive(Debug, Clone)]
pub struct NeuerBenutzer<'a> {
    pub username: &'a str,
    pub email: &'a str,
    pub password_hash: &'a str,
    pub full_name: Option<&'a str>,
    pub role_id: RoleId,
}

/// Profilaenderung durch den Benutzer selbst
///
/// `full_name` wird immer uebernommen (auch `None`),
/// `profile_picture = None` laesst das gespeicherte Bild unveraendert.
#[derive(Debug, Clone, Default)]
pub struct ProfilUpdate {
    pub full_name: Option<String>,
    pub profile_picture: Option<String>,
}

// ---------------------------------------------------------------------------
// Rollen
// ---------------------------------------------------------------------------

/// Rollen-Datensatz
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RolleRecord {
    pub id: RoleId,
    pub name: String,
    pub description: Option<String>,
}

// ---------------------------------------------------------------------------
// Session-Ledger
// ---------------------------------------------------------------------------

/// Ein Login-bis-Logout-Intervall
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    pub id: SessionId,
    pub user_id: UserId,
    pub login_time: DateTime<Utc>,
    pub logout_time: Option<DateTime<Utc>>,
    pub client_address: Option<String>,
    pub client_agent: Option<String>,
}

impl SessionRecord {
    pub fn ist_offen(&self) -> bool {
        self.logout_time.is_none()
    }
}

/// Session-Eintrag fuer die Admin-Ansicht
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionMitBenutzer {
    #[serde(flatten)]
    pub session: SessionRecord,
    /// `None` wenn der Benutzer inzwischen geloescht wurde
    pub username: Option<String>,
}

// ---------------------------------------------------------------------------
// Audit-Log
// ---------------------------------------------------------------------------

/// Audit-Log-Eintrag (unveraenderlich)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuditLogRecord {
    pub id: i64,
    pub user_id: Option<UserId>,
    pub action: String,
    pub action_time: DateTime<Utc>,
    /// Per LEFT JOIN aufgeloest; `None` fuer geloeschte oder fehlende Benutzer
    pub username: Option<String>,
}

/// Filter fuer Audit-Log-Abfragen
#[derive(Debug, Clone, Default)]
pub struct AuditLogFilter {
    pub user_id: Option<UserId>,
    pub limit: Option<i64>,
}

// ---------------------------------------------------------------------------
// Statistik
// ---------------------------------------------------------------------------

/// Zaehlerstaende fuer das Admin-Dashboard
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Statistik {
    pub benutzer: i64,
    pub rollen: i64,
    pub sessions: i64,
    pub audit_eintraege: i64,
}
