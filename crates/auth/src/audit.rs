//! Audit-Protokoll
//!
//! Anhaengen ist best effort: ein Speicherfehler wird geloggt und nie an
//! den Aufrufer weitergereicht. Lesen gibt Fehler normal zurueck.

use std::sync::Arc;

use secureauth_core::UserId;
use secureauth_db::{
    models::{AuditLogFilter, AuditLogRecord},
    repository::AuditLogRepository,
};

use crate::error::AuthResult;

/// Feste Aktionstexte
pub mod aktion {
    use secureauth_core::UserId;

    pub const REGISTRIERT: &str = "User registered";
    pub const ANGEMELDET: &str = "User logged in";
    pub const ABGEMELDET: &str = "User logged out";
    pub const PROFIL_AKTUALISIERT: &str = "Profile updated";
    pub const ACCOUNT_GELOESCHT: &str = "Account deleted";

    pub fn rolle_geaendert(ziel: UserId, rollenname: &str) -> String {
        format!("Changed role for user_id {ziel} to {rollenname}")
    }

    pub fn benutzer_geloescht(ziel: UserId) -> String {
        format!("Deleted user_id {ziel}")
    }
}

/// Schreib- und Lesezugriff auf das Audit-Log
pub struct AuditProtokoll<A: AuditLogRepository> {
    repo: Arc<A>,
}

impl<A: AuditLogRepository> AuditProtokoll<A> {
    pub fn neu(repo: Arc<A>) -> Self {
        Self { repo }
    }

    /// Haengt einen Eintrag an. Fehler landen nur im Log.
    pub async fn erfassen(&self, user_id: Option<UserId>, aktion: &str) {
        match self.repo.log_event(user_id, aktion).await {
            Ok(eintrag) => {
                tracing::debug!(audit_id = eintrag.id, aktion = %aktion, "Audit-Eintrag geschrieben");
            }
            Err(e) => {
                tracing::warn!(
                    user_id = ?user_id.map(|u| u.inner()),
                    aktion = %aktion,
                    fehler = %e,
                    "Audit-Eintrag konnte nicht geschrieben werden"
                );
            }
        }
    }

    /// Neueste Eintraege zuerst, optional auf einen Benutzer gefiltert
    pub async fn letzte(
        &self,
        limit: i64,
        user_id: Option<UserId>,
    ) -> AuthResult<Vec<AuditLogRecord>> {
        let eintraege = self
            .repo
            .list_events(AuditLogFilter {
                user_id,
                limit: Some(limit),
            })
            .await?;
        Ok(eintraege)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use secureauth_db::{DbError, DbResult, SqliteDb};

    /// Audit-Speicher der jeden Zugriff ablehnt
    struct KaputtesAudit;

    impl AuditLogRepository for KaputtesAudit {
        async fn log_event(&self, _: Option<UserId>, _: &str) -> DbResult<AuditLogRecord> {
            Err(DbError::intern("Audit-Tabelle gesperrt"))
        }

        async fn list_events(&self, _: AuditLogFilter) -> DbResult<Vec<AuditLogRecord>> {
            Err(DbError::intern("Audit-Tabelle gesperrt"))
        }
    }

    #[tokio::test]
    async fn erfassen_schluckt_fehler() {
        let protokoll = AuditProtokoll::neu(Arc::new(KaputtesAudit));
        // Darf weder paniken noch einen Fehler liefern
        protokoll.erfassen(Some(UserId(1)), aktion::ANGEMELDET).await;
        assert!(protokoll.letzte(10, None).await.is_err());
    }

    #[tokio::test]
    async fn erfassen_und_lesen() {
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        let protokoll = AuditProtokoll::neu(db);

        protokoll.erfassen(Some(UserId(5)), aktion::REGISTRIERT).await;
        protokoll.erfassen(Some(UserId(6)), aktion::ANGEMELDET).await;

        let alle = protokoll.letzte(20, None).await.unwrap();
        assert_eq!(alle.len(), 2);
        assert_eq!(alle[0].action, "User logged in");

        let nur_fuenf = protokoll.letzte(20, Some(UserId(5))).await.unwrap();
        assert_eq!(nur_fuenf.len(), 1);
        assert_eq!(nur_fuenf[0].action, "User registered");
    }

    #[test]
    fn formatierte_aktionen() {
        assert_eq!(
            aktion::rolle_geaendert(UserId(4), "Admin"),
            "Changed role for user_id 4 to Admin"
        );
        assert_eq!(aktion::benutzer_geloescht(UserId(9)), "Deleted user_id 9");
    }
}
