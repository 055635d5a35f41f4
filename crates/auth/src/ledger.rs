//! Session-Ledger
//!
//! Zeichnet pro Login ein Intervall auf, unabhaengig vom Client-Token der
//! Web-Schicht. Fehler werden hier an den Aufrufer gemeldet; der AuthService
//! entscheidet, dass sie Login und Logout nicht blockieren.

use std::sync::Arc;

use secureauth_core::{SessionId, UserId};
use secureauth_db::{
    models::{SessionMitBenutzer, SessionRecord},
    repository::SessionRepository,
};

use crate::error::AuthResult;
use crate::service::ClientInfo;

pub struct SessionLedger<S: SessionRepository> {
    repo: Arc<S>,
}

impl<S: SessionRepository> SessionLedger<S> {
    pub fn neu(repo: Arc<S>) -> Self {
        Self { repo }
    }

    /// Legt einen offenen Eintrag an (login_time = jetzt)
    pub async fn oeffnen(&self, user_id: UserId, client: &ClientInfo<'_>) -> AuthResult<SessionId> {
        let id = self
            .repo
            .open_session(user_id, client.adresse, client.agent)
            .await?;
        tracing::debug!(user_id = %user_id, session_id = %id, "Ledger-Eintrag geoeffnet");
        Ok(id)
    }

    /// Setzt logout_time = jetzt
    pub async fn schliessen(&self, id: SessionId) -> AuthResult<()> {
        self.repo.close_session(id).await?;
        tracing::debug!(session_id = %id, "Ledger-Eintrag geschlossen");
        Ok(())
    }

    /// Sessions eines Benutzers, neueste zuerst
    pub async fn fuer_benutzer(&self, user_id: UserId, limit: i64) -> AuthResult<Vec<SessionRecord>> {
        Ok(self.repo.list_for_user(user_id, limit).await?)
    }

    /// Alle Sessions mit Benutzername (Admin-Ansicht), neueste zuerst
    pub async fn alle(&self, limit: i64) -> AuthResult<Vec<SessionMitBenutzer>> {
        Ok(self.repo.list_all(limit).await?)
    }
}
