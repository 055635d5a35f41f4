//! Authentifizierter Principal
//!
//! Wird beim Login aus Benutzer und aufgeloester Rolle gebildet und von der
//! Web-Schicht in ihrem eigenen Client-Token mitgefuehrt. Der Principal wird
//! explizit an jede Operation uebergeben – es gibt keinen prozessweiten
//! Request-Kontext.

use serde::{Deserialize, Serialize};

use crate::types::{Rolle, SessionId, UserId};

/// Identitaet + Rolle eines angemeldeten Aufrufers
///
/// Die Rolle ist der Stand zum Login-Zeitpunkt. Spaetere Rollenwechsel
/// wirken erst nach erneutem Login.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AuthenticatedPrincipal {
    pub user_id: UserId,
    pub username: String,
    pub rolle: Rolle,
    /// Ledger-Eintrag dieses Logins (fehlt wenn das Ledger nicht schreibbar war)
    pub session_id: Option<SessionId>,
}

impl AuthenticatedPrincipal {
    pub fn ist_admin(&self) -> bool {
        self.rolle == Rolle::Admin
    }
}
