//! Lesende Ansichten fuer Profil, Dashboard und Admin-Bereich
//!
//! Admin-Ansichten pruefen die Rolle selbst, damit ein falsch verdrahteter
//! Handler keine fremden Daten ausliefert.

use serde::Serialize;

use secureauth_core::{AuthenticatedPrincipal, RoleId, UserId};
use secureauth_db::{
    models::{AuditLogRecord, BenutzerRecord, RolleRecord, SessionMitBenutzer, SessionRecord, Statistik},
    repository::{
        AuditLogRepository, RoleRepository, SessionRepository, StatistikRepository,
        UserRepository,
    },
};

use crate::error::{AuthError, AuthResult};
use crate::service::{admin_erfordern, AuthService};

/// Startseite nach dem Login
#[derive(Debug, Clone, Serialize)]
pub struct Dashboard {
    pub benutzer: BenutzerRecord,
    /// Eigene Sessions, neueste zuerst
    pub sessions: Vec<SessionRecord>,
    /// Admins sehen alle Eintraege, andere nur die eigenen
    pub audit: Vec<AuditLogRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Benutzerverwaltung {
    pub benutzer: Vec<BenutzerRecord>,
    pub rollen: Vec<RolleRecord>,
}

#[derive(Debug, Clone, Serialize)]
pub struct Protokolle {
    pub audit: Vec<AuditLogRecord>,
    pub sessions: Vec<SessionMitBenutzer>,
}

impl<U, S, A> AuthService<U, S, A>
where
    U: UserRepository + RoleRepository + StatistikRepository,
    S: SessionRepository,
    A: AuditLogRepository,
{
    /// Benutzer mit Rollenname
    pub async fn profil(&self, user_id: UserId) -> AuthResult<BenutzerRecord> {
        self.user_repo
            .get_by_id(user_id)
            .await?
            .ok_or_else(|| AuthError::NichtGefunden(format!("User {user_id}")))
    }

    pub async fn rolle_nach_id(&self, role_id: RoleId) -> AuthResult<Option<RolleRecord>> {
        Ok(self.user_repo.get_role(role_id).await?)
    }

    /// Profil plus Verlauf; Verlaufslisten sind best effort
    pub async fn dashboard(&self, principal: &AuthenticatedPrincipal) -> AuthResult<Dashboard> {
        let benutzer = self.profil(principal.user_id).await?;

        let sessions = self
            .ledger
            .fuer_benutzer(principal.user_id, self.limits.eigene_sessions)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id = %principal.user_id, fehler = %e, "Session-Verlauf nicht lesbar");
                Vec::new()
            });

        let filter = (!principal.ist_admin()).then_some(principal.user_id);
        let audit = self
            .audit
            .letzte(self.limits.eigenes_audit, filter)
            .await
            .unwrap_or_else(|e| {
                tracing::warn!(user_id = %principal.user_id, fehler = %e, "Audit-Verlauf nicht lesbar");
                Vec::new()
            });

        Ok(Dashboard {
            benutzer,
            sessions,
            audit,
        })
    }

    /// Alle Benutzer (neueste zuerst) und alle Rollen
    pub async fn benutzerverwaltung(
        &self,
        admin: &AuthenticatedPrincipal,
    ) -> AuthResult<Benutzerverwaltung> {
        admin_erfordern(admin)?;

        Ok(Benutzerverwaltung {
            benutzer: self.user_repo.list().await?,
            rollen: self.user_repo.list_roles().await?,
        })
    }

    pub async fn statistik(&self, admin: &AuthenticatedPrincipal) -> AuthResult<Statistik> {
        admin_erfordern(admin)?;
        Ok(self.user_repo.statistik().await?)
    }

    /// Audit-Log und Sessions aller Benutzer mit Benutzernamen
    pub async fn protokolle(&self, admin: &AuthenticatedPrincipal) -> AuthResult<Protokolle> {
        admin_erfordern(admin)?;

        let limit = self.limits.admin_listen;
        Ok(Protokolle {
            audit: self.audit.letzte(limit, None).await?,
            sessions: self.ledger.alle(limit).await?,
        })
    }
}
