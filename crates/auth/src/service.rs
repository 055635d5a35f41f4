//! Auth-Service fuer SecureAuth
//!
//! Zentraler Einstiegspunkt fuer Registrierung, Login, Logout,
//! Profilpflege, Rollenwechsel und Account-Loeschung.
//!
//! Zustandsmodell aus Sicht des Servers: Anonym → Angemeldet(Rolle) → Anonym.
//! Der Service haelt keinen veraenderlichen Zustand im Speicher; alles
//! Dauerhafte liegt in den Repositories. Der Aufrufer reicht den
//! [`AuthenticatedPrincipal`] bei jeder Operation explizit herein.
//!
//! Fehlerpolitik: Lookups, Anlegen, Rollenwechsel und Loeschen brechen bei
//! Speicherfehlern ab. Ledger- und Audit-Schreibvorgaenge sind best effort
//! und aendern das Ergebnis einer Operation nie.

use std::sync::Arc;

use secureauth_core::{AuthenticatedPrincipal, RoleId, Rolle, SessionId, UserId};
use secureauth_db::{
    models::{BenutzerRecord, NeuerBenutzer, ProfilUpdate},
    repository::{
        AuditLogRepository, RoleRepository, SessionRepository, StatistikRepository,
        UserRepository,
    },
    SqliteDb,
};

use crate::{
    audit::{aktion, AuditProtokoll},
    error::{AuthError, AuthResult, KonfliktFeld},
    gate,
    ledger::SessionLedger,
    password::{blind_verifizieren, passwort_hashen, passwort_staerke_pruefen, passwort_verifizieren},
};

/// Herkunft einer Anmeldung, wie sie die Web-Schicht sieht
#[derive(Debug, Clone, Copy, Default)]
pub struct ClientInfo<'a> {
    pub adresse: Option<&'a str>,
    pub agent: Option<&'a str>,
}

/// Ergebnis eines erfolgreichen Logins
#[derive(Debug, Clone)]
pub struct Anmeldung {
    pub benutzer: BenutzerRecord,
    /// Zum Login-Zeitpunkt aufgeloeste Rolle
    pub rolle: Rolle,
    /// `None` wenn der Ledger-Eintrag nicht geschrieben werden konnte
    pub session_id: Option<SessionId>,
}

impl Anmeldung {
    /// Principal, den die Web-Schicht in ihrem Client-Token ablegt
    pub fn principal(&self) -> AuthenticatedPrincipal {
        AuthenticatedPrincipal {
            user_id: self.benutzer.id,
            username: self.benutzer.username.clone(),
            rolle: self.rolle,
            session_id: self.session_id,
        }
    }
}

/// Obergrenzen fuer Verlaufslisten
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerlaufLimits {
    pub eigene_sessions: i64,
    pub eigenes_audit: i64,
    pub admin_listen: i64,
}

impl Default for VerlaufLimits {
    fn default() -> Self {
        Self {
            eigene_sessions: 10,
            eigenes_audit: 20,
            admin_listen: 100,
        }
    }
}

/// Auth-Service – zentraler Einstiegspunkt fuer alle Authentifizierungsvorgaenge
pub struct AuthService<U, S, A>
where
    U: UserRepository + RoleRepository + StatistikRepository,
    S: SessionRepository,
    A: AuditLogRepository,
{
    pub(crate) user_repo: Arc<U>,
    pub(crate) ledger: SessionLedger<S>,
    pub(crate) audit: AuditProtokoll<A>,
    pub(crate) limits: VerlaufLimits,
}

impl AuthService<SqliteDb, SqliteDb, SqliteDb> {
    /// Alle Repositories aus derselben SQLite-Datenbank
    pub fn mit_sqlite(db: Arc<SqliteDb>) -> Self {
        Self::neu(Arc::clone(&db), Arc::clone(&db), db)
    }
}

impl<U, S, A> AuthService<U, S, A>
where
    U: UserRepository + RoleRepository + StatistikRepository,
    S: SessionRepository,
    A: AuditLogRepository,
{
    /// Erstellt einen neuen AuthService
    pub fn neu(user_repo: Arc<U>, session_repo: Arc<S>, audit_repo: Arc<A>) -> Self {
        Self {
            user_repo,
            ledger: SessionLedger::neu(session_repo),
            audit: AuditProtokoll::neu(audit_repo),
            limits: VerlaufLimits::default(),
        }
    }

    /// Ersetzt die Obergrenzen fuer Verlaufslisten
    pub fn mit_limits(mut self, limits: VerlaufLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Registriert einen neuen Benutzer mit der Standardrolle
    ///
    /// Reihenfolge: Pflichtfelder, Passwort-Richtlinie, Benutzername, E-Mail.
    /// Es wird nur die erste Kollision gemeldet. Oeffnet keine Session.
    pub async fn registrieren(
        &self,
        username: &str,
        email: &str,
        passwort: &str,
        full_name: Option<&str>,
    ) -> AuthResult<UserId> {
        if username.is_empty() || email.is_empty() {
            return Err(AuthError::FehlendeEingabe(
                "Username and email are required.",
            ));
        }

        passwort_staerke_pruefen(passwort).map_err(AuthError::SchwachesPasswort)?;

        if self.user_repo.get_by_username(username).await?.is_some() {
            return Err(AuthError::Konflikt(KonfliktFeld::Username));
        }
        if self.user_repo.get_by_email(email).await?.is_some() {
            return Err(AuthError::Konflikt(KonfliktFeld::Email));
        }

        let role_id = self.user_repo.default_role_id().await?;
        let passwort_hash = passwort_hashen(passwort)?;

        // Ein paralleler Insert mit gleichem Namen/E-Mail endet hier als Konflikt
        let user_id = self
            .user_repo
            .create(NeuerBenutzer {
                username,
                email,
                password_hash: &passwort_hash,
                full_name,
                role_id,
            })
            .await?;

        self.audit.erfassen(Some(user_id), aktion::REGISTRIERT).await;

        tracing::info!(
            user_id = %user_id,
            username = %username,
            "Neuer Benutzer registriert"
        );

        Ok(user_id)
    }

    /// Meldet einen Benutzer an und oeffnet einen Ledger-Eintrag
    ///
    /// Unbekannter Benutzer und falsches Passwort liefern denselben Fehler.
    pub async fn anmelden(
        &self,
        username: &str,
        passwort: &str,
        client: ClientInfo<'_>,
    ) -> AuthResult<Anmeldung> {
        if username.is_empty() || passwort.is_empty() {
            return Err(AuthError::FehlendeEingabe(
                "Please enter both username and password.",
            ));
        }

        let Some(benutzer) = self.user_repo.get_by_username(username).await? else {
            blind_verifizieren(passwort);
            tracing::warn!(username = %username, "Login fuer unbekannten Benutzer");
            return Err(AuthError::UngueltigeAnmeldedaten);
        };

        let korrekt = match passwort_verifizieren(passwort, &benutzer.password_hash) {
            Ok(korrekt) => korrekt,
            Err(e) => {
                tracing::warn!(user_id = %benutzer.id, fehler = %e, "Gespeicherter Hash unlesbar");
                false
            }
        };
        if !korrekt {
            tracing::warn!(username = %username, "Fehlgeschlagener Login-Versuch");
            return Err(AuthError::UngueltigeAnmeldedaten);
        }

        let rolle = Rolle::aus_name(benutzer.role_name.as_deref());

        let session_id = match self.ledger.oeffnen(benutzer.id, &client).await {
            Ok(id) => Some(id),
            Err(e) => {
                tracing::warn!(
                    user_id = %benutzer.id,
                    fehler = %e,
                    "Ledger-Eintrag fuer Login fehlgeschlagen, Login wird fortgesetzt"
                );
                None
            }
        };

        self.audit.erfassen(Some(benutzer.id), aktion::ANGEMELDET).await;

        tracing::info!(
            user_id = %benutzer.id,
            username = %benutzer.username,
            rolle = %rolle,
            "Benutzer angemeldet"
        );

        Ok(Anmeldung {
            benutzer,
            rolle,
            session_id,
        })
    }

    /// Meldet einen Benutzer ab
    ///
    /// Gelingt aus Sicht des Aufrufers immer; die Web-Schicht verwirft
    /// danach ihr Client-Token.
    pub async fn abmelden(&self, principal: &AuthenticatedPrincipal) {
        if let Some(session_id) = principal.session_id {
            self.ledger_schliessen(principal.user_id, session_id).await;
        }

        self.audit
            .erfassen(Some(principal.user_id), aktion::ABGEMELDET)
            .await;

        tracing::info!(user_id = %principal.user_id, "Benutzer abgemeldet");
    }

    /// Aktualisiert den Anzeigenamen und optional das Profilbild
    ///
    /// `neues_bild` ist der Dateiname, den die Upload-Verarbeitung der
    /// Web-Schicht bereits gespeichert hat.
    pub async fn profil_aktualisieren(
        &self,
        principal: &AuthenticatedPrincipal,
        full_name: Option<&str>,
        neues_bild: Option<&str>,
    ) -> AuthResult<()> {
        self.user_repo
            .update_profile(
                principal.user_id,
                ProfilUpdate {
                    full_name: full_name.map(str::to_string),
                    profile_picture: neues_bild.map(str::to_string),
                },
            )
            .await?;

        self.audit
            .erfassen(Some(principal.user_id), aktion::PROFIL_AKTUALISIERT)
            .await;

        tracing::debug!(user_id = %principal.user_id, "Profil aktualisiert");
        Ok(())
    }

    /// Weist einem Benutzer eine andere Rolle zu (nur Admin)
    ///
    /// Bestehende Principals behalten ihre alte Rolle bis zum naechsten Login.
    pub async fn rolle_aendern(
        &self,
        admin: &AuthenticatedPrincipal,
        ziel: UserId,
        neue_rolle: RoleId,
    ) -> AuthResult<()> {
        admin_erfordern(admin)?;

        let rolle = self
            .user_repo
            .get_role(neue_rolle)
            .await?
            .ok_or_else(|| AuthError::NichtGefunden(format!("Rolle {neue_rolle}")))?;

        self.user_repo.update_role(ziel, rolle.id).await?;

        self.audit
            .erfassen(
                Some(admin.user_id),
                &aktion::rolle_geaendert(ziel, &rolle.name),
            )
            .await;

        tracing::info!(
            admin_id = %admin.user_id,
            ziel = %ziel,
            rolle = %rolle.name,
            "Rolle geaendert"
        );
        Ok(())
    }

    /// Loescht einen anderen Benutzer (nur Admin, nicht sich selbst)
    ///
    /// Ledger- und Audit-Eintraege des Ziels bleiben mit ihrer ID bestehen;
    /// auch der Loesch-Eintrag selbst zeigt auf die geloeschte ID.
    pub async fn benutzer_loeschen(
        &self,
        admin: &AuthenticatedPrincipal,
        ziel: UserId,
    ) -> AuthResult<()> {
        admin_erfordern(admin)?;

        if admin.user_id == ziel {
            return Err(AuthError::SelbstLoeschung);
        }

        self.user_repo.delete(ziel).await?;

        self.audit
            .erfassen(Some(ziel), &aktion::benutzer_geloescht(ziel))
            .await;

        tracing::info!(admin_id = %admin.user_id, ziel = %ziel, "Benutzer geloescht");
        Ok(())
    }

    /// Loescht den eigenen Account
    ///
    /// Danach ist der Principal ungueltig; die Web-Schicht verwirft ihr Token.
    pub async fn eigenen_account_loeschen(&self, principal: &AuthenticatedPrincipal) -> AuthResult<()> {
        self.user_repo.delete(principal.user_id).await?;

        self.audit
            .erfassen(Some(principal.user_id), aktion::ACCOUNT_GELOESCHT)
            .await;

        if let Some(session_id) = principal.session_id {
            self.ledger_schliessen(principal.user_id, session_id).await;
        }

        tracing::info!(user_id = %principal.user_id, "Account selbst geloescht");
        Ok(())
    }

    async fn ledger_schliessen(&self, user_id: UserId, session_id: SessionId) {
        if let Err(e) = self.ledger.schliessen(session_id).await {
            tracing::warn!(
                user_id = %user_id,
                session_id = %session_id,
                fehler = %e,
                "Ledger-Eintrag konnte nicht geschlossen werden"
            );
        }
    }
}

/// Gate-Pruefung fuer Admin-Operationen innerhalb des Service
pub(crate) fn admin_erfordern(principal: &AuthenticatedPrincipal) -> AuthResult<()> {
    if gate::zulassen(principal, Rolle::Admin) {
        Ok(())
    } else {
        Err(AuthError::ZugriffVerweigert(Rolle::Admin))
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use secureauth_db::{
        models::{AuditLogFilter, AuditLogRecord, SessionMitBenutzer, SessionRecord},
        DbError, DbResult,
    };

    pub(crate) type TestService = AuthService<SqliteDb, SqliteDb, SqliteDb>;

    pub(crate) async fn test_service() -> (TestService, Arc<SqliteDb>) {
        let db = Arc::new(SqliteDb::in_memory().await.expect("In-Memory DB"));
        (AuthService::mit_sqlite(Arc::clone(&db)), db)
    }

    /// Registriert einen Benutzer, hebt ihn zum Admin und meldet ihn an
    pub(crate) async fn admin_anmelden(service: &TestService, db: &SqliteDb) -> AuthenticatedPrincipal {
        let id = service
            .registrieren("root", "root@x.com", "Adm1nPass", None)
            .await
            .unwrap();
        let admin_rolle = db.get_role_by_name("Admin").await.unwrap().unwrap();
        db.update_role(id, admin_rolle.id).await.unwrap();
        service
            .anmelden("root", "Adm1nPass", ClientInfo::default())
            .await
            .unwrap()
            .principal()
    }

    /// Ledger-Speicher der jeden Zugriff ablehnt
    struct KaputtesLedger;

    impl SessionRepository for KaputtesLedger {
        async fn open_session(&self, _: UserId, _: Option<&str>, _: Option<&str>) -> DbResult<SessionId> {
            Err(DbError::intern("Ledger gesperrt"))
        }
        async fn close_session(&self, _: SessionId) -> DbResult<()> {
            Err(DbError::intern("Ledger gesperrt"))
        }
        async fn get_session(&self, _: SessionId) -> DbResult<Option<SessionRecord>> {
            Err(DbError::intern("Ledger gesperrt"))
        }
        async fn list_for_user(&self, _: UserId, _: i64) -> DbResult<Vec<SessionRecord>> {
            Err(DbError::intern("Ledger gesperrt"))
        }
        async fn list_all(&self, _: i64) -> DbResult<Vec<SessionMitBenutzer>> {
            Err(DbError::intern("Ledger gesperrt"))
        }
    }

    /// Audit-Speicher der jeden Zugriff ablehnt
    struct KaputtesAudit;

    impl AuditLogRepository for KaputtesAudit {
        async fn log_event(&self, _: Option<UserId>, _: &str) -> DbResult<AuditLogRecord> {
            Err(DbError::intern("Audit gesperrt"))
        }
        async fn list_events(&self, _: AuditLogFilter) -> DbResult<Vec<AuditLogRecord>> {
            Err(DbError::intern("Audit gesperrt"))
        }
    }

    async fn audit_texte(db: &SqliteDb) -> Vec<String> {
        db.list_events(AuditLogFilter::default())
            .await
            .unwrap()
            .into_iter()
            .map(|e| e.action)
            .collect()
    }

    #[tokio::test]
    async fn registrieren_mit_standardrolle() {
        let (service, db) = test_service().await;

        let id = service
            .registrieren("alice", "alice@x.com", "Passw0rd", Some("Alice A."))
            .await
            .expect("Registrierung fehlgeschlagen");

        let alice = db.get_by_username("alice").await.unwrap().unwrap();
        assert_eq!(alice.id, id);
        assert_eq!(alice.role_name.as_deref(), Some("User"));
        assert!(alice.password_hash.starts_with("$argon2id$"));
        assert_ne!(alice.password_hash, "Passw0rd");

        // Registrierung oeffnet keine Session
        assert!(db.list_for_user(id, 10).await.unwrap().is_empty());

        let eintraege = db
            .list_events(AuditLogFilter {
                user_id: Some(id),
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(eintraege.len(), 1);
        assert_eq!(eintraege[0].action, "User registered");
    }

    #[tokio::test]
    async fn doppelte_registrierung_schlaegt_fehl() {
        let (service, db) = test_service().await;
        let erste = service
            .registrieren("duplikat", "a@x.com", "Passw0rd", None)
            .await
            .unwrap();

        let ergebnis = service
            .registrieren("duplikat", "b@x.com", "Passw0rd", None)
            .await;
        let err = ergebnis.unwrap_err();
        assert!(matches!(err, AuthError::Konflikt(KonfliktFeld::Username)));
        assert_eq!(err.nutzer_nachricht(), "Username already exists!");

        // Der erste Benutzer ist weiterhin auffindbar
        let gefunden = db.get_by_username("duplikat").await.unwrap().unwrap();
        assert_eq!(gefunden.id, erste);
    }

    #[tokio::test]
    async fn email_kollision_und_reihenfolge() {
        let (service, _db) = test_service().await;
        service
            .registrieren("bob", "bob@x.com", "Passw0rd", None)
            .await
            .unwrap();

        let err = service
            .registrieren("robert", "bob@x.com", "Passw0rd", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Konflikt(KonfliktFeld::Email)));

        // Beide Felder kollidieren: nur der Benutzername wird gemeldet
        let err = service
            .registrieren("bob", "bob@x.com", "Passw0rd", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::Konflikt(KonfliktFeld::Username)));
    }

    #[tokio::test]
    async fn schwaches_passwort_abgelehnt() {
        let (service, db) = test_service().await;

        let err = service
            .registrieren("kurz", "kurz@x.com", "Ab1", None)
            .await
            .unwrap_err();
        assert_eq!(
            err.nutzer_nachricht(),
            "Password must be at least 8 characters long"
        );

        let err = service
            .registrieren("klein", "klein@x.com", "passw0rd", None)
            .await
            .unwrap_err();
        assert_eq!(
            err.nutzer_nachricht(),
            "Password must contain at least one uppercase letter"
        );

        assert!(db.get_by_username("kurz").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn leere_pflichtfelder() {
        let (service, _db) = test_service().await;

        let err = service
            .registrieren("", "x@x.com", "Passw0rd", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::FehlendeEingabe(_)));

        let err = service
            .anmelden("alice", "", ClientInfo::default())
            .await
            .unwrap_err();
        assert_eq!(
            err.nutzer_nachricht(),
            "Please enter both username and password."
        );
    }

    #[tokio::test]
    async fn anmeldefehler_sind_nicht_unterscheidbar() {
        let (service, _db) = test_service().await;
        service
            .registrieren("user", "user@x.com", "Richtig1", None)
            .await
            .unwrap();

        let falsches_passwort = service
            .anmelden("user", "Falsch123", ClientInfo::default())
            .await
            .unwrap_err();
        let unbekannt = service
            .anmelden("niemand", "Falsch123", ClientInfo::default())
            .await
            .unwrap_err();

        assert!(matches!(falsches_passwort, AuthError::UngueltigeAnmeldedaten));
        assert!(matches!(unbekannt, AuthError::UngueltigeAnmeldedaten));
        assert_eq!(falsches_passwort.to_string(), unbekannt.to_string());
        assert_eq!(
            falsches_passwort.nutzer_nachricht(),
            unbekannt.nutzer_nachricht()
        );
    }

    #[tokio::test]
    async fn anmelden_und_abmelden_schliesst_ledger() {
        let (service, db) = test_service().await;
        let id = service
            .registrieren("carol", "carol@x.com", "Passw0rd", None)
            .await
            .unwrap();

        let anmeldung = service
            .anmelden(
                "carol",
                "Passw0rd",
                ClientInfo {
                    adresse: Some("10.0.0.7"),
                    agent: Some("Mozilla/5.0"),
                },
            )
            .await
            .expect("Anmeldung fehlgeschlagen");
        assert_eq!(anmeldung.rolle, Rolle::User);

        let principal = anmeldung.principal();
        assert_eq!(principal.user_id, id);
        let session_id = principal.session_id.expect("Ledger-Eintrag erwartet");

        let offen = db.get_session(session_id).await.unwrap().unwrap();
        assert!(offen.ist_offen());
        assert_eq!(offen.client_address.as_deref(), Some("10.0.0.7"));

        service.abmelden(&principal).await;

        let geschlossen = db.get_session(session_id).await.unwrap().unwrap();
        assert!(geschlossen.logout_time.is_some());

        let texte = audit_texte(&db).await;
        assert_eq!(
            texte,
            vec!["User logged out", "User logged in", "User registered"]
        );
    }

    #[tokio::test]
    async fn abmelden_ohne_ledger_eintrag() {
        let (service, db) = test_service().await;
        let id = service
            .registrieren("dora", "dora@x.com", "Passw0rd", None)
            .await
            .unwrap();

        let principal = AuthenticatedPrincipal {
            user_id: id,
            username: "dora".into(),
            rolle: Rolle::User,
            session_id: None,
        };
        service.abmelden(&principal).await;

        assert_eq!(audit_texte(&db).await[0], "User logged out");
    }

    #[tokio::test]
    async fn ledger_ausfall_blockiert_login_nicht() {
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        let service = AuthService::neu(Arc::clone(&db), Arc::new(KaputtesLedger), Arc::clone(&db));

        service
            .registrieren("erin", "erin@x.com", "Passw0rd", None)
            .await
            .unwrap();
        let anmeldung = service
            .anmelden("erin", "Passw0rd", ClientInfo::default())
            .await
            .expect("Login muss trotz Ledger-Ausfall gelingen");
        assert!(anmeldung.session_id.is_none());

        // Logout mit einer (erfundenen) Session-ID gelingt ebenfalls
        let mut principal = anmeldung.principal();
        principal.session_id = Some(SessionId(77));
        service.abmelden(&principal).await;

        assert_eq!(audit_texte(&db).await[0], "User logged out");
    }

    #[tokio::test]
    async fn audit_ausfall_blockiert_nichts() {
        let db = Arc::new(SqliteDb::in_memory().await.unwrap());
        let service = AuthService::neu(Arc::clone(&db), Arc::clone(&db), Arc::new(KaputtesAudit));

        let id = service
            .registrieren("finn", "finn@x.com", "Passw0rd", None)
            .await
            .expect("Registrierung muss trotz Audit-Ausfall gelingen");
        let principal = service
            .anmelden("finn", "Passw0rd", ClientInfo::default())
            .await
            .unwrap()
            .principal();
        service
            .profil_aktualisieren(&principal, Some("Finn"), None)
            .await
            .unwrap();
        service.eigenen_account_loeschen(&principal).await.unwrap();

        assert!(db.get_by_id(id).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn speicher_nicht_verfuegbar() {
        let (service, db) = test_service().await;
        db.schliessen().await;

        let err = service
            .anmelden("alice", "Passw0rd", ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SpeicherNichtVerfuegbar(_)));

        let err = service
            .registrieren("alice", "alice@x.com", "Passw0rd", None)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SpeicherNichtVerfuegbar(_)));
    }

    #[tokio::test]
    async fn profil_aktualisieren() {
        let (service, db) = test_service().await;
        service
            .registrieren("gina", "gina@x.com", "Passw0rd", Some("Gina"))
            .await
            .unwrap();
        let principal = service
            .anmelden("gina", "Passw0rd", ClientInfo::default())
            .await
            .unwrap()
            .principal();

        service
            .profil_aktualisieren(&principal, Some("Gina G."), Some("3_gina.png"))
            .await
            .unwrap();
        service
            .profil_aktualisieren(&principal, Some("Georgina"), None)
            .await
            .unwrap();

        let gina = db.get_by_id(principal.user_id).await.unwrap().unwrap();
        assert_eq!(gina.full_name.as_deref(), Some("Georgina"));
        assert_eq!(gina.profile_picture.as_deref(), Some("3_gina.png"));
        assert_eq!(audit_texte(&db).await[0], "Profile updated");
    }

    #[tokio::test]
    async fn admin_kann_sich_nicht_selbst_loeschen() {
        let (service, db) = test_service().await;
        let admin = admin_anmelden(&service, &db).await;
        let anderer = service
            .registrieren("opfer", "opfer@x.com", "Passw0rd", None)
            .await
            .unwrap();

        let err = service
            .benutzer_loeschen(&admin, admin.user_id)
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::SelbstLoeschung));
        assert!(db.get_by_id(admin.user_id).await.unwrap().is_some());

        service.benutzer_loeschen(&admin, anderer).await.unwrap();
        assert!(db.get_by_id(anderer).await.unwrap().is_none());

        // Der Eintrag zeigt auf das geloeschte Ziel, nicht auf den Admin
        let neuester = db
            .list_events(AuditLogFilter::default())
            .await
            .unwrap()
            .remove(0);
        assert_eq!(neuester.action, format!("Deleted user_id {anderer}"));
        assert_eq!(neuester.user_id, Some(anderer));
        assert_ne!(neuester.user_id, Some(admin.user_id));
        assert!(neuester.username.is_none());

        // Zweites Loeschen: Ziel existiert nicht mehr
        let err = service.benutzer_loeschen(&admin, anderer).await.unwrap_err();
        assert!(matches!(err, AuthError::NichtGefunden(_)));
    }

    #[tokio::test]
    async fn nur_admins_verwalten_benutzer() {
        let (service, db) = test_service().await;
        let ziel = service
            .registrieren("hans", "hans@x.com", "Passw0rd", None)
            .await
            .unwrap();
        service
            .registrieren("ida", "ida@x.com", "Passw0rd", None)
            .await
            .unwrap();
        let ida = service
            .anmelden("ida", "Passw0rd", ClientInfo::default())
            .await
            .unwrap()
            .principal();

        let admin_rolle = db.get_role_by_name("Admin").await.unwrap().unwrap();
        assert!(matches!(
            service.rolle_aendern(&ida, ziel, admin_rolle.id).await,
            Err(AuthError::ZugriffVerweigert(Rolle::Admin))
        ));
        assert!(matches!(
            service.benutzer_loeschen(&ida, ziel).await,
            Err(AuthError::ZugriffVerweigert(Rolle::Admin))
        ));
        assert!(db.get_by_id(ziel).await.unwrap().is_some());
    }

    #[tokio::test]
    async fn unbekannte_rolle_aendert_nichts() {
        let (service, db) = test_service().await;
        let admin = admin_anmelden(&service, &db).await;
        let ziel = service
            .registrieren("jan", "jan@x.com", "Passw0rd", None)
            .await
            .unwrap();
        let vorher = audit_texte(&db).await.len();

        let err = service
            .rolle_aendern(&admin, ziel, RoleId(999))
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::NichtGefunden(_)));
        assert_eq!(audit_texte(&db).await.len(), vorher);
        let jan = db.get_by_id(ziel).await.unwrap().unwrap();
        assert_eq!(jan.role_name.as_deref(), Some("User"));
    }

    #[tokio::test]
    async fn eigenen_account_loeschen() {
        let (service, db) = test_service().await;
        let id = service
            .registrieren("kai", "kai@x.com", "Passw0rd", None)
            .await
            .unwrap();
        let principal = service
            .anmelden("kai", "Passw0rd", ClientInfo::default())
            .await
            .unwrap()
            .principal();

        service.eigenen_account_loeschen(&principal).await.unwrap();

        assert!(db.get_by_id(id).await.unwrap().is_none());

        // Audit-Eintrag zeigt auf die geloeschte ID
        let eintraege = db
            .list_events(AuditLogFilter {
                user_id: Some(id),
                limit: None,
            })
            .await
            .unwrap();
        assert_eq!(eintraege[0].action, "Account deleted");
        assert!(eintraege[0].username.is_none());

        let session = db
            .get_session(principal.session_id.unwrap())
            .await
            .unwrap()
            .unwrap();
        assert!(session.logout_time.is_some());

        // Login danach scheitert generisch
        let err = service
            .anmelden("kai", "Passw0rd", ClientInfo::default())
            .await
            .unwrap_err();
        assert!(matches!(err, AuthError::UngueltigeAnmeldedaten));
    }

    #[tokio::test]
    async fn szenario_rollenwechsel_wirkt_ab_naechstem_login() {
        let (service, db) = test_service().await;
        let admin = admin_anmelden(&service, &db).await;

        let alice_id = service
            .registrieren("alice", "alice@x.com", "Passw0rd", None)
            .await
            .unwrap();

        let erste = service
            .anmelden("alice", "Passw0rd", ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(erste.rolle, Rolle::User);
        assert_eq!(db.list_for_user(alice_id, 10).await.unwrap().len(), 1);
        let alter_principal = erste.principal();

        let admin_rolle = db.get_role_by_name("Admin").await.unwrap().unwrap();
        service
            .rolle_aendern(&admin, alice_id, admin_rolle.id)
            .await
            .unwrap();

        let texte = audit_texte(&db).await;
        assert!(texte[0].contains(&format!("Changed role for user_id {alice_id} to Admin")));

        // Bestehender Principal bleibt bis zum naechsten Login veraltet
        assert_eq!(alter_principal.rolle, Rolle::User);
        assert!(!gate::rolle_erfordern(Some(&alter_principal), Rolle::Admin).ist_erlaubt());

        let zweite = service
            .anmelden("alice", "Passw0rd", ClientInfo::default())
            .await
            .unwrap();
        assert_eq!(zweite.rolle, Rolle::Admin);
        assert!(gate::rolle_erfordern(Some(&zweite.principal()), Rolle::Admin).ist_erlaubt());
    }
}
