//! Autorisierungs-Gate
//!
//! Reine Praedikate ohne Seiteneffekte, die die Web-Schicht vor dem
//! Dispatch aufruft. Die Anmeldung wird immer vor der Rolle geprueft: ein
//! anonymer Aufrufer landet beim Login, nicht bei "Zugriff verweigert".

use secureauth_core::{AuthenticatedPrincipal, Rolle};

/// Ergebnis einer Zugangspruefung
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zugang {
    Erlaubt,
    /// Kein Principal vorhanden – zur Anmeldung umleiten
    AnmeldungErforderlich,
    /// Angemeldet, aber mit unzureichender Rolle
    Verweigert { benoetigt: Rolle },
}

impl Zugang {
    pub fn ist_erlaubt(&self) -> bool {
        matches!(self, Self::Erlaubt)
    }

    /// Meldung fuer den Endbenutzer; `None` wenn der Zugang erlaubt ist
    pub fn nutzer_nachricht(&self) -> Option<String> {
        match self {
            Self::Erlaubt => None,
            Self::AnmeldungErforderlich => Some("Please log in to access this page.".into()),
            Self::Verweigert { benoetigt } => Some(format!(
                "Access denied. {benoetigt} privileges required."
            )),
        }
    }
}

/// Vergleicht die beim Login festgehaltene Rolle mit der geforderten
pub fn zulassen(principal: &AuthenticatedPrincipal, benoetigt: Rolle) -> bool {
    principal.rolle == benoetigt
}

/// Erfordert nur einen angemeldeten Aufrufer
pub fn anmeldung_erfordern(principal: Option<&AuthenticatedPrincipal>) -> Zugang {
    match principal {
        Some(_) => Zugang::Erlaubt,
        None => Zugang::AnmeldungErforderlich,
    }
}

/// Erfordert einen angemeldeten Aufrufer mit der angegebenen Rolle
pub fn rolle_erfordern(principal: Option<&AuthenticatedPrincipal>, benoetigt: Rolle) -> Zugang {
    let Some(principal) = principal else {
        return Zugang::AnmeldungErforderlich;
    };
    if zulassen(principal, benoetigt) {
        Zugang::Erlaubt
    } else {
        tracing::debug!(
            user_id = %principal.user_id,
            rolle = %principal.rolle,
            benoetigt = %benoetigt,
            "Zugriff verweigert"
        );
        Zugang::Verweigert { benoetigt }
    }
}
