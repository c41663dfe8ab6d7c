//! User-facing strings.
//!
//! The site is French; every status line and placeholder shown to visitors
//! lives here.

/// Program grid while loading.
pub const PROGRAMS_LOADING: &str = "Chargement des programmes...";

/// Program grid with no programs.
pub const PROGRAMS_EMPTY: &str = "Aucun programme disponible.";

/// Prefix of the program grid error.
pub const PROGRAMS_ERROR: &str = "Erreur de chargement des programmes :";

/// Program page while loading.
pub const PROGRAM_LOADING: &str = "Chargement du programme...";

/// Program page without articles.
pub const NO_ARTICLES: &str = "Aucun article publié pour ce programme.";

/// Detail page opened without `?slug=`.
pub const MISSING_SLUG: &str = "Paramètre manquant : ?slug=...";

/// Any request that hit its deadline.
pub const TOO_SLOW: &str = "Le serveur met trop de temps à répondre.";

/// Fallback when an error carries no message.
pub const UNKNOWN_ERROR: &str = "Erreur inconnue.";

/// Form status while a request is in flight.
pub const SENDING: &str = "Envoi en cours…";

/// Form status for a target that was never configured.
pub const FORM_NOT_CONFIGURED: &str =
    "❌ Formulaire non configuré : l’adresse d’envoi est manquante.";

/// Form status for transport errors and unexplained failures.
pub const RETRY_LATER: &str = "❌ Impossible d’envoyer pour le moment. Réessayez plus tard.";

/// Volunteer form confirmation.
pub const VOLUNTEER_SENT: &str = "✅ Merci ! Votre demande bénévole a été envoyée.";

/// Partner form confirmation.
pub const PARTNER_SENT: &str = "✅ Merci ! Votre demande partenaire a été envoyée.";

/// Link label on program cards.
pub const PROGRAM_LINK: &str = "→ Page détaillée du programme";

/// Link label on article cards.
pub const ARTICLE_LINK: &str = "Lire";
