//! Internationalization (i18n) for the storefront UI.
//!
//! All language-related logic lives here:
//!
//! - `language`: the supported-language registry
//! - `translations`: per-language key→string tables with fallback lookup
//!
//! Tables are loaded once at startup; the active language is chosen per
//! request from the session (set by `GET /lang/{code}`) and defaults to
//! the configured fallback language.

mod language;
mod translations;

pub use language::Language;
pub use translations::{I18nError, Translator};

use std::convert::Infallible;
use std::sync::Arc;

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use tower_sessions::Session;

use crate::models::session_keys;
use crate::state::AppState;

/// A request's view of the translation tables: the shared [`Translator`]
/// bound to the active [`Language`].
///
/// Passed into templates, which call [`Locale::t`] for every UI string.
#[derive(Clone)]
pub struct Locale {
    translator: Arc<Translator>,
    language: Language,
}

impl Locale {
    /// Create a locale for the given language.
    #[must_use]
    pub const fn new(translator: Arc<Translator>, language: Language) -> Self {
        Self {
            translator,
            language,
        }
    }

    /// Resolve a dotted translation key.
    ///
    /// Falls back to the default language, then to the key itself, so a
    /// missing translation shows up in the page rather than failing the
    /// request.
    #[must_use]
    pub fn t(&self, key: &str) -> String {
        self.translator.translate(self.language, key)
    }

    /// The active language.
    #[must_use]
    pub const fn language(&self) -> Language {
        self.language
    }

    /// All supported languages, for the language switcher.
    #[must_use]
    pub const fn languages(&self) -> &'static [Language] {
        &Language::ALL
    }
}

impl FromRequestParts<AppState> for Locale {
    type Rejection = Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let language = match parts.extensions.get::<Session>() {
            Some(session) => session
                .get::<String>(session_keys::LANGUAGE)
                .await
                .ok()
                .flatten()
                .and_then(|code| Language::from_code(&code))
                .unwrap_or_else(|| state.translator().fallback()),
            None => state.translator().fallback(),
        };

        Ok(Self::new(state.translator_arc(), language))
    }
}
