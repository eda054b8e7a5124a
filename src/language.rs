use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::catalog;
use crate::persistence::{PersistenceAdapter, LANGUAGE_KEY};

#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize, strum_macros::Display,
)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
pub enum Language {
    #[default]
    En,
    Bn,
    Ar,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Bn, Language::Ar];

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim() {
            "en" => Some(Language::En),
            "bn" => Some(Language::Bn),
            "ar" => Some(Language::Ar),
            _ => None,
        }
    }

    pub fn code(&self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Bn => "bn",
            Language::Ar => "ar",
        }
    }

    pub fn native_name(&self) -> &'static str {
        match self {
            Language::En => "English",
            Language::Bn => "বাংলা",
            Language::Ar => "العربية",
        }
    }

    pub fn is_rtl(&self) -> bool {
        matches!(self, Language::Ar)
    }

    /// Next language in the fixed cycle used by the settings screen
    pub fn next(&self) -> Self {
        match self {
            Language::En => Language::Bn,
            Language::Bn => Language::Ar,
            Language::Ar => Language::En,
        }
    }
}

/// A value available in every supported language
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Localized<T> {
    pub en: T,
    pub bn: T,
    pub ar: T,
}

impl<T> Localized<T> {
    pub fn get(&self, lang: Language) -> &T {
        match lang {
            Language::En => &self.en,
            Language::Bn => &self.bn,
            Language::Ar => &self.ar,
        }
    }
}

/// The persisted interface language.
pub struct LanguagePreference<S: PersistenceAdapter> {
    backend: S,
    current: Language,
}

impl<S: PersistenceAdapter> LanguagePreference<S> {
    /// Reads the stored code; unknown or unreadable values yield the default.
    pub fn load(backend: S) -> Self {
        let current = match backend.load(LANGUAGE_KEY) {
            Ok(Some(code)) => Language::from_code(&code).unwrap_or_else(|| {
                warn!(code = %code, "ignoring unknown stored language");
                Language::default()
            }),
            Ok(None) => Language::default(),
            Err(err) => {
                warn!(error = %err, "failed to read language preference");
                Language::default()
            }
        };
        Self { backend, current }
    }

    pub fn language(&self) -> Language {
        self.current
    }

    pub fn set_language(&mut self, lang: Language) {
        self.current = lang;
        debug!(language = %lang, "language changed");
        if let Err(err) = self.backend.save(LANGUAGE_KEY, lang.code()) {
            warn!(error = %err, "failed to persist language preference");
        }
    }

    pub fn t<'a>(&self, key: &'a str) -> &'a str {
        translate(self.current, key)
    }
}

/// Looks up `key` in the embedded translation table, falling back to the key
pub fn translate(lang: Language, key: &str) -> &str {
    match catalog::catalog().translation(key) {
        Some(entry) => entry.get(lang).as_str(),
        None => key,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::persistence::MemoryStore;
    use std::rc::Rc;

    #[test]
    fn defaults_to_english_without_stored_value() {
        let pref = LanguagePreference::load(MemoryStore::new());
        assert_eq!(pref.language(), Language::En);
    }

    #[test]
    fn set_language_persists_code() {
        let store = Rc::new(MemoryStore::new());
        let mut pref = LanguagePreference::load(Rc::clone(&store));
        pref.set_language(Language::Bn);

        assert_eq!(store.load(LANGUAGE_KEY).unwrap().as_deref(), Some("bn"));
        let reloaded = LanguagePreference::load(store);
        assert_eq!(reloaded.language(), Language::Bn);
    }

    #[test]
    fn unknown_stored_code_falls_back() {
        let store = MemoryStore::new();
        store.save(LANGUAGE_KEY, "fr").unwrap();
        let pref = LanguagePreference::load(store);
        assert_eq!(pref.language(), Language::En);
    }

    #[test]
    fn translate_known_and_missing_keys() {
        assert_eq!(translate(Language::En, "module_tawaf"), "Tawaf");
        assert_eq!(translate(Language::Ar, "module_tawaf"), "الطواف");
        assert_eq!(translate(Language::Bn, "no_such_key"), "no_such_key");
    }

    #[test]
    fn display_matches_code() {
        for lang in Language::ALL {
            assert_eq!(lang.to_string(), lang.code());
            assert_eq!(Language::from_code(lang.code()), Some(lang));
        }
    }

    #[test]
    fn next_cycles_through_all() {
        assert_eq!(Language::En.next().next().next(), Language::En);
    }
}
