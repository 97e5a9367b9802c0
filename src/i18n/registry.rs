//! Known-language registry.
//!
//! The table mirrors the language list exposed by the translation provider.
//! Lookups are case-insensitive; codes are stored lowercase.

use std::collections::BTreeMap;

use once_cell::sync::Lazy;
use serde::Serialize;

use crate::error::{FaqError, Result};

/// Provider language table: `(code, display name)`.
const PROVIDER_LANGUAGES: &[(&str, &str)] = &[
    ("af", "afrikaans"),
    ("sq", "albanian"),
    ("am", "amharic"),
    ("ar", "arabic"),
    ("hy", "armenian"),
    ("az", "azerbaijani"),
    ("eu", "basque"),
    ("be", "belarusian"),
    ("bn", "bengali"),
    ("bs", "bosnian"),
    ("bg", "bulgarian"),
    ("ca", "catalan"),
    ("ceb", "cebuano"),
    ("ny", "chichewa"),
    ("zh-cn", "chinese (simplified)"),
    ("zh-tw", "chinese (traditional)"),
    ("co", "corsican"),
    ("hr", "croatian"),
    ("cs", "czech"),
    ("da", "danish"),
    ("nl", "dutch"),
    ("en", "english"),
    ("eo", "esperanto"),
    ("et", "estonian"),
    ("tl", "filipino"),
    ("fi", "finnish"),
    ("fr", "french"),
    ("fy", "frisian"),
    ("gl", "galician"),
    ("ka", "georgian"),
    ("de", "german"),
    ("el", "greek"),
    ("gu", "gujarati"),
    ("ht", "haitian creole"),
    ("ha", "hausa"),
    ("haw", "hawaiian"),
    ("iw", "hebrew"),
    ("he", "hebrew"),
    ("hi", "hindi"),
    ("hmn", "hmong"),
    ("hu", "hungarian"),
    ("is", "icelandic"),
    ("ig", "igbo"),
    ("id", "indonesian"),
    ("ga", "irish"),
    ("it", "italian"),
    ("ja", "japanese"),
    ("jw", "javanese"),
    ("kn", "kannada"),
    ("kk", "kazakh"),
    ("km", "khmer"),
    ("ko", "korean"),
    ("ku", "kurdish (kurmanji)"),
    ("ky", "kyrgyz"),
    ("lo", "lao"),
    ("la", "latin"),
    ("lv", "latvian"),
    ("lt", "lithuanian"),
    ("lb", "luxembourgish"),
    ("mk", "macedonian"),
    ("mg", "malagasy"),
    ("ms", "malay"),
    ("ml", "malayalam"),
    ("mt", "maltese"),
    ("mi", "maori"),
    ("mr", "marathi"),
    ("mn", "mongolian"),
    ("my", "myanmar (burmese)"),
    ("ne", "nepali"),
    ("no", "norwegian"),
    ("or", "odia"),
    ("ps", "pashto"),
    ("fa", "persian"),
    ("pl", "polish"),
    ("pt", "portuguese"),
    ("pa", "punjabi"),
    ("ro", "romanian"),
    ("ru", "russian"),
    ("sm", "samoan"),
    ("gd", "scots gaelic"),
    ("sr", "serbian"),
    ("st", "sesotho"),
    ("sn", "shona"),
    ("sd", "sindhi"),
    ("si", "sinhala"),
    ("sk", "slovak"),
    ("sl", "slovenian"),
    ("so", "somali"),
    ("es", "spanish"),
    ("su", "sundanese"),
    ("sw", "swahili"),
    ("sv", "swedish"),
    ("tg", "tajik"),
    ("ta", "tamil"),
    ("te", "telugu"),
    ("th", "thai"),
    ("tr", "turkish"),
    ("uk", "ukrainian"),
    ("ur", "urdu"),
    ("ug", "uyghur"),
    ("uz", "uzbek"),
    ("vi", "vietnamese"),
    ("cy", "welsh"),
    ("xh", "xhosa"),
    ("yi", "yiddish"),
    ("yo", "yoruba"),
    ("zu", "zulu"),
];

static BUILTIN: Lazy<LanguageRegistry> = Lazy::new(|| {
    LanguageRegistry::new(
        PROVIDER_LANGUAGES
            .iter()
            .map(|(code, name)| (code.to_string(), name.to_string())),
    )
});

/// A single registry entry, as exposed by `GET /api/languages`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LanguageInfo {
    pub code: String,
    pub name: String,
}

/// Fixed mapping of language code to display name.
#[derive(Debug, Clone)]
pub struct LanguageRegistry {
    languages: BTreeMap<String, String>,
}

impl LanguageRegistry {
    /// Build a registry from `(code, name)` pairs. Codes are lowercased.
    pub fn new(entries: impl IntoIterator<Item = (String, String)>) -> Self {
        let languages = entries
            .into_iter()
            .map(|(code, name)| (code.trim().to_ascii_lowercase(), name))
            .filter(|(code, _)| !code.is_empty())
            .collect();
        Self { languages }
    }

    /// The provider's built-in language table.
    pub fn builtin() -> &'static LanguageRegistry {
        &BUILTIN
    }

    /// Canonical form of `code` if it is known, `None` otherwise.
    pub fn canonical(&self, code: &str) -> Option<&str> {
        let code = code.trim().to_ascii_lowercase();
        self.languages
            .get_key_value(code.as_str())
            .map(|(k, _)| k.as_str())
    }

    /// Like [`canonical`](Self::canonical) but reports unknown codes as errors.
    pub fn require(&self, code: &str) -> Result<&str> {
        self.canonical(code)
            .ok_or_else(|| FaqError::UnsupportedLanguage(code.to_string()))
    }

    pub fn display_name(&self, code: &str) -> Option<&str> {
        let canonical = self.canonical(code)?;
        self.languages.get(canonical).map(String::as_str)
    }

    /// All known codes in sorted order.
    pub fn codes(&self) -> impl Iterator<Item = &str> {
        self.languages.keys().map(String::as_str)
    }

    pub fn list(&self) -> Vec<LanguageInfo> {
        self.languages
            .iter()
            .map(|(code, name)| LanguageInfo {
                code: code.clone(),
                name: name.clone(),
            })
            .collect()
    }

    pub fn len(&self) -> usize {
        self.languages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.languages.is_empty()
    }
}
