//! FAQ entry model.

use serde::{Deserialize, Serialize};

use crate::error::{FaqError, Result};

/// Languages with a precomputed question translation stored on the entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PrecomputedLang {
    Hi,
    Bn,
}

impl PrecomputedLang {
    pub const ALL: [PrecomputedLang; 2] = [PrecomputedLang::Hi, PrecomputedLang::Bn];

    pub fn code(self) -> &'static str {
        match self {
            Self::Hi => "hi",
            Self::Bn => "bn",
        }
    }

    /// Map a canonical (lowercase) language code to its precomputed slot.
    pub fn from_code(code: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|lang| lang.code() == code)
    }
}

/// Precomputed question translations, one optional slot per [`PrecomputedLang`].
///
/// Empty strings are stored as `None`; a slot is either usable text or absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionTranslations {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub hi: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bn: Option<String>,
}

impl QuestionTranslations {
    pub fn get(&self, lang: PrecomputedLang) -> Option<&str> {
        let slot = match lang {
            PrecomputedLang::Hi => &self.hi,
            PrecomputedLang::Bn => &self.bn,
        };
        slot.as_deref().filter(|s| !s.trim().is_empty())
    }

    pub fn set(&mut self, lang: PrecomputedLang, text: Option<String>) {
        let text = text.filter(|s| !s.trim().is_empty());
        match lang {
            PrecomputedLang::Hi => self.hi = text,
            PrecomputedLang::Bn => self.bn = text,
        }
    }

    /// Languages whose slot is currently absent.
    pub fn missing(&self) -> Vec<PrecomputedLang> {
        PrecomputedLang::ALL
            .into_iter()
            .filter(|lang| self.get(*lang).is_none())
            .collect()
    }

    pub fn clear(&mut self) {
        self.hi = None;
        self.bn = None;
    }
}

/// A canonical FAQ entry in the source language.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Faq {
    pub id: u64,
    /// Source-language question.
    pub question: String,
    /// Source-language answer (may contain HTML).
    pub answer: String,
    #[serde(default)]
    pub translations: QuestionTranslations,
    /// RFC 3339 creation timestamp.
    pub created_at: String,
    /// RFC 3339 last-updated timestamp.
    pub updated_at: String,
}

impl Faq {
    /// Precomputed question for a canonical language code, if stored.
    pub fn precomputed_question(&self, code: &str) -> Option<&str> {
        PrecomputedLang::from_code(code).and_then(|lang| self.translations.get(lang))
    }
}

/// Fields for a new entry. Both source fields are required.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct NewFaq {
    pub question: String,
    pub answer: String,
    #[serde(default)]
    pub translations: QuestionTranslations,
}

impl NewFaq {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            translations: QuestionTranslations::default(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        require_non_empty("question", &self.question)?;
        require_non_empty("answer", &self.answer)
    }
}

/// Merge patch for an existing entry: only supplied fields change.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FaqPatch {
    #[serde(default)]
    pub question: Option<String>,
    #[serde(default)]
    pub answer: Option<String>,
    #[serde(default)]
    pub translations: Option<QuestionTranslations>,
}

impl FaqPatch {
    /// Supplied source fields must still be non-empty.
    pub fn validate(&self) -> Result<()> {
        if let Some(ref q) = self.question {
            require_non_empty("question", q)?;
        }
        if let Some(ref a) = self.answer {
            require_non_empty("answer", a)?;
        }
        Ok(())
    }

    pub fn is_empty(&self) -> bool {
        self.question.is_none() && self.answer.is_none() && self.translations.is_none()
    }

    /// Apply to `faq` in place. Returns `true` if the source question changed.
    ///
    /// A changed question without replacement translations clears the stored
    /// precomputed translations, which were generated from the old text.
    pub fn apply(self, faq: &mut Faq) -> bool {
        let mut question_changed = false;
        if let Some(q) = self.question {
            question_changed = q != faq.question;
            faq.question = q;
        }
        if let Some(a) = self.answer {
            faq.answer = a;
        }
        match self.translations {
            Some(t) => {
                for lang in PrecomputedLang::ALL {
                    faq.translations.set(lang, t.get(lang).map(str::to_string));
                }
            }
            None if question_changed => faq.translations.clear(),
            None => {}
        }
        question_changed
    }
}

impl From<NewFaq> for FaqPatch {
    /// A full update is a patch that supplies every source field.
    fn from(new: NewFaq) -> Self {
        Self {
            question: Some(new.question),
            answer: Some(new.answer),
            translations: Some(new.translations),
        }
    }
}

fn require_non_empty(field: &str, value: &str) -> Result<()> {
    if value.trim().is_empty() {
        return Err(FaqError::Validation(format!("{field} must not be empty")));
    }
    Ok(())
}
