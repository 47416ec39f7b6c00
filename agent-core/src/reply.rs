//! Structured reply returned to the caller at the end of each turn.
//!
//! The language label coming back from the model is untrusted: [`Language::resolve`] maps codes
//! and names to the closest supported language and falls back to script detection on the
//! content, so a reply always carries one of `en`, `ru`, `ky`.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Reply languages supported by the messaging channel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// English.
    En,
    /// Russian.
    Ru,
    /// Kyrgyz.
    Ky,
}

impl Language {
    pub const ALL: [Language; 3] = [Language::En, Language::Ru, Language::Ky];

    pub fn code(self) -> &'static str {
        match self {
            Language::En => "en",
            Language::Ru => "ru",
            Language::Ky => "ky",
        }
    }

    /// Maps an ISO code or language name to the closest supported language.
    ///
    /// Region suffixes are ignored (`en-US` → `en`). Turkic languages map to Kyrgyz, other
    /// Cyrillic-script languages to Russian. Returns `None` when nothing is close enough.
    pub fn from_label(label: &str) -> Option<Self> {
        let label = label.trim().to_ascii_lowercase();
        let primary = label.split(['-', '_']).next().unwrap_or_default();
        match primary {
            "en" | "eng" | "english" => Some(Language::En),
            "ru" | "rus" | "russian" => Some(Language::Ru),
            "ky" | "kir" | "kgz" | "kyrgyz" | "kirghiz" => Some(Language::Ky),
            "kk" | "kaz" | "kazakh" | "uz" | "uzb" | "uzbek" | "tr" | "tur" | "turkish" | "tk"
            | "turkmen" | "tt" | "tatar" | "ba" | "bashkir" => Some(Language::Ky),
            "uk" | "ukr" | "ukrainian" | "be" | "bel" | "belarusian" | "bg" | "bulgarian"
            | "sr" | "serbian" | "mk" | "macedonian" | "tg" | "tajik" | "mn" | "mongolian" => {
                Some(Language::Ru)
            }
            _ => None,
        }
    }

    /// Guesses the language from the script of `text`.
    ///
    /// Any Kyrgyz-specific letter (`ң`, `ө`, `ү`) means Kyrgyz; otherwise a Cyrillic majority
    /// means Russian; everything else, including empty text, is English.
    pub fn detect(text: &str) -> Self {
        let mut letters = 0usize;
        let mut cyrillic = 0usize;
        for c in text.chars().filter(|c| c.is_alphabetic()) {
            if matches!(c, 'ң' | 'Ң' | 'ө' | 'Ө' | 'ү' | 'Ү') {
                return Language::Ky;
            }
            letters += 1;
            if ('\u{0400}'..='\u{04FF}').contains(&c) {
                cyrillic += 1;
            }
        }
        if letters > 0 && cyrillic * 2 > letters {
            Language::Ru
        } else {
            Language::En
        }
    }

    /// Resolves a model-provided label, detecting from `content` when the label is missing or
    /// not recognised.
    pub fn resolve(label: Option<&str>, content: &str) -> Self {
        label
            .and_then(Self::from_label)
            .unwrap_or_else(|| Self::detect(content))
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::from_label(s).ok_or_else(|| format!("unsupported language: {:?}", s))
    }
}

/// Final typed envelope of a turn: reply text plus its language.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StructuredReply {
    pub content: String,
    pub language: Language,
}

impl StructuredReply {
    pub fn new(content: impl Into<String>, language: Language) -> Self {
        Self {
            content: content.into(),
            language,
        }
    }
}

impl fmt::Display for StructuredReply {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}] {}", self.language, self.content)
    }
}
