//! Session record types.
//!
//! A session is a caller-scoped conversational context: which language to
//! reply in, the last reply produced (for translate-the-previous-answer
//! requests), and whether the one-time name correction already fired.

use serde::{Deserialize, Serialize};

/// The two supported reply languages.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    De,
    En,
}

impl Language {
    pub fn as_str(&self) -> &'static str {
        match self {
            Language::De => "de",
            Language::En => "en",
        }
    }
}

impl std::fmt::Display for Language {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Per-session conversational state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionRecord {
    /// The active reply language
    pub language: Language,

    /// The last reply produced for this session
    pub last_reply: String,

    /// Whether the one-time self-identification correction already fired
    pub name_corrected: bool,
}

impl SessionRecord {
    /// A fresh record; `language` comes from the classifier's detection for
    /// the first turn, never a fixed constant.
    pub fn new(language: Language) -> Self {
        Self {
            language,
            last_reply: String::new(),
            name_corrected: false,
        }
    }
}
