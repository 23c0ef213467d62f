//! Language and intent classification.
//!
//! All checks run on a normalized form of the message: trimmed,
//! lowercased, inner whitespace collapsed to single spaces. Intent
//! detection is ordered; the orchestrator applies explicit language
//! requests first, then language-only switches, then translation
//! requests, then bare greetings.

use greenmow_core::Language;

const GREETINGS: &[&str] = &[
    "hi",
    "hii",
    "hello",
    "hey",
    "hallo",
    "guten tag",
    "guten morgen",
    "guten abend",
    "servus",
    "moin",
    "yo",
];

const OTHER_ASSISTANT_NAMES: &[&str] = &[
    "chatgpt", "copilot", "gpt", "gpt-4", "gpt4", "gpt-4o", "openai",
];

const EN_REQUEST_TRIGGERS: &[&str] = &[
    "english",
    "englisch",
    "in english",
    "speak english",
    "english please",
    "auf englisch",
    "in englisch",
    "können wir auf englisch",
    "kannst du auf englisch",
    "please answer in english",
    "answer in english",
];

const DE_REQUEST_TRIGGERS: &[&str] = &[
    "deutsch",
    "german",
    "in german",
    "speak german",
    "german please",
    "auf deutsch",
    "in deutsch",
    "können wir auf deutsch",
    "kannst du auf deutsch",
    "please answer in german",
    "answer in german",
];

const TRANSLATE_TO_EN_TRIGGERS: &[&str] = &[
    "auf englisch zurück",
    "auf englisch bitte",
    "kannst du das auf englisch",
    "kannst du mir das auf englisch",
    "in english",
    "please answer in english",
    "translate to english",
    "return it in english",
];

const TRANSLATE_TO_DE_TRIGGERS: &[&str] = &[
    "auf deutsch zurück",
    "auf deutsch bitte",
    "kannst du das auf deutsch",
    "kannst du mir das auf deutsch",
    "in german",
    "please answer in german",
    "translate to german",
    "return it in german",
];

const DE_MARKERS: &[&str] = &[
    " wie ", " was ", " warum ", " bitte ", " kannst ", " können ", " ich ", " und ", " nicht ",
    " für ",
];

const EN_MARKERS: &[&str] = &[
    " what ", " why ", " how ", " please ", " can ", " i ", " and ", " not ", " for ", " much ",
    " many ",
];

/// Trim, lowercase, collapse inner whitespace.
pub fn normalize(s: &str) -> String {
    s.trim()
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// The whole message is nothing but a greeting.
pub fn is_greeting_only(text: &str) -> bool {
    GREETINGS.contains(&normalize(text).as_str())
}

/// The whole message is a bare language name ("english", "deutsch", ...).
pub fn is_language_only(text: &str) -> Option<Language> {
    match normalize(text).as_str() {
        "english" | "englisch" | "en" => Some(Language::En),
        "deutsch" | "german" | "de" => Some(Language::De),
        _ => None,
    }
}

/// The message contains an explicit request to switch reply language.
pub fn explicit_lang_request(text: &str) -> Option<Language> {
    let t = normalize(text);
    if EN_REQUEST_TRIGGERS.iter().any(|x| t.contains(x)) {
        return Some(Language::En);
    }
    if DE_REQUEST_TRIGGERS.iter().any(|x| t.contains(x)) {
        return Some(Language::De);
    }
    None
}

/// Heuristic language detection for the first message of a session.
///
/// German diacritics force German; otherwise marker words are counted on
/// both sides and ties (or no hits at all) default to English.
pub fn detect_lang(text: &str) -> Language {
    let t = normalize(text);

    if let Some(lang) = explicit_lang_request(&t) {
        return lang;
    }
    if let Some(lang) = is_language_only(&t) {
        return lang;
    }

    if t.chars().any(|ch| matches!(ch, 'ä' | 'ö' | 'ü' | 'ß')) {
        return Language::De;
    }

    let padded = format!(" {t} ");
    let score_de = DE_MARKERS.iter().filter(|m| padded.contains(*m)).count();
    let score_en = EN_MARKERS.iter().filter(|m| padded.contains(*m)).count();

    if score_de == 0 && score_en == 0 {
        return Language::En;
    }
    if score_en > score_de {
        Language::En
    } else {
        Language::De
    }
}

/// The message asks for the previous reply translated. English wins when
/// both directions somehow match.
pub fn wants_translation_to(text: &str) -> Option<Language> {
    let t = normalize(text);
    if TRANSLATE_TO_EN_TRIGGERS.iter().any(|x| t.contains(x)) {
        return Some(Language::En);
    }
    if TRANSLATE_TO_DE_TRIGGERS.iter().any(|x| t.contains(x)) {
        return Some(Language::De);
    }
    None
}

/// The message names another well-known assistant.
pub fn mentions_other_assistant(text: &str) -> bool {
    let t = normalize(text);
    OTHER_ASSISTANT_NAMES.iter().any(|n| t.contains(n))
}

// --- Canned replies ---

pub fn greeting_reply(lang: Language) -> &'static str {
    match lang {
        Language::En => "Hello! How can I help you?",
        Language::De => "Hallo! Wie kann ich dir helfen?",
    }
}

pub fn language_switch_reply(lang: Language) -> &'static str {
    match lang {
        Language::En => "Sure — I’ll reply in English from now on. How can I help?",
        Language::De => "Klar — ich antworte ab jetzt auf Deutsch. Wie kann ich dir helfen?",
    }
}

pub fn translation_no_source_reply(lang: Language) -> &'static str {
    match lang {
        Language::En => "Sure — please paste the text you want me to translate to English.",
        Language::De => "Klar — bitte füge den Text ein, den ich ins Deutsche übersetzen soll.",
    }
}

pub fn loop_did_not_finish_reply(lang: Language) -> &'static str {
    match lang {
        Language::En => "Tool-calling loop did not finish. Please try again with a simpler request.",
        Language::De => "Tool-Loop hat nicht abgeschlossen. Bitte stelle die Anfrage einfacher.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_collapses_whitespace() {
        assert_eq!(normalize("  Hallo   Welt \n"), "hallo welt");
    }

    #[test]
    fn greeting_detection_is_exact_match() {
        assert!(is_greeting_only("Hallo"));
        assert!(is_greeting_only("  guten   morgen "));
        assert!(!is_greeting_only("hallo zusammen"));
        assert!(!is_greeting_only("hello there"));
    }

    #[test]
    fn language_only_words() {
        assert_eq!(is_language_only("English"), Some(Language::En));
        assert_eq!(is_language_only("deutsch"), Some(Language::De));
        assert_eq!(is_language_only("DE"), Some(Language::De));
        assert_eq!(is_language_only("french"), None);
    }

    #[test]
    fn explicit_requests_match_substrings() {
        assert_eq!(
            explicit_lang_request("können wir auf englisch weitermachen?"),
            Some(Language::En)
        );
        assert_eq!(
            explicit_lang_request("please answer in german"),
            Some(Language::De)
        );
        assert_eq!(explicit_lang_request("wie ist das wetter"), None);
    }

    #[test]
    fn diacritics_force_german() {
        assert_eq!(detect_lang("schöne Grüße"), Language::De);
        assert_eq!(detect_lang("Straße"), Language::De);
    }

    #[test]
    fn marker_words_decide_language() {
        assert_eq!(detect_lang("was kostet das und wie lange"), Language::De);
        assert_eq!(detect_lang("how much does it cost and why"), Language::En);
    }

    #[test]
    fn no_markers_defaults_to_english() {
        assert_eq!(detect_lang("mower status GM-A-001"), Language::En);
        assert_eq!(detect_lang(""), Language::En);
    }

    #[test]
    fn marker_tie_defaults_to_english_side_losing() {
        // one marker each: "can" (en) vs "bitte" (de) — tie goes to German
        // because English must strictly win
        assert_eq!(detect_lang("can you bitte help"), Language::De);
    }

    #[test]
    fn translation_triggers() {
        assert_eq!(
            wants_translation_to("kannst du das auf englisch?"),
            Some(Language::En)
        );
        assert_eq!(
            wants_translation_to("auf deutsch zurück bitte"),
            Some(Language::De)
        );
        assert_eq!(wants_translation_to("translate to english"), Some(Language::En));
        assert_eq!(wants_translation_to("what about mowers"), None);
    }

    #[test]
    fn other_assistant_names_detected() {
        assert!(mentions_other_assistant("are you ChatGPT?"));
        assert!(mentions_other_assistant("bist du copilot"));
        assert!(!mentions_other_assistant("are you a mower bot"));
    }

    #[test]
    fn canned_replies_match_language() {
        assert_eq!(greeting_reply(Language::De), "Hallo! Wie kann ich dir helfen?");
        assert_eq!(greeting_reply(Language::En), "Hello! How can I help you?");
        assert!(language_switch_reply(Language::En).contains("English"));
        assert!(translation_no_source_reply(Language::De).contains("Deutsche"));
    }
}
