use serde::{Deserialize, Serialize};

/// An entry in a synthesizer's voice catalog
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Voice {
    pub name: String,
    /// BCP-47 tag as reported by the engine ("en-US", "en_GB", ...)
    pub locale: String,
    #[serde(default)]
    pub is_default: bool,
}

/// Pick a voice: first one matching the locale, else a default voice, else the first.
pub fn select_voice<'a>(voices: &'a [Voice], locale: &str) -> Option<&'a Voice> {
    let wanted = normalize_locale(locale);

    voices
        .iter()
        .find(|v| normalize_locale(&v.locale) == wanted)
        .or_else(|| voices.iter().find(|v| v.is_default))
        .or_else(|| voices.first())
}

fn normalize_locale(locale: &str) -> String {
    locale.trim().replace('_', "-").to_ascii_lowercase()
}
