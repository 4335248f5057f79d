//! Language utilities for language code handling
//!
//! This module validates ISO 639-1 / ISO 639-2 codes (optionally carrying a
//! region subtag such as `zh-CN`), resolves the auto-detect sentinel and maps
//! target languages to speech synthesis locales.

use anyhow::{Result, anyhow};
use isolang::Language;
use once_cell::sync::Lazy;
use std::collections::HashMap;

/// Reserved source-language value asking the provider to infer the language
pub const AUTO_DETECT: &str = "auto";

/// Language code type
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LanguageCodeType {
    /// ISO 639-1 (2-letter) code
    Part1,
    /// ISO 639-2/T (3-letter) code
    Part2T,
    /// ISO 639-2/B (3-letter) code
    Part2B,
}

/// ISO 639-2/B codes that differ from their 639-2/T counterpart
const PART2B_TO_PART2T: &[(&str, &str)] = &[
    ("fre", "fra"),
    ("ger", "deu"),
    ("dut", "nld"),
    ("gre", "ell"),
    ("chi", "zho"),
    ("cze", "ces"),
    ("ice", "isl"),
    ("alb", "sqi"),
    ("arm", "hye"),
    ("baq", "eus"),
    ("bur", "mya"),
    ("per", "fas"),
    ("geo", "kat"),
    ("may", "msa"),
    ("mac", "mkd"),
    ("rum", "ron"),
    ("slo", "slk"),
    ("wel", "cym"),
];

/// Regional locales preferred by speech synthesis engines
static SPEECH_LOCALES: Lazy<HashMap<&'static str, &'static str>> = Lazy::new(|| {
    HashMap::from([
        ("en", "en-US"),
        ("tr", "tr-TR"),
        ("pt", "pt-PT"),
        ("zh-CN", "zh-CN"),
        ("zh-TW", "zh-TW"),
        ("ru", "ru-RU"),
        ("es", "es-ES"),
        ("de", "de-DE"),
        ("fr", "fr-FR"),
        ("ja", "ja-JP"),
        ("hi", "hi-IN"),
        ("ar", "ar-SA"),
        ("bn", "bn-BD"),
        ("pa", "pa-IN"),
        ("ur", "ur-PK"),
        ("id", "id-ID"),
        ("sw", "sw-KE"),
    ])
});

/// Whether the code is the auto-detect sentinel
pub fn is_auto_detect(code: &str) -> bool {
    code.trim().eq_ignore_ascii_case(AUTO_DETECT)
}

/// Resolve the source language for dispatch.
///
/// The provider cannot detect languages, so the auto-detect sentinel is
/// replaced by `fallback`. Any other code is returned trimmed.
pub fn resolve_source_language(code: &str, fallback: &str) -> String {
    if is_auto_detect(code) {
        fallback.trim().to_string()
    } else {
        code.trim().to_string()
    }
}

/// Primary language subtag of a code (`zh-CN` -> `zh`, `pt_BR` -> `pt`)
pub fn primary_subtag(code: &str) -> &str {
    let code = code.trim();
    code.split(['-', '_']).next().unwrap_or(code)
}

/// Validate if a language code is a valid ISO 639-1 or ISO 639-2 code.
///
/// A region subtag is allowed and ignored for validation purposes.
pub fn validate_language_code(code: &str) -> Result<LanguageCodeType> {
    let normalized_code = primary_subtag(code).to_lowercase();

    if normalized_code.len() == 2 {
        if Language::from_639_1(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part1);
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(LanguageCodeType::Part2T);
        }

        if PART2B_TO_PART2T.iter().any(|(b, _)| *b == normalized_code) {
            return Ok(LanguageCodeType::Part2B);
        }
    }

    Err(anyhow!("Invalid language code: {}", code))
}

/// Normalize a language code to ISO 639-2/T (3-letter) format
pub fn normalize_to_part2t(code: &str) -> Result<String> {
    let normalized_code = primary_subtag(code).to_lowercase();

    if normalized_code.len() == 2 {
        if let Some(lang) = Language::from_639_1(&normalized_code) {
            return Ok(lang.to_639_3().to_string());
        }
    } else if normalized_code.len() == 3 {
        if Language::from_639_3(&normalized_code).is_some() {
            return Ok(normalized_code);
        }

        if let Some((_, t)) = PART2B_TO_PART2T.iter().find(|(b, _)| *b == normalized_code) {
            return Ok((*t).to_string());
        }
    }

    Err(anyhow!("Cannot normalize invalid language code: {}", code))
}

/// Get the language name from a code
pub fn get_language_name(code: &str) -> Result<String> {
    if is_auto_detect(code) {
        return Ok("Auto-detect".to_string());
    }

    let normalized = normalize_to_part2t(code)?;
    let lang = Language::from_639_3(&normalized)
        .ok_or_else(|| anyhow!("Failed to get language from code: {}", normalized))?;

    Ok(lang.to_name().to_string())
}

/// Speech synthesis locale for a target language.
///
/// Known languages map to a regional locale; anything else is passed through.
pub fn speech_locale_for(code: &str) -> String {
    let code = code.trim();
    SPEECH_LOCALES
        .get(code)
        .map(|locale| (*locale).to_string())
        .unwrap_or_else(|| code.to_string())
}
