use std::collections::HashSet;

/// Normalize language identifiers to the form used for dictionary names.
///
/// - Trims whitespace.
/// - Converts `_` to `-` (`zh_CN`).
/// - Lowercases (`zh-CN` -> `zh-cn`).
pub fn normalize_locale(s: &str) -> String {
    s.trim().replace('_', "-").to_ascii_lowercase()
}

/// Create a fallback chain for dictionary selection.
///
/// Example:
/// - `zh-TW` -> `["zh-tw", "zh", "en"]`
/// - `en-US` -> `["en-us", "en"]`
pub fn locale_fallback_chain(locale: &str) -> Vec<String> {
    let tag = normalize_locale(locale);
    let lang = tag.split('-').next().unwrap_or_default().to_string();

    // The English baseline always terminates the chain.
    let mut chain = vec![tag, lang, "en".to_string()];
    chain.retain(|l| !l.is_empty());

    let mut seen = HashSet::new();
    chain.retain(|l| seen.insert(l.clone()));
    chain
}
