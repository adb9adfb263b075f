use std::sync::{Arc, OnceLock};

use tracing::error;

use crate::dictionary::LocaleDictionary;
use crate::locale::{locale_fallback_chain, normalize_locale};

const BUILTINS: [(&str, &str); 2] = [
    ("en", include_str!("../lang/en.yaml")),
    ("zh-cn", include_str!("../lang/zh-cn.yaml")),
];

static PARSED: [OnceLock<Arc<LocaleDictionary>>; 2] = [OnceLock::new(), OnceLock::new()];

fn load(idx: usize) -> Arc<LocaleDictionary> {
    PARSED[idx]
        .get_or_init(|| {
            let (tag, src) = BUILTINS[idx];
            match LocaleDictionary::from_yaml_str(src) {
                Ok(dict) => Arc::new(dict.with_name(tag)),
                Err(e) => {
                    error!(locale = %tag, error = %e, "built-in dictionary failed to parse");
                    Arc::new(LocaleDictionary::new(tag))
                }
            }
        })
        .clone()
}

/// The English baseline dictionary. Parsed once, then shared.
pub fn english() -> Arc<LocaleDictionary> {
    load(0)
}

/// The built-in dictionary named exactly `tag` (after normalization).
pub fn lookup_builtin(tag: &str) -> Option<Arc<LocaleDictionary>> {
    let tag = normalize_locale(tag);
    BUILTINS
        .iter()
        .position(|(name, _)| *name == tag)
        .map(load)
}

/// The best built-in dictionary for `tag`, following its fallback chain.
///
/// Always succeeds: the chain ends in English.
pub fn builtin(tag: &str) -> Arc<LocaleDictionary> {
    locale_fallback_chain(tag)
        .iter()
        .find_map(|l| lookup_builtin(l))
        .unwrap_or_else(english)
}

/// Language identifiers of the built-in dictionaries.
pub fn available() -> Vec<&'static str> {
    BUILTINS.iter().map(|(name, _)| *name).collect()
}
