//! Dictionary files and locale selection for the CLI

use anyhow::{Context, Result};
use std::collections::BTreeSet;
use std::fs;
use std::path::{Path, PathBuf};
use std::sync::Arc;

use verba_i18n::{english, locale_fallback_chain, lookup_builtin, normalize_locale, LocaleDictionary};

/// Load a `.json`, `.yaml` or `.yml` dictionary file.
///
/// A file without a `name` leaf is named after its stem (`de.yaml` -> `de`).
pub fn load_dictionary(path: &Path) -> Result<LocaleDictionary> {
    let content =
        fs::read_to_string(path).with_context(|| format!("Failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("json"));
    let dict = if is_json {
        LocaleDictionary::from_json_str(&content)
    } else {
        LocaleDictionary::from_yaml_str(&content)
    }
    .with_context(|| format!("Failed to parse {}", path.display()))?;

    if !dict.name().is_empty() {
        let name = normalize_locale(dict.name());
        return Ok(dict.with_name(name));
    }
    let stem = path
        .file_stem()
        .and_then(|s| s.to_str())
        .map(normalize_locale)
        .unwrap_or_default();
    Ok(dict.with_name(stem))
}

/// Built-in dictionaries plus the ones listed in `verba.toml`.
#[derive(Default)]
pub struct Catalog {
    extra: Vec<Arc<LocaleDictionary>>,
}

impl Catalog {
    pub fn load(paths: &[PathBuf]) -> Result<Self> {
        let mut extra = Vec::with_capacity(paths.len());
        for path in paths {
            let dict = load_dictionary(path)?;
            tracing::debug!(
                path = %path.display(),
                lang = %dict.name(),
                entries = dict.len(),
                "loaded dictionary"
            );
            extra.push(Arc::new(dict));
        }
        Ok(Self { extra })
    }

    /// Best dictionary for `tag`; configured dictionaries shadow built-ins.
    pub fn resolve(&self, tag: &str) -> Arc<LocaleDictionary> {
        for l in locale_fallback_chain(tag) {
            if let Some(dict) = self.extra.iter().find(|d| d.name() == l) {
                return dict.clone();
            }
            if let Some(dict) = lookup_builtin(&l) {
                return dict;
            }
        }
        english()
    }
}

/// Leaf paths a dictionary lacks or adds relative to a base dictionary.
#[derive(Debug, Default, PartialEq)]
pub struct Coverage {
    pub missing: Vec<String>,
    pub extra: Vec<String>,
}

const NAME_KEY: &str = "name";

/// Leaf paths that need translating; the root `name` leaf only labels the file.
fn translatable_paths(dict: &LocaleDictionary) -> BTreeSet<String> {
    dict.leaf_paths()
        .into_iter()
        .filter(|p| p != NAME_KEY)
        .collect()
}

impl Coverage {
    pub fn compare(base: &LocaleDictionary, target: &LocaleDictionary) -> Self {
        let base = translatable_paths(base);
        let target = translatable_paths(target);
        Self {
            missing: base.difference(&target).cloned().collect(),
            extra: target.difference(&base).cloned().collect(),
        }
    }

    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn coverage_lists_missing_and_extra_paths() {
        let mut base = LocaleDictionary::new("en");
        base.insert("el.select.loading", "Loading");
        base.insert("el.select.noData", "No data");
        let mut target = LocaleDictionary::new("de");
        target.insert("el.select.loading", "Laden");
        target.insert("el.select.extra", "Extra");

        let cov = Coverage::compare(&base, &target);
        assert_eq!(cov.missing, vec!["el.select.noData".to_string()]);
        assert_eq!(cov.extra, vec!["el.select.extra".to_string()]);
        assert!(!cov.is_complete());
    }

    #[test]
    fn coverage_ignores_the_name_label() {
        let mut base = LocaleDictionary::new("en");
        base.insert("name", "en");
        base.insert("el.select.loading", "Loading");
        let mut target = LocaleDictionary::new("de");
        target.insert("el.select.loading", "Laden");

        let cov = Coverage::compare(&base, &target);
        assert_eq!(cov, Coverage::default());
        assert!(cov.is_complete());
    }

    #[test]
    fn unnamed_file_covering_english_is_complete() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("de.yaml");
        let src = include_str!("../../verba_i18n/lang/en.yaml").replace("name: \"en\"\n", "");
        fs::write(&path, src).unwrap();

        let target = load_dictionary(&path).unwrap();
        assert_eq!(target.name(), "de");
        assert!(target.resolve("name").is_none());

        let cov = Coverage::compare(&english(), &target);
        assert!(cov.is_complete(), "missing: {:?}", cov.missing);
        assert!(cov.extra.is_empty());
    }

    #[test]
    fn configured_dictionaries_shadow_builtins() {
        let mut de = LocaleDictionary::new("de");
        de.insert("el.select.loading", "Laden");
        let catalog = Catalog {
            extra: vec![Arc::new(de)],
        };

        assert_eq!(catalog.resolve("de-AT").name(), "de");
        assert_eq!(catalog.resolve("zh_CN").name(), "zh-cn");
        assert_eq!(catalog.resolve("fr").name(), "en");
    }

    #[test]
    fn missing_file_is_an_error() {
        let err = load_dictionary(Path::new("/nonexistent/verba/de.yaml")).unwrap_err();
        assert!(err.to_string().contains("Failed to read"));
    }
}
