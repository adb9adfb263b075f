use std::fmt;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use tracing::debug;

use crate::builtin::english;
use crate::dictionary::LocaleDictionary;
use crate::label::{Label, TranslationRequest};
use crate::translator::{translate_with, Translate};

/// The active locale seen by a UI subtree.
///
/// Holds the current dictionary as a shared snapshot plus an optional
/// host translator. Switching languages swaps the snapshot; a translation
/// in flight keeps reading the dictionary it started with.
pub struct LocaleContext {
    dictionary: RwLock<Arc<LocaleDictionary>>,
    translator: Option<Arc<dyn Translate>>,
    on_change: Mutex<Option<fn(&str)>>,
}

impl fmt::Debug for LocaleContext {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LocaleContext")
            .field("lang", &self.lang())
            .field("custom_translator", &self.translator.is_some())
            .finish()
    }
}

impl LocaleContext {
    pub fn new(dictionary: Arc<LocaleDictionary>) -> Self {
        Self {
            dictionary: RwLock::new(dictionary),
            translator: None,
            on_change: Mutex::new(None),
        }
    }

    /// A context over the built-in English dictionary.
    pub fn english() -> Self {
        Self::new(english())
    }

    /// Consult `translator` before the dictionary walk.
    pub fn with_translator(self, translator: impl Translate + 'static) -> Self {
        self.with_shared_translator(Arc::new(translator))
    }

    pub fn with_shared_translator(mut self, translator: Arc<dyn Translate>) -> Self {
        self.translator = Some(translator);
        self
    }

    /// Set the callback fired after every locale switch.
    ///
    /// The host should set this to something like a redraw request.
    pub fn set_change_listener(&self, callback: fn(&str)) {
        *self.on_change.lock().unwrap_or_else(PoisonError::into_inner) = Some(callback);
    }

    /// The current dictionary snapshot.
    pub fn dictionary(&self) -> Arc<LocaleDictionary> {
        self.dictionary
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Short language identifier of the active dictionary.
    pub fn lang(&self) -> String {
        self.dictionary().name().to_string()
    }

    /// Replace the active dictionary.
    pub fn set_locale(&self, dictionary: Arc<LocaleDictionary>) {
        let mut cur = self
            .dictionary
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        if Arc::ptr_eq(&cur, &dictionary) {
            return;
        }
        debug!(
            "LocaleContext::set_locale: {} -> {}",
            cur.name(),
            dictionary.name()
        );
        let lang = dictionary.name().to_string();
        *cur = dictionary;
        drop(cur);

        let callback = *self.on_change.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(cb) = callback {
            cb(&lang);
        }
    }

    /// Translate a request: custom translator first, then the dictionary.
    pub fn tr(&self, request: &TranslationRequest) -> String {
        let dictionary = self.dictionary();
        translate_with(self.translator.as_deref(), &dictionary, request)
    }

    /// Translate `path` without placeholder options.
    pub fn t(&self, path: &str) -> String {
        self.tr(&TranslationRequest::new(path.to_string()))
    }

    pub fn resolve_label(&self, label: &Label) -> String {
        match label {
            Label::Raw(s) => s.clone(),
            Label::Key(r) => self.tr(r),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn dict(name: &str, greeting: &str) -> Arc<LocaleDictionary> {
        let mut d = LocaleDictionary::new(name);
        d.insert("greet", greeting);
        Arc::new(d)
    }

    #[test]
    fn english_context_uses_builtin() {
        let ctx = LocaleContext::english();
        assert_eq!(ctx.lang(), "en");
        assert_eq!(ctx.t("el.select.noData"), "No data");
        assert_eq!(
            ctx.tr(&TranslationRequest::new("el.pagination.total").arg("total", 42)),
            "Total 42"
        );
    }

    #[test]
    fn swap_changes_later_results_only() {
        let ctx = LocaleContext::new(dict("en", "Hi {name}"));
        let req = TranslationRequest::new("greet").arg("name", "Sam");

        let before = ctx.tr(&req);
        let snapshot = ctx.dictionary();
        ctx.set_locale(dict("de", "Hallo {name}"));

        assert_eq!(before, "Hi Sam");
        assert_eq!(ctx.tr(&req), "Hallo Sam");
        assert_eq!(ctx.lang(), "de");
        assert_eq!(snapshot.resolve("greet"), Some("Hi {name}"));
    }

    static CHANGES: AtomicUsize = AtomicUsize::new(0);

    fn count_change(_lang: &str) {
        CHANGES.fetch_add(1, Ordering::SeqCst);
    }

    #[test]
    fn listener_fires_on_real_switches() {
        let first = dict("en", "Hi");
        let ctx = LocaleContext::new(first.clone());
        ctx.set_change_listener(count_change);

        ctx.set_locale(first);
        assert_eq!(CHANGES.load(Ordering::SeqCst), 0);

        ctx.set_locale(dict("de", "Hallo"));
        assert_eq!(CHANGES.load(Ordering::SeqCst), 1);
    }

    #[test]
    fn custom_translator_takes_precedence() {
        let ctx = LocaleContext::new(dict("en", "Hi {name}")).with_translator(
            |r: &TranslationRequest| -> Option<String> {
                (r.path == "greet").then(|| "Yo".to_string())
            },
        );
        assert_eq!(ctx.t("greet"), "Yo");
        assert_eq!(ctx.resolve_label(&Label::raw("plain")), "plain");
    }
}
