//! Verba internationalization (i18n)
//!
//! Goals:
//! - Nested locale dictionaries addressed by dotted paths (`"el.select.loading"`)
//! - `{name}` placeholder interpolation that never fails at render time
//! - An optional host-supplied translator consulted before the dictionary walk
//! - Explicit locale contexts scoped to UI subtrees instead of a global singleton
//! - Built-in English baseline (plus `zh-cn`), and an optional Fluent backend

mod builtin;
mod context;
mod dictionary;
mod error;
mod label;
mod locale;
mod scope;
mod template;
mod translator;

#[cfg(feature = "fluent")]
mod fluent;

pub use builtin::{available, builtin, english, lookup_builtin};
pub use context::LocaleContext;
pub use dictionary::{DictionaryError, Entry, LocaleDictionary};
pub use error::I18nError;
pub use label::{ArgValue, Label, TranslationRequest};
pub use locale::{locale_fallback_chain, normalize_locale};
pub use scope::{ScopeId, ScopeTree};
pub use template::interpolate;
pub use translator::{translate, translate_with, Translate};

#[cfg(feature = "fluent")]
pub use fluent::FluentTranslator;

/// Convenience macro for building a translation path + options as a [`Label`].
///
/// Examples:
/// - `t!("el.select.loading")`
/// - `t!("el.pagination.total", { total: 42 })`
#[macro_export]
macro_rules! t {
    ($path:literal) => {
        $crate::Label::key($crate::TranslationRequest::new($path))
    };
    ($path:literal, { $($name:ident : $value:expr),* $(,)? }) => {{
        let mut r = $crate::TranslationRequest::new($path);
        $(
            r = r.arg(stringify!($name), $value);
        )*
        $crate::Label::key(r)
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn macro_builds_requests() {
        assert_eq!(
            t!("el.select.loading"),
            Label::Key(TranslationRequest::new("el.select.loading"))
        );

        let total = 42;
        assert_eq!(
            t!("el.pagination.total", { total: total }),
            Label::Key(TranslationRequest::new("el.pagination.total").arg("total", 42))
        );
    }
}
