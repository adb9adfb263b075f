use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

use fluent_bundle::concurrent::FluentBundle;
use fluent_bundle::{FluentArgs, FluentResource, FluentValue};

use unic_langid::LanguageIdentifier;

use crate::label::{ArgValue, TranslationRequest};
use crate::locale::{locale_fallback_chain, normalize_locale};
use crate::translator::Translate;
use crate::I18nError;

fn parse_ftl(locale: &str, ftl: &str) -> Result<(String, FluentBundle<FluentResource>), String> {
    let loc = normalize_locale(locale);
    let langid: LanguageIdentifier = loc
        .parse()
        .map_err(|e| format!("invalid locale `{}`: {}", loc, e))?;

    let res = FluentResource::try_new(ftl.to_string())
        .map_err(|(_res, errs)| format!("ftl parse error: {:?}", errs))?;

    let mut bundle = FluentBundle::new_concurrent(vec![langid]);
    // Plain text output; no bidi isolation marks around placeables.
    bundle.set_use_isolating(false);
    bundle
        .add_resource(res)
        .map_err(|errs| format!("ftl add_resource error: {:?}", errs))?;

    Ok((loc, bundle))
}

/// Fluent message ids cannot contain `.`; `el.select.loading` maps to
/// `el-select-loading`.
fn message_id(path: &str) -> String {
    path.replace('.', "-")
}

/// A [`Translate`] implementation backed by Fluent (`.ftl`) resources.
///
/// Requests whose message is missing return `None`, so a [`LocaleContext`]
/// falls back to its dictionary.
///
/// [`LocaleContext`]: crate::LocaleContext
pub struct FluentTranslator {
    locale: RwLock<String>,
    bundles: RwLock<HashMap<String, FluentBundle<FluentResource>>>,
}

impl FluentTranslator {
    pub fn new(locale: &str) -> Self {
        Self {
            locale: RwLock::new(normalize_locale(locale)),
            bundles: RwLock::new(HashMap::new()),
        }
    }

    pub fn locale(&self) -> String {
        self.locale
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    pub fn set_locale(&self, locale: &str) {
        let loc = normalize_locale(locale);
        if loc.is_empty() {
            return;
        }
        *self.locale.write().unwrap_or_else(PoisonError::into_inner) = loc;
    }

    /// Parse and load a Fluent resource for `locale`, replacing any previous one.
    pub fn load_ftl(&self, locale: &str, ftl: &str) -> Result<(), I18nError> {
        let (loc, bundle) = parse_ftl(locale, ftl).map_err(I18nError::Fluent)?;
        self.bundles
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(loc, bundle);
        Ok(())
    }

    fn format(
        bundle: &FluentBundle<FluentResource>,
        locale: &str,
        request: &TranslationRequest,
    ) -> Option<String> {
        let id = message_id(&request.path);
        let pattern = bundle.get_message(&id)?.value()?;

        let mut args = FluentArgs::new();
        for (k, v) in &request.options {
            match v {
                ArgValue::Str(s) => {
                    args.set(k.as_ref(), FluentValue::from(s.as_str()));
                }
                ArgValue::Int(i) => {
                    args.set(k.as_ref(), FluentValue::from(*i));
                }
                ArgValue::Float(f) => {
                    args.set(k.as_ref(), FluentValue::from(*f));
                }
                ArgValue::Bool(b) => {
                    // Fluent has no native bool; pass through as a string.
                    args.set(k.as_ref(), FluentValue::from(b.to_string()));
                }
            }
        }

        let mut errs = Vec::new();
        let s = bundle
            .format_pattern(pattern, Some(&args), &mut errs)
            .to_string();
        if !errs.is_empty() {
            tracing::warn!(
                locale = %locale,
                message_id = %id,
                errors = ?errs,
                "Fluent formatting errors"
            );
        }
        Some(s)
    }
}

impl Translate for FluentTranslator {
    fn translate(&self, request: &TranslationRequest) -> Option<String> {
        let bundles = self.bundles.read().unwrap_or_else(PoisonError::into_inner);
        for l in locale_fallback_chain(&self.locale()) {
            if let Some(bundle) = bundles.get(&l) {
                if let Some(s) = Self::format(bundle, &l, request) {
                    return Some(s);
                }
            }
        }
        None
    }
}
