use tracing::trace;

use crate::dictionary::LocaleDictionary;
use crate::label::TranslationRequest;
use crate::template::interpolate;

/// A host-supplied translator, consulted before the dictionary walk.
///
/// Returning `None` (or an empty string) hands the request over to the
/// active dictionary.
pub trait Translate: Send + Sync {
    fn translate(&self, request: &TranslationRequest) -> Option<String>;
}

impl<F> Translate for F
where
    F: Fn(&TranslationRequest) -> Option<String> + Send + Sync,
{
    fn translate(&self, request: &TranslationRequest) -> Option<String> {
        self(request)
    }
}

/// Resolve `request.path` in `dictionary` and interpolate its options.
///
/// An unresolved path yields an empty string.
pub fn translate(dictionary: &LocaleDictionary, request: &TranslationRequest) -> String {
    match dictionary.resolve(&request.path) {
        Some(template) => interpolate(template, &request.options),
        None => {
            trace!(
                locale = %dictionary.name(),
                path = %request.path,
                "unresolved translation path"
            );
            String::new()
        }
    }
}

/// [`translate`], with an optional custom translator tried first.
pub fn translate_with(
    custom: Option<&dyn Translate>,
    dictionary: &LocaleDictionary,
    request: &TranslationRequest,
) -> String {
    if let Some(custom) = custom {
        if let Some(s) = custom.translate(request) {
            if !s.is_empty() {
                return s;
            }
        }
    }
    translate(dictionary, request)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn dict() -> LocaleDictionary {
        let mut d = LocaleDictionary::new("en");
        d.insert("a.b", "hello");
        d.insert("greet", "Hi {name}");
        d
    }

    #[test]
    fn translates_and_interpolates() {
        let d = dict();
        assert_eq!(translate(&d, &TranslationRequest::new("a.b")), "hello");
        assert_eq!(
            translate(&d, &TranslationRequest::new("greet").arg("name", "Sam")),
            "Hi Sam"
        );
        assert_eq!(
            translate(&d, &TranslationRequest::new("greet")),
            "Hi {name}"
        );
    }

    #[test]
    fn unresolved_paths_are_empty() {
        let d = dict();
        assert_eq!(translate(&d, &TranslationRequest::new("")), "");
        assert_eq!(translate(&d, &TranslationRequest::new("a.x")), "");
        assert_eq!(translate(&d, &TranslationRequest::new("a.b.c")), "");
    }

    #[test]
    fn custom_translator_wins_when_non_empty() {
        let d = dict();
        let custom = |r: &TranslationRequest| -> Option<String> {
            match r.path.as_ref() {
                "a.b" => Some("custom".to_string()),
                "greet" => Some(String::new()),
                _ => None,
            }
        };

        let req = TranslationRequest::new("a.b");
        assert_eq!(translate_with(Some(&custom), &d, &req), "custom");

        // Empty and missing custom results fall back to the dictionary.
        let req = TranslationRequest::new("greet").arg("name", "Sam");
        assert_eq!(translate_with(Some(&custom), &d, &req), "Hi Sam");
        let req = TranslationRequest::new("a.x");
        assert_eq!(translate_with(Some(&custom), &d, &req), "");

        assert_eq!(
            translate_with(None, &d, &TranslationRequest::new("a.b")),
            "hello"
        );
    }
}
