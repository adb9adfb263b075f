use thiserror::Error;

use crate::dictionary::DictionaryError;

/// Errors raised while loading translation sources.
///
/// Translating never produces an error; only parsing dictionaries or Fluent
/// resources does.
#[derive(Debug, Error)]
pub enum I18nError {
    #[error(transparent)]
    Dictionary(#[from] DictionaryError),

    #[error("fluent error: {0}")]
    Fluent(String),
}
