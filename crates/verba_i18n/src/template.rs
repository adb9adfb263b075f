use std::borrow::Cow;
use std::collections::HashMap;

use crate::label::ArgValue;

pub(crate) const MAX_EXPANDED_BYTES: usize = 64 * 1024;

const LINEAR_SEARCH_THRESHOLD: usize = 8;

fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_'
}

fn take_prefix_by_bytes(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while end > 0 && !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Returns `true` once the output is full.
fn push_str_limited(out: &mut String, s: &str) -> bool {
    if out.len() >= MAX_EXPANDED_BYTES {
        return true;
    }
    let remaining = MAX_EXPANDED_BYTES - out.len();
    out.push_str(take_prefix_by_bytes(s, remaining));
    out.len() >= MAX_EXPANDED_BYTES
}

fn find_option<'a>(
    map: Option<&HashMap<&str, &'a ArgValue>>,
    options: &'a [(Cow<'static, str>, ArgValue)],
    name: &str,
) -> Option<&'a ArgValue> {
    match map {
        Some(map) => map.get(name).copied(),
        None => options
            .iter()
            .find(|(k, _)| k.as_ref() == name)
            .map(|(_, v)| v),
    }
}

/// Substitute `{name}` tokens in `template` with values from `options`.
///
/// - `name` is one or more ASCII word characters; other brace text is literal.
/// - With no options the template is returned unchanged.
/// - A token whose name has no option stays in the output verbatim.
/// - Substituted values are not scanned again.
pub fn interpolate(template: &str, options: &[(Cow<'static, str>, ArgValue)]) -> String {
    if options.is_empty() || !template.contains('{') {
        return template.to_string();
    }

    // Options are usually tiny; only hash when there are many.
    let options_map = if options.len() > LINEAR_SEARCH_THRESHOLD {
        Some(
            options
                .iter()
                .map(|(k, v)| (k.as_ref(), v))
                .collect::<HashMap<&str, &ArgValue>>(),
        )
    } else {
        None
    };

    let bytes = template.as_bytes();
    let mut out = String::with_capacity(std::cmp::min(template.len() + 8, MAX_EXPANDED_BYTES));
    let mut literal_start = 0;
    let mut i = 0;

    while i < bytes.len() {
        if bytes[i] != b'{' {
            i += 1;
            continue;
        }

        let name_start = i + 1;
        let mut name_end = name_start;
        while name_end < bytes.len() && is_word_byte(bytes[name_end]) {
            name_end += 1;
        }
        if name_end == name_start || name_end >= bytes.len() || bytes[name_end] != b'}' {
            i += 1;
            continue;
        }

        // Braces and word bytes are ASCII, so every index here is a char boundary.
        if push_str_limited(&mut out, &template[literal_start..i]) {
            return out;
        }
        let name = &template[name_start..name_end];
        let full = match find_option(options_map.as_ref(), options, name) {
            Some(ArgValue::Str(s)) => push_str_limited(&mut out, s),
            Some(v) => push_str_limited(&mut out, &v.to_string()),
            None => push_str_limited(&mut out, &template[i..=name_end]),
        };
        if full {
            return out;
        }

        i = name_end + 1;
        literal_start = i;
    }

    push_str_limited(&mut out, &template[literal_start..]);
    out
}
