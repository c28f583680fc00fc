use std::borrow::Cow;

/// Pluralizes a piece of text.
pub fn pluralize(base: &str, count: usize) -> Cow<'_, str> {
    if count == 1 {
        base.into()
    } else {
        format!("{base}s").into()
    }
}

/// Formats `count` followed by the matching form of `base`, e.g. `3 changes`.
pub fn counted(count: usize, base: &str) -> String {
    format!("{count} {}", pluralize(base, count))
}
