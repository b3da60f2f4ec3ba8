use std::collections::BTreeSet;

use unicode_normalization::UnicodeNormalization;

/// Canonical form used when comparing value and cause tags.
///
/// NFKC folds full-width and compatibility characters, then case and separators are
/// unified so "Climate Action", "climate-action" and "climate_action" compare equal.
pub fn normalize_tag(tag: &str) -> String {
    let folded: String = tag.nfkc().collect::<String>().to_lowercase();
    folded
        .split(|c: char| c.is_whitespace() || c == '-' || c == '_')
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join("-")
}

/// Normalizes every tag and drops the ones that normalize to nothing.
pub fn normalize_tag_set<'a, I>(tags: I) -> BTreeSet<String>
where
    I: IntoIterator<Item = &'a String>,
{
    tags.into_iter()
        .map(|tag| normalize_tag(tag))
        .filter(|tag| !tag.is_empty())
        .collect()
}
