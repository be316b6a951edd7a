use regex::Regex;
use std::sync::LazyLock;

/// Optional http(s) scheme, a dotted host ending in a 2+ letter label, an
/// optional port, path, query and fragment. The query is captured so its
/// key/value structure can be checked separately.
const LONG_URL_PATTERN: &str = r"^(?:https?://)?[a-zA-Z0-9-]+(?:\.[a-zA-Z0-9-]+)*\.[a-zA-Z]{2,}(?::[0-9]+)?(?:/[^?#]*)?(?:\?([^#]*))?(?:#.*)?$";

static LONG_URL_REGEX: LazyLock<Option<Regex>> =
    LazyLock::new(|| Regex::new(LONG_URL_PATTERN).ok());

/// Returns whether `candidate` is acceptable as a long URL.
///
/// Never fails: anything that cannot be validated is simply not valid.
pub fn is_valid_long_url(candidate: &str) -> bool {
    if candidate.is_empty() || candidate.chars().any(|c| c.is_whitespace() || c.is_control()) {
        return false;
    }

    let Some(regex) = LONG_URL_REGEX.as_ref() else {
        return false;
    };

    let Some(captures) = regex.captures(candidate) else {
        return false;
    };

    match captures.get(1) {
        Some(query) => is_valid_query(query.as_str()),
        None => true,
    }
}

// Every `&`-separated pair needs a key, and a value whenever `=` is present.
fn is_valid_query(query: &str) -> bool {
    query.split('&').all(|pair| match pair.split_once('=') {
        Some((key, value)) => !key.is_empty() && !value.is_empty(),
        None => !pair.is_empty(),
    })
}
