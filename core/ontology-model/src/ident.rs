use regex::Regex;
use std::sync::LazyLock;

/// A Unicode letter followed by letters, digits or underscores.
static IDENTIFIER: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^\p{L}[\p{L}\p{N}_]*$").expect("identifier grammar is a valid regex")
});

/// Returns true if `name` is a valid type or property identifier.
///
/// Letters include any Unicode letter, so `Person`, `员工` and `Établissement`
/// are all accepted; `_id`, `9lives` and `first-name` are not.
pub fn is_valid_identifier(name: &str) -> bool {
    IDENTIFIER.is_match(name)
}
