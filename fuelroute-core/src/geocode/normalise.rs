//! Address normalisation applied before the first geocoding attempt.

/// Markers that describe highway exits rather than locations and confuse
/// free-text search.
const DIRECTIONAL_MARKERS: &[&str] = &["EXIT"];

/// Normalise a free-text address for geocoding.
///
/// Drops directional markers such as `EXIT` (case-insensitive, whole words
/// only), replaces `&` with `and`, collapses runs of whitespace and trims.
///
/// # Examples
/// ```
/// use fuelroute_core::normalise_address;
///
/// assert_eq!(
///     normalise_address("123 Main St EXIT 5 & Route 9"),
///     "123 Main St 5 and Route 9",
/// );
/// ```
#[must_use]
pub fn normalise_address(raw: &str) -> String {
    let spaced = raw.replace('&', " and ");
    spaced
        .split_whitespace()
        .filter(|token| !is_directional_marker(token))
        .collect::<Vec<_>>()
        .join(" ")
}

fn is_directional_marker(token: &str) -> bool {
    let word = token.trim_matches(|c: char| c.is_ascii_punctuation());
    DIRECTIONAL_MARKERS
        .iter()
        .any(|marker| word.eq_ignore_ascii_case(marker))
}
