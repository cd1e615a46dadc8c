/// Character in an input URI marking a position to fuzz.
pub const MARKER: char = '#';

/// Boundary values substituted at every marker, in order.
pub const CATALOG: &[&str] = &[
    "1",
    "0",
    "-1",
    "2147483647",
    "a",
    "+",
    "\"fskjnjsdjlk\"",
    "",
    "\"\"",
];

/// Number of positions `expand` will fuzz.
pub fn marker_count(uri: &str) -> usize {
    uri.matches(MARKER).count()
}

/// Expands every marker in `uri` over the whole catalog.
///
/// Markers are resolved left to right, the first one varying slowest, so the
/// result holds `CATALOG.len().pow(k)` candidates for `k` markers. A URI
/// without markers comes back unchanged as the only candidate.
pub fn expand(uri: &str) -> Vec<String> {
    let mut candidates = vec![uri.to_string()];

    for _ in uri.chars().filter(|c| *c == MARKER) {
        candidates = candidates
            .iter()
            .flat_map(|candidate| substitute_first(candidate))
            .collect();
    }

    candidates
}

// catalog values never contain the marker, so the first one left is always
// the next unresolved position of the input
fn substitute_first(candidate: &str) -> impl Iterator<Item = String> + '_ {
    CATALOG
        .iter()
        .map(move |value| candidate.replacen(MARKER, value, 1))
}
