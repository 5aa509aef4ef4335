//! Symbol normalisation for manual entry.

/// Venue suffixes stripped from manually entered symbols (e.g. `AIR.PA` -> `AIR`).
pub const KNOWN_VENUE_SUFFIXES: &[&str] = &[
    ".PA", ".DE", ".MI", ".BR", ".AS", ".ST", ".L", ".HE", ".SW", ".VX", ".OL",
];

/// Canonical form of a user-typed symbol.
///
/// Trims whitespace, upper-cases, and strips the first matching known
/// venue suffix. Unknown suffixes are kept (`BRK.B` stays `BRK.B`).
pub fn normalize_symbol(raw: &str) -> String {
    let symbol = raw.trim().to_ascii_uppercase();
    for suffix in KNOWN_VENUE_SUFFIXES {
        if let Some(stripped) = symbol.strip_suffix(suffix) {
            return stripped.to_string();
        }
    }
    symbol
}
