// src/regions.rs

/// Regions offered for selection, in display order.
pub static KNOWN_REGIONS: &[(&str, &str)] = &[
    ("global", "Global"),
    ("US", "United States"),
    ("CN", "China"),
    ("EU", "European Union"),
    ("DE", "Germany"),
    ("NO", "Norway"),
    ("FR", "France"),
    ("UK", "United Kingdom"),
];

pub static DEFAULT_SELECTION: &[&str] = &["global", "US"];

/// Display name for a region code; unknown codes are shown as-is.
pub fn label(code: &str) -> &str {
    KNOWN_REGIONS
        .iter()
        .find(|(c, _)| *c == code)
        .map_or(code, |(_, name)| *name)
}

pub fn labels(codes: &[String]) -> Vec<String> {
    codes.iter().map(|c| label(c).to_string()).collect()
}
