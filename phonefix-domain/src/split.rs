use phonefix_types::tags::VALUE_SEPARATOR;

/// One tag value broken into number candidates.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SplitValue {
    /// Trimmed, non-blank pieces in source order.
    pub candidates: Vec<String>,

    /// The value used `,` somewhere. Splitting proceeds regardless.
    pub bad_separator: bool,

    /// Rejoining the pieces with `;` does not reproduce the raw value.
    pub beautified: bool,
}

/// Splits a raw tag value on `,` and `;`.
pub fn split_value(raw: &str) -> SplitValue {
    let candidates: Vec<String> = raw
        .split([',', VALUE_SEPARATOR])
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect();

    let rejoined = candidates.join(&VALUE_SEPARATOR.to_string());

    SplitValue {
        bad_separator: raw.contains(','),
        beautified: rejoined != raw,
        candidates,
    }
}
