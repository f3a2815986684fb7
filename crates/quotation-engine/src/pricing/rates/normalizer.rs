use crate::pricing::classifier::{normalize_developer_type, PlotAreaBand, PricingLocation};

/// Lookup key form of a free-text label: invisible characters stripped,
/// whitespace collapsed, ASCII-lowercased.
pub(crate) fn normalize_key(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}

pub(crate) fn developer_key(value: &str) -> String {
    normalize_key(&normalize_developer_type(value))
}

pub(crate) fn location_key(value: &str) -> String {
    match PricingLocation::from_label(value) {
        Some(location) => normalize_key(location.label()),
        None => normalize_key(value),
    }
}

pub(crate) fn band_key(value: &str) -> String {
    match PlotAreaBand::from_label(value) {
        Some(band) => normalize_key(band.label()),
        None => normalize_key(value),
    }
}

/// Service names match exactly once surrounding whitespace is gone.
pub(crate) fn service_key(value: &str) -> String {
    value.replace(['\u{feff}', '\u{200b}'], "").trim().to_string()
}

/// Largest amount a rate cell may carry. Anything above it is treated as a
/// data-entry error and loads as a placeholder.
pub(crate) const MAX_RATE_AMOUNT: u64 = 1_000_000_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum ParsedAmount {
    Value(u64),
    Placeholder,
}

/// Parses a rate-card amount cell. Currency symbols, thousands separators
/// and a trailing `/-` are accepted; anything non-numeric, negative or above
/// `MAX_RATE_AMOUNT` is a placeholder.
pub(crate) fn parse_amount(raw: &str) -> ParsedAmount {
    let cleaned: String = raw
        .trim()
        .trim_end_matches("/-")
        .chars()
        .filter(|ch| !matches!(ch, ',' | '\u{20b9}' | ' '))
        .collect();
    let cleaned = cleaned
        .strip_prefix("Rs.")
        .or_else(|| cleaned.strip_prefix("Rs"))
        .unwrap_or(&cleaned);

    if cleaned.is_empty() {
        return ParsedAmount::Placeholder;
    }

    if let Ok(value) = cleaned.parse::<u64>() {
        return if value <= MAX_RATE_AMOUNT {
            ParsedAmount::Value(value)
        } else {
            ParsedAmount::Placeholder
        };
    }

    match cleaned.parse::<f64>() {
        Ok(value) if value.is_finite() && value >= 0.0 && value <= MAX_RATE_AMOUNT as f64 => {
            ParsedAmount::Value(value.round() as u64)
        }
        _ => ParsedAmount::Placeholder,
    }
}
