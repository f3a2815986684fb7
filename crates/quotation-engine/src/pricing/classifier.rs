use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use std::sync::OnceLock;

/// Canonical pricing location a raw project region collapses into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PricingLocation {
    #[serde(rename = "Mumbai City")]
    MumbaiCity,
    #[serde(rename = "Mumbai Suburban")]
    MumbaiSuburban,
    #[serde(rename = "Pune")]
    Pune,
    #[serde(rename = "ROM")]
    RestOfMaharashtra,
}

impl PricingLocation {
    pub const fn ordered() -> [Self; 4] {
        [
            Self::MumbaiCity,
            Self::MumbaiSuburban,
            Self::Pune,
            Self::RestOfMaharashtra,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::MumbaiCity => "Mumbai City",
            Self::MumbaiSuburban => "Mumbai Suburban",
            Self::Pune => "Pune",
            Self::RestOfMaharashtra => "ROM",
        }
    }

    /// Parses a canonical label as written in rate-card rows.
    pub fn from_label(value: &str) -> Option<Self> {
        let normalized = normalize_label(value);
        Self::ordered()
            .into_iter()
            .find(|location| normalize_label(location.label()) == normalized)
    }
}

impl fmt::Display for PricingLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Region groups offered on the intake form, in display order.
pub const REGION_GROUPS: &[(&str, &[&str])] = &[
    (
        "Mumbai Metropolitan Region",
        &["Mumbai Suburban", "Mumbai City", "Thane", "Palghar"],
    ),
    ("Navi/KDMC/Raigad", &["KDMC", "Navi Mumbai", "Raigad"]),
    (
        "Pune & ROM",
        &[
            "Pune - City",
            "Pune - PCMC",
            "Pune - PMRDA",
            "Pune - Rural",
            "ROM (Rest of Maharashtra)",
        ],
    ),
];

static REGION_MAP: OnceLock<HashMap<String, PricingLocation>> = OnceLock::new();

fn region_map() -> &'static HashMap<String, PricingLocation> {
    REGION_MAP.get_or_init(|| {
        const REGION_TO_LOCATION: &[(&str, PricingLocation)] = &[
            // Mumbai Metropolitan Region
            ("Mumbai City", PricingLocation::MumbaiCity),
            ("Mumbai Suburban", PricingLocation::MumbaiSuburban),
            ("Thane", PricingLocation::MumbaiSuburban),
            ("Palghar", PricingLocation::MumbaiSuburban),
            // Navi/KDMC/Raigad
            ("KDMC", PricingLocation::MumbaiSuburban),
            ("Navi Mumbai", PricingLocation::MumbaiSuburban),
            ("Raigad", PricingLocation::MumbaiSuburban),
            // Pune
            ("Pune - City", PricingLocation::Pune),
            ("Pune - PCMC", PricingLocation::Pune),
            ("Pune - PMRDA", PricingLocation::Pune),
            ("Pune", PricingLocation::Pune),
            // Rest of Maharashtra
            ("Pune - Rural", PricingLocation::RestOfMaharashtra),
            ("ROM (Rest of Maharashtra)", PricingLocation::RestOfMaharashtra),
            ("Rest of Maharashtra", PricingLocation::RestOfMaharashtra),
            ("ROM", PricingLocation::RestOfMaharashtra),
        ];

        let mut map = HashMap::with_capacity(REGION_TO_LOCATION.len());
        for (region, location) in REGION_TO_LOCATION {
            map.insert(normalize_label(region), *location);
        }
        map
    })
}

/// Maps a raw region label to its pricing location. Unknown and empty input
/// falls back to `ROM`.
pub fn map_region_to_location(region: &str) -> PricingLocation {
    region_map()
        .get(&normalize_label(region))
        .copied()
        .unwrap_or(PricingLocation::RestOfMaharashtra)
}

/// Plot-area bands used as the third rate-card key. Bounds are inclusive.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum PlotAreaBand {
    #[serde(rename = "0-500")]
    UpTo500,
    #[serde(rename = "500-1000")]
    UpTo1000,
    #[serde(rename = "1001-1500")]
    UpTo1500,
    #[serde(rename = "1501-2000")]
    UpTo2000,
    #[serde(rename = "2001-2500")]
    UpTo2500,
    #[serde(rename = "2501-4000")]
    UpTo4000,
    #[serde(rename = "4001-6500")]
    UpTo6500,
    #[serde(rename = "6500 and above")]
    Above6500,
}

impl PlotAreaBand {
    pub const fn ordered() -> [Self; 8] {
        [
            Self::UpTo500,
            Self::UpTo1000,
            Self::UpTo1500,
            Self::UpTo2000,
            Self::UpTo2500,
            Self::UpTo4000,
            Self::UpTo6500,
            Self::Above6500,
        ]
    }

    pub const fn label(self) -> &'static str {
        match self {
            Self::UpTo500 => "0-500",
            Self::UpTo1000 => "500-1000",
            Self::UpTo1500 => "1001-1500",
            Self::UpTo2000 => "1501-2000",
            Self::UpTo2500 => "2001-2500",
            Self::UpTo4000 => "2501-4000",
            Self::UpTo6500 => "4001-6500",
            Self::Above6500 => "6500 and above",
        }
    }

    /// Inclusive upper bound of the band; `None` for the open-ended top band.
    pub const fn upper_bound(self) -> Option<u64> {
        match self {
            Self::UpTo500 => Some(500),
            Self::UpTo1000 => Some(1000),
            Self::UpTo1500 => Some(1500),
            Self::UpTo2000 => Some(2000),
            Self::UpTo2500 => Some(2500),
            Self::UpTo4000 => Some(4000),
            Self::UpTo6500 => Some(6500),
            Self::Above6500 => None,
        }
    }

    /// Parses band labels as they appear in rate-card exports. Accepts the
    /// canonical labels plus the `501-1000` / `6500+` spellings.
    pub fn from_label(value: &str) -> Option<Self> {
        let compact: String = value
            .chars()
            .filter(|ch| !ch.is_whitespace())
            .collect::<String>()
            .to_ascii_lowercase();

        let band = match compact.as_str() {
            "0-500" => Self::UpTo500,
            "500-1000" | "501-1000" => Self::UpTo1000,
            "1001-1500" => Self::UpTo1500,
            "1501-2000" => Self::UpTo2000,
            "2001-2500" => Self::UpTo2500,
            "2501-4000" => Self::UpTo4000,
            "4001-6500" => Self::UpTo6500,
            "6500andabove" | "6500+" | "6501+" | "above6500" => Self::Above6500,
            _ => return None,
        };
        Some(band)
    }
}

impl fmt::Display for PlotAreaBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Buckets a plot area. Negative and NaN input land in the lowest band; callers
/// validate the area before relying on the result.
pub fn plot_area_to_band(area: f64) -> PlotAreaBand {
    if area.is_nan() {
        return PlotAreaBand::UpTo500;
    }

    PlotAreaBand::ordered()
        .into_iter()
        .find(|band| match band.upper_bound() {
            Some(bound) => area <= bound as f64,
            None => true,
        })
        .unwrap_or(PlotAreaBand::Above6500)
}

/// Rate-card developer labels keyed by the short codes used on the intake form.
pub fn normalize_developer_type(value: &str) -> String {
    let trimmed = value.trim();
    match trimmed.to_ascii_lowercase().as_str() {
        "cat1" => "Category 1".to_string(),
        "cat2" => "Category 2".to_string(),
        "cat3" => "Category 3".to_string(),
        "agent" => "Agent".to_string(),
        _ => trimmed.to_string(),
    }
}

fn normalize_label(value: &str) -> String {
    let cleaned = value.replace(['\u{feff}', '\u{200b}'], "");
    let collapsed = cleaned.split_whitespace().collect::<Vec<_>>().join(" ");
    collapsed.to_ascii_lowercase()
}
