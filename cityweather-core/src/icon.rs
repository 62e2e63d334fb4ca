use serde::{Deserialize, Serialize};
use std::fmt;

/// Bundled image assets, referenced by build-time identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Asset {
    Clear,
    Cloud,
    Drizzle,
    Rain,
    Snow,
    Humidity,
    Wind,
    Search,
}

impl Asset {
    pub fn as_str(&self) -> &'static str {
        match self {
            Asset::Clear => "clear",
            Asset::Cloud => "cloud",
            Asset::Drizzle => "drizzle",
            Asset::Rain => "rain",
            Asset::Snow => "snow",
            Asset::Humidity => "humidity",
            Asset::Wind => "wind",
            Asset::Search => "search",
        }
    }

    /// File name of the bundled image.
    pub fn file_name(&self) -> &'static str {
        match self {
            Asset::Clear => "clear.png",
            Asset::Cloud => "cloud.png",
            Asset::Drizzle => "drizzle.png",
            Asset::Rain => "rain.png",
            Asset::Snow => "snow.png",
            Asset::Humidity => "humidity.png",
            Asset::Wind => "wind.png",
            Asset::Search => "search.png",
        }
    }

    /// Terminal stand-in for the image.
    pub fn glyph(&self) -> &'static str {
        match self {
            Asset::Clear => "☀",
            Asset::Cloud => "☁",
            Asset::Drizzle => "🌦",
            Asset::Rain => "🌧",
            Asset::Snow => "❄",
            Asset::Humidity => "💧",
            Asset::Wind => "🌬",
            Asset::Search => "🔍",
        }
    }

    pub const fn conditions() -> &'static [Asset] {
        &[Asset::Clear, Asset::Cloud, Asset::Drizzle, Asset::Rain, Asset::Snow]
    }
}

impl fmt::Display for Asset {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Every condition code the provider documents that has a bundled icon.
pub const CONDITION_CODES: [(&str, Asset); 14] = [
    ("01d", Asset::Clear),
    ("01n", Asset::Clear),
    ("02d", Asset::Cloud),
    ("02n", Asset::Cloud),
    ("03d", Asset::Cloud),
    ("03n", Asset::Cloud),
    ("04d", Asset::Drizzle),
    ("04n", Asset::Drizzle),
    ("09d", Asset::Rain),
    ("09n", Asset::Rain),
    ("10d", Asset::Rain),
    ("10n", Asset::Rain),
    ("13d", Asset::Snow),
    ("13n", Asset::Snow),
];

/// Used for any code [`lookup`] does not know.
pub const DEFAULT_ICON: Asset = Asset::Clear;

/// Partial lookup over the known condition codes. Case-sensitive.
pub fn lookup(code: &str) -> Option<Asset> {
    CONDITION_CODES
        .iter()
        .find(|(known, _)| *known == code)
        .map(|(_, asset)| *asset)
}

/// Resolve a provider condition code to a bundled icon, falling back to
/// [`DEFAULT_ICON`].
pub fn resolve_icon(code: &str) -> Asset {
    lookup(code).unwrap_or(DEFAULT_ICON)
}
