use serde::{Deserialize, Serialize};

pub const DEFAULT_ZOOM: u32 = 4;

/// On-disk catalog layout.
///
/// Countries are a list rather than a JSON object so duplicate ids survive
/// parsing and can be rejected by validation.
#[derive(Debug, Default, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogDocument {
    pub countries: Vec<CountryDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CountryDocument {
    pub id: String,
    /// Display name; defaults to `id`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// `[lat, lon]` in degrees.
    pub center: [f64; 2],
    #[serde(default = "default_zoom")]
    pub zoom: u32,
    /// Flag image drawn over the country on the overview map.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub flag_url: Option<String>,
    #[serde(default)]
    pub species: Vec<SpeciesDocument>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpeciesDocument {
    pub common_name: String,
    pub scientific_name: String,
    #[serde(default)]
    pub blooming_conditions: String,
    #[serde(default)]
    pub image_url: String,
    /// `[lat, lon]` in degrees.
    pub coords: [f64; 2],
}

fn default_zoom() -> u32 {
    DEFAULT_ZOOM
}
