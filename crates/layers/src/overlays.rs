use catalog::{Catalog, CountryEntry};
use foundation::{LAT_MAX_DEG, LAT_MIN_DEG, LON_MAX_DEG, LON_MIN_DEG};
use serde::Serialize;

/// Half extent of a flag image around its country's center, in degrees.
pub const FLAG_HALF_SPAN_LAT_DEG: f64 = 10.0;
pub const FLAG_HALF_SPAN_LON_DEG: f64 = 15.0;
pub const FLAG_OPACITY: f32 = 0.4;

/// A georeferenced image laid over the map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ImageOverlay {
    pub country: String,
    pub image_url: String,
    /// `[[south, west], [north, east]]` in degrees.
    pub bounds: [[f64; 2]; 2],
    pub opacity: f32,
}

impl ImageOverlay {
    /// Flag of `entry` centered on its map center, clamped to valid coordinates.
    pub fn flag(entry: &CountryEntry) -> Option<Self> {
        let url = entry.flag_url.as_ref()?;
        let c = entry.center;
        let south = (c.lat_deg - FLAG_HALF_SPAN_LAT_DEG).max(LAT_MIN_DEG);
        let north = (c.lat_deg + FLAG_HALF_SPAN_LAT_DEG).min(LAT_MAX_DEG);
        let west = (c.lon_deg - FLAG_HALF_SPAN_LON_DEG).max(LON_MIN_DEG);
        let east = (c.lon_deg + FLAG_HALF_SPAN_LON_DEG).min(LON_MAX_DEG);
        Some(Self {
            country: entry.key.as_str().to_string(),
            image_url: url.clone(),
            bounds: [[south, west], [north, east]],
            opacity: FLAG_OPACITY,
        })
    }
}

/// Flag overlays for every catalog country that has one, in catalog order.
pub fn flag_overlays(catalog: &Catalog) -> Vec<ImageOverlay> {
    catalog.entries().iter().filter_map(ImageOverlay::flag).collect()
}
