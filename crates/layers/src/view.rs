use catalog::CountryEntry;
use formats::BoundaryCollection;
use foundation::{CountryKey, LatLon};
use selector::{CountrySelector, SelectionState};
use serde::Serialize;
use serde_json::Value;

use crate::markers::{Marker, overview_markers, species_markers};
use crate::overlays::{ImageOverlay, flag_overlays};
use crate::symbology::{CountryStyle, Palette, country_style};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CountryPolygon {
    pub key: String,
    /// GeoJSON feature id, when the boundary dataset carries one.
    pub feature_id: Option<String>,
    pub feature_name: String,
    pub tooltip: String,
    pub style: CountryStyle,
    pub geometry: Value,
}

/// Everything a map host needs for one render pass.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MapView {
    pub title: String,
    pub selected: Option<String>,
    /// `[lat, lon]` in degrees.
    pub center: [f64; 2],
    pub zoom: u32,
    pub polygons: Vec<CountryPolygon>,
    pub markers: Vec<Marker>,
    pub overlays: Vec<ImageOverlay>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct ViewOptions {
    pub base_center: LatLon,
    pub base_zoom: u32,
    /// Show every catalog species on the base map.
    pub overview_markers: bool,
    /// Lay country flags over the base map.
    pub flags: bool,
}

impl Default for ViewOptions {
    fn default() -> Self {
        Self {
            base_center: LatLon::new(0.0, -60.0),
            base_zoom: 3,
            overview_markers: true,
            flags: true,
        }
    }
}

/// Polygons for every boundary feature that resolves to a catalog country.
///
/// Each polygon is styled from its own resolved key.
pub fn country_polygons(
    selector: &CountrySelector,
    boundaries: &BoundaryCollection,
    highlighted: Option<&CountryKey>,
) -> Vec<CountryPolygon> {
    let palette = Palette::for_catalog(selector.catalog());
    selector
        .interactive(&boundaries.features, |f| f.name.as_deref())
        .into_iter()
        .map(|(key, feature)| {
            let feature_name = feature.name.clone().unwrap_or_default();
            CountryPolygon {
                key: key.as_str().to_string(),
                feature_id: feature.id.clone(),
                tooltip: selector.tooltip_for(&feature_name),
                style: country_style(&palette, key.as_str(), highlighted == Some(key)),
                geometry: feature.geometry.clone(),
                feature_name,
            }
        })
        .collect()
}

pub fn base_view(
    selector: &CountrySelector,
    boundaries: &BoundaryCollection,
    opts: &ViewOptions,
) -> MapView {
    let markers = if opts.overview_markers {
        overview_markers(selector.catalog())
    } else {
        Vec::new()
    };
    let overlays = if opts.flags {
        flag_overlays(selector.catalog())
    } else {
        Vec::new()
    };
    MapView {
        title: "Select a country by clicking on the map".to_string(),
        selected: None,
        center: opts.base_center.to_array(),
        zoom: opts.base_zoom,
        polygons: country_polygons(selector, boundaries, None),
        markers,
        overlays,
    }
}

/// Per-country view: the entry's species and its own highlighted outline.
pub fn detail_view(
    selector: &CountrySelector,
    entry: &CountryEntry,
    boundaries: &BoundaryCollection,
) -> MapView {
    let polygons = country_polygons(selector, boundaries, Some(&entry.key))
        .into_iter()
        .filter(|p| p.key == entry.key.as_str())
        .collect();
    MapView {
        title: format!("Endemic species in {}", entry.canonical_name),
        selected: Some(entry.key.as_str().to_string()),
        center: entry.center.to_array(),
        zoom: entry.default_zoom,
        polygons,
        markers: species_markers(entry),
        overlays: Vec::new(),
    }
}

/// Detail view for the current selection, or the base view when there is none.
pub fn render(
    selector: &CountrySelector,
    state: &SelectionState,
    boundaries: &BoundaryCollection,
    opts: &ViewOptions,
) -> MapView {
    match selector.current_selection(state) {
        Some(entry) => detail_view(selector, entry, boundaries),
        None => base_view(selector, boundaries, opts),
    }
}
