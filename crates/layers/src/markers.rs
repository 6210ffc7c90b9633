use std::borrow::Cow;

use catalog::{Catalog, CountryEntry, SpeciesRecord};
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Marker {
    /// `[lat, lon]` in degrees.
    pub position: [f64; 2],
    pub tooltip: String,
    pub popup_html: String,
}

impl Marker {
    pub fn for_species(record: &SpeciesRecord, tooltip: impl Into<String>) -> Self {
        Self {
            position: record.coordinates.to_array(),
            tooltip: tooltip.into(),
            popup_html: popup_html(record),
        }
    }
}

/// One marker per species of `entry`, in catalog order.
pub fn species_markers(entry: &CountryEntry) -> Vec<Marker> {
    entry
        .species
        .iter()
        .map(|sp| Marker::for_species(sp, sp.common_name.clone()))
        .collect()
}

/// Markers for every species in the catalog, tooltips prefixed with the country.
pub fn overview_markers(catalog: &Catalog) -> Vec<Marker> {
    let mut out = Vec::with_capacity(catalog.species_count());
    for entry in catalog.entries() {
        for sp in &entry.species {
            let tooltip = format!("{}: {}", entry.canonical_name, sp.common_name);
            out.push(Marker::for_species(sp, tooltip));
        }
    }
    out
}

pub fn popup_html(record: &SpeciesRecord) -> String {
    let mut html = format!(
        "<div class=\"species-popup\"><h4>{}</h4><i>{}</i><p>{}</p>",
        escape_html(&record.common_name),
        escape_html(&record.scientific_name),
        escape_html(&record.blooming_conditions),
    );
    if !record.image_url.is_empty() {
        html.push_str(&format!(
            "<img src=\"{}\" width=\"200\">",
            escape_html(&record.image_url)
        ));
    }
    html.push_str("</div>");
    html
}

pub fn escape_html(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for ch in text.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    Cow::Owned(out)
}
