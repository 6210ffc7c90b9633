use std::collections::HashMap;

use catalog::Catalog;
use serde::Serialize;

/// Fill/stroke parameters for one country polygon.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct CountryStyle {
    pub fill_color: [f32; 4],
    pub stroke_color: [f32; 4],
    pub stroke_weight: f32,
    pub fill_opacity: f32,
}

const PALETTE: [[u8; 3]; 8] = [
    [0xfb, 0xb4, 0xae],
    [0xb3, 0xcd, 0xe3],
    [0xcc, 0xeb, 0xc5],
    [0xde, 0xcb, 0xe4],
    [0xfe, 0xd9, 0xa6],
    [0xff, 0xff, 0xcc],
    [0xe5, 0xd8, 0xbd],
    [0xfd, 0xda, 0xec],
];

const BLACK: [f32; 4] = [0.0, 0.0, 0.0, 1.0];
const RED: [f32; 4] = [1.0, 0.0, 0.0, 1.0];

/// Fill colors assigned to catalog countries.
///
/// Countries take palette slots in catalog order, so the first
/// `PALETTE.len()` countries never share a fill. Larger catalogs wrap around.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Palette {
    slots: HashMap<String, usize>,
}

impl Palette {
    pub fn for_catalog(catalog: &Catalog) -> Self {
        let slots = catalog
            .keys()
            .enumerate()
            .map(|(i, key)| (key.as_str().to_string(), i % PALETTE.len()))
            .collect();
        Self { slots }
    }

    /// Fill for `key`; keys outside the catalog fall back to [`hashed_color`].
    pub fn fill_for(&self, key: &str) -> [f32; 4] {
        match self.slots.get(key) {
            Some(&slot) => slot_color(slot),
            None => hashed_color(key),
        }
    }
}

/// Style for the polygon of country `key`.
///
/// Pure: depends only on its arguments, so every feature is styled with its
/// own key no matter how many features are styled or in which order.
pub fn country_style(palette: &Palette, key: &str, highlighted: bool) -> CountryStyle {
    let fill_color = palette.fill_for(key);
    if highlighted {
        CountryStyle {
            fill_color,
            stroke_color: RED,
            stroke_weight: 3.0,
            fill_opacity: 0.7,
        }
    } else {
        CountryStyle {
            fill_color,
            stroke_color: BLACK,
            stroke_weight: 1.5,
            fill_opacity: 0.5,
        }
    }
}

/// Palette entry picked by a content hash of `key`, stable across runs.
pub fn hashed_color(key: &str) -> [f32; 4] {
    let hash = blake3::hash(key.as_bytes());
    slot_color(hash.as_bytes()[0] as usize % PALETTE.len())
}

fn slot_color(slot: usize) -> [f32; 4] {
    let [r, g, b] = PALETTE[slot % PALETTE.len()];
    [r as f32 / 255.0, g as f32 / 255.0, b as f32 / 255.0, 1.0]
}
