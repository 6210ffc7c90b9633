use std::collections::HashMap;
use std::fs;
use std::path::Path;

use foundation::{CountryKey, LatLon};

pub mod document;

pub use document::*;

/// Bundled demo dataset: four countries with two species each.
pub const DEMO_CATALOG_JSON: &str = include_str!("../assets/demo_catalog.json");

#[derive(Debug, Clone, PartialEq)]
pub struct SpeciesRecord {
    pub common_name: String,
    pub scientific_name: String,
    pub blooming_conditions: String,
    pub image_url: String,
    pub coordinates: LatLon,
}

#[derive(Debug, Clone, PartialEq)]
pub struct CountryEntry {
    pub key: CountryKey,
    pub canonical_name: String,
    pub center: LatLon,
    pub default_zoom: u32,
    pub flag_url: Option<String>,
    /// May be empty; an empty list renders an empty detail view.
    pub species: Vec<SpeciesRecord>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CatalogError {
    InvalidRecord {
        country: String,
        species_index: Option<usize>,
        reason: String,
    },
    DuplicateKey(String),
    Parse(String),
    Io(String),
}

impl std::fmt::Display for CatalogError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CatalogError::InvalidRecord {
                country,
                species_index: Some(idx),
                reason,
            } => write!(f, "invalid species #{idx} in {country:?}: {reason}"),
            CatalogError::InvalidRecord {
                country,
                species_index: None,
                reason,
            } => write!(f, "invalid country entry {country:?}: {reason}"),
            CatalogError::DuplicateKey(key) => write!(f, "duplicate country id {key:?}"),
            CatalogError::Parse(msg) => write!(f, "catalog parse error: {msg}"),
            CatalogError::Io(msg) => write!(f, "catalog read error: {msg}"),
        }
    }
}

impl std::error::Error for CatalogError {}

#[derive(Debug, Clone, Copy)]
pub enum CatalogSource<'a> {
    Json(&'a str),
    Path(&'a Path),
    Demo,
}

/// Validated, read-only species catalog keyed by country.
///
/// Iteration follows the order of the source document.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Catalog {
    entries: Vec<CountryEntry>,
    index: HashMap<CountryKey, usize>,
}

pub fn load(source: CatalogSource<'_>) -> Result<Catalog, CatalogError> {
    match source {
        CatalogSource::Json(payload) => Catalog::from_json_str(payload),
        CatalogSource::Path(path) => Catalog::from_path(path),
        CatalogSource::Demo => Catalog::demo(),
    }
}

impl Catalog {
    pub fn demo() -> Result<Self, CatalogError> {
        Self::from_json_str(DEMO_CATALOG_JSON)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self, CatalogError> {
        let path = path.as_ref();
        let payload = fs::read_to_string(path)
            .map_err(|e| CatalogError::Io(format!("{}: {e}", path.display())))?;
        Self::from_json_str(&payload)
    }

    pub fn from_json_str(payload: &str) -> Result<Self, CatalogError> {
        let doc = serde_json::from_str::<CatalogDocument>(payload)
            .map_err(|e| CatalogError::Parse(e.to_string()))?;
        Self::from_document(doc)
    }

    pub fn from_document(doc: CatalogDocument) -> Result<Self, CatalogError> {
        let mut entries: Vec<CountryEntry> = Vec::with_capacity(doc.countries.len());
        let mut index: HashMap<CountryKey, usize> = HashMap::with_capacity(doc.countries.len());

        for country in doc.countries {
            let entry = validate_country(country)?;
            if index.contains_key(entry.key.as_str()) {
                return Err(CatalogError::DuplicateKey(entry.key.into_string()));
            }
            index.insert(entry.key.clone(), entries.len());
            entries.push(entry);
        }

        Ok(Self { entries, index })
    }

    pub fn get(&self, key: &str) -> Option<&CountryEntry> {
        self.index.get(key).map(|&i| &self.entries[i])
    }

    pub fn contains(&self, key: &str) -> bool {
        self.index.contains_key(key)
    }

    pub fn keys(&self) -> impl Iterator<Item = &CountryKey> + '_ {
        self.entries.iter().map(|e| &e.key)
    }

    pub fn entries(&self) -> &[CountryEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn species_count(&self) -> usize {
        self.entries.iter().map(|e| e.species.len()).sum()
    }

    pub fn to_document(&self) -> CatalogDocument {
        let countries = self
            .entries
            .iter()
            .map(|e| CountryDocument {
                id: e.key.as_str().to_string(),
                name: (e.canonical_name != e.key.as_str()).then(|| e.canonical_name.clone()),
                center: e.center.to_array(),
                zoom: e.default_zoom,
                flag_url: e.flag_url.clone(),
                species: e
                    .species
                    .iter()
                    .map(|s| SpeciesDocument {
                        common_name: s.common_name.clone(),
                        scientific_name: s.scientific_name.clone(),
                        blooming_conditions: s.blooming_conditions.clone(),
                        image_url: s.image_url.clone(),
                        coords: s.coordinates.to_array(),
                    })
                    .collect(),
            })
            .collect();
        CatalogDocument { countries }
    }

    /// Content fingerprint (BLAKE3, hex) over every field in document order.
    pub fn fingerprint(&self) -> String {
        let mut hasher = blake3::Hasher::new();
        for e in &self.entries {
            hash_str(&mut hasher, e.key.as_str());
            hash_str(&mut hasher, &e.canonical_name);
            hash_coords(&mut hasher, e.center);
            hasher.update(&e.default_zoom.to_le_bytes());
            match &e.flag_url {
                Some(url) => {
                    hasher.update(&[1]);
                    hash_str(&mut hasher, url);
                }
                None => {
                    hasher.update(&[0]);
                }
            }
            hasher.update(&(e.species.len() as u64).to_le_bytes());
            for s in &e.species {
                hash_str(&mut hasher, &s.common_name);
                hash_str(&mut hasher, &s.scientific_name);
                hash_str(&mut hasher, &s.blooming_conditions);
                hash_str(&mut hasher, &s.image_url);
                hash_coords(&mut hasher, s.coordinates);
            }
        }
        hasher.finalize().to_hex().to_string()
    }
}

fn validate_country(doc: CountryDocument) -> Result<CountryEntry, CatalogError> {
    let invalid = |species_index: Option<usize>, reason: String| CatalogError::InvalidRecord {
        country: doc.id.clone(),
        species_index,
        reason,
    };

    if doc.id.is_empty() {
        return Err(invalid(None, "country id must not be empty".to_string()));
    }
    if doc.zoom == 0 {
        return Err(invalid(None, "zoom must be greater than zero".to_string()));
    }
    if doc.flag_url.as_deref().is_some_and(|url| url.trim().is_empty()) {
        return Err(invalid(None, "flag_url must not be blank".to_string()));
    }
    let center = LatLon::from_array(doc.center)
        .validate()
        .map_err(|e| invalid(None, format!("center: {e}")))?;

    let mut species = Vec::with_capacity(doc.species.len());
    for (idx, sp) in doc.species.iter().enumerate() {
        let coordinates = LatLon::from_array(sp.coords)
            .validate()
            .map_err(|e| invalid(Some(idx), e.to_string()))?;
        species.push(SpeciesRecord {
            common_name: sp.common_name.clone(),
            scientific_name: sp.scientific_name.clone(),
            blooming_conditions: sp.blooming_conditions.clone(),
            image_url: sp.image_url.clone(),
            coordinates,
        });
    }

    Ok(CountryEntry {
        canonical_name: doc.name.clone().unwrap_or_else(|| doc.id.clone()),
        key: CountryKey::new(doc.id),
        center,
        default_zoom: doc.zoom,
        flag_url: doc.flag_url.clone(),
        species,
    })
}

fn hash_str(hasher: &mut blake3::Hasher, s: &str) {
    hasher.update(&(s.len() as u64).to_le_bytes());
    hasher.update(s.as_bytes());
}

fn hash_coords(hasher: &mut blake3::Hasher, p: LatLon) {
    hasher.update(&p.lat_deg.to_le_bytes());
    hasher.update(&p.lon_deg.to_le_bytes());
}
