use serde_json::{Map, Value};

/// Property holding the country name in common world boundary datasets.
pub const DEFAULT_NAME_PROPERTY: &str = "name";

/// One boundary polygon with its display name.
///
/// The geometry is kept as raw GeoJSON and handed to the renderer untouched.
#[derive(Debug, Clone, PartialEq)]
pub struct BoundaryFeature {
    pub id: Option<String>,
    /// `None` when the name property is missing or not a string; such
    /// features are drawn but never clickable.
    pub name: Option<String>,
    pub geometry: Value,
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct BoundaryCollection {
    pub features: Vec<BoundaryFeature>,
    /// Features dropped for carrying a null, missing or non-areal geometry.
    pub skipped: usize,
}

#[derive(Debug)]
pub enum BoundaryError {
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for BoundaryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BoundaryError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            BoundaryError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for BoundaryError {}

impl BoundaryCollection {
    pub fn empty() -> Self {
        Self::default()
    }

    pub fn from_geojson_str(payload: &str) -> Result<Self, BoundaryError> {
        Self::from_geojson_str_with_property(payload, DEFAULT_NAME_PROPERTY)
    }

    pub fn from_geojson_str_with_property(
        payload: &str,
        name_property: &str,
    ) -> Result<Self, BoundaryError> {
        let value: Value =
            serde_json::from_str(payload).map_err(|e| BoundaryError::InvalidFeature {
                index: 0,
                reason: format!("JSON parse error: {e}"),
            })?;
        Self::from_geojson_value(value, name_property)
    }

    pub fn from_geojson_value(value: Value, name_property: &str) -> Result<Self, BoundaryError> {
        let Value::Object(mut obj) = value else {
            return Err(BoundaryError::NotAFeatureCollection);
        };
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(BoundaryError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(BoundaryError::NotAFeatureCollection);
        }

        let Some(Value::Array(features_val)) = obj.remove("features") else {
            return Err(BoundaryError::NotAFeatureCollection);
        };

        let mut features = Vec::with_capacity(features_val.len());
        let mut skipped = 0;
        for (index, feat_val) in features_val.into_iter().enumerate() {
            let Value::Object(feat_obj) = feat_val else {
                return Err(BoundaryError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                });
            };
            match parse_feature(feat_obj, name_property)
                .map_err(|reason| BoundaryError::InvalidFeature { index, reason })?
            {
                Some(feature) => features.push(feature),
                None => skipped += 1,
            }
        }

        Ok(Self { features, skipped })
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }

    /// Names of the named features, in input order.
    pub fn names(&self) -> impl Iterator<Item = &str> + '_ {
        self.features.iter().filter_map(|f| f.name.as_deref())
    }
}

/// `Ok(None)` for a well-formed feature that has no polygon to draw.
fn parse_feature(
    mut feat_obj: Map<String, Value>,
    name_property: &str,
) -> Result<Option<BoundaryFeature>, String> {
    let feat_type = feat_obj
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("feature missing type".to_string())?;
    if feat_type != "Feature" {
        return Err(format!("unexpected feature type: {feat_type}"));
    }

    let id = match feat_obj.get("id") {
        Some(Value::String(s)) => Some(s.clone()),
        Some(Value::Number(n)) => Some(n.to_string()),
        _ => None,
    };

    let name = feat_obj
        .get("properties")
        .and_then(|v| v.as_object())
        .and_then(|props| props.get(name_property))
        .and_then(|v| v.as_str())
        .map(str::to_string);

    let geometry = match feat_obj.remove("geometry") {
        None | Some(Value::Null) => return Ok(None),
        Some(Value::Object(g)) => g,
        Some(_) => return Err("geometry must be an object or null".to_string()),
    };
    let geom_type = geometry
        .get("type")
        .and_then(|v| v.as_str())
        .ok_or("geometry missing type".to_string())?;
    if !matches!(geom_type, "Polygon" | "MultiPolygon") {
        return Ok(None);
    }

    Ok(Some(BoundaryFeature {
        id,
        name,
        geometry: Value::Object(geometry),
    }))
}
