use serde_json::{Map, Value};

use crate::geometry::Footprint;

/// Property holding the construction year.
pub const YEAR_COMPLETED_KEY: &str = "Yr_Comp";
/// Property holding the vacancy ratio.
pub const VACANCY_RATE_KEY: &str = "vacancy_ap";

#[derive(Debug, Clone, PartialEq)]
pub struct BuildingFeature {
    /// Position of the feature in the source collection.
    pub index: usize,
    pub id: Option<String>,
    pub footprint: Footprint,
    pub year_completed: f64,
    pub vacancy_rate: f64,
    pub properties: Map<String, Value>,
}

/// Why a single feature was left out of the dataset.
#[derive(Debug, Clone, PartialEq)]
pub enum FeatureError {
    MalformedGeometry(String),
    MissingAttribute { key: &'static str },
    NonNumericAttribute { key: &'static str, found: String },
}

impl std::fmt::Display for FeatureError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FeatureError::MalformedGeometry(reason) => write!(f, "malformed geometry: {reason}"),
            FeatureError::MissingAttribute { key } => write!(f, "missing attribute {key}"),
            FeatureError::NonNumericAttribute { key, found } => {
                write!(f, "attribute {key} is not a number: {found}")
            }
        }
    }
}

impl std::error::Error for FeatureError {}

#[derive(Debug, Clone, PartialEq)]
pub struct RejectedFeature {
    pub index: usize,
    pub id: Option<String>,
    pub error: FeatureError,
}

/// Errors that make the whole payload unusable.
#[derive(Debug)]
pub enum DatasetError {
    Json(serde_json::Error),
    NotAFeatureCollection,
    InvalidFeature { index: usize, reason: String },
}

impl std::fmt::Display for DatasetError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetError::Json(e) => write!(f, "JSON parse error: {e}"),
            DatasetError::NotAFeatureCollection => {
                write!(f, "expected GeoJSON FeatureCollection")
            }
            DatasetError::InvalidFeature { index, reason } => {
                write!(f, "invalid feature at index {index}: {reason}")
            }
        }
    }
}

impl std::error::Error for DatasetError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetError::Json(e) => Some(e),
            _ => None,
        }
    }
}

/// Building footprints loaded once per session.
///
/// Features whose geometry or styling attributes are unusable are kept out of
/// `features` and listed in `rejected` instead of failing the whole load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct BuildingDataset {
    pub features: Vec<BuildingFeature>,
    pub rejected: Vec<RejectedFeature>,
}

impl BuildingDataset {
    pub fn from_geojson_str(payload: &str) -> Result<Self, DatasetError> {
        let value: Value = serde_json::from_str(payload).map_err(DatasetError::Json)?;
        Self::from_geojson_value(&value)
    }

    pub fn from_geojson_value(value: &Value) -> Result<Self, DatasetError> {
        let obj = value
            .as_object()
            .ok_or(DatasetError::NotAFeatureCollection)?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or(DatasetError::NotAFeatureCollection)?;
        if ty != "FeatureCollection" {
            return Err(DatasetError::NotAFeatureCollection);
        }

        let features_val = obj
            .get("features")
            .and_then(|v| v.as_array())
            .ok_or(DatasetError::NotAFeatureCollection)?;

        let mut out = Self::default();
        for (index, feat_val) in features_val.iter().enumerate() {
            let feat_obj = feat_val
                .as_object()
                .ok_or(DatasetError::InvalidFeature {
                    index,
                    reason: "feature must be an object".to_string(),
                })?;

            let feat_type = feat_obj.get("type").and_then(|v| v.as_str()).ok_or(
                DatasetError::InvalidFeature {
                    index,
                    reason: "feature missing type".to_string(),
                },
            )?;
            if feat_type != "Feature" {
                return Err(DatasetError::InvalidFeature {
                    index,
                    reason: format!("unexpected feature type: {feat_type}"),
                });
            }

            let id = match feat_obj.get("id") {
                Some(Value::String(s)) => Some(s.clone()),
                Some(Value::Number(n)) => Some(n.to_string()),
                _ => None,
            };

            let properties = feat_obj
                .get("properties")
                .and_then(|v| v.as_object())
                .cloned()
                .unwrap_or_default();

            match parse_building(index, id.clone(), feat_obj.get("geometry"), properties) {
                Ok(feature) => out.features.push(feature),
                Err(error) => out.rejected.push(RejectedFeature { index, id, error }),
            }
        }

        Ok(out)
    }

    pub fn len(&self) -> usize {
        self.features.len()
    }

    pub fn is_empty(&self) -> bool {
        self.features.is_empty()
    }
}

fn parse_building(
    index: usize,
    id: Option<String>,
    geometry: Option<&Value>,
    properties: Map<String, Value>,
) -> Result<BuildingFeature, FeatureError> {
    let footprint = match geometry {
        None | Some(Value::Null) => {
            return Err(FeatureError::MalformedGeometry(
                "feature has no geometry".to_string(),
            ));
        }
        Some(g) => Footprint::from_geojson_geometry(g).map_err(FeatureError::MalformedGeometry)?,
    };
    let year_completed = numeric_attribute(&properties, YEAR_COMPLETED_KEY)?;
    let vacancy_rate = numeric_attribute(&properties, VACANCY_RATE_KEY)?;

    Ok(BuildingFeature {
        index,
        id,
        footprint,
        year_completed,
        vacancy_rate,
        properties,
    })
}

fn numeric_attribute(props: &Map<String, Value>, key: &'static str) -> Result<f64, FeatureError> {
    match props.get(key) {
        None | Some(Value::Null) => Err(FeatureError::MissingAttribute { key }),
        Some(v) => v.as_f64().ok_or_else(|| FeatureError::NonNumericAttribute {
            key,
            found: v.to_string(),
        }),
    }
}
