use std::fs;
use std::path::{Path, PathBuf};

use crate::buildings::{BuildingDataset, DatasetError};

#[derive(Debug)]
pub enum DatasetLoadError {
    Io {
        path: PathBuf,
        source: std::io::Error,
    },
    Parse {
        path: PathBuf,
        source: DatasetError,
    },
}

impl std::fmt::Display for DatasetLoadError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DatasetLoadError::Io { path, source } => {
                write!(f, "failed to read dataset {}: {source}", path.display())
            }
            DatasetLoadError::Parse { path, source } => {
                write!(f, "failed to parse dataset {}: {source}", path.display())
            }
        }
    }
}

impl std::error::Error for DatasetLoadError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            DatasetLoadError::Io { source, .. } => Some(source),
            DatasetLoadError::Parse { source, .. } => Some(source),
        }
    }
}

pub fn load_buildings(path: impl AsRef<Path>) -> Result<BuildingDataset, DatasetLoadError> {
    let path = path.as_ref();
    let payload = fs::read_to_string(path).map_err(|e| DatasetLoadError::Io {
        path: path.to_path_buf(),
        source: e,
    })?;
    BuildingDataset::from_geojson_str(&payload).map_err(|e| DatasetLoadError::Parse {
        path: path.to_path_buf(),
        source: e,
    })
}
