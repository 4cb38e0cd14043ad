use formats::{DatasetError, DatasetLoadError};
use layers::symbology::ScaleError;

#[derive(Debug)]
pub enum ViewerError {
    /// No basemap token was configured.
    MissingAccessToken,
    InvalidAccessToken { reason: &'static str },
    DatasetFetch { url: String, reason: String },
    Dataset(DatasetError),
    DatasetLoad(DatasetLoadError),
    Style(ScaleError),
    InvalidViewState(String),
}

impl std::fmt::Display for ViewerError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViewerError::MissingAccessToken => write!(
                f,
                "basemap access token missing: set {}",
                crate::config::ACCESS_TOKEN_ENV
            ),
            ViewerError::InvalidAccessToken { reason } => {
                write!(f, "invalid basemap access token: {reason}")
            }
            ViewerError::DatasetFetch { url, reason } => {
                write!(f, "failed to fetch dataset {url}: {reason}")
            }
            ViewerError::Dataset(e) => write!(f, "dataset error: {e}"),
            ViewerError::DatasetLoad(e) => write!(f, "{e}"),
            ViewerError::Style(e) => write!(f, "invalid color thresholds: {e}"),
            ViewerError::InvalidViewState(reason) => write!(f, "invalid view state: {reason}"),
        }
    }
}

impl std::error::Error for ViewerError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            ViewerError::Dataset(e) => Some(e),
            ViewerError::DatasetLoad(e) => Some(e),
            ViewerError::Style(e) => Some(e),
            _ => None,
        }
    }
}

impl From<DatasetError> for ViewerError {
    fn from(e: DatasetError) -> Self {
        ViewerError::Dataset(e)
    }
}

impl From<DatasetLoadError> for ViewerError {
    fn from(e: DatasetLoadError) -> Self {
        ViewerError::DatasetLoad(e)
    }
}

impl From<ScaleError> for ViewerError {
    fn from(e: ScaleError) -> Self {
        ViewerError::Style(e)
    }
}
