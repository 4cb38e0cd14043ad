use layers::geojson::GeoJsonLayerProps;
use layers::symbology::{Rgb, ThematicStyler};
use scene::{BasemapOptions, LightingEffect, ViewState};
use serde::Serialize;

use crate::error::ViewerError;

/// Environment variable holding the basemap access token.
pub const ACCESS_TOKEN_ENV: &str = "MapboxAccessToken";

pub const DEFAULT_DATA_URL: &str = "./buildings.geojson";
pub const DEFAULT_BASEMAP_STYLE: &str = "mapbox://styles/mapbox/light-v9";
pub const DEFAULT_BASEMAP_CONTAINER: &str = "map";
pub const DEFAULT_OVERLAY_CANVAS: &str = "deck-canvas";

/// Public basemap token (`pk.` prefix). The value never shows up in
/// `Debug` output or serialized config.
#[derive(Clone, PartialEq, Eq)]
pub struct AccessToken(String);

impl AccessToken {
    pub fn parse(raw: &str) -> Result<Self, ViewerError> {
        let token = raw.trim();
        if token.is_empty() {
            return Err(ViewerError::MissingAccessToken);
        }
        if token.chars().any(char::is_whitespace) {
            return Err(ViewerError::InvalidAccessToken {
                reason: "token contains whitespace",
            });
        }
        match token.strip_prefix("pk.") {
            Some(rest) if !rest.is_empty() => Ok(Self(token.to_string())),
            Some(_) => Err(ViewerError::InvalidAccessToken {
                reason: "token has no body after the pk. prefix",
            }),
            None => Err(ViewerError::InvalidAccessToken {
                reason: "expected a public token starting with pk.",
            }),
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Debug for AccessToken {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("AccessToken(pk.***)")
    }
}

/// Styling parameters of the building layer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyleConfig {
    pub year_thresholds: Vec<f64>,
    pub year_colors: Vec<Rgb>,
    pub unknown_color: Rgb,
    pub elevation_factor: f64,
}

impl StyleConfig {
    pub fn styler(&self) -> Result<ThematicStyler, ViewerError> {
        Ok(ThematicStyler::from_parts(
            self.year_thresholds.clone(),
            self.year_colors.clone(),
            self.unknown_color,
            self.elevation_factor,
        )?)
    }
}

impl Default for StyleConfig {
    fn default() -> Self {
        Self {
            year_thresholds: ThematicStyler::DEFAULT_YEAR_THRESHOLDS.to_vec(),
            year_colors: ThematicStyler::DEFAULT_COLORS.to_vec(),
            unknown_color: Rgb::GREY,
            elevation_factor: ThematicStyler::DEFAULT_ELEVATION_FACTOR,
        }
    }
}

/// Everything the viewer needs to start.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ViewerConfig {
    pub data_url: String,
    pub basemap_container: String,
    pub basemap_style: String,
    pub overlay_canvas: String,
    pub initial_view_state: ViewState,
    pub layer: GeoJsonLayerProps,
    pub style: StyleConfig,
    #[serde(skip)]
    pub lighting: LightingEffect,
    #[serde(skip)]
    pub access_token: Option<AccessToken>,
}

impl Default for ViewerConfig {
    fn default() -> Self {
        Self {
            data_url: DEFAULT_DATA_URL.to_string(),
            basemap_container: DEFAULT_BASEMAP_CONTAINER.to_string(),
            basemap_style: DEFAULT_BASEMAP_STYLE.to_string(),
            overlay_canvas: DEFAULT_OVERLAY_CANVAS.to_string(),
            initial_view_state: ViewState::INITIAL,
            layer: GeoJsonLayerProps::default(),
            style: StyleConfig::default(),
            lighting: LightingEffect::default(),
            access_token: None,
        }
    }
}

impl ViewerConfig {
    /// Defaults plus the token from the process environment, if any.
    ///
    /// A present but malformed token is an error; an absent one is not,
    /// callers that need tiles check [`ViewerConfig::access_token`].
    pub fn from_env() -> Result<Self, ViewerError> {
        let mut config = Self::default();
        if let Ok(raw) = std::env::var(ACCESS_TOKEN_ENV) {
            config.access_token = Some(AccessToken::parse(&raw)?);
        }
        Ok(config)
    }

    pub fn with_access_token(mut self, raw: &str) -> Result<Self, ViewerError> {
        self.access_token = Some(AccessToken::parse(raw)?);
        Ok(self)
    }

    pub fn access_token(&self) -> Result<&AccessToken, ViewerError> {
        self.access_token
            .as_ref()
            .ok_or(ViewerError::MissingAccessToken)
    }

    pub fn basemap_options(&self) -> BasemapOptions {
        BasemapOptions::new(
            self.basemap_container.clone(),
            self.basemap_style.clone(),
            &self.initial_view_state,
        )
    }
}
