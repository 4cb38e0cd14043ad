use foundation::math::{LonLat, MERCATOR_MAX_LAT_DEG, wrap_angle_deg, wrap_lon_deg};
use serde::{Deserialize, Serialize};

/// Camera pose of the interactive overlay, plus the limits it is held to.
///
/// Field names serialize in the overlay engine's camelCase convention so a
/// view state can be exchanged with the host page unchanged.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ViewState {
    pub longitude: f64,
    pub latitude: f64,
    pub zoom: f64,
    #[serde(default)]
    pub bearing: f64,
    #[serde(default)]
    pub pitch: f64,
    #[serde(default = "default_min_zoom")]
    pub min_zoom: f64,
    #[serde(default = "default_max_zoom")]
    pub max_zoom: f64,
    #[serde(default = "default_min_pitch")]
    pub min_pitch: f64,
    #[serde(default = "default_max_pitch")]
    pub max_pitch: f64,
}

fn default_min_zoom() -> f64 {
    0.0
}

fn default_max_zoom() -> f64 {
    20.0
}

fn default_min_pitch() -> f64 {
    0.0
}

fn default_max_pitch() -> f64 {
    60.0
}

impl ViewState {
    /// Starting pose over Beirut.
    pub const INITIAL: ViewState = ViewState {
        longitude: 35.52,
        latitude: 33.88,
        zoom: 14.0,
        bearing: 0.0,
        pitch: 45.0,
        min_zoom: 0.0,
        max_zoom: 16.0,
        min_pitch: 0.0,
        max_pitch: 60.0,
    };

    pub fn center(&self) -> LonLat {
        LonLat::new(self.longitude, self.latitude)
    }

    /// Copies the pose of `other` while keeping this state's limits.
    pub fn with_pose_of(self, other: &ViewState) -> Self {
        Self {
            longitude: other.longitude,
            latitude: other.latitude,
            zoom: other.zoom,
            bearing: other.bearing,
            pitch: other.pitch,
            ..self
        }
    }

    /// Applies the limits. Values already in range are returned bit-for-bit.
    pub fn constrained(self) -> Self {
        let longitude = if (-180.0..180.0).contains(&self.longitude) {
            self.longitude
        } else {
            wrap_lon_deg(self.longitude)
        };
        let bearing = if self.bearing > -180.0 && self.bearing <= 180.0 {
            self.bearing
        } else {
            wrap_angle_deg(self.bearing)
        };
        Self {
            longitude,
            latitude: self
                .latitude
                .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG),
            zoom: self.zoom.clamp(self.min_zoom, self.max_zoom),
            bearing,
            pitch: self.pitch.clamp(self.min_pitch, self.max_pitch),
            ..self
        }
    }

    pub fn is_finite(&self) -> bool {
        self.longitude.is_finite()
            && self.latitude.is_finite()
            && self.zoom.is_finite()
            && self.bearing.is_finite()
            && self.pitch.is_finite()
    }
}

impl Default for ViewState {
    fn default() -> Self {
        Self::INITIAL
    }
}

#[cfg(test)]
mod tests {
    use super::ViewState;

    #[test]
    fn initial_pose_matches_page_defaults() {
        let v = ViewState::INITIAL;
        assert_eq!(v.longitude, 35.52);
        assert_eq!(v.latitude, 33.88);
        assert_eq!(v.zoom, 14.0);
        assert_eq!(v.max_zoom, 16.0);
        assert_eq!(v.pitch, 45.0);
        assert_eq!(v.bearing, 0.0);
    }

    #[test]
    fn constrained_is_identity_in_range() {
        let v = ViewState {
            longitude: -10.0,
            latitude: 20.0,
            zoom: 10.0,
            bearing: 5.0,
            pitch: 30.0,
            ..ViewState::INITIAL
        };
        assert_eq!(v.constrained(), v);
    }

    #[test]
    fn constrained_clamps_zoom_and_pitch() {
        let v = ViewState {
            zoom: 22.0,
            pitch: 85.0,
            bearing: 190.0,
            longitude: 200.0,
            ..ViewState::INITIAL
        }
        .constrained();
        assert_eq!(v.zoom, 16.0);
        assert_eq!(v.pitch, 60.0);
        assert!((v.bearing - -170.0).abs() < 1e-9);
        assert!((v.longitude - -160.0).abs() < 1e-9);
    }

    #[test]
    fn deserializes_camel_case_pose_with_default_limits() {
        let v: ViewState = serde_json::from_str(
            r#"{"longitude":-10,"latitude":20,"zoom":10,"bearing":5,"pitch":30}"#,
        )
        .expect("parse view state");
        assert_eq!(v.longitude, -10.0);
        assert_eq!(v.max_zoom, 20.0);
        assert_eq!(v.max_pitch, 60.0);
    }

    #[test]
    fn with_pose_of_keeps_limits() {
        let other = ViewState {
            zoom: 3.0,
            max_zoom: 30.0,
            ..ViewState::INITIAL
        };
        let v = ViewState::INITIAL.with_pose_of(&other);
        assert_eq!(v.zoom, 3.0);
        assert_eq!(v.max_zoom, 16.0);
    }
}
