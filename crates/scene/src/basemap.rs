use serde::{Deserialize, Serialize};

use crate::view_state::ViewState;

/// Camera target accepted by the basemap's instant `jumpTo`.
#[derive(Debug, Copy, Clone, PartialEq, Serialize, Deserialize)]
pub struct CameraOptions {
    /// `[longitude, latitude]` in degrees.
    pub center: [f64; 2],
    pub zoom: f64,
    pub bearing: f64,
    pub pitch: f64,
}

impl CameraOptions {
    pub fn longitude(&self) -> f64 {
        self.center[0]
    }

    pub fn latitude(&self) -> f64 {
        self.center[1]
    }
}

impl From<&ViewState> for CameraOptions {
    fn from(v: &ViewState) -> Self {
        Self {
            center: [v.longitude, v.latitude],
            zoom: v.zoom,
            bearing: v.bearing,
            pitch: v.pitch,
        }
    }
}

/// Construction options handed to the basemap library.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BasemapOptions {
    /// DOM id of the element the basemap draws into.
    pub container: String,
    pub style: String,
    /// Off: the overlay owns all input and drives the basemap camera.
    pub interactive: bool,
    #[serde(flatten)]
    pub camera: CameraOptions,
}

impl BasemapOptions {
    pub fn new(container: impl Into<String>, style: impl Into<String>, initial: &ViewState) -> Self {
        Self {
            container: container.into(),
            style: style.into(),
            interactive: false,
            camera: CameraOptions::from(initial),
        }
    }
}

/// The tile-rendering map underneath the overlay.
///
/// Implementations apply camera jumps without animation. A basemap that has
/// not finished loading its style reports `is_loaded() == false`; callers
/// hold camera updates until it has.
pub trait Basemap {
    fn is_loaded(&self) -> bool;
    fn jump_to(&mut self, camera: CameraOptions);
    fn camera(&self) -> CameraOptions;
}

/// In-memory basemap: tracks the camera without drawing anything.
///
/// Used by the headless viewer and as a stand-in wherever no real map
/// library is attached.
#[derive(Debug, Clone, PartialEq)]
pub struct HeadlessBasemap {
    options: BasemapOptions,
    camera: CameraOptions,
    loaded: bool,
    jumps: u64,
}

impl HeadlessBasemap {
    pub fn new(options: BasemapOptions) -> Self {
        Self {
            camera: options.camera,
            options,
            loaded: false,
            jumps: 0,
        }
    }

    /// Same as [`HeadlessBasemap::new`] but already loaded.
    pub fn loaded(options: BasemapOptions) -> Self {
        Self {
            loaded: true,
            ..Self::new(options)
        }
    }

    pub fn set_loaded(&mut self) {
        self.loaded = true;
    }

    pub fn options(&self) -> &BasemapOptions {
        &self.options
    }

    pub fn jump_count(&self) -> u64 {
        self.jumps
    }
}

impl Basemap for HeadlessBasemap {
    fn is_loaded(&self) -> bool {
        self.loaded
    }

    fn jump_to(&mut self, camera: CameraOptions) {
        self.camera = camera;
        self.jumps += 1;
    }

    fn camera(&self) -> CameraOptions {
        self.camera
    }
}

#[cfg(test)]
mod tests {
    use super::{Basemap, BasemapOptions, CameraOptions, HeadlessBasemap};
    use crate::view_state::ViewState;

    #[test]
    fn options_start_at_initial_view() {
        let opts = BasemapOptions::new("map", "mapbox://styles/mapbox/light-v9", &ViewState::INITIAL);
        assert!(!opts.interactive);
        assert_eq!(opts.camera.center, [35.52, 33.88]);
        assert_eq!(opts.camera.zoom, 14.0);
        assert_eq!(opts.camera.pitch, 45.0);
    }

    #[test]
    fn options_serialize_flat_like_the_map_constructor() {
        let opts = BasemapOptions::new("map", "style", &ViewState::INITIAL);
        let json = serde_json::to_value(&opts).expect("serialize");
        assert_eq!(json["container"], "map");
        assert_eq!(json["interactive"], false);
        assert_eq!(json["center"][0], 35.52);
        assert_eq!(json["bearing"], 0.0);
    }

    #[test]
    fn headless_jump_replaces_camera() {
        let mut map = HeadlessBasemap::loaded(BasemapOptions::new("map", "s", &ViewState::INITIAL));
        let cam = CameraOptions {
            center: [-10.0, 20.0],
            zoom: 10.0,
            bearing: 5.0,
            pitch: 30.0,
        };
        map.jump_to(cam);
        assert_eq!(map.camera(), cam);
        assert_eq!(map.jump_count(), 1);
    }

    #[test]
    fn headless_starts_unloaded() {
        let mut map = HeadlessBasemap::new(BasemapOptions::new("map", "s", &ViewState::INITIAL));
        assert!(!map.is_loaded());
        map.set_loaded();
        assert!(map.is_loaded());
    }
}
