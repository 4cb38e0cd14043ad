//! The interactive overlay: owns the view state, the layers and the lights.
//!
//! Camera changes leave the overlay only as [`ViewerEvent`]s on the bus it is
//! handed; it never touches the basemap directly.

use formats::BuildingDataset;
use foundation::math::LonLat;
use layers::geojson::{GeoJsonLayer, GeoJsonLayerSnapshot, StyledBuilding};
use layers::polygon::{PolygonLayer, PolygonLayerSnapshot};
use layers::symbology::Rgb;
use runtime::EventBus;
use scene::{
    ControllerOptions, Interaction, LightingEffect, LightingSnapshot, MapController, ViewState,
    Viewport,
};
use serde::Serialize;
use tracing::{debug, trace, warn};

use crate::config::ViewerConfig;
use crate::error::ViewerError;

#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    ViewStateChanged(ViewState),
}

/// Everything a renderer needs for one frame, serialized for the host.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LayerData {
    pub view_state: ViewState,
    pub lighting: LightingSnapshot,
    pub ground: PolygonLayerSnapshot,
    pub buildings: GeoJsonLayerSnapshot,
}

/// What picking reports about the building under the cursor.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PickInfo {
    pub feature_index: usize,
    pub id: Option<String>,
    pub coordinate: [f64; 2],
    pub year_completed: f64,
    pub vacancy_rate: f64,
    pub fill_color: Rgb,
    pub elevation: f64,
}

impl PickInfo {
    fn new(b: &StyledBuilding, at: LonLat) -> Self {
        Self {
            feature_index: b.feature_index,
            id: b.id.clone(),
            coordinate: [at.lon_deg, at.lat_deg],
            year_completed: b.year_completed,
            vacancy_rate: b.vacancy_rate,
            fill_color: b.fill_color,
            elevation: b.elevation,
        }
    }
}

pub struct Deck {
    view_state: ViewState,
    initial_view_state: ViewState,
    controller: MapController,
    ground: PolygonLayer,
    buildings: GeoJsonLayer,
    lighting: LightingEffect,
}

impl Deck {
    pub fn new(config: &ViewerConfig) -> Result<Self, ViewerError> {
        let limits = &config.initial_view_state;
        if !(limits.min_zoom <= limits.max_zoom && limits.min_pitch <= limits.max_pitch) {
            return Err(ViewerError::InvalidViewState(format!(
                "zoom range [{}, {}] or pitch range [{}, {}] is empty",
                limits.min_zoom, limits.max_zoom, limits.min_pitch, limits.max_pitch
            )));
        }
        let initial = config.initial_view_state.constrained();
        if !initial.is_finite() {
            return Err(ViewerError::InvalidViewState(
                "initial view state is not finite".to_string(),
            ));
        }
        Ok(Self {
            view_state: initial,
            initial_view_state: initial,
            controller: MapController::new(ControllerOptions::default(), Viewport::default()),
            ground: PolygonLayer::ground(),
            buildings: GeoJsonLayer::new("geojson", config.layer, config.style.styler()?),
            lighting: config.lighting,
        })
    }

    pub fn view_state(&self) -> &ViewState {
        &self.view_state
    }

    pub fn viewport(&self) -> Viewport {
        self.controller.viewport()
    }

    pub fn buildings(&self) -> &GeoJsonLayer {
        &self.buildings
    }

    pub fn ground(&self) -> &PolygonLayer {
        &self.ground
    }

    pub fn lighting(&self) -> &LightingEffect {
        &self.lighting
    }

    /// Feeds one input through the controller. Publishes and returns the
    /// new view state when the camera moved.
    pub fn handle(
        &mut self,
        input: Interaction,
        bus: &mut EventBus<ViewerEvent>,
    ) -> Option<ViewState> {
        let next = self.controller.handle(&self.view_state, input)?;
        if !next.is_finite() {
            warn!(?input, "interaction produced a non-finite pose, ignoring");
            return None;
        }
        Some(self.commit(next, bus))
    }

    /// Programmatic camera change. The pose is clamped to the current limits.
    pub fn set_view_state(
        &mut self,
        view_state: ViewState,
        bus: &mut EventBus<ViewerEvent>,
    ) -> Result<ViewState, ViewerError> {
        if !view_state.is_finite() {
            return Err(ViewerError::InvalidViewState(format!(
                "non-finite pose {view_state:?}"
            )));
        }
        let next = self.view_state.with_pose_of(&view_state).constrained();
        Ok(self.commit(next, bus))
    }

    pub fn reset(&mut self, bus: &mut EventBus<ViewerEvent>) -> ViewState {
        self.commit(self.initial_view_state, bus)
    }

    fn commit(&mut self, next: ViewState, bus: &mut EventBus<ViewerEvent>) -> ViewState {
        self.view_state = next;
        let seq = bus.publish(ViewerEvent::ViewStateChanged(next));
        debug!(
            seq,
            longitude = next.longitude,
            latitude = next.latitude,
            zoom = next.zoom,
            bearing = next.bearing,
            pitch = next.pitch,
            "view state changed"
        );
        next
    }

    pub fn set_data(&mut self, dataset: &BuildingDataset) {
        self.buildings.set_data(dataset);
        for b in self.buildings.buildings() {
            trace!(
                index = b.feature_index,
                year = b.year_completed,
                color = ?b.fill_color.0,
                elevation = b.elevation,
                "styled building"
            );
        }
    }

    /// Building under the screen position `(x, y)` in CSS pixels.
    pub fn pick(&self, x: f64, y: f64) -> Option<PickInfo> {
        let at = self.viewport().unproject(&self.view_state, [x, y]);
        self.pick_lon_lat(at)
    }

    pub fn pick_lon_lat(&self, at: LonLat) -> Option<PickInfo> {
        self.buildings
            .pick([at.lon_deg, at.lat_deg])
            .map(|b| PickInfo::new(b, at))
    }

    pub fn layer_data(&self) -> LayerData {
        LayerData {
            view_state: self.view_state,
            lighting: self.lighting.snapshot(self.view_state.center()),
            ground: self.ground.snapshot(),
            buildings: self.buildings.snapshot(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::{Deck, ViewerEvent};
    use crate::config::ViewerConfig;
    use formats::BuildingDataset;
    use foundation::math::LonLat;
    use layers::symbology::Rgb;
    use pretty_assertions::assert_eq;
    use runtime::EventBus;
    use scene::{Interaction, PointerButton, ViewState};

    fn demo_deck() -> Deck {
        let payload = include_str!("../../apps/viewer_web/assets/buildings.geojson");
        let ds = BuildingDataset::from_geojson_str(payload).expect("parse");
        let mut deck = Deck::new(&ViewerConfig::default()).expect("deck");
        deck.set_data(&ds);
        deck
    }

    #[test]
    fn drag_publishes_view_state() {
        let mut deck = demo_deck();
        let mut bus = EventBus::new();
        let sub = bus.subscribe();
        let down = Interaction::PointerDown {
            x: 100.0,
            y: 100.0,
            button: PointerButton::Primary,
        };
        assert!(deck.handle(down, &mut bus).is_none());
        let vs = deck
            .handle(Interaction::PointerMove { x: 150.0, y: 100.0 }, &mut bus)
            .expect("moved");
        assert!(vs.longitude < ViewState::INITIAL.longitude);

        let events = bus.drain(&sub);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0].event, ViewerEvent::ViewStateChanged(vs));
    }

    #[test]
    fn non_finite_pointer_input_is_ignored() {
        let mut deck = demo_deck();
        let mut bus = EventBus::new();
        let sub = bus.subscribe();
        let down = Interaction::PointerDown {
            x: 100.0,
            y: 100.0,
            button: PointerButton::Primary,
        };
        deck.handle(down, &mut bus);
        let moved = deck.handle(
            Interaction::PointerMove {
                x: f64::NAN,
                y: 100.0,
            },
            &mut bus,
        );
        assert!(moved.is_none());
        assert_eq!(bus.pending(&sub), 0);
        assert_eq!(*deck.view_state(), ViewState::INITIAL);

        // The drag survives and keeps panning from the last good position.
        let vs = deck
            .handle(Interaction::PointerMove { x: 150.0, y: 100.0 }, &mut bus)
            .expect("moved");
        assert!(vs.is_finite());
        assert!(vs.longitude < ViewState::INITIAL.longitude);
    }

    #[test]
    fn set_view_state_keeps_limits() {
        let mut deck = demo_deck();
        let mut bus = EventBus::new();
        let target = ViewState {
            zoom: 30.0,
            max_zoom: 30.0,
            ..ViewState::INITIAL
        };
        let vs = deck.set_view_state(target, &mut bus).expect("set");
        assert_eq!(vs.zoom, 16.0);
        assert_eq!(vs.max_zoom, 16.0);
    }

    #[test]
    fn non_finite_view_state_is_rejected() {
        let mut deck = demo_deck();
        let mut bus = EventBus::new();
        let sub = bus.subscribe();
        let bad = ViewState {
            latitude: f64::NAN,
            ..ViewState::INITIAL
        };
        assert!(deck.set_view_state(bad, &mut bus).is_err());
        assert_eq!(bus.pending(&sub), 0);
        assert_eq!(*deck.view_state(), ViewState::INITIAL);
    }

    #[test]
    fn inverted_limits_are_rejected() {
        let mut config = ViewerConfig::default();
        config.initial_view_state.min_zoom = 18.0;
        assert!(Deck::new(&config).is_err());
    }

    #[test]
    fn reset_returns_to_initial_pose() {
        let mut deck = demo_deck();
        let mut bus = EventBus::new();
        let moved = ViewState {
            longitude: 0.0,
            latitude: 0.0,
            ..ViewState::INITIAL
        };
        deck.set_view_state(moved, &mut bus).expect("set");
        assert_eq!(deck.reset(&mut bus), ViewState::INITIAL);
    }

    #[test]
    fn pick_at_screen_center() {
        let mut deck = demo_deck();
        let mut bus = EventBus::new();
        let over_b002 = ViewState {
            longitude: 35.5184,
            latitude: 33.8883,
            ..ViewState::INITIAL
        };
        deck.set_view_state(over_b002, &mut bus).expect("set");
        let vp = deck.viewport();
        let hit = deck
            .pick(vp.width * 0.5, vp.height * 0.5)
            .expect("building under center");
        assert_eq!(hit.id.as_deref(), Some("b-002"));
        assert_eq!(hit.fill_color, Rgb::YELLOW);
        assert_eq!(hit.elevation, 50.0);
        assert!(deck.pick_lon_lat(LonLat::new(0.0, 0.0)).is_none());
    }

    #[test]
    fn layer_data_carries_both_layers() {
        let data = demo_deck().layer_data();
        assert_eq!(data.ground.id.0, "ground");
        assert_eq!(data.buildings.id.0, "geojson");
        assert_eq!(data.buildings.buildings.len(), 6);
        assert!(data.lighting.shadow);
        assert_eq!(data.view_state, ViewState::INITIAL);

        let json = serde_json::to_value(&data).expect("serialize");
        assert_eq!(json["viewState"]["zoom"], 14.0);
        assert_eq!(json["buildings"]["props"]["opacity"], 0.8);
    }
}
