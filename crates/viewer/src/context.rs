use std::path::Path;

use formats::{BuildingDataset, load_buildings};
use foundation::time::Time;
use layers::symbology::Rgb;
use runtime::{EventBus, Frame};
use scene::{Basemap, Interaction, ViewState};
use serde::Serialize;
use tracing::{info, warn};

use crate::config::ViewerConfig;
use crate::deck::{Deck, LayerData, PickInfo, ViewerEvent};
use crate::error::ViewerError;
use crate::sync::{CameraSync, SyncOutcome};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ColorCount {
    pub color: Rgb,
    pub count: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RejectedInfo {
    pub index: usize,
    pub id: Option<String>,
    pub reason: String,
}

/// Outcome of a dataset load.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LoadSummary {
    pub features: usize,
    /// Footprint vertices across all loaded buildings.
    pub vertices: usize,
    pub rejected: Vec<RejectedInfo>,
    /// Buildings per fill color, in threshold order.
    pub colors: Vec<ColorCount>,
    pub unknown_year: usize,
}

/// Owns the overlay, the basemap and the wiring between them.
pub struct AppContext<B: Basemap> {
    config: ViewerConfig,
    deck: Deck,
    basemap: B,
    bus: EventBus<ViewerEvent>,
    camera_sync: CameraSync,
    frame: Frame,
    summary: Option<LoadSummary>,
}

impl<B: Basemap> AppContext<B> {
    pub fn new(config: ViewerConfig, basemap: B) -> Result<Self, ViewerError> {
        let deck = Deck::new(&config)?;
        let mut bus = EventBus::new();
        let camera_sync = CameraSync::new(&mut bus);
        Ok(Self {
            config,
            deck,
            basemap,
            bus,
            camera_sync,
            frame: Frame::first(),
            summary: None,
        })
    }

    pub fn config(&self) -> &ViewerConfig {
        &self.config
    }

    pub fn deck(&self) -> &Deck {
        &self.deck
    }

    pub fn basemap(&self) -> &B {
        &self.basemap
    }

    pub fn basemap_mut(&mut self) -> &mut B {
        &mut self.basemap
    }

    pub fn frame(&self) -> Frame {
        self.frame
    }

    pub fn view_state(&self) -> &ViewState {
        self.deck.view_state()
    }

    /// Summary of the last successful load.
    pub fn summary(&self) -> Option<&LoadSummary> {
        self.summary.as_ref()
    }

    pub fn load_geojson_str(&mut self, payload: &str) -> Result<&LoadSummary, ViewerError> {
        let dataset = BuildingDataset::from_geojson_str(payload)?;
        Ok(self.load_dataset(&dataset))
    }

    pub fn load_file(&mut self, path: impl AsRef<Path>) -> Result<&LoadSummary, ViewerError> {
        let dataset = load_buildings(path)?;
        Ok(self.load_dataset(&dataset))
    }

    pub fn load_dataset(&mut self, dataset: &BuildingDataset) -> &LoadSummary {
        for r in &dataset.rejected {
            warn!(index = r.index, id = ?r.id, "skipping building: {}", r.error);
        }
        self.deck.set_data(dataset);

        let summary = self.summarize(dataset);
        info!(
            features = summary.features,
            rejected = summary.rejected.len(),
            "buildings loaded"
        );
        self.summary.insert(summary)
    }

    fn summarize(&self, dataset: &BuildingDataset) -> LoadSummary {
        let buildings = self.deck.buildings().buildings();
        let styler = self.deck.buildings().styler();
        let colors = styler
            .thresholds()
            .range()
            .iter()
            .map(|&color| ColorCount {
                color,
                count: buildings
                    .iter()
                    .filter(|b| !b.year_completed.is_nan() && b.fill_color == color)
                    .count(),
            })
            .collect();
        LoadSummary {
            features: buildings.len(),
            vertices: buildings.iter().map(|b| b.footprint.vertex_count()).sum(),
            rejected: dataset
                .rejected
                .iter()
                .map(|r| RejectedInfo {
                    index: r.index,
                    id: r.id.clone(),
                    reason: r.error.to_string(),
                })
                .collect(),
            colors,
            unknown_year: buildings
                .iter()
                .filter(|b| b.year_completed.is_nan())
                .count(),
        }
    }

    /// Handles one input at the current frame time. The basemap follows in
    /// the same call.
    pub fn dispatch(&mut self, input: Interaction) -> Option<ViewState> {
        let now = self.frame.time;
        self.dispatch_at(now, input)
    }

    pub fn dispatch_at(&mut self, now: Time, input: Interaction) -> Option<ViewState> {
        self.frame = self.frame.advance(now);
        let changed = self.deck.handle(input, &mut self.bus);
        self.pump();
        changed
    }

    pub fn set_view_state(&mut self, view_state: ViewState) -> Result<ViewState, ViewerError> {
        let applied = self.deck.set_view_state(view_state, &mut self.bus)?;
        self.pump();
        Ok(applied)
    }

    pub fn reset_view(&mut self) -> ViewState {
        let applied = self.deck.reset(&mut self.bus);
        self.pump();
        applied
    }

    pub fn pump(&mut self) -> SyncOutcome {
        self.camera_sync.pump(&mut self.bus, &mut self.basemap)
    }

    /// Call once the basemap reports its style loaded.
    pub fn basemap_loaded(&mut self) -> bool {
        self.camera_sync.on_basemap_loaded(&mut self.basemap)
    }

    pub fn layer_data(&self) -> LayerData {
        self.deck.layer_data()
    }

    pub fn pick(&self, x: f64, y: f64) -> Option<PickInfo> {
        self.deck.pick(x, y)
    }
}
