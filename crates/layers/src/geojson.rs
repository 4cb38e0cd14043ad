use formats::{BuildingDataset, BuildingFeature, Footprint, Position};
use serde::Serialize;

use crate::extrude::{ExtrudedPolygon, extrude_polygon};
use crate::layer::{Layer, LayerId};
use crate::query::footprint_contains;
use crate::symbology::{Rgb, ThematicStyler};

/// Draw flags of the building layer.
#[derive(Debug, Copy, Clone, PartialEq, Serialize)]
pub struct GeoJsonLayerProps {
    pub opacity: f64,
    pub stroked: bool,
    pub filled: bool,
    pub extruded: bool,
    pub wireframe: bool,
    pub pickable: bool,
}

impl Default for GeoJsonLayerProps {
    fn default() -> Self {
        Self {
            opacity: 0.8,
            stroked: false,
            filled: true,
            extruded: true,
            wireframe: true,
            pickable: true,
        }
    }
}

/// A building with its derived fill color and height.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct StyledBuilding {
    pub feature_index: usize,
    pub id: Option<String>,
    pub year_completed: f64,
    pub vacancy_rate: f64,
    pub fill_color: Rgb,
    pub elevation: f64,
    pub footprint: Footprint,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedBuilding {
    pub feature_index: usize,
    pub id: Option<String>,
    pub fill_color: [u8; 4],
    pub elevation: f64,
    pub parts: Vec<ExtrudedPolygon>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GeoJsonLayerSnapshot {
    pub id: LayerId,
    pub props: GeoJsonLayerProps,
    pub buildings: Vec<RenderedBuilding>,
}

/// Extruded building footprints colored by construction year.
#[derive(Debug, Clone, PartialEq)]
pub struct GeoJsonLayer {
    id: LayerId,
    pub props: GeoJsonLayerProps,
    styler: ThematicStyler,
    buildings: Vec<StyledBuilding>,
}

impl GeoJsonLayer {
    pub fn new(id: &'static str, props: GeoJsonLayerProps, styler: ThematicStyler) -> Self {
        Self {
            id: LayerId(id),
            props,
            styler,
            buildings: Vec::new(),
        }
    }

    pub fn styler(&self) -> &ThematicStyler {
        &self.styler
    }

    /// Replaces the layer data, styling every feature once.
    pub fn set_data(&mut self, dataset: &BuildingDataset) {
        self.buildings = dataset
            .features
            .iter()
            .map(|f| self.style(f))
            .collect();
    }

    pub fn style(&self, feature: &BuildingFeature) -> StyledBuilding {
        StyledBuilding {
            feature_index: feature.index,
            id: feature.id.clone(),
            year_completed: feature.year_completed,
            vacancy_rate: feature.vacancy_rate,
            fill_color: self.styler.color_for(feature.year_completed),
            elevation: self.styler.elevation_for(feature.vacancy_rate),
            footprint: feature.footprint.clone(),
        }
    }

    pub fn buildings(&self) -> &[StyledBuilding] {
        &self.buildings
    }

    pub fn fill_rgba(&self, building: &StyledBuilding) -> [u8; 4] {
        building.fill_color.with_opacity(self.props.opacity)
    }

    /// Topmost building whose footprint contains `p`, later features drawing
    /// over earlier ones.
    pub fn pick(&self, p: Position) -> Option<&StyledBuilding> {
        if !self.props.pickable {
            return None;
        }
        self.buildings
            .iter()
            .rev()
            .find(|b| footprint_contains(&b.footprint, p))
    }

    pub fn snapshot(&self) -> GeoJsonLayerSnapshot {
        let buildings = self
            .buildings
            .iter()
            .map(|b| {
                let height = if self.props.extruded { b.elevation } else { 0.0 };
                RenderedBuilding {
                    feature_index: b.feature_index,
                    id: b.id.clone(),
                    fill_color: if self.props.filled {
                        self.fill_rgba(b)
                    } else {
                        [0, 0, 0, 0]
                    },
                    elevation: height,
                    parts: b
                        .footprint
                        .polygons
                        .iter()
                        .map(|rings| {
                            extrude_polygon(rings, height, self.props.extruded && self.props.wireframe)
                        })
                        .collect(),
                }
            })
            .collect();

        GeoJsonLayerSnapshot {
            id: self.id,
            props: self.props,
            buildings,
        }
    }
}

impl Layer for GeoJsonLayer {
    fn id(&self) -> LayerId {
        self.id
    }

    fn pickable(&self) -> bool {
        self.props.pickable
    }
}

#[cfg(test)]
mod tests {
    use super::{GeoJsonLayer, GeoJsonLayerProps};
    use crate::layer::{Layer, LayerId};
    use crate::symbology::{Rgb, ThematicStyler};
    use formats::BuildingDataset;
    use pretty_assertions::assert_eq;

    fn demo_layer() -> GeoJsonLayer {
        let payload = include_str!("../../apps/viewer_web/assets/buildings.geojson");
        let ds = BuildingDataset::from_geojson_str(payload).expect("parse buildings");
        let mut layer = GeoJsonLayer::new("geojson", GeoJsonLayerProps::default(), ThematicStyler::default());
        layer.set_data(&ds);
        layer
    }

    #[test]
    fn single_feature_scenario() {
        let payload = r#"{"type":"FeatureCollection","features":[{"type":"Feature","properties":{"Yr_Comp":1999.0,"vacancy_ap":1.0},"geometry":{"type":"Polygon","coordinates":[[[35.5,33.8],[35.501,33.8],[35.501,33.801],[35.5,33.8]]]}}]}"#;
        let ds = BuildingDataset::from_geojson_str(payload).expect("parse");
        let mut layer = GeoJsonLayer::new("geojson", GeoJsonLayerProps::default(), ThematicStyler::default());
        layer.set_data(&ds);
        let b = &layer.buildings()[0];
        assert_eq!(b.fill_color, Rgb([255, 255, 0]));
        assert_eq!(b.elevation, 50.0);
    }

    #[test]
    fn demo_colors_follow_construction_year() {
        let layer = demo_layer();
        let colors: Vec<Rgb> = layer.buildings().iter().map(|b| b.fill_color).collect();
        assert_eq!(
            colors,
            vec![Rgb::YELLOW, Rgb::YELLOW, Rgb::RED, Rgb::RED, Rgb::WHITE, Rgb::WHITE]
        );
    }

    #[test]
    fn props_match_page_layer() {
        let layer = demo_layer();
        assert_eq!(layer.id(), LayerId("geojson"));
        assert!(layer.pickable());
        assert_eq!(layer.props.opacity, 0.8);
        assert!(layer.props.extruded && layer.props.wireframe && !layer.props.stroked);
    }

    #[test]
    fn snapshot_applies_opacity_and_extrusion() {
        let snap = demo_layer().snapshot();
        assert_eq!(snap.buildings.len(), 6);
        let b = &snap.buildings[1];
        assert_eq!(b.fill_color, [255, 255, 0, 204]);
        assert_eq!(b.elevation, 50.0);
        assert!(!b.parts[0].walls.is_empty());
        assert!(!b.parts[0].outline.is_empty());
        // MultiPolygon keeps one prism per part.
        assert_eq!(snap.buildings[3].parts.len(), 2);
    }

    #[test]
    fn flat_mode_drops_height() {
        let mut layer = demo_layer();
        layer.props.extruded = false;
        let snap = layer.snapshot();
        assert!(snap.buildings.iter().all(|b| b.elevation == 0.0));
        assert!(snap.buildings.iter().all(|b| b.parts.iter().all(|p| p.walls.is_empty())));
    }

    #[test]
    fn pick_finds_building_under_point() {
        let layer = demo_layer();
        let hit = layer.pick([35.5184, 33.8883]).expect("hit");
        assert_eq!(hit.id.as_deref(), Some("b-002"));
        assert!(layer.pick([35.0, 33.0]).is_none());
    }

    #[test]
    fn pick_skips_courtyard_hole() {
        let layer = demo_layer();
        assert!(layer.pick([35.5205, 33.8805]).is_none());
        assert_eq!(
            layer.pick([35.5201, 33.8801]).and_then(|b| b.id.as_deref()),
            Some("b-003")
        );
    }

    #[test]
    fn unpickable_layer_never_hits() {
        let mut layer = demo_layer();
        layer.props.pickable = false;
        assert!(layer.pick([35.5184, 33.8883]).is_none());
    }
}
