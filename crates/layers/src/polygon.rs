use formats::Ring;
use serde::Serialize;

use crate::extrude::{ExtrudedPolygon, extrude_polygon};
use crate::layer::{Layer, LayerId};

/// Flat polygons drawn with one fill color.
///
/// The page uses it for an invisible ground plane that receives shadows.
#[derive(Debug, Clone, PartialEq)]
pub struct PolygonLayer {
    id: LayerId,
    pub polygons: Vec<Ring>,
    pub stroked: bool,
    pub filled: bool,
    pub fill_color: [u8; 4],
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PolygonLayerSnapshot {
    pub id: LayerId,
    pub fill_color: [u8; 4],
    pub stroked: bool,
    pub polygons: Vec<ExtrudedPolygon>,
}

impl PolygonLayer {
    pub fn new(id: &'static str, polygons: Vec<Ring>) -> Self {
        Self {
            id: LayerId(id),
            polygons,
            stroked: true,
            filled: true,
            fill_color: [0, 0, 0, 255],
        }
    }

    /// Transparent land-cover quad used as the shadow receiver.
    pub fn ground() -> Self {
        Self {
            stroked: false,
            fill_color: [0, 0, 0, 0],
            ..Self::new(
                "ground",
                vec![vec![
                    [-123.0, 49.196],
                    [-123.0, 49.324],
                    [-123.306, 49.324],
                    [-123.306, 49.196],
                ]],
            )
        }
    }

    pub fn is_transparent(&self) -> bool {
        !self.filled || self.fill_color[3] == 0
    }

    pub fn snapshot(&self) -> PolygonLayerSnapshot {
        PolygonLayerSnapshot {
            id: self.id,
            fill_color: self.fill_color,
            stroked: self.stroked,
            polygons: self
                .polygons
                .iter()
                .map(|ring| extrude_polygon(std::slice::from_ref(ring), 0.0, self.stroked))
                .collect(),
        }
    }
}

impl Layer for PolygonLayer {
    fn id(&self) -> LayerId {
        self.id
    }
}

#[cfg(test)]
mod tests {
    use super::PolygonLayer;
    use crate::layer::{Layer, LayerId};

    #[test]
    fn ground_is_invisible_and_unstroked() {
        let ground = PolygonLayer::ground();
        assert_eq!(ground.id(), LayerId("ground"));
        assert!(ground.is_transparent());
        assert!(!ground.stroked);
        assert!(!ground.pickable());
    }

    #[test]
    fn ground_snapshot_is_a_flat_quad() {
        let snap = PolygonLayer::ground().snapshot();
        assert_eq!(snap.polygons.len(), 1);
        assert_eq!(snap.polygons[0].roof.len(), 6);
        assert!(snap.polygons[0].walls.is_empty());
        assert!(snap.polygons[0].outline.is_empty());
    }

    #[test]
    fn snapshot_serializes_layer_id() {
        let json = serde_json::to_value(PolygonLayer::ground().snapshot()).expect("serialize");
        assert_eq!(json["id"], "ground");
        assert_eq!(json["fill_color"], serde_json::json!([0, 0, 0, 0]));
    }
}
