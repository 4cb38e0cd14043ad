use earcutr::earcut;
use formats::{Position, Ring};
use foundation::math::{LonLat, lon_lat_to_world};
use serde::Serialize;

/// `[longitude, latitude, height_m]`.
pub type Vertex = [f64; 3];

/// Renderable prism for one footprint polygon.
#[derive(Debug, Default, Clone, PartialEq, Serialize)]
pub struct ExtrudedPolygon {
    /// Flat triangle list (3 vertices per triangle) at the roof height.
    pub roof: Vec<Vertex>,
    /// Flat triangle list for the side walls. Empty when the height is zero.
    pub walls: Vec<Vertex>,
    /// Line segments for wireframe drawing.
    pub outline: Vec<[Vertex; 2]>,
}

impl ExtrudedPolygon {
    pub fn triangle_count(&self) -> usize {
        (self.roof.len() + self.walls.len()) / 3
    }
}

/// Extrudes `rings` (outer first, then holes) from the ground to `height_m`.
pub fn extrude_polygon(rings: &[Ring], height_m: f64, wireframe: bool) -> ExtrudedPolygon {
    let mut out = ExtrudedPolygon {
        roof: triangulate(rings, height_m),
        ..Default::default()
    };
    if out.roof.is_empty() {
        return out;
    }

    let has_height = height_m.is_finite() && height_m != 0.0;
    for ring in rings {
        for (i, a) in ring.iter().enumerate() {
            let b = &ring[(i + 1) % ring.len()];
            let a0 = [a[0], a[1], 0.0];
            let b0 = [b[0], b[1], 0.0];
            let a1 = [a[0], a[1], height_m];
            let b1 = [b[0], b[1], height_m];

            if has_height {
                out.walls.extend_from_slice(&[a0, b0, b1, a0, b1, a1]);
            }
            if wireframe {
                out.outline.push([a1, b1]);
                if has_height {
                    out.outline.push([a0, a1]);
                }
            }
        }
    }
    out
}

fn triangulate(rings: &[Ring], height_m: f64) -> Vec<Vertex> {
    // Triangulate in Web Mercator world space: conformal, so ring shapes and
    // winding survive the projection.
    let mut vertices: Vec<&Position> = Vec::new();
    let mut coords_2d: Vec<f64> = Vec::new();
    let mut hole_indices: Vec<usize> = Vec::new();

    for (ring_i, ring) in rings.iter().enumerate() {
        if ring.len() < 3 {
            continue;
        }
        if ring_i > 0 {
            hole_indices.push(vertices.len());
        }
        for p in ring {
            let xy = lon_lat_to_world(LonLat::new(p[0], p[1]));
            coords_2d.push(xy[0]);
            coords_2d.push(xy[1]);
            vertices.push(p);
        }
    }

    if vertices.len() < 3 {
        return Vec::new();
    }

    let indices = match earcut(&coords_2d, &hole_indices, 2) {
        Ok(ix) => ix,
        Err(_) => return Vec::new(),
    };

    let mut out: Vec<Vertex> = Vec::with_capacity(indices.len());
    for idx in indices {
        if let Some(p) = vertices.get(idx) {
            out.push([p[0], p[1], height_m]);
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::{ExtrudedPolygon, extrude_polygon};

    fn square() -> Vec<Vec<[f64; 2]>> {
        vec![vec![[0.0, 0.0], [0.001, 0.0], [0.001, 0.001], [0.0, 0.001]]]
    }

    #[test]
    fn square_roof_is_two_triangles_at_height() {
        let prism = extrude_polygon(&square(), 50.0, false);
        assert_eq!(prism.roof.len(), 6);
        assert!(prism.roof.iter().all(|v| v[2] == 50.0));
    }

    #[test]
    fn walls_have_two_triangles_per_edge() {
        let prism = extrude_polygon(&square(), 50.0, false);
        assert_eq!(prism.walls.len(), 4 * 6);
        assert_eq!(prism.triangle_count(), 2 + 8);
        assert!(prism.outline.is_empty());
    }

    #[test]
    fn flat_footprint_has_no_walls() {
        let prism = extrude_polygon(&square(), 0.0, true);
        assert!(prism.walls.is_empty());
        // Roof edges only, no vertical edges.
        assert_eq!(prism.outline.len(), 4);
    }

    #[test]
    fn wireframe_adds_roof_and_vertical_edges() {
        let prism = extrude_polygon(&square(), 10.0, true);
        assert_eq!(prism.outline.len(), 8);
        assert!(prism.outline.iter().any(|[a, b]| a[2] == 0.0 && b[2] == 10.0));
    }

    #[test]
    fn hole_adds_inner_walls_and_more_roof_triangles() {
        let mut rings = square();
        rings.push(vec![
            [0.0003, 0.0003],
            [0.0003, 0.0007],
            [0.0007, 0.0007],
            [0.0007, 0.0003],
        ]);
        let prism = extrude_polygon(&rings, 5.0, false);
        assert_eq!(prism.walls.len(), 8 * 6);
        assert_eq!(prism.roof.len(), 8 * 3);
    }

    #[test]
    fn degenerate_ring_produces_nothing() {
        let rings = vec![vec![[0.0, 0.0], [1.0, 1.0]]];
        assert_eq!(extrude_polygon(&rings, 5.0, true), ExtrudedPolygon::default());
    }
}
