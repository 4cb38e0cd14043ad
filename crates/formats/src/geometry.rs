use serde::Serialize;
use serde_json::Value;

/// `[longitude, latitude]` in degrees.
pub type Position = [f64; 2];

/// A linear ring without its closing duplicate.
pub type Ring = Vec<Position>;

/// One polygon: outer ring first, then holes.
pub type PolygonRings = Vec<Ring>;

/// Ground outline of one building; a MultiPolygon has several parts.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Footprint {
    pub polygons: Vec<PolygonRings>,
}

impl Footprint {
    pub fn from_geojson_geometry(value: &Value) -> Result<Self, String> {
        let obj = value
            .as_object()
            .ok_or("geometry must be an object".to_string())?;
        let ty = obj
            .get("type")
            .and_then(|v| v.as_str())
            .ok_or("geometry missing type".to_string())?;
        let coords = obj
            .get("coordinates")
            .ok_or("geometry missing coordinates".to_string())?;

        let polygons = match ty {
            "Polygon" => vec![parse_polygon(coords)?],
            "MultiPolygon" => parse_multi_polygon(coords)?,
            other => return Err(format!("unsupported footprint geometry: {other}")),
        };
        if polygons.is_empty() {
            return Err("MultiPolygon has no polygons".to_string());
        }
        Ok(Self { polygons })
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons
            .iter()
            .flat_map(|p| p.iter())
            .map(|r| r.len())
            .sum()
    }
}

fn parse_position(coords: &Value) -> Result<Position, String> {
    let arr = coords
        .as_array()
        .ok_or("position must be an array".to_string())?;
    if arr.len() < 2 {
        return Err("position must have [lon, lat]".to_string());
    }
    let lon = arr[0]
        .as_f64()
        .ok_or("position lon must be a number".to_string())?;
    let lat = arr[1]
        .as_f64()
        .ok_or("position lat must be a number".to_string())?;
    if !(-180.0..=180.0).contains(&lon) || !(-90.0..=90.0).contains(&lat) {
        return Err(format!("position out of range: [{lon}, {lat}]"));
    }
    Ok([lon, lat])
}

fn parse_ring(coords: &Value) -> Result<Ring, String> {
    let arr = coords
        .as_array()
        .ok_or("ring must be an array of positions".to_string())?;
    let mut ring = Vec::with_capacity(arr.len());
    for item in arr {
        ring.push(parse_position(item)?);
    }
    drop_closing_duplicate(&mut ring);
    if ring.len() < 3 {
        return Err(format!("ring needs at least 3 distinct positions, got {}", ring.len()));
    }
    Ok(ring)
}

fn parse_polygon(coords: &Value) -> Result<PolygonRings, String> {
    let rings = coords
        .as_array()
        .ok_or("Polygon coordinates must be an array of rings".to_string())?;
    if rings.is_empty() {
        return Err("Polygon has no rings".to_string());
    }
    let mut out = Vec::with_capacity(rings.len());
    for ring in rings {
        out.push(parse_ring(ring)?);
    }
    Ok(out)
}

fn parse_multi_polygon(coords: &Value) -> Result<Vec<PolygonRings>, String> {
    let polys = coords
        .as_array()
        .ok_or("MultiPolygon coordinates must be an array of polygons".to_string())?;
    let mut out = Vec::with_capacity(polys.len());
    for poly in polys {
        out.push(parse_polygon(poly)?);
    }
    Ok(out)
}

fn drop_closing_duplicate(ring: &mut Ring) {
    if ring.len() >= 2 && ring.first() == ring.last() {
        ring.pop();
    }
}

#[cfg(test)]
mod tests {
    use super::Footprint;
    use serde_json::json;

    #[test]
    fn polygon_drops_closing_position() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[35.5, 33.8], [35.6, 33.8], [35.6, 33.9], [35.5, 33.8]]]
        });
        let fp = Footprint::from_geojson_geometry(&geom).expect("polygon");
        assert_eq!(fp.polygons.len(), 1);
        assert_eq!(fp.polygons[0][0].len(), 3);
        assert_eq!(fp.vertex_count(), 3);
    }

    #[test]
    fn multipolygon_keeps_every_part() {
        let geom = json!({
            "type": "MultiPolygon",
            "coordinates": [
                [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0]]],
                [[[2.0, 0.0], [3.0, 0.0], [3.0, 1.0], [2.0, 0.0]]]
            ]
        });
        let fp = Footprint::from_geojson_geometry(&geom).expect("multipolygon");
        assert_eq!(fp.polygons.len(), 2);
        assert_eq!(fp.vertex_count(), 6);
    }

    #[test]
    fn rejects_points() {
        let geom = json!({"type": "Point", "coordinates": [35.5, 33.8]});
        let err = Footprint::from_geojson_geometry(&geom).unwrap_err();
        assert!(err.contains("unsupported"));
    }

    #[test]
    fn rejects_degenerate_ring() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]
        });
        assert!(Footprint::from_geojson_geometry(&geom).is_err());
    }

    #[test]
    fn rejects_out_of_range_position() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], [1.0, 95.0], [1.0, 0.0]]]
        });
        let err = Footprint::from_geojson_geometry(&geom).unwrap_err();
        assert!(err.contains("out of range"));
    }

    #[test]
    fn rejects_non_numeric_coordinate() {
        let geom = json!({
            "type": "Polygon",
            "coordinates": [[[0.0, 0.0], ["a", 1.0], [1.0, 0.0]]]
        });
        assert!(Footprint::from_geojson_geometry(&geom).is_err());
    }
}
