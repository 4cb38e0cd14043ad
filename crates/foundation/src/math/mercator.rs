//! Web Mercator in the 512 px tile convention used by interactive map
//! overlays: at zoom `z` the whole world spans `512 * 2^z` pixels.

use std::f64::consts::PI;

use super::{LonLat, wrap_lon_deg};

/// World size in pixels at zoom 0.
pub const TILE_SIZE: f64 = 512.0;

/// Latitude limit of the square Mercator world.
pub const MERCATOR_MAX_LAT_DEG: f64 = 85.051_128_78;

pub fn zoom_to_scale(zoom: f64) -> f64 {
    2f64.powf(zoom)
}

/// Projects a position to zoom-0 world pixels (x right, y down).
pub fn lon_lat_to_world(p: LonLat) -> [f64; 2] {
    let lat = p
        .lat_deg
        .clamp(-MERCATOR_MAX_LAT_DEG, MERCATOR_MAX_LAT_DEG)
        .to_radians();
    let lon = p.lon_deg.to_radians();
    let x = TILE_SIZE * (lon + PI) / (2.0 * PI);
    let y = TILE_SIZE * (PI - (PI / 4.0 + lat / 2.0).tan().ln()) / (2.0 * PI);
    [x, y]
}

pub fn world_to_lon_lat(xy: [f64; 2]) -> LonLat {
    let lon = xy[0] / TILE_SIZE * 2.0 * PI - PI;
    let lat = 2.0 * (PI - xy[1] / TILE_SIZE * 2.0 * PI).exp().atan() - PI / 2.0;
    LonLat::new(wrap_lon_deg(lon.to_degrees()), lat.to_degrees())
}
