/// Geographic position in degrees.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LonLat {
    pub lon_deg: f64,
    pub lat_deg: f64,
}

impl LonLat {
    pub const fn new(lon_deg: f64, lat_deg: f64) -> Self {
        Self { lon_deg, lat_deg }
    }

    pub fn is_finite(&self) -> bool {
        self.lon_deg.is_finite() && self.lat_deg.is_finite()
    }
}

/// Wraps a longitude into `[-180, 180)`.
pub fn wrap_lon_deg(lon: f64) -> f64 {
    (lon + 180.0).rem_euclid(360.0) - 180.0
}

/// Wraps an angle into `(-180, 180]`.
pub fn wrap_angle_deg(angle: f64) -> f64 {
    let a = angle.rem_euclid(360.0);
    if a > 180.0 { a - 360.0 } else { a }
}

#[cfg(test)]
mod tests {
    use super::{wrap_angle_deg, wrap_lon_deg};

    fn assert_close(a: f64, b: f64, eps: f64) {
        let diff = (a - b).abs();
        assert!(diff <= eps, "expected {a} ~= {b} (diff {diff})");
    }

    #[test]
    fn wrap_lon_keeps_in_range_values() {
        assert_close(wrap_lon_deg(35.52), 35.52, 1e-12);
        assert_close(wrap_lon_deg(-10.0), -10.0, 1e-12);
    }

    #[test]
    fn wrap_lon_folds_across_antimeridian() {
        assert_close(wrap_lon_deg(190.0), -170.0, 1e-12);
        assert_close(wrap_lon_deg(-190.0), 170.0, 1e-12);
        assert_close(wrap_lon_deg(180.0), -180.0, 1e-12);
    }

    #[test]
    fn wrap_angle_prefers_positive_half_turn() {
        assert_close(wrap_angle_deg(180.0), 180.0, 1e-12);
        assert_close(wrap_angle_deg(-180.0), 180.0, 1e-12);
        assert_close(wrap_angle_deg(270.0), -90.0, 1e-12);
        assert_close(wrap_angle_deg(5.0), 5.0, 1e-12);
    }
}
