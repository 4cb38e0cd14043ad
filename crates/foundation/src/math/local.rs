/// Local East-North-Up direction or offset.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Enu {
    pub east: f64,
    pub north: f64,
    pub up: f64,
}

impl Enu {
    pub fn new(east: f64, north: f64, up: f64) -> Self {
        Self { east, north, up }
    }

    /// Unit vector pointing at `azimuth` (clockwise from north) and `altitude`
    /// above the horizon, both in radians.
    pub fn from_azimuth_altitude(azimuth_rad: f64, altitude_rad: f64) -> Self {
        let cos_alt = altitude_rad.cos();
        Self::new(
            cos_alt * azimuth_rad.sin(),
            cos_alt * azimuth_rad.cos(),
            altitude_rad.sin(),
        )
    }

    pub fn neg(self) -> Self {
        Self::new(-self.east, -self.north, -self.up)
    }

    pub fn length(self) -> f64 {
        (self.east * self.east + self.north * self.north + self.up * self.up).sqrt()
    }

    pub fn to_array(self) -> [f64; 3] {
        [self.east, self.north, self.up]
    }
}

#[cfg(test)]
mod tests {
    use super::Enu;

    #[test]
    fn zenith_points_up() {
        let v = Enu::from_azimuth_altitude(0.0, std::f64::consts::FRAC_PI_2);
        assert!(v.up > 0.999_999);
        assert!((v.length() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn east_on_horizon() {
        let v = Enu::from_azimuth_altitude(std::f64::consts::FRAC_PI_2, 0.0);
        assert!((v.east - 1.0).abs() < 1e-12);
        assert!(v.north.abs() < 1e-12);
        assert!(v.up.abs() < 1e-12);
    }
}
