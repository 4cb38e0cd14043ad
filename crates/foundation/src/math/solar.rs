//! Low-cost solar ephemeris, good to a fraction of a degree for shading.

use crate::time::UtcTimestamp;

use super::{Enu, LonLat};

/// Sun position as seen from a point on the ground.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SunPosition {
    /// Angle above the horizon. Negative at night.
    pub altitude_rad: f64,
    /// Clockwise from north.
    pub azimuth_rad: f64,
}

impl SunPosition {
    /// Unit vector pointing from the ground towards the sun.
    pub fn to_enu(self) -> Enu {
        Enu::from_azimuth_altitude(self.azimuth_rad, self.altitude_rad)
    }
}

fn wrap_360(mut d: f64) -> f64 {
    d %= 360.0;
    if d < 0.0 {
        d += 360.0;
    }
    d
}

fn wrap_180(d: f64) -> f64 {
    let d = wrap_360(d);
    if d > 180.0 { d - 360.0 } else { d }
}

/// Point on Earth where the sun is at the zenith at `ts`.
pub fn subsolar_point(ts: UtcTimestamp) -> LonLat {
    let jd = ts.julian_day();
    let n = jd - 2_451_545.0; // days since J2000

    // Mean longitude and anomaly (degrees)
    let l = wrap_360(280.46 + 0.985_647_4 * n);
    let g = wrap_360(357.528 + 0.985_600_3 * n);

    // Ecliptic longitude and obliquity (degrees)
    let lambda = wrap_360(l + 1.915 * g.to_radians().sin() + 0.020 * (2.0 * g).to_radians().sin());
    let epsilon = 23.439 - 0.000_000_4 * n;

    let lambda_rad = lambda.to_radians();
    let eps_rad = epsilon.to_radians();
    let alpha = (eps_rad.cos() * lambda_rad.sin())
        .atan2(lambda_rad.cos())
        .to_degrees();
    let delta = (eps_rad.sin() * lambda_rad.sin()).asin().to_degrees();

    // Greenwich Mean Sidereal Time (degrees)
    let t = n / 36_525.0;
    let gmst = wrap_360(
        280.460_618_37 + 360.985_647_366_29 * n + 0.000_387_933 * t * t - (t * t * t) / 38_710_000.0,
    );

    LonLat::new(wrap_180(alpha - gmst), delta)
}

pub fn sun_position(ts: UtcTimestamp, observer: LonLat) -> SunPosition {
    let sub = subsolar_point(ts);
    let lat = observer.lat_deg.to_radians();
    let dec = sub.lat_deg.to_radians();
    // Hour angle, positive when the sun is west of the observer.
    let h = (observer.lon_deg - sub.lon_deg).to_radians();

    let sin_alt = lat.sin() * dec.sin() + lat.cos() * dec.cos() * h.cos();
    let altitude_rad = sin_alt.clamp(-1.0, 1.0).asin();
    let azimuth_rad = (-h.sin() * dec.cos())
        .atan2(lat.cos() * dec.sin() - lat.sin() * dec.cos() * h.cos())
        .rem_euclid(std::f64::consts::TAU);

    SunPosition {
        altitude_rad,
        azimuth_rad,
    }
}

#[cfg(test)]
mod tests {
    use super::{sun_position, subsolar_point};
    use crate::math::LonLat;
    use crate::time::UtcTimestamp;

    #[test]
    fn summer_subsolar_latitude_is_north() {
        let ts = UtcTimestamp::from_utc(2019, 6, 21, 12, 0, 0).expect("valid date");
        let sub = subsolar_point(ts);
        assert!((sub.lat_deg - 23.44).abs() < 0.2, "lat {}", sub.lat_deg);
        assert!(sub.lon_deg.abs() < 3.0, "lon {}", sub.lon_deg);
    }

    #[test]
    fn equinox_noon_at_null_island_is_near_zenith() {
        let pos = sun_position(
            UtcTimestamp::from_utc(2019, 3, 20, 12, 0, 0).expect("valid date"),
            LonLat::new(0.0, 0.0),
        );
        assert!(pos.altitude_rad.to_degrees() > 85.0);
    }

    #[test]
    fn sun_is_down_over_beirut_late_evening() {
        let pos = sun_position(
            UtcTimestamp::from_utc(2019, 8, 1, 22, 0, 0).expect("valid date"),
            LonLat::new(35.52, 33.88),
        );
        assert!(pos.altitude_rad < 0.0);
    }

    #[test]
    fn morning_sun_is_in_the_east() {
        // 06:00 UTC is mid-morning in Beirut.
        let pos = sun_position(
            UtcTimestamp::from_utc(2019, 8, 1, 6, 0, 0).expect("valid date"),
            LonLat::new(35.52, 33.88),
        );
        assert!(pos.altitude_rad > 0.0);
        let az = pos.azimuth_rad.to_degrees();
        assert!(az > 45.0 && az < 135.0, "azimuth {az}");
    }
}
