use foundation::UtcTimestamp;
use foundation::math::{LonLat, SunPosition, sun_position};
use serde::Serialize;

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct AmbientLight {
    pub color: [u8; 3],
    pub intensity: f64,
}

/// Directional light placed where the sun is at `timestamp`.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct SunLight {
    pub timestamp: UtcTimestamp,
    pub color: [u8; 3],
    pub intensity: f64,
    pub shadow: bool,
}

impl SunLight {
    pub fn position_at(&self, at: LonLat) -> SunPosition {
        sun_position(self.timestamp, at)
    }

    /// Direction the light travels (sun towards ground), local east-north-up.
    pub fn direction_at(&self, at: LonLat) -> [f64; 3] {
        self.position_at(at).to_enu().neg().to_array()
    }
}

#[derive(Debug, Copy, Clone, PartialEq)]
pub struct LightingEffect {
    pub ambient: AmbientLight,
    pub sun: SunLight,
    /// RGBA in `[0, 1]`.
    pub shadow_color: [f64; 4],
}

impl Default for LightingEffect {
    fn default() -> Self {
        Self {
            ambient: AmbientLight {
                color: [255, 255, 255],
                intensity: 0.0,
            },
            sun: SunLight {
                timestamp: UtcTimestamp::from_utc(2019, 8, 1, 22, 0, 0).unwrap_or_default(),
                color: [255, 255, 255],
                intensity: 1.0,
                shadow: true,
            },
            shadow_color: [0.0, 0.0, 0.0, 0.5],
        }
    }
}

/// Lighting resolved for one map position, ready for a renderer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LightingSnapshot {
    pub ambient_color: [u8; 3],
    pub ambient_intensity: f64,
    pub sun_color: [u8; 3],
    pub sun_intensity: f64,
    pub sun_direction: [f64; 3],
    pub sun_altitude_deg: f64,
    pub sun_azimuth_deg: f64,
    pub shadow: bool,
    pub shadow_color: [f64; 4],
}

impl LightingEffect {
    pub fn casts_shadows(&self) -> bool {
        self.sun.shadow && self.sun.intensity > 0.0
    }

    pub fn snapshot(&self, at: LonLat) -> LightingSnapshot {
        let pos = self.sun.position_at(at);
        LightingSnapshot {
            ambient_color: self.ambient.color,
            ambient_intensity: self.ambient.intensity,
            sun_color: self.sun.color,
            sun_intensity: self.sun.intensity,
            sun_direction: pos.to_enu().neg().to_array(),
            sun_altitude_deg: pos.altitude_rad.to_degrees(),
            sun_azimuth_deg: pos.azimuth_rad.to_degrees(),
            shadow: self.casts_shadows(),
            shadow_color: self.shadow_color,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LightingEffect;
    use foundation::math::LonLat;

    #[test]
    fn default_matches_page_lighting() {
        let fx = LightingEffect::default();
        assert_eq!(fx.ambient.intensity, 0.0);
        assert_eq!(fx.sun.intensity, 1.0);
        assert!(fx.sun.shadow);
        assert_eq!(fx.sun.timestamp.unix_ms(), 1_564_696_800_000.0);
        assert_eq!(fx.shadow_color, [0.0, 0.0, 0.0, 0.5]);
        assert!(fx.casts_shadows());
    }

    #[test]
    fn light_travels_away_from_the_sun() {
        let fx = LightingEffect::default();
        let at = LonLat::new(35.52, 33.88);
        let dir = fx.sun.direction_at(at);
        // Sun is below the horizon at that hour, so light travels upward.
        assert!(dir[2] > 0.0);
        let len = (dir[0] * dir[0] + dir[1] * dir[1] + dir[2] * dir[2]).sqrt();
        assert!((len - 1.0).abs() < 1e-9);
    }

    #[test]
    fn snapshot_carries_resolved_angles() {
        let fx = LightingEffect::default();
        let snap = fx.snapshot(LonLat::new(35.52, 33.88));
        assert!(snap.sun_altitude_deg < 0.0);
        assert!((0.0..360.0).contains(&snap.sun_azimuth_deg));
        assert!(snap.shadow);
    }
}
