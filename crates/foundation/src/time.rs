use chrono::{DateTime, TimeZone, Utc};

/// Time primitives
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Time(pub f64); // seconds

/// A UTC instant. Defaults to the Unix epoch.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord)]
pub struct UtcTimestamp(pub DateTime<Utc>);

/// Julian Day of the Unix epoch (1970-01-01T00:00:00Z).
pub const UNIX_EPOCH_JULIAN_DAY: f64 = 2_440_587.5;

const MS_PER_DAY: f64 = 86_400_000.0;

impl UtcTimestamp {
    /// Calendar date and time of day in UTC. `month` is 1-based; `None` for
    /// dates that do not exist.
    pub fn from_utc(
        year: i32,
        month: u32,
        day: u32,
        hour: u32,
        minute: u32,
        second: u32,
    ) -> Option<Self> {
        Utc.with_ymd_and_hms(year, month, day, hour, minute, second)
            .single()
            .map(Self)
    }

    pub fn unix_ms(self) -> f64 {
        self.0.timestamp_millis() as f64
    }

    pub fn julian_day(self) -> f64 {
        UNIX_EPOCH_JULIAN_DAY + self.unix_ms() / MS_PER_DAY
    }
}

impl From<DateTime<Utc>> for UtcTimestamp {
    fn from(dt: DateTime<Utc>) -> Self {
        Self(dt)
    }
}

#[cfg(test)]
mod tests {
    use super::{UNIX_EPOCH_JULIAN_DAY, UtcTimestamp};

    fn at(y: i32, mo: u32, d: u32, h: u32, mi: u32, s: u32) -> UtcTimestamp {
        UtcTimestamp::from_utc(y, mo, d, h, mi, s).expect("valid date")
    }

    #[test]
    fn epoch_is_zero() {
        assert_eq!(at(1970, 1, 1, 0, 0, 0).unix_ms(), 0.0);
        assert_eq!(at(1970, 1, 1, 0, 0, 0).julian_day(), UNIX_EPOCH_JULIAN_DAY);
        assert_eq!(UtcTimestamp::default(), at(1970, 1, 1, 0, 0, 0));
    }

    #[test]
    fn matches_known_instant() {
        // 2019-08-01T22:00:00Z
        assert_eq!(at(2019, 8, 1, 22, 0, 0).unix_ms(), 1_564_696_800_000.0);
    }

    #[test]
    fn j2000_julian_day() {
        let ts = at(2000, 1, 1, 12, 0, 0);
        assert!((ts.julian_day() - 2_451_545.0).abs() < 1e-9);
    }

    #[test]
    fn leap_day_is_counted() {
        let feb28 = at(2020, 2, 28, 0, 0, 0);
        let mar1 = at(2020, 3, 1, 0, 0, 0);
        assert_eq!(mar1.unix_ms() - feb28.unix_ms(), 2.0 * 86_400_000.0);
    }

    #[test]
    fn impossible_date_is_none() {
        assert!(UtcTimestamp::from_utc(2019, 2, 30, 0, 0, 0).is_none());
        assert!(UtcTimestamp::from_utc(2019, 8, 1, 24, 0, 0).is_none());
    }
}
