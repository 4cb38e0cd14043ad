use foundation::time::Time;

/// One input turn of the viewer.
///
/// Every dispatched interaction opens a new frame; the host supplies the
/// timestamp so a recorded session replays with identical frame numbers.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Frame {
    /// 0-based turn counter.
    pub index: u64,
    /// Host time at the start of the turn (seconds).
    pub time: Time,
}

impl Frame {
    pub const fn first() -> Self {
        Self {
            index: 0,
            time: Time(0.0),
        }
    }

    /// Next turn. Time never runs backwards, even if the host clock does.
    pub fn advance(self, now: Time) -> Self {
        let t = if now.0.is_finite() && now.0 > self.time.0 {
            now.0
        } else {
            self.time.0
        };
        Self {
            index: self.index + 1,
            time: Time(t),
        }
    }
}

impl Default for Frame {
    fn default() -> Self {
        Self::first()
    }
}

#[cfg(test)]
mod tests {
    use super::Frame;
    use foundation::time::Time;

    #[test]
    fn advance_counts_turns() {
        let f = Frame::first().advance(Time(0.5)).advance(Time(1.0));
        assert_eq!(f.index, 2);
        assert_eq!(f.time, Time(1.0));
    }

    #[test]
    fn time_is_monotonic() {
        let f = Frame::first().advance(Time(2.0)).advance(Time(1.0));
        assert_eq!(f.time, Time(2.0));
        let f = f.advance(Time(f64::NAN));
        assert_eq!(f.index, 3);
        assert_eq!(f.time, Time(2.0));
    }
}
