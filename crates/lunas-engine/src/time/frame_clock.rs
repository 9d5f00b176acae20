/// Frame timing snapshot.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct FrameTime {
    /// Time elapsed since the previous frame tick, in seconds.
    pub dt: f32,

    /// Host timestamp of this tick, in milliseconds.
    pub now_ms: f64,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Frame clock producing `FrameTime` snapshots from host timestamps.
///
/// The host supplies the timestamp of each scheduled frame. The first tick sets
/// the baseline to its own timestamp, so the first `dt` is always zero.
///
/// Timestamps that go backwards yield a zero delta. An optional upper clamp
/// keeps downstream systems stable after long stalls; there is none by default.
#[derive(Debug, Clone, Default)]
pub struct FrameClock {
    last_ms: Option<f64>,
    frame_index: u64,
    dt_max: Option<f32>,
}

impl FrameClock {
    /// Creates an unclamped clock with no baseline.
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a clock whose delta never exceeds `dt_max` seconds.
    pub fn with_max_dt(dt_max: f32) -> Self {
        debug_assert!(dt_max >= 0.0);
        Self {
            dt_max: Some(dt_max),
            ..Self::default()
        }
    }

    /// Timestamp of the last frame boundary, in milliseconds.
    pub fn last_frame_time(&self) -> Option<f64> {
        self.last_ms
    }

    /// Advances the clock to `now_ms` and returns a new `FrameTime`.
    pub fn tick(&mut self, now_ms: f64) -> FrameTime {
        let last = self.last_ms.unwrap_or(now_ms);
        let elapsed_ms = (now_ms - last).max(0.0);
        self.last_ms = Some(now_ms);

        let mut dt = (elapsed_ms / 1000.0) as f32;
        if let Some(max) = self.dt_max {
            dt = dt.min(max);
        }

        let ft = FrameTime {
            dt,
            now_ms,
            frame_index: self.frame_index,
        };

        self.frame_index = self.frame_index.wrapping_add(1);

        ft
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn approx(a: f32, b: f32) -> bool {
        (a - b).abs() < 1e-6
    }

    #[test]
    fn first_tick_has_zero_dt() {
        let mut clock = FrameClock::new();
        let ft = clock.tick(1000.0);

        assert_eq!(ft.dt, 0.0);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(clock.last_frame_time(), Some(1000.0));
    }

    #[test]
    fn deltas_are_seconds_between_ticks() {
        let mut clock = FrameClock::new();
        let dts: Vec<f32> = [1000.0, 1016.0, 1032.0]
            .into_iter()
            .map(|t| clock.tick(t).dt)
            .collect();

        assert_eq!(dts[0], 0.0);
        assert!(approx(dts[1], 0.016));
        assert!(approx(dts[2], 0.016));
    }

    #[test]
    fn backwards_time_saturates_to_zero() {
        let mut clock = FrameClock::new();
        clock.tick(500.0);

        assert_eq!(clock.tick(400.0).dt, 0.0);
        assert_eq!(clock.last_frame_time(), Some(400.0));
    }

    #[test]
    fn max_dt_clamps_long_stalls() {
        let mut clock = FrameClock::with_max_dt(0.25);
        clock.tick(0.0);

        assert!(approx(clock.tick(10_000.0).dt, 0.25));
        assert!(approx(clock.tick(10_100.0).dt, 0.1));
    }
}
