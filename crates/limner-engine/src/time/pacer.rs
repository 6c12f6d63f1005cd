use std::time::{Duration, Instant};

/// Frame timing snapshot.
#[derive(Debug, Copy, Clone)]
pub struct FrameTime {
    /// Time elapsed since the previous tick, in seconds (clamped).
    pub dt: f32,

    /// Timestamp passed to the tick.
    pub now: Instant,

    /// Monotonic frame counter.
    pub frame_index: u64,
}

/// Fixed-rate deadline scheduler.
///
/// Each tick moves the deadline forward by exactly one interval from the
/// previous deadline, not from `now`, so processing jitter never
/// accumulates into drift. A lag of more than one whole interval (a stall)
/// realigns the anchor to `now` instead of replaying the backlog.
///
/// Delta time is clamped to avoid pathological values after the loop is
/// suspended or stalls.
#[derive(Debug, Clone)]
pub struct FramePacer {
    interval: Duration,
    deadline: Option<Instant>,
    last: Option<Instant>,
    frame_index: u64,
    dt_min: Duration,
    dt_max: Duration,
}

impl FramePacer {
    /// Creates a pacer targeting `rate` frames per second.
    pub fn new(rate: f32) -> Self {
        Self::with_clamps(rate, Duration::from_micros(100), Duration::from_millis(250))
    }

    /// Creates a pacer with custom delta-time clamps.
    pub fn with_clamps(rate: f32, dt_min: Duration, dt_max: Duration) -> Self {
        debug_assert!(dt_min <= dt_max);
        Self {
            interval: interval_for(rate).unwrap_or(Duration::from_micros(16_667)),
            deadline: None,
            last: None,
            frame_index: 0,
            dt_min,
            dt_max,
        }
    }

    #[inline]
    pub fn interval(&self) -> Duration {
        self.interval
    }

    #[inline]
    pub fn rate(&self) -> f32 {
        1.0 / self.interval.as_secs_f32()
    }

    /// Next scheduled tick. `None` until the first tick or reset.
    #[inline]
    pub fn deadline(&self) -> Option<Instant> {
        self.deadline
    }

    #[inline]
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }

    /// Changes the target rate. The current deadline stays; later ones use
    /// the new interval. Rates that are not positive and finite are refused.
    pub fn set_rate(&mut self, rate: f32) -> bool {
        match interval_for(rate) {
            Some(interval) => {
                self.interval = interval;
                true
            }
            None => false,
        }
    }

    /// Drops the anchor: the next frame is due at `now`.
    ///
    /// Used when the loop resumes after being suspended, so missed ticks are
    /// skipped instead of fast-forwarded.
    pub fn reset(&mut self, now: Instant) {
        self.deadline = Some(now);
        self.last = Some(now);
    }

    #[inline]
    pub fn is_due(&self, now: Instant) -> bool {
        self.deadline.is_none_or(|d| now >= d)
    }

    /// Records a drawn frame and schedules the next deadline.
    pub fn tick(&mut self, now: Instant) -> FrameTime {
        let dt = self
            .last
            .map_or(self.dt_min, |last| now.saturating_duration_since(last))
            .clamp(self.dt_min, self.dt_max);
        self.last = Some(now);

        let anchor = self.deadline.unwrap_or(now);
        let mut next = anchor + self.interval;
        if next + self.interval <= now {
            next = now + self.interval;
        }
        self.deadline = Some(next);

        let ft = FrameTime {
            dt: dt.as_secs_f32(),
            now,
            frame_index: self.frame_index,
        };
        self.frame_index = self.frame_index.wrapping_add(1);
        ft
    }
}

impl Default for FramePacer {
    fn default() -> Self {
        Self::new(60.0)
    }
}

fn interval_for(rate: f32) -> Option<Duration> {
    (rate.is_finite() && rate > 0.0).then(|| Duration::from_secs_f64(1.0 / rate as f64))
}

#[cfg(test)]
mod tests {
    use super::*;

    // ── deadline anchoring ────────────────────────────────────────────────

    #[test]
    fn deadlines_advance_by_fixed_interval_despite_jitter() {
        let mut pacer = FramePacer::new(30.0);
        let interval = pacer.interval();
        let t0 = Instant::now();
        pacer.reset(t0);

        let jitter_ms = [0u64, 7, 2, 19, 11, 30, 1, 25];
        let mut deadlines = Vec::new();
        for (i, j) in jitter_ms.iter().enumerate() {
            let scheduled = t0 + interval * i as u32;
            pacer.tick(scheduled + Duration::from_millis(*j));
            deadlines.push(pacer.deadline().unwrap());
        }

        for pair in deadlines.windows(2) {
            assert_eq!(pair[1] - pair[0], interval);
        }
        assert_eq!(deadlines[0], t0 + interval);
    }

    #[test]
    fn stall_realigns_instead_of_bursting() {
        let mut pacer = FramePacer::new(30.0);
        let t0 = Instant::now();
        pacer.reset(t0);
        pacer.tick(t0);

        let late = t0 + Duration::from_secs(2);
        pacer.tick(late);
        assert_eq!(pacer.deadline(), Some(late + pacer.interval()));
    }

    #[test]
    fn reset_makes_frame_due_now() {
        let mut pacer = FramePacer::new(10.0);
        let t0 = Instant::now();
        pacer.reset(t0);
        pacer.tick(t0);
        assert!(!pacer.is_due(t0 + Duration::from_millis(50)));

        let resumed = t0 + Duration::from_secs(30);
        pacer.reset(resumed);
        assert!(pacer.is_due(resumed));
        assert_eq!(pacer.deadline(), Some(resumed));
    }

    // ── rate ──────────────────────────────────────────────────────────────

    #[test]
    fn set_rate_rejects_nonsense() {
        let mut pacer = FramePacer::new(60.0);
        assert!(!pacer.set_rate(0.0));
        assert!(!pacer.set_rate(f32::NAN));
        assert!(pacer.set_rate(30.0));
        assert!((pacer.rate() - 30.0).abs() < 1e-3);
    }

    #[test]
    fn dt_is_clamped() {
        let mut pacer = FramePacer::new(60.0);
        let t0 = Instant::now();
        pacer.reset(t0);
        let ft = pacer.tick(t0 + Duration::from_secs(5));
        assert!((ft.dt - 0.25).abs() < 1e-6);
        assert_eq!(ft.frame_index, 0);
        assert_eq!(pacer.frame_index(), 1);
    }
}
