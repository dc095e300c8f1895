use std::time::{Duration, Instant};

const WINDOW: Duration = Duration::from_secs(1);

/// Counts displayed frames since session start. Never reset within a session.
#[derive(Debug, Clone)]
pub struct FrameRateCounter {
    start: Instant,
    frames: u64,
    window_start: Instant,
    window_frames: u64,
    recent: Option<f32>,
}

impl FrameRateCounter {
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    pub fn starting_at(start: Instant) -> Self {
        Self {
            start,
            frames: 0,
            window_start: start,
            window_frames: 0,
            recent: None,
        }
    }

    pub fn tick(&mut self) {
        self.tick_at(Instant::now());
    }

    pub fn tick_at(&mut self, now: Instant) {
        self.frames += 1;
        self.window_frames += 1;

        let span = now.saturating_duration_since(self.window_start);
        if span >= WINDOW {
            self.recent = Some(self.window_frames as f32 / span.as_secs_f32());
            self.window_start = now;
            self.window_frames = 0;
        }
    }

    pub fn frames(&self) -> u64 {
        self.frames
    }

    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }

    /// Average rate over the whole session.
    pub fn fps(&self) -> f64 {
        self.fps_at(Instant::now())
    }

    pub fn fps_at(&self, now: Instant) -> f64 {
        let secs = now.saturating_duration_since(self.start).as_secs_f64();
        if secs <= 0.0 {
            return 0.0;
        }
        self.frames as f64 / secs
    }

    /// Rate over the last completed one-second window, once there is one.
    pub fn recent_fps(&self) -> Option<f32> {
        self.recent
    }
}

impl Default for FrameRateCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_average_over_session() {
        let start = Instant::now();
        let mut counter = FrameRateCounter::starting_at(start);
        for i in 1..=20 {
            counter.tick_at(start + Duration::from_millis(100 * i));
        }
        assert_eq!(counter.frames(), 20);
        let fps = counter.fps_at(start + Duration::from_secs(2));
        assert!((fps - 10.0).abs() < 1e-9);
    }

    #[test]
    fn test_recent_rate_updates_each_window() {
        let start = Instant::now();
        let mut counter = FrameRateCounter::starting_at(start);
        assert_eq!(counter.recent_fps(), None);

        for i in 1..=5 {
            counter.tick_at(start + Duration::from_millis(200 * i));
        }
        let recent = counter.recent_fps().unwrap();
        assert!((recent - 5.0).abs() < 1e-4);

        // Counting carries on after the window rolls over.
        counter.tick_at(start + Duration::from_millis(1100));
        assert_eq!(counter.frames(), 6);
    }

    #[test]
    fn test_no_time_elapsed_reports_zero() {
        let start = Instant::now();
        let counter = FrameRateCounter::starting_at(start);
        assert_eq!(counter.fps_at(start), 0.0);
    }
}
