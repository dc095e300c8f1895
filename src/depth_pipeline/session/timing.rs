use std::time::{Duration, Instant};

use tracing::info;

#[derive(Debug, Clone, PartialEq)]
pub struct StageTiming {
    pub name: &'static str,
    pub total: Duration,
    pub calls: u64,
}

impl StageTiming {
    pub fn average(&self) -> Duration {
        if self.calls == 0 {
            return Duration::ZERO;
        }
        let nanos = self.total.as_nanos() / u128::from(self.calls);
        Duration::from_nanos(u64::try_from(nanos).unwrap_or(u64::MAX))
    }
}

/// Accumulated wall time per pipeline stage, in first-seen order
#[derive(Debug, Clone, Default)]
pub struct StageTimings {
    stages: Vec<StageTiming>,
}

impl StageTimings {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add(&mut self, name: &'static str, duration: Duration) {
        match self.stages.iter_mut().find(|s| s.name == name) {
            Some(stage) => {
                stage.total += duration;
                stage.calls += 1;
            }
            None => self.stages.push(StageTiming {
                name,
                total: duration,
                calls: 1,
            }),
        }
    }

    /// Runs `f` and charges its wall time to `name`.
    pub fn time<T>(&mut self, name: &'static str, f: impl FnOnce() -> T) -> T {
        let timer = Timer::start(name);
        let out = f();
        let (name, duration) = timer.stop();
        self.add(name, duration);
        out
    }

    pub fn get(&self, name: &str) -> Option<&StageTiming> {
        self.stages.iter().find(|s| s.name == name)
    }

    pub fn stages(&self) -> &[StageTiming] {
        &self.stages
    }

    pub fn total_duration(&self) -> Duration {
        self.stages.iter().map(|s| s.total).sum()
    }

    pub fn log_summary(&self) {
        let total = self.total_duration();
        for stage in &self.stages {
            let percentage = if total.as_secs_f64() > 0.0 {
                (stage.total.as_secs_f64() / total.as_secs_f64()) * 100.0
            } else {
                0.0
            };
            info!(
                "{:<12} {:>9.3}ms avg over {:>6} calls ({:>5.1}%)",
                stage.name,
                stage.average().as_secs_f64() * 1000.0,
                stage.calls,
                percentage
            );
        }
    }
}

pub struct Timer {
    start: Instant,
    name: &'static str,
}

impl Timer {
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    pub fn stop(self) -> (&'static str, Duration) {
        (self.name, self.start.elapsed())
    }
}
