//! Live session configuration

use std::path::PathBuf;
use std::time::Duration;

use crate::depth_pipeline::{
    evaluation::DatasetPreset,
    postprocess::{ColorCurve, DepthRange},
    record::RecordConfig,
};

#[derive(Debug, Clone)]
pub struct SessionConfig {
    /// Training dataset of the model; picks the crop
    pub dataset: DatasetPreset,
    /// Fixed depth range mapped onto the color curve
    pub display_range: DepthRange,
    pub curve: ColorCurve,
    /// Longest the consumer sleeps waiting for a frame before re-checking the stop signal
    pub poll_interval: Duration,
    pub window_title: String,
    /// TrueType font for the captions; `None` uses the bundled font
    pub font_path: Option<PathBuf>,
    /// Stop after this many displayed frames
    pub max_frames: Option<u64>,
    pub record: Option<RecordConfig>,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            dataset: DatasetPreset::Kitti,
            display_range: DepthRange::new(0.0, 8.0),
            curve: ColorCurve::Inferno,
            poll_interval: Duration::from_millis(5),
            window_title: "Depth Prediction".to_string(),
            font_path: None,
            max_frames: None,
            record: None,
        }
    }
}

impl SessionConfig {
    pub fn builder() -> SessionConfigBuilder {
        SessionConfigBuilder::default()
    }
}

/// Builder for SessionConfig
#[derive(Default)]
pub struct SessionConfigBuilder {
    dataset: Option<DatasetPreset>,
    display_range: Option<DepthRange>,
    curve: Option<ColorCurve>,
    poll_interval: Option<Duration>,
    window_title: Option<String>,
    font_path: Option<PathBuf>,
    max_frames: Option<u64>,
    record: Option<RecordConfig>,
}

impl SessionConfigBuilder {
    pub fn dataset(mut self, dataset: DatasetPreset) -> Self {
        self.dataset = Some(dataset);
        self
    }

    pub fn display_range(mut self, min: f32, max: f32) -> Self {
        self.display_range = Some(DepthRange::new(min, max));
        self
    }

    pub fn curve(mut self, curve: ColorCurve) -> Self {
        self.curve = Some(curve);
        self
    }

    pub fn poll_interval(mut self, interval: Duration) -> Self {
        self.poll_interval = Some(interval);
        self
    }

    pub fn window_title(mut self, title: impl Into<String>) -> Self {
        self.window_title = Some(title.into());
        self
    }

    pub fn font_path(mut self, path: Option<PathBuf>) -> Self {
        self.font_path = path;
        self
    }

    pub fn max_frames(mut self, max_frames: Option<u64>) -> Self {
        self.max_frames = max_frames;
        self
    }

    pub fn record(mut self, record: Option<RecordConfig>) -> Self {
        self.record = record;
        self
    }

    pub fn build(self) -> SessionConfig {
        let default = SessionConfig::default();
        SessionConfig {
            dataset: self.dataset.unwrap_or(default.dataset),
            display_range: self.display_range.unwrap_or(default.display_range),
            curve: self.curve.unwrap_or(default.curve),
            poll_interval: self.poll_interval.unwrap_or(default.poll_interval),
            window_title: self.window_title.unwrap_or(default.window_title),
            font_path: self.font_path,
            max_frames: self.max_frames,
            record: self.record,
        }
    }
}
