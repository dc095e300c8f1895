//! Replays a list of image files as if they came from a camera.

use std::path::PathBuf;
use std::thread;
use std::time::{Duration, Instant};

use tracing::debug;

use crate::depth_pipeline::{
    capture::camera::{Camera, CaptureEvent, FrameStream},
    common::error::{PipelineError, Result},
    evaluation::DatasetManifest,
};

pub struct FileSequenceCamera {
    paths: Vec<PathBuf>,
    interval: Duration,
    looping: bool,
}

impl FileSequenceCamera {
    /// `fps <= 0` replays as fast as the files decode.
    pub fn new(paths: Vec<PathBuf>, fps: f64) -> Self {
        let interval = if fps > 0.0 {
            Duration::from_secs_f64(1.0 / fps)
        } else {
            Duration::ZERO
        };
        Self {
            paths,
            interval,
            looping: false,
        }
    }

    /// Replays the RGB side of a dataset manifest.
    pub fn from_manifest(manifest: &DatasetManifest, fps: f64) -> Self {
        Self::new(manifest.rgb_paths().to_vec(), fps)
    }

    pub fn looping(mut self, looping: bool) -> Self {
        self.looping = looping;
        self
    }
}

impl Camera for FileSequenceCamera {
    type Stream = FileSequenceStream;

    fn describe(&self) -> String {
        match self.paths.first() {
            Some(first) => format!("{} files starting at {}", self.paths.len(), first.display()),
            None => "empty file sequence".to_string(),
        }
    }

    fn open(self) -> Result<FileSequenceStream> {
        let Some(first) = self.paths.first() else {
            return Err(PipelineError::CameraOpen("no image files to replay".to_string()));
        };
        if !first.is_file() {
            return Err(PipelineError::CameraOpen(format!(
                "{}: no such file",
                first.display()
            )));
        }

        Ok(FileSequenceStream {
            paths: self.paths,
            interval: self.interval,
            looping: self.looping,
            next_index: 0,
            next_due: Instant::now(),
        })
    }
}

pub struct FileSequenceStream {
    paths: Vec<PathBuf>,
    interval: Duration,
    looping: bool,
    next_index: usize,
    next_due: Instant,
}

impl FrameStream for FileSequenceStream {
    fn next_frame(&mut self) -> Result<CaptureEvent> {
        if self.next_index >= self.paths.len() {
            if !self.looping {
                return Ok(CaptureEvent::Ended);
            }
            self.next_index = 0;
        }

        let now = Instant::now();
        if self.next_due > now {
            thread::sleep(self.next_due - now);
        }
        self.next_due = Instant::now() + self.interval;

        let path = &self.paths[self.next_index];
        self.next_index += 1;

        match image::open(path) {
            Ok(img) => Ok(CaptureEvent::Frame(img.to_rgb8())),
            Err(e) => {
                debug!("Skipping {}: {}", path.display(), e);
                Ok(CaptureEvent::Skipped)
            }
        }
    }
}
