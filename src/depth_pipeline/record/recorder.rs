use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbImage};
use tracing::info;

use crate::depth_pipeline::{
    common::error::{PipelineError, Result},
    engine::DepthMap,
    record::tiff_depth_writer::TiffDepthWriter,
    record::types::{RecordConfig, RecordMode, TiffCompression},
    record::writer::DepthWriter,
};

/// Paths written for one recorded frame
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Recording {
    pub composite: PathBuf,
    pub depth: PathBuf,
}

/// Saves composites and raw depth maps as numbered file pairs.
pub struct FrameRecorder {
    dir: PathBuf,
    mode: RecordMode,
    writer: Box<dyn DepthWriter>,
    next_index: u64,
}

impl FrameRecorder {
    pub fn new(dir: impl Into<PathBuf>, mode: RecordMode, compression: TiffCompression) -> Result<Self> {
        Self::with_writer(dir, mode, Box::new(TiffDepthWriter::new(compression)))
    }

    pub fn from_config(config: &RecordConfig) -> Result<Self> {
        Self::new(&config.dir, config.mode, config.compression)
    }

    pub fn with_writer(dir: impl Into<PathBuf>, mode: RecordMode, writer: Box<dyn DepthWriter>) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir)
            .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", dir.display(), e)))?;
        info!("Recording to {} ({:?})", dir.display(), mode);
        Ok(Self {
            dir,
            mode,
            writer,
            next_index: 0,
        })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn mode(&self) -> RecordMode {
        self.mode
    }

    pub fn recorded(&self) -> u64 {
        self.next_index
    }

    /// Records the frame if the mode calls for it.
    pub fn maybe_record(
        &mut self,
        snapshot_requested: bool,
        composite: &RgbImage,
        depth: &DepthMap,
    ) -> Result<Option<Recording>> {
        if !self.mode.should_record(snapshot_requested) {
            return Ok(None);
        }
        self.record(composite, depth).map(Some)
    }

    pub fn record(&mut self, composite: &RgbImage, depth: &DepthMap) -> Result<Recording> {
        let index = self.next_index;
        let composite_path = self.dir.join(format!("{:06}_composite.png", index));
        let depth_path = self
            .dir
            .join(format!("{:06}_depth.{}", index, self.writer.extension()));

        composite
            .save_with_format(&composite_path, ImageFormat::Png)
            .map_err(|e| PipelineError::OutputWriteError(format!("{}: {}", composite_path.display(), e)))?;

        let write_err = |e: std::io::Error| PipelineError::OutputWriteError(format!("{}: {}", depth_path.display(), e));
        let file = File::create(&depth_path).map_err(write_err)?;
        let mut out = BufWriter::new(file);
        self.writer.write_depth(depth, &mut out).map_err(|e| match e {
            PipelineError::IoError(io) => write_err(io),
            other => other,
        })?;
        out.flush().map_err(write_err)?;

        self.next_index += 1;
        Ok(Recording {
            composite: composite_path,
            depth: depth_path,
        })
    }
}
