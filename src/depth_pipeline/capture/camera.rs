use std::path::PathBuf;
use std::str::FromStr;

use image::RgbImage;

use crate::depth_pipeline::common::error::Result;

/// What one pull from a camera stream produced.
#[derive(Debug)]
pub enum CaptureEvent {
    /// A decoded frame, already in RGB
    Frame(RgbImage),
    /// The device delivered an empty or undecodable buffer; try again
    Skipped,
    /// The source has no more frames (file replay only)
    Ended,
}

/// An opened stream, owned by the producer thread.
pub trait FrameStream {
    /// Blocks until the device delivers the next buffer.
    fn next_frame(&mut self) -> Result<CaptureEvent>;

    /// Stops streaming. Called once, after the last `next_frame`.
    fn stop(&mut self) -> Result<()> {
        Ok(())
    }
}

/// A camera that can be moved to the producer thread and opened there.
pub trait Camera: Send + 'static {
    type Stream: FrameStream;

    /// Human-readable source name for logs.
    fn describe(&self) -> String;

    /// Configures resolution/format and starts the stream.
    fn open(self) -> Result<Self::Stream>;
}

/// Pixel format requested from a V4L2 device
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelFormat {
    /// Motion-JPEG, decoded on the producer thread
    Mjpeg,
    /// Packed YUV 4:2:2
    Yuyv,
}

impl FromStr for PixelFormat {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "mjpeg" | "mjpg" => Ok(PixelFormat::Mjpeg),
            "yuyv" => Ok(PixelFormat::Yuyv),
            other => Err(format!("unknown pixel format '{}', expected mjpeg or yuyv", other)),
        }
    }
}

/// Configuration for a live camera
#[derive(Debug, Clone)]
pub struct CameraConfig {
    pub device: PathBuf,
    pub width: u32,
    pub height: u32,
    pub fps: u32,
    /// Number of driver buffers to map
    pub buffer_count: u32,
    pub pixel_format: PixelFormat,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            device: PathBuf::from("/dev/video0"),
            width: 1920,
            height: 1080,
            fps: 30,
            buffer_count: 4,
            pixel_format: PixelFormat::Mjpeg,
        }
    }
}

impl CameraConfig {
    pub fn builder() -> CameraConfigBuilder {
        CameraConfigBuilder::default()
    }
}

/// Builder for CameraConfig
#[derive(Default)]
pub struct CameraConfigBuilder {
    device: Option<PathBuf>,
    width: Option<u32>,
    height: Option<u32>,
    fps: Option<u32>,
    buffer_count: Option<u32>,
    pixel_format: Option<PixelFormat>,
}

impl CameraConfigBuilder {
    pub fn device(mut self, device: impl Into<PathBuf>) -> Self {
        self.device = Some(device.into());
        self
    }

    pub fn resolution(mut self, width: u32, height: u32) -> Self {
        self.width = Some(width);
        self.height = Some(height);
        self
    }

    pub fn fps(mut self, fps: u32) -> Self {
        self.fps = Some(fps);
        self
    }

    pub fn buffer_count(mut self, count: u32) -> Self {
        self.buffer_count = Some(count);
        self
    }

    pub fn pixel_format(mut self, format: PixelFormat) -> Self {
        self.pixel_format = Some(format);
        self
    }

    pub fn build(self) -> CameraConfig {
        let default = CameraConfig::default();
        CameraConfig {
            device: self.device.unwrap_or(default.device),
            width: self.width.unwrap_or(default.width),
            height: self.height.unwrap_or(default.height),
            fps: self.fps.unwrap_or(default.fps),
            buffer_count: self.buffer_count.unwrap_or(default.buffer_count).max(1),
            pixel_format: self.pixel_format.unwrap_or(default.pixel_format),
        }
    }
}
