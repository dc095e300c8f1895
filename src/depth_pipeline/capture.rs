//! Frame acquisition
//!
//! Camera collaborators are split in two: a [`Camera`] is a `Send` description of the device
//! that gets moved onto the producer thread, and the [`FrameStream`] it opens lives and dies
//! on that thread.

pub mod camera;
pub mod convert;
pub mod file_camera;
pub mod producer;
#[cfg(feature = "v4l2")]
pub mod v4l2_camera;

#[cfg(test)]
mod tests;

pub use camera::{Camera, CameraConfig, CameraConfigBuilder, CaptureEvent, FrameStream, PixelFormat};
pub use convert::yuyv_to_rgb;
pub use file_camera::FileSequenceCamera;
pub use producer::{FrameProducer, ProducerHandle, ProducerStats};
#[cfg(feature = "v4l2")]
pub use v4l2_camera::V4l2Camera;
