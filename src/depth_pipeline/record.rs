//! Snapshot and continuous recording of composites and raw depth

pub mod recorder;
pub mod tiff_depth_writer;
pub mod types;
pub mod writer;

pub use recorder::{FrameRecorder, Recording};
pub use tiff_depth_writer::TiffDepthWriter;
pub use types::{RecordConfig, RecordMode, TiffCompression};
pub use writer::DepthWriter;
