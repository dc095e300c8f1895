//! Real-time monocular depth pipeline
//!
//! A producer thread keeps the newest camera frame in a single-slot mailbox; the consumer
//! loop takes it, runs the model on the accelerator, colorizes the prediction and shows the
//! source and depth panels stacked on top of each other.

pub mod capture;
pub mod common;
pub mod engine;
pub mod evaluation;
pub mod frame;
pub mod lifecycle;
pub mod postprocess;
pub mod preprocess;
pub mod record;
pub mod session;
pub mod visualize;

pub use common::{
    PipelineError,
    Result,
};

pub use frame::{
    Frame,
    FrameSlot,
    SlotStats,
};

pub use lifecycle::{
    SessionContext,
    StopSignal,
};

pub use capture::{
    Camera,
    CameraConfig,
    CaptureEvent,
    FileSequenceCamera,
    FrameProducer,
    FrameStream,
    ProducerHandle,
    ProducerStats,
};

#[cfg(feature = "v4l2")]
pub use capture::V4l2Camera;

pub use preprocess::{
    CropPolicy,
    InputTensor,
    Normalization,
    Preprocessor,
    TensorShape,
};

pub use engine::{
    CudaEngine,
    DepthEngine,
    DepthMap,
    EngineState,
    ModelManifest,
};

pub use postprocess::{
    ColorCurve,
    DepthRange,
    colorize,
    estimate_scale,
    sanitize_prediction,
};

pub use visualize::{
    Compositor,
    DisplayEvent,
    DisplaySurface,
    FrameRateCounter,
    HeadlessDisplay,
    WindowDisplay,
};

pub use record::{
    DepthWriter,
    FrameRecorder,
    RecordMode,
    TiffCompression,
    TiffDepthWriter,
};

pub use evaluation::{
    DatasetManifest,
    DatasetPreset,
};

pub use session::{
    LiveSession,
    SessionConfig,
    SessionConfigBuilder,
    SessionReport,
    StageTimings,
};
