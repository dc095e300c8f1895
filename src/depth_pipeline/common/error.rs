use thiserror::Error;

#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("Failed to open camera stream: {0}")]
    CameraOpen(String),

    #[error("Camera stream failed: {0}")]
    CameraStream(String),

    #[error("Failed to load compiled model: {0}")]
    ModelLoad(String),

    #[error("CUDA error: {0}")]
    CudaError(String),

    #[error("No CUDA accelerator available in this build")]
    AcceleratorUnavailable,

    #[error("Shape mismatch: expected {expected:?}, got {actual:?}")]
    ShapeMismatch {
        expected: Vec<usize>,
        actual: Vec<usize>,
    },

    #[error("Invalid image dimensions: width={0}, height={1}")]
    InvalidDimensions(usize, usize),

    #[error("No ground-truth pixel lies strictly inside ({min_depth}, {max_depth})")]
    EmptyValidMask { min_depth: f32, max_depth: f32 },

    #[error("Median prediction over the valid mask is zero; scale is undefined")]
    DegenerateScale,

    #[error("Invalid dataset manifest at line {line}: {reason}")]
    Manifest { line: usize, reason: String },

    #[error("Display error: {0}")]
    Display(String),

    #[error("Failed to write output file: {0}")]
    OutputWriteError(String),

    #[error("Failed to encode TIFF image: {0}")]
    EncodeError(String),

    #[error("Producer thread panicked")]
    ProducerPanicked,

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
}

#[cfg(cuda_accel)]
impl From<cudarc::driver::DriverError> for PipelineError {
    fn from(e: cudarc::driver::DriverError) -> Self {
        PipelineError::CudaError(e.to_string())
    }
}

pub type Result<T> = std::result::Result<T, PipelineError>;
