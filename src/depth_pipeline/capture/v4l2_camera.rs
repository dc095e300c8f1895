use image::ImageFormat;
use tracing::{debug, info, warn};
use v4l::buffer::Type;
use v4l::io::mmap::Stream as MmapStream;
use v4l::io::traits::{CaptureStream, Stream as StreamControl};
use v4l::video::Capture;
use v4l::{Device, Format, FourCC};

use crate::depth_pipeline::{
    capture::camera::{Camera, CameraConfig, CaptureEvent, FrameStream, PixelFormat},
    capture::convert::yuyv_to_rgb,
    common::error::{PipelineError, Result},
};

/// V4L2 camera, one device node, fixed resolution.
#[derive(Debug, Clone)]
pub struct V4l2Camera {
    config: CameraConfig,
}

impl V4l2Camera {
    pub fn new(config: CameraConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &CameraConfig {
        &self.config
    }

    fn fourcc(format: PixelFormat) -> FourCC {
        match format {
            PixelFormat::Mjpeg => FourCC::new(b"MJPG"),
            PixelFormat::Yuyv => FourCC::new(b"YUYV"),
        }
    }
}

impl Camera for V4l2Camera {
    type Stream = V4l2Stream;

    fn describe(&self) -> String {
        format!(
            "{} @ {}x{} {}fps {:?}",
            self.config.device.display(),
            self.config.width,
            self.config.height,
            self.config.fps,
            self.config.pixel_format
        )
    }

    fn open(self) -> Result<V4l2Stream> {
        let config = self.config;
        let open_err =
            |what: &str, e: std::io::Error| PipelineError::CameraOpen(format!("{}: {}: {}", config.device.display(), what, e));

        let device = Device::with_path(&config.device).map_err(|e| open_err("open", e))?;

        let fourcc = Self::fourcc(config.pixel_format);
        let requested = Format::new(config.width, config.height, fourcc);
        let format = Capture::set_format(&device, &requested).map_err(|e| open_err("set format", e))?;

        if format.fourcc != fourcc {
            return Err(PipelineError::CameraOpen(format!(
                "{}: {:?} not supported (device offered {})",
                config.device.display(),
                config.pixel_format,
                format.fourcc
            )));
        }
        if format.width != config.width || format.height != config.height {
            warn!(
                "Camera negotiated {}x{} instead of {}x{}",
                format.width, format.height, config.width, config.height
            );
        }

        let params = v4l::video::capture::Parameters::with_fps(config.fps);
        Capture::set_params(&device, &params).map_err(|e| open_err("set frame rate", e))?;

        let stream = MmapStream::with_buffers(&device, Type::VideoCapture, config.buffer_count)
            .map_err(|e| open_err("map buffers", e))?;

        info!(
            "V4L2 stream ready: {}x{} {} ({} buffers)",
            format.width, format.height, format.fourcc, config.buffer_count
        );

        Ok(V4l2Stream {
            stream,
            _device: device,
            width: format.width,
            height: format.height,
            pixel_format: config.pixel_format,
        })
    }
}

pub struct V4l2Stream {
    // Declared before the device so the mappings are released first.
    stream: MmapStream<'static>,
    _device: Device,
    width: u32,
    height: u32,
    pixel_format: PixelFormat,
}

impl FrameStream for V4l2Stream {
    fn next_frame(&mut self) -> Result<CaptureEvent> {
        let (buffer, meta) = CaptureStream::next(&mut self.stream)
            .map_err(|e| PipelineError::CameraStream(e.to_string()))?;

        let used = (meta.bytesused as usize).min(buffer.len());
        if used == 0 {
            return Ok(CaptureEvent::Skipped);
        }
        let data = &buffer[..used];

        let event = match self.pixel_format {
            PixelFormat::Mjpeg => match image::load_from_memory_with_format(data, ImageFormat::Jpeg) {
                Ok(img) => CaptureEvent::Frame(img.to_rgb8()),
                Err(e) => {
                    debug!("Dropping undecodable MJPEG buffer: {}", e);
                    CaptureEvent::Skipped
                }
            },
            PixelFormat::Yuyv => match yuyv_to_rgb(data, self.width, self.height) {
                Some(img) => CaptureEvent::Frame(img),
                None => CaptureEvent::Skipped,
            },
        };
        Ok(event)
    }

    fn stop(&mut self) -> Result<()> {
        StreamControl::stop(&mut self.stream).map_err(|e| PipelineError::CameraStream(e.to_string()))
    }
}
