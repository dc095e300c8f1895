//! Command-line interface

use std::path::PathBuf;

use clap::Parser;

use crate::depth_pipeline::{
    CameraConfig, ColorCurve, DatasetPreset, SessionConfig, TiffCompression,
    capture::PixelFormat,
    record::{RecordConfig, RecordMode},
};

#[derive(Parser, Debug, Clone)]
#[command(author, version, about = "Real-time monocular depth estimation on a CUDA device", long_about = None)]
pub struct Cli {
    /// Compiled model manifest (JSON)
    #[arg(long, value_name = "MANIFEST")]
    pub model: PathBuf,

    /// CUDA device ordinal
    #[arg(long, default_value_t = 0)]
    pub device: usize,

    /// Dataset the model was trained on: kitti or nyu
    #[arg(long, default_value = "kitti")]
    pub dataset: DatasetPreset,

    /// V4L2 device node
    #[arg(long, default_value = "/dev/video0")]
    pub camera: PathBuf,

    #[arg(long, default_value_t = 1920)]
    pub width: u32,

    #[arg(long, default_value_t = 1080)]
    pub height: u32,

    #[arg(long, default_value_t = 30)]
    pub fps: u32,

    /// Camera pixel format: mjpeg or yuyv
    #[arg(long, default_value = "mjpeg")]
    pub pixel_format: PixelFormat,

    /// Replay the RGB images of a dataset split file instead of opening a camera
    #[arg(long, value_name = "SPLIT_FILE")]
    pub replay_manifest: Option<PathBuf>,

    #[arg(long, default_value = ".")]
    pub rgb_root: PathBuf,

    #[arg(long, default_value = ".")]
    pub depth_root: PathBuf,

    /// Replay rate; 0 replays as fast as possible
    #[arg(long, default_value_t = 10.0)]
    pub replay_fps: f64,

    /// Restart the replay when it reaches the end
    #[arg(long = "loop")]
    pub looping: bool,

    /// Depth mapped to the low end of the color curve
    #[arg(long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub vmin: f32,

    /// Depth mapped to the high end of the color curve
    #[arg(long, default_value_t = 8.0, allow_negative_numbers = true)]
    pub vmax: f32,

    /// inferno, magma, viridis or gray
    #[arg(long, default_value = "inferno")]
    pub colormap: ColorCurve,

    /// TrueType font used for the captions instead of the bundled one
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// Directory for snapshots (S key) or continuous recording
    #[arg(long)]
    pub record_dir: Option<PathBuf>,

    /// Record every frame instead of snapshots only
    #[arg(long, requires = "record_dir")]
    pub record_all: bool,

    /// Compression for recorded depth TIFFs
    #[arg(long, default_value = "deflate-fast")]
    pub tiff_compression: TiffCompression,

    /// Run without a window
    #[arg(long)]
    pub headless: bool,

    /// Stop after this many frames
    #[arg(long)]
    pub max_frames: Option<u64>,
}

impl Cli {
    pub fn validate(&self) -> Result<(), String> {
        if !(self.vmax > self.vmin) {
            return Err(format!("--vmax ({}) must be greater than --vmin ({})", self.vmax, self.vmin));
        }
        if self.width == 0 || self.height == 0 {
            return Err(format!("invalid camera resolution {}x{}", self.width, self.height));
        }
        Ok(())
    }

    pub fn camera_config(&self) -> CameraConfig {
        CameraConfig::builder()
            .device(&self.camera)
            .resolution(self.width, self.height)
            .fps(self.fps)
            .pixel_format(self.pixel_format)
            .build()
    }

    pub fn record_config(&self) -> Option<RecordConfig> {
        self.record_dir.as_ref().map(|dir| {
            let mode = if self.record_all {
                RecordMode::EveryFrame
            } else {
                RecordMode::SnapshotOnly
            };
            RecordConfig::new(dir)
                .mode(mode)
                .compression(self.tiff_compression)
        })
    }

    pub fn session_config(&self) -> SessionConfig {
        SessionConfig::builder()
            .dataset(self.dataset)
            .display_range(self.vmin, self.vmax)
            .curve(self.colormap)
            .font_path(self.font.clone())
            .max_frames(self.max_frames)
            .record(self.record_config())
            .build()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let cli = Cli::try_parse_from(["monodepth-rt", "--model", "kitti.json"]).unwrap();
        assert!(cli.validate().is_ok());

        let config = cli.session_config();
        assert_eq!(config.dataset, DatasetPreset::Kitti);
        assert_eq!(config.curve, ColorCurve::Inferno);
        assert_eq!((config.display_range.min, config.display_range.max), (0.0, 8.0));
        assert!(config.record.is_none());

        let camera = cli.camera_config();
        assert_eq!(camera.device, PathBuf::from("/dev/video0"));
        assert_eq!((camera.width, camera.height, camera.fps), (1920, 1080, 30));
        assert_eq!(camera.pixel_format, PixelFormat::Mjpeg);
    }

    #[test]
    fn test_full_flag_set() {
        let cli = Cli::try_parse_from([
            "monodepth-rt",
            "--model",
            "nyu.json",
            "--dataset",
            "nyu",
            "--colormap",
            "viridis",
            "--vmin",
            "0.5",
            "--vmax",
            "10",
            "--record-dir",
            "/tmp/out",
            "--record-all",
            "--tiff-compression",
            "lzw",
            "--replay-manifest",
            "nyu_test.txt",
            "--loop",
            "--headless",
            "--max-frames",
            "100",
        ])
        .unwrap();

        assert!(cli.looping && cli.headless);
        assert_eq!(cli.replay_manifest, Some(PathBuf::from("nyu_test.txt")));

        let config = cli.session_config();
        assert_eq!(config.dataset, DatasetPreset::Nyu);
        assert_eq!(config.curve, ColorCurve::Viridis);
        assert_eq!(config.max_frames, Some(100));
        let record = config.record.unwrap();
        assert_eq!(record.mode, RecordMode::EveryFrame);
        assert_eq!(record.compression, TiffCompression::Lzw);
    }

    #[test]
    fn test_rejects_bad_values() {
        assert!(Cli::try_parse_from(["monodepth-rt", "--model", "m.json", "--colormap", "jet"]).is_err());
        assert!(Cli::try_parse_from(["monodepth-rt", "--model", "m.json", "--dataset", "cityscapes"]).is_err());
        assert!(Cli::try_parse_from(["monodepth-rt", "--model", "m.json", "--record-all"]).is_err());
        assert!(Cli::try_parse_from(["monodepth-rt"]).is_err());

        let inverted = Cli::try_parse_from(["monodepth-rt", "--model", "m.json", "--vmin", "9"]).unwrap();
        assert!(inverted.validate().is_err());
    }
}
