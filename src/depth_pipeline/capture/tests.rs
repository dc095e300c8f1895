use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use image::{Rgb, RgbImage};

use crate::depth_pipeline::capture::{
    Camera, CameraConfig, CaptureEvent, FileSequenceCamera, FrameProducer, FrameStream, PixelFormat,
};
use crate::depth_pipeline::common::error::{PipelineError, Result};
use crate::depth_pipeline::lifecycle::SessionContext;

enum Step {
    Frame(u8),
    Skip,
    Fail,
    End,
}

struct MockCamera {
    fail_open: bool,
    script: Vec<Step>,
    /// Keep producing frames forever once the script runs out
    endless: bool,
    stopped: Arc<AtomicBool>,
}

impl MockCamera {
    fn scripted(script: Vec<Step>) -> Self {
        Self {
            fail_open: false,
            script,
            endless: false,
            stopped: Arc::new(AtomicBool::new(false)),
        }
    }
}

struct MockStream {
    script: VecDeque<Step>,
    endless: bool,
    stopped: Arc<AtomicBool>,
}

impl Camera for MockCamera {
    type Stream = MockStream;

    fn describe(&self) -> String {
        "mock camera".to_string()
    }

    fn open(self) -> Result<MockStream> {
        if self.fail_open {
            return Err(PipelineError::CameraOpen("mock device busy".to_string()));
        }
        Ok(MockStream {
            script: self.script.into(),
            endless: self.endless,
            stopped: self.stopped,
        })
    }
}

impl FrameStream for MockStream {
    fn next_frame(&mut self) -> Result<CaptureEvent> {
        std::thread::sleep(Duration::from_millis(1));
        match self.script.pop_front() {
            Some(Step::Frame(v)) => Ok(CaptureEvent::Frame(RgbImage::from_pixel(2, 2, Rgb([v, v, v])))),
            Some(Step::Skip) => Ok(CaptureEvent::Skipped),
            Some(Step::Fail) => Err(PipelineError::CameraStream("mock cable unplugged".to_string())),
            Some(Step::End) => Ok(CaptureEvent::Ended),
            None if self.endless => Ok(CaptureEvent::Frame(RgbImage::new(2, 2))),
            None => Ok(CaptureEvent::Ended),
        }
    }

    fn stop(&mut self) -> Result<()> {
        self.stopped.store(true, Ordering::SeqCst);
        Ok(())
    }
}

#[test]
fn test_open_failure_aborts_spawn() {
    let ctx = SessionContext::new();
    let mut camera = MockCamera::scripted(vec![]);
    camera.fail_open = true;

    let result = FrameProducer::spawn(camera, ctx.clone());
    assert!(matches!(result, Err(PipelineError::CameraOpen(_))));
    assert!(!ctx.slot().is_ready());
}

#[test]
fn test_producer_publishes_and_skips_then_ends() {
    let ctx = SessionContext::new();
    let camera = MockCamera::scripted(vec![Step::Frame(10), Step::Skip, Step::Frame(20), Step::End]);
    let stopped = camera.stopped.clone();

    let handle = FrameProducer::spawn(camera, ctx.clone()).unwrap();
    while !handle.is_finished() {
        std::thread::sleep(Duration::from_millis(1));
    }
    let stats = handle.stop_and_join().unwrap();

    assert_eq!(stats.delivered, 2);
    assert_eq!(stats.skipped, 1);
    assert!(stopped.load(Ordering::SeqCst), "stream should be stopped on exit");
    // End of source raises the stop flag for the consumer.
    assert!(ctx.stop().is_stop_requested());

    let last = ctx.slot().try_take().unwrap();
    assert_eq!(last.sequence, 2);
    assert_eq!(last.image.get_pixel(0, 0), &Rgb([20, 20, 20]));
}

#[test]
fn test_stop_signal_terminates_endless_producer() {
    let ctx = SessionContext::new();
    let mut camera = MockCamera::scripted(vec![]);
    camera.endless = true;

    let handle = FrameProducer::spawn(camera, ctx.clone()).unwrap();
    assert!(ctx.slot().wait_take(Duration::from_secs(5)).is_some());

    ctx.stop().request_stop();
    ctx.stop().request_stop();
    let stats = handle.stop_and_join().unwrap();
    assert!(stats.delivered >= 1);
}

#[test]
fn test_stream_failure_surfaces_on_join() {
    let ctx = SessionContext::new();
    let camera = MockCamera::scripted(vec![Step::Frame(1), Step::Fail]);

    let handle = FrameProducer::spawn(camera, ctx.clone()).unwrap();
    while !handle.is_finished() {
        std::thread::sleep(Duration::from_millis(1));
    }

    assert!(ctx.stop().is_stop_requested());
    let result = handle.stop_and_join();
    assert!(matches!(result, Err(PipelineError::CameraStream(_))));
}

#[test]
fn test_dropping_handle_joins_producer() {
    let ctx = SessionContext::new();
    let mut camera = MockCamera::scripted(vec![]);
    camera.endless = true;
    let stopped = camera.stopped.clone();

    let handle = FrameProducer::spawn(camera, ctx.clone()).unwrap();
    drop(handle);

    assert!(ctx.stop().is_stop_requested());
    assert!(stopped.load(Ordering::SeqCst));
}

#[test]
fn test_file_sequence_replays_and_skips_bad_files() {
    let dir = tempfile::tempdir().unwrap();
    let good = dir.path().join("a.png");
    RgbImage::from_pixel(3, 2, Rgb([1, 2, 3])).save(&good).unwrap();
    let bad = dir.path().join("b.png");
    std::fs::write(&bad, b"not a png").unwrap();

    let mut stream = FileSequenceCamera::new(vec![good.clone(), bad], 0.0).open().unwrap();

    match stream.next_frame().unwrap() {
        CaptureEvent::Frame(img) => assert_eq!(img.get_pixel(2, 1), &Rgb([1, 2, 3])),
        other => panic!("expected frame, got {:?}", other),
    }
    assert!(matches!(stream.next_frame().unwrap(), CaptureEvent::Skipped));
    assert!(matches!(stream.next_frame().unwrap(), CaptureEvent::Ended));
}

#[test]
fn test_file_sequence_loops() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("only.png");
    RgbImage::new(1, 1).save(&path).unwrap();

    let mut stream = FileSequenceCamera::new(vec![path], 0.0).looping(true).open().unwrap();
    for _ in 0..3 {
        assert!(matches!(stream.next_frame().unwrap(), CaptureEvent::Frame(_)));
    }
}

#[test]
fn test_file_sequence_open_fails_without_files() {
    let missing = FileSequenceCamera::new(vec!["/nonexistent/frame.png".into()], 30.0).open();
    assert!(matches!(missing, Err(PipelineError::CameraOpen(_))));

    let empty = FileSequenceCamera::new(Vec::new(), 30.0).open();
    assert!(matches!(empty, Err(PipelineError::CameraOpen(_))));
}

#[test]
fn test_camera_config_builder() {
    let config = CameraConfig::builder()
        .device("/dev/video2")
        .resolution(1280, 720)
        .fps(60)
        .buffer_count(0)
        .pixel_format(PixelFormat::Yuyv)
        .build();

    assert_eq!(config.device, std::path::PathBuf::from("/dev/video2"));
    assert_eq!((config.width, config.height), (1280, 720));
    assert_eq!(config.fps, 60);
    assert_eq!(config.buffer_count, 1);
    assert_eq!(config.pixel_format, PixelFormat::Yuyv);

    let default = CameraConfig::default();
    assert_eq!((default.width, default.height, default.fps), (1920, 1080, 30));
}
