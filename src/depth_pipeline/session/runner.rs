use std::sync::Arc;
use std::time::Duration;

use image::RgbImage;
use tracing::{debug, error, info, trace, warn};

use crate::depth_pipeline::{
    capture::{ProducerHandle, ProducerStats},
    common::error::Result,
    engine::{DepthEngine, DepthMap},
    frame::{Frame, SlotStats},
    lifecycle::SessionContext,
    postprocess::colorize,
    preprocess::Preprocessor,
    record::FrameRecorder,
    session::config::SessionConfig,
    session::timing::StageTimings,
    visualize::{Compositor, DisplayEvent, DisplaySurface, FrameRateCounter},
};

/// Summary of one live session
#[derive(Debug, Clone)]
pub struct SessionReport {
    /// Frames processed and displayed
    pub frames: u64,
    pub elapsed: Duration,
    pub fps: f64,
    pub slot: SlotStats,
    pub producer: ProducerStats,
    pub recorded: u64,
    pub timings: StageTimings,
}

impl SessionReport {
    pub fn log_summary(&self) {
        info!(
            "Processed {} frames in {:.2}s ({:.2} FPS)",
            self.frames,
            self.elapsed.as_secs_f64(),
            self.fps
        );
        info!(
            "Camera delivered {} frames, {} skipped, {} overwritten before processing",
            self.producer.delivered, self.producer.skipped, self.slot.dropped
        );
        if self.recorded > 0 {
            info!("Recorded {} frames", self.recorded);
        }
        self.timings.log_summary();
    }
}

struct ProcessedFrame {
    composite: RgbImage,
    depth: DepthMap,
}

/// The consumer side of the pipeline.
pub struct LiveSession<E: DepthEngine, D: DisplaySurface> {
    config: SessionConfig,
    ctx: Arc<SessionContext>,
    engine: E,
    display: D,
    preprocessor: Preprocessor,
    compositor: Compositor,
    recorder: Option<FrameRecorder>,
}

impl<E: DepthEngine, D: DisplaySurface> LiveSession<E, D> {
    pub fn new(config: SessionConfig, ctx: Arc<SessionContext>, engine: E, display: D) -> Result<Self> {
        let input_shape = engine.input_shape();
        if input_shape != config.dataset.reference_input_shape() {
            debug!(
                "Model input {:?} differs from the {} reference {:?}",
                input_shape.dims(),
                config.dataset,
                config.dataset.reference_input_shape().dims()
            );
        }
        let preprocessor = Preprocessor::new(input_shape, config.dataset.crop())?;
        debug!("Model input {:?}, output {:?}", input_shape.dims(), engine.output_dims());

        let compositor = Compositor::from_font_path(config.font_path.as_deref())?;
        let recorder = config
            .record
            .as_ref()
            .map(FrameRecorder::from_config)
            .transpose()?;

        Ok(Self {
            config,
            ctx,
            engine,
            display,
            preprocessor,
            compositor,
            recorder,
        })
    }

    pub fn context(&self) -> &Arc<SessionContext> {
        &self.ctx
    }

    /// Runs until quit, frame limit, end of source or the first failure.
    ///
    /// The producer is stopped and joined before this returns, whatever the outcome.
    pub fn run(mut self, producer: ProducerHandle) -> Result<SessionReport> {
        info!(
            dataset = %self.config.dataset,
            curve = %self.config.curve,
            vmin = self.config.display_range.min,
            vmax = self.config.display_range.max,
            "Starting live session"
        );

        let mut fps = FrameRateCounter::new();
        let mut timings = StageTimings::new();

        let outcome = self.consume(&mut fps, &mut timings);
        if let Err(e) = &outcome {
            error!("Session aborted: {}", e);
        }

        self.ctx.stop().request_stop();
        let producer_outcome = producer.stop_and_join();

        let report = SessionReport {
            frames: fps.frames(),
            elapsed: fps.elapsed(),
            fps: fps.fps(),
            slot: self.ctx.slot().stats(),
            producer: producer_outcome.as_ref().copied().unwrap_or_default(),
            recorded: self.recorder.as_ref().map_or(0, FrameRecorder::recorded),
            timings,
        };
        report.log_summary();

        outcome?;
        producer_outcome?;
        Ok(report)
    }

    fn consume(&mut self, fps: &mut FrameRateCounter, timings: &mut StageTimings) -> Result<()> {
        loop {
            let frame = match self.ctx.slot().wait_take(self.config.poll_interval) {
                Some(frame) => frame,
                // The producer publishes before it raises the flag; take that last frame.
                None if self.ctx.stop().is_stop_requested() => match self.ctx.slot().try_take() {
                    Some(frame) => frame,
                    None => {
                        debug!("Stop requested and no frame pending");
                        return Ok(());
                    }
                },
                None => continue,
            };

            let processed = self.process(&frame, fps.recent_fps(), timings)?;
            timings.time("display", || self.display.show(&processed.composite))?;
            fps.tick();

            let event = self.display.poll_event();
            self.record(event, &processed)?;

            if event == DisplayEvent::Quit {
                info!("Quit requested");
                self.ctx.stop().request_stop();
                return Ok(());
            }
            if self.config.max_frames.is_some_and(|max| fps.frames() >= max) {
                info!("Reached frame limit of {}", fps.frames());
                return Ok(());
            }
        }
    }

    fn process(&mut self, frame: &Frame, fps: Option<f32>, timings: &mut StageTimings) -> Result<ProcessedFrame> {
        trace!(sequence = frame.sequence, age = ?frame.age(), "Processing frame");

        let (view, tensor) = timings.time("preprocess", || {
            let _span = tracing::info_span!("preprocess", sequence = frame.sequence).entered();
            let view = self.preprocessor.prepare_view(&frame.image)?;
            let tensor = self.preprocessor.to_tensor(&view)?;
            Result::Ok((view, tensor))
        })?;

        let depth = timings.time("infer", || {
            let _span = tracing::info_span!("infer").entered();
            self.engine.infer(&tensor)
        })?;

        let colored = timings.time("colorize", || {
            let _span = tracing::info_span!("colorize").entered();
            colorize(&depth, self.config.display_range, self.config.curve)
        });

        let composite = timings.time("composite", || {
            let _span = tracing::info_span!("composite").entered();
            self.compositor.compose(&view, &colored, fps)
        });

        Ok(ProcessedFrame { composite, depth })
    }

    fn record(&mut self, event: DisplayEvent, processed: &ProcessedFrame) -> Result<()> {
        let snapshot = event == DisplayEvent::Snapshot;
        let Some(recorder) = self.recorder.as_mut() else {
            if snapshot {
                warn!("Snapshot requested but no record directory is configured");
            }
            return Ok(());
        };
        if let Some(recording) = recorder.maybe_record(snapshot, &processed.composite, &processed.depth)? {
            debug!("Saved {}", recording.composite.display());
        }
        Ok(())
    }
}
