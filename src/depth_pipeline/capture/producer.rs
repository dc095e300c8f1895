use std::sync::Arc;
use std::sync::mpsc;
use std::thread::{self, JoinHandle};

use tracing::{debug, error, info, trace, warn};

use crate::depth_pipeline::{
    capture::camera::{Camera, CaptureEvent, FrameStream},
    common::error::{PipelineError, Result},
    frame::Frame,
    lifecycle::{SessionContext, StopSignal},
};

/// What the capture thread did before it exited.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ProducerStats {
    /// Frames published into the slot
    pub delivered: u64,
    /// Empty or undecodable buffers that were skipped
    pub skipped: u64,
}

pub struct FrameProducer;

impl FrameProducer {
    /// Opens `camera` on a dedicated thread and starts publishing into the context's slot.
    ///
    /// Returns only after the stream is open; an open failure is returned here and no
    /// thread is left running.
    pub fn spawn<C: Camera>(camera: C, ctx: Arc<SessionContext>) -> Result<ProducerHandle> {
        let source = camera.describe();
        let stop = ctx.stop().clone();
        let (opened_tx, opened_rx) = mpsc::sync_channel::<Result<()>>(1);

        info!(source = %source, "Starting frame producer");

        let handle = thread::Builder::new()
            .name("frame-producer".to_string())
            .spawn(move || -> Result<ProducerStats> {
                let mut stream = match camera.open() {
                    Ok(stream) => {
                        let _ = opened_tx.send(Ok(()));
                        stream
                    }
                    Err(e) => {
                        let reason = e.to_string();
                        let _ = opened_tx.send(Err(e));
                        return Err(PipelineError::CameraOpen(reason));
                    }
                };
                capture_loop(&mut stream, &ctx)
            })?;

        match opened_rx.recv() {
            Ok(Ok(())) => {
                info!(source = %source, "Camera stream open");
                Ok(ProducerHandle {
                    handle: Some(handle),
                    stop,
                })
            }
            Ok(Err(e)) => {
                let _ = handle.join();
                Err(match e {
                    PipelineError::CameraOpen(_) => e,
                    other => PipelineError::CameraOpen(other.to_string()),
                })
            }
            // The thread went away without reporting, which only happens on a panic in open().
            Err(_) => {
                let _ = handle.join();
                Err(PipelineError::ProducerPanicked)
            }
        }
    }
}

fn capture_loop<S: FrameStream>(stream: &mut S, ctx: &SessionContext) -> Result<ProducerStats> {
    let mut stats = ProducerStats::default();

    let outcome = loop {
        // Checked once per delivered frame; a blocked next_frame() is not interrupted.
        if ctx.stop().is_stop_requested() {
            debug!("Producer observed stop signal");
            break Ok(());
        }

        match stream.next_frame() {
            Ok(CaptureEvent::Frame(image)) => {
                stats.delivered += 1;
                ctx.slot().publish(Frame::new(stats.delivered, image));
            }
            Ok(CaptureEvent::Skipped) => {
                stats.skipped += 1;
                trace!("Skipped empty camera buffer");
            }
            Ok(CaptureEvent::Ended) => {
                info!("Camera source ended");
                break Ok(());
            }
            Err(e) => {
                error!("Camera stream failed: {}", e);
                break Err(e);
            }
        }
    };

    // Whatever ended the loop, the consumer must not wait for frames that will never come.
    ctx.stop().request_stop();

    if let Err(e) = stream.stop() {
        warn!("Failed to stop camera stream cleanly: {}", e);
    }

    info!(
        delivered = stats.delivered,
        skipped = stats.skipped,
        "Frame producer exiting"
    );
    outcome.map(|_| stats)
}

/// Owner of the running capture thread.
///
/// Dropping the handle stops and joins the thread, so the shared context is never released
/// while the producer can still publish into it.
pub struct ProducerHandle {
    handle: Option<JoinHandle<Result<ProducerStats>>>,
    stop: StopSignal,
}

impl ProducerHandle {
    pub fn is_finished(&self) -> bool {
        self.handle.as_ref().is_none_or(|h| h.is_finished())
    }

    /// Raises the stop signal and waits for the capture thread to exit.
    pub fn stop_and_join(mut self) -> Result<ProducerStats> {
        self.join_inner()
    }

    fn join_inner(&mut self) -> Result<ProducerStats> {
        self.stop.request_stop();
        match self.handle.take() {
            Some(handle) => handle.join().map_err(|_| PipelineError::ProducerPanicked)?,
            None => Ok(ProducerStats::default()),
        }
    }
}

impl Drop for ProducerHandle {
    fn drop(&mut self) {
        if self.handle.is_some() {
            if let Err(e) = self.join_inner() {
                warn!("Frame producer ended with error during teardown: {}", e);
            }
        }
    }
}
