use std::process::ExitCode;
use std::sync::Arc;

use anyhow::{Context, Result, anyhow};
use clap::Parser;
use tracing::{error, info};

use monodepth_rt::cli::Cli;
use monodepth_rt::depth_pipeline::{
    CudaEngine, DatasetManifest, DisplaySurface, FileSequenceCamera, FrameProducer, HeadlessDisplay,
    LiveSession, ProducerHandle, SessionConfig, SessionContext, WindowDisplay,
};
use monodepth_rt::logger;

fn main() -> ExitCode {
    logger::init();
    let cli = Cli::parse();

    match run(&cli) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(cli: &Cli) -> Result<()> {
    cli.validate().map_err(|e| anyhow!(e))?;
    info!("Starting monodepth-rt...");

    let engine = CudaEngine::load(&cli.model, cli.device)
        .with_context(|| format!("loading model {}", cli.model.display()))?;

    let ctx = SessionContext::new();
    let producer = spawn_producer(cli, ctx.clone())?;

    let config = cli.session_config();
    if cli.headless {
        run_session(config, ctx, engine, HeadlessDisplay::new(), producer)
    } else {
        let display = WindowDisplay::new(config.window_title.clone());
        run_session(config, ctx, engine, display, producer)
    }
}

fn run_session<D: DisplaySurface>(
    config: SessionConfig,
    ctx: Arc<SessionContext>,
    engine: CudaEngine,
    display: D,
    producer: ProducerHandle,
) -> Result<()> {
    let report = LiveSession::new(config, ctx, engine, display)
        .context("setting up session")?
        .run(producer)
        .context("live session failed")?;

    info!("FPS: {:.2}", report.fps);
    Ok(())
}

fn spawn_producer(cli: &Cli, ctx: Arc<SessionContext>) -> Result<ProducerHandle> {
    if let Some(split) = &cli.replay_manifest {
        let manifest = DatasetManifest::load(split, cli.dataset, &cli.rgb_root, &cli.depth_root)
            .with_context(|| format!("reading split file {}", split.display()))?;
        info!("Replaying {} frames from {}", manifest.len(), split.display());
        let camera = FileSequenceCamera::from_manifest(&manifest, cli.replay_fps).looping(cli.looping);
        return FrameProducer::spawn(camera, ctx).context("starting replay");
    }
    spawn_camera(cli, ctx)
}

#[cfg(feature = "v4l2")]
fn spawn_camera(cli: &Cli, ctx: Arc<SessionContext>) -> Result<ProducerHandle> {
    let camera = monodepth_rt::depth_pipeline::V4l2Camera::new(cli.camera_config());
    FrameProducer::spawn(camera, ctx).with_context(|| format!("opening camera {}", cli.camera.display()))
}

#[cfg(not(feature = "v4l2"))]
fn spawn_camera(cli: &Cli, _ctx: Arc<SessionContext>) -> Result<ProducerHandle> {
    Err(anyhow!(
        "cannot open {}: built without the `v4l2` feature; use --replay-manifest",
        cli.camera.display()
    ))
}
