use std::path::Path;
use std::sync::Arc;
use std::time::{Duration, Instant};

use cudarc::driver::safe::*;
use cudarc::nvrtc::Ptx;
use tracing::{debug, info};

use crate::depth_pipeline::{
    common::error::{PipelineError, Result},
    engine::depth_engine::DepthEngine,
    engine::manifest::ModelManifest,
    engine::types::{DepthMap, EngineState},
    preprocess::{InputTensor, TensorShape},
};

/// Compiled depth model resident on one CUDA device
pub struct CudaEngine {
    state: EngineState,
    input_shape: TensorShape,
    output_dims: (usize, usize),
    launch: LaunchConfig,
    _context: Arc<CudaContext>,
    stream: Arc<CudaStream>,
    _module: Arc<CudaModule>,
    kernel: CudaFunction,
    weights: CudaSlice<f32>,
    d_input: CudaSlice<f32>,
    d_output: CudaSlice<f32>,
    host_output: Vec<f32>,
    load_time: Duration,
}

impl CudaEngine {
    /// Load the manifest at `manifest_path` and bring the model up on `device`.
    pub fn load(manifest_path: impl AsRef<Path>, device: usize) -> Result<Self> {
        let manifest = ModelManifest::load(manifest_path)?;
        Self::from_manifest(&manifest, device)
    }

    pub fn from_manifest(manifest: &ModelManifest, device: usize) -> Result<Self> {
        let started = Instant::now();
        let input_shape = manifest.input_shape()?;
        let output_dims = manifest.output_dims()?;

        let module_path = manifest.module_path();
        if !module_path.is_file() {
            return Err(PipelineError::ModelLoad(format!(
                "{}: compiled module not found",
                module_path.display()
            )));
        }

        let context = CudaContext::new(device)
            .map_err(|e| PipelineError::ModelLoad(format!("CUDA device {}: {}", device, e)))?;
        let stream = context.default_stream();
        let module = context
            .load_module(Ptx::from_file(&module_path))
            .map_err(|e| PipelineError::ModelLoad(format!("{}: {}", module_path.display(), e)))?;
        let kernel = module
            .load_function(&manifest.entry)
            .map_err(|e| PipelineError::ModelLoad(format!("entry '{}': {}", manifest.entry, e)))?;
        debug!("Module {} loaded", module_path.display());

        // The weight argument is always a valid pointer, even for weightless modules.
        let weights = match manifest.load_weights()? {
            Some(host) if !host.is_empty() => stream.clone_htod(&host)?,
            _ => stream.alloc_zeros::<f32>(1)?,
        };

        let output_len = output_dims.0 * output_dims.1;
        let d_input = stream.alloc_zeros::<f32>(input_shape.element_count())?;
        let d_output = stream.alloc_zeros::<f32>(output_len)?;
        stream.synchronize()?;

        let launch = match manifest.launch {
            Some(geometry) => LaunchConfig {
                grid_dim: (geometry.grid[0], geometry.grid[1], geometry.grid[2]),
                block_dim: (geometry.block[0], geometry.block[1], geometry.block[2]),
                shared_mem_bytes: geometry.shared_mem_bytes,
            },
            None => LaunchConfig::for_num_elems(output_len as u32),
        };

        let load_time = started.elapsed();
        info!(
            device,
            entry = %manifest.entry,
            input = ?input_shape.dims(),
            output = ?output_dims,
            "Depth model ready in {:.2}s",
            load_time.as_secs_f64()
        );

        Ok(Self {
            state: EngineState::Ready,
            input_shape,
            output_dims,
            launch,
            _context: context,
            stream,
            _module: module,
            kernel,
            weights,
            d_input,
            d_output,
            host_output: vec![0.0; output_len],
            load_time,
        })
    }

    /// Copy in, launch, copy out, then wait once for the whole sequence.
    fn execute(&mut self, input: &InputTensor) -> Result<()> {
        self.stream.memcpy_htod(input.data.as_slice(), &mut self.d_input)?;

        let input_len = self.d_input.len() as i32;
        let output_len = self.d_output.len() as i32;
        let mut launch_args = self.stream.launch_builder(&self.kernel);
        launch_args.arg(&self.weights);
        launch_args.arg(&self.d_input);
        launch_args.arg(&mut self.d_output);
        launch_args.arg(&input_len);
        launch_args.arg(&output_len);
        unsafe { launch_args.launch(self.launch)? };

        self.stream.memcpy_dtoh(&self.d_output, self.host_output.as_mut_slice())?;
        self.stream.synchronize()?;
        Ok(())
    }

    /// Wall time spent in `from_manifest`, device buffers included.
    pub fn load_time(&self) -> Duration {
        self.load_time
    }

    /// Frees device buffers and the context.
    pub fn release(mut self) {
        self.state = EngineState::Released;
        debug!("Engine state {:?}", self.state);
    }
}

impl DepthEngine for CudaEngine {
    fn input_shape(&self) -> TensorShape {
        self.input_shape
    }

    fn output_dims(&self) -> (usize, usize) {
        self.output_dims
    }

    fn state(&self) -> EngineState {
        self.state
    }

    fn infer(&mut self, input: &InputTensor) -> Result<DepthMap> {
        if input.shape != self.input_shape || input.data.len() != self.input_shape.element_count() {
            return Err(PipelineError::ShapeMismatch {
                expected: self.input_shape.dims(),
                actual: input.shape.dims(),
            });
        }

        self.state = EngineState::Executing;
        let outcome = self.execute(input);
        self.state = EngineState::Ready;
        outcome?;

        let (height, width) = self.output_dims;
        DepthMap::from_flat(height, width, self.host_output.clone())
    }
}
