use std::io::Write;

use crate::depth_pipeline::{common::error::Result, engine::DepthMap};

pub trait DepthWriter {
    fn write_depth(&self, depth: &DepthMap, output: &mut dyn Write) -> Result<()>;

    /// File extension for outputs of this writer, without the dot
    fn extension(&self) -> &'static str;
}
