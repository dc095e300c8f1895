use std::io::Write;

use tiff::encoder::compression::DeflateLevel;
use tiff::encoder::{Compression, TiffEncoder, colortype};
use tracing::debug;

use crate::depth_pipeline::{
    common::error::{PipelineError, Result},
    engine::DepthMap,
    record::types::TiffCompression,
    record::writer::DepthWriter,
};

/// Single-channel 32-bit float TIFF, raw model values
#[derive(Debug, Clone, Copy, Default)]
pub struct TiffDepthWriter {
    compression: TiffCompression,
}

impl TiffDepthWriter {
    pub fn new(compression: TiffCompression) -> Self {
        Self { compression }
    }

    fn encoder_compression(&self) -> Compression {
        match self.compression {
            TiffCompression::None => Compression::Uncompressed,
            TiffCompression::Lzw => Compression::Lzw,
            TiffCompression::DeflateFast => Compression::Deflate(DeflateLevel::Fast),
            TiffCompression::DeflateBalanced => Compression::Deflate(DeflateLevel::Balanced),
            TiffCompression::DeflateBest => Compression::Deflate(DeflateLevel::Best),
        }
    }
}

impl DepthWriter for TiffDepthWriter {
    fn write_depth(&self, depth: &DepthMap, output: &mut dyn Write) -> Result<()> {
        debug!("Encoding depth TIFF: {}x{}", depth.width, depth.height);

        // The encoder needs Seek; encode into memory first.
        let mut buffer = Vec::new();
        let mut encoder = TiffEncoder::new(std::io::Cursor::new(&mut buffer))
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?
            .with_compression(self.encoder_compression());

        encoder
            .write_image::<colortype::Gray32Float>(depth.width as u32, depth.height as u32, &depth.data)
            .map_err(|e| PipelineError::EncodeError(e.to_string()))?;

        output.write_all(&buffer)?;
        Ok(())
    }

    fn extension(&self) -> &'static str {
        "tiff"
    }
}
