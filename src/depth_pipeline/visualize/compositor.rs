use std::fs;
use std::path::Path;

use ab_glyph::{FontArc, PxScale};
use image::imageops::{self, FilterType};
use image::{Rgb, RgbImage};
use imageproc::drawing::{draw_filled_rect_mut, draw_text_mut};
use imageproc::rect::Rect;
use tracing::debug;

use crate::depth_pipeline::common::error::{PipelineError, Result};

/// DejaVu Sans Mono, see `assets/font/LICENSE-DejaVu.txt`
static BUNDLED_FONT: &[u8] = include_bytes!("../../../assets/font/DejaVuSansMono.ttf");

const SOURCE_CAPTION: &str = "RGB Image";
const DEPTH_CAPTION: &str = "Predicted depth";
const SOURCE_BOX: (u32, u32) = (190, 35);
const DEPTH_BOX: (u32, u32) = (270, 35);
const FPS_BOX: (u32, u32) = (140, 35);
const TEXT_ORIGIN: (i32, i32) = (5, 6);
const TEXT_SCALE: f32 = 24.0;

const BLACK: Rgb<u8> = Rgb([0, 0, 0]);
const WHITE: Rgb<u8> = Rgb([255, 255, 255]);

/// Builds the display frame: labelled source view on top, labelled depth below.
pub struct Compositor {
    font: FontArc,
    scale: PxScale,
}

impl Compositor {
    /// Compositor captioning with the bundled font.
    pub fn new() -> Result<Self> {
        let font = FontArc::try_from_slice(BUNDLED_FONT)
            .map_err(|e| PipelineError::Display(format!("bundled caption font: {}", e)))?;
        Ok(Self::with_font(font))
    }

    pub fn with_font(font: FontArc) -> Self {
        Self {
            font,
            scale: PxScale::from(TEXT_SCALE),
        }
    }

    /// Loads a TrueType/OpenType font for the captions.
    pub fn with_font_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path)?;
        let font = FontArc::try_from_vec(bytes)
            .map_err(|e| PipelineError::Display(format!("{}: {}", path.display(), e)))?;
        debug!("Caption font loaded from {}", path.display());
        Ok(Self::with_font(font))
    }

    /// Uses `path` when given, the bundled font otherwise.
    pub fn from_font_path(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::with_font_file(path),
            None => Self::new(),
        }
    }

    pub fn compose(&self, source: &RgbImage, depth: &RgbImage, fps: Option<f32>) -> RgbImage {
        let mut top = source.clone();
        self.label(&mut top, 0, SOURCE_BOX, SOURCE_CAPTION);
        if let Some(fps) = fps {
            let x = top.width().saturating_sub(FPS_BOX.0) as i32;
            if x >= SOURCE_BOX.0 as i32 {
                self.label(&mut top, x, FPS_BOX, &format!("{:.1} FPS", fps));
            }
        }

        let mut bottom = if depth.width() == source.width() || depth.width() == 0 {
            depth.clone()
        } else {
            let height = (depth.height() as u64 * source.width() as u64 / depth.width() as u64).max(1) as u32;
            imageops::resize(depth, source.width(), height, FilterType::Triangle)
        };
        self.label(&mut bottom, 0, DEPTH_BOX, DEPTH_CAPTION);

        let mut out = RgbImage::new(top.width(), top.height() + bottom.height());
        imageops::replace(&mut out, &top, 0, 0);
        imageops::replace(&mut out, &bottom, 0, top.height() as i64);
        out
    }

    fn label(&self, panel: &mut RgbImage, x: i32, (w, h): (u32, u32), text: &str) {
        if panel.width() == 0 || panel.height() == 0 {
            return;
        }
        draw_filled_rect_mut(panel, Rect::at(x, 0).of_size(w, h), BLACK);
        draw_text_mut(panel, WHITE, x + TEXT_ORIGIN.0, TEXT_ORIGIN.1, self.scale, &self.font, text);
    }
}
