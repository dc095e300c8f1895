use std::borrow::Cow;

use image::RgbImage;
use image::imageops::{self, FilterType};
use tracing::debug;

use crate::depth_pipeline::{
    common::error::{PipelineError, Result},
    preprocess::types::{CropPolicy, InputTensor, Normalization, TensorShape},
};

/// Turns camera frames into model inputs of one fixed shape.
#[derive(Debug, Clone)]
pub struct Preprocessor {
    target: TensorShape,
    crop: CropPolicy,
    normalization: Normalization,
}

impl Preprocessor {
    pub fn new(target: TensorShape, crop: CropPolicy) -> Result<Self> {
        if target.channels != 3 {
            return Err(PipelineError::ShapeMismatch {
                expected: vec![3, target.height, target.width],
                actual: target.dims(),
            });
        }
        if target.width == 0 || target.height == 0 {
            return Err(PipelineError::InvalidDimensions(target.width, target.height));
        }
        debug!("Preprocessor target {:?}, crop {:?}", target, crop);
        Ok(Self {
            target,
            crop,
            normalization: Normalization::default(),
        })
    }

    pub fn with_normalization(mut self, normalization: Normalization) -> Self {
        self.normalization = normalization;
        self
    }

    pub fn target(&self) -> TensorShape {
        self.target
    }

    pub fn crop(&self) -> CropPolicy {
        self.crop
    }

    /// Crops and resizes `image` to the model's spatial size. This is also what gets shown
    /// next to the prediction.
    pub fn prepare_view(&self, image: &RgbImage) -> Result<RgbImage> {
        let (frame_w, frame_h) = image.dimensions();
        let (x, y, w, h) = self
            .crop
            .resolve(frame_w, frame_h)
            .ok_or(PipelineError::InvalidDimensions(frame_w as usize, frame_h as usize))?;

        let cropped: Cow<'_, RgbImage> = if (x, y, w, h) == (0, 0, frame_w, frame_h) {
            Cow::Borrowed(image)
        } else {
            Cow::Owned(imageops::crop_imm(image, x, y, w, h).to_image())
        };

        let (target_w, target_h) = (self.target.width as u32, self.target.height as u32);
        if cropped.dimensions() == (target_w, target_h) {
            return Ok(cropped.into_owned());
        }
        Ok(imageops::resize(cropped.as_ref(), target_w, target_h, FilterType::Triangle))
    }

    /// Scales to `[0, 1]`, normalizes and lays the channels out as planes.
    pub fn to_tensor(&self, view: &RgbImage) -> Result<InputTensor> {
        let shape = self.target;
        if view.dimensions() != (shape.width as u32, shape.height as u32) {
            return Err(PipelineError::ShapeMismatch {
                expected: shape.dims(),
                actual: vec![3, view.height() as usize, view.width() as usize],
            });
        }

        let plane = shape.plane_len();
        let Normalization { mean, std } = self.normalization;
        let mut data = vec![0.0f32; shape.element_count()];

        for (i, pixel) in view.pixels().enumerate() {
            for c in 0..3 {
                data[c * plane + i] = (pixel[c] as f32 / 255.0 - mean[c]) / std[c];
            }
        }

        Ok(InputTensor { shape, data })
    }

    pub fn preprocess(&self, image: &RgbImage) -> Result<InputTensor> {
        let view = self.prepare_view(image)?;
        self.to_tensor(&view)
    }
}

/// One-shot form of [`Preprocessor::preprocess`].
pub fn preprocess(image: &RgbImage, target: TensorShape, crop: CropPolicy) -> Result<InputTensor> {
    Preprocessor::new(target, crop)?.preprocess(image)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    fn gradient(width: u32, height: u32) -> RgbImage {
        RgbImage::from_fn(width, height, |x, y| {
            Rgb([(x * 7 % 256) as u8, (y * 13 % 256) as u8, ((x + y) * 3 % 256) as u8])
        })
    }

    #[test]
    fn test_mid_gray_matches_normalization_formula() {
        let frame = RgbImage::from_pixel(10, 10, Rgb([128, 128, 128]));
        let tensor = preprocess(&frame, TensorShape::new(3, 10, 10), CropPolicy::None).unwrap();

        assert_eq!(tensor.data.len(), 300);
        let norm = Normalization::default();
        for c in 0..3 {
            let expected = (128.0 / 255.0 - norm.mean[c]) / norm.std[c];
            assert!(
                (tensor.channel_mean(c) - expected).abs() < 1e-5,
                "channel {}: {} vs {}",
                c,
                tensor.channel_mean(c),
                expected
            );
        }
    }

    #[test]
    fn test_preprocess_is_deterministic() {
        let frame = gradient(64, 48);
        let pre = Preprocessor::new(TensorShape::new(3, 20, 30), CropPolicy::None).unwrap();

        let a = pre.preprocess(&frame).unwrap();
        let b = pre.preprocess(&frame).unwrap();
        let c = preprocess(&frame, TensorShape::new(3, 20, 30), CropPolicy::None).unwrap();

        let bits = |t: &InputTensor| t.data.iter().map(|v| v.to_bits()).collect::<Vec<_>>();
        assert_eq!(bits(&a), bits(&b));
        assert_eq!(bits(&a), bits(&c));
    }

    #[test]
    fn test_layout_is_planar() {
        let frame = RgbImage::from_fn(2, 1, |x, _| if x == 0 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) });
        let tensor = Preprocessor::new(TensorShape::new(3, 1, 2), CropPolicy::None)
            .unwrap()
            .with_normalization(Normalization { mean: [0.0; 3], std: [1.0; 3] })
            .preprocess(&frame)
            .unwrap();

        assert_eq!(tensor.channel(0), &[1.0, 0.0]);
        assert_eq!(tensor.channel(1), &[0.0, 0.0]);
        assert_eq!(tensor.channel(2), &[0.0, 1.0]);
    }

    #[test]
    fn test_crop_window_selects_region_before_resize() {
        // Left half black, right half white; cropping the right half must give all white.
        let frame = RgbImage::from_fn(8, 4, |x, _| if x < 4 { Rgb([0, 0, 0]) } else { Rgb([255, 255, 255]) });
        let pre = Preprocessor::new(
            TensorShape::new(3, 2, 2),
            CropPolicy::Window { top: 0, left: 4, height: 4, width: 4 },
        )
        .unwrap();

        let view = pre.prepare_view(&frame).unwrap();
        assert_eq!(view.dimensions(), (2, 2));
        assert!(view.pixels().all(|p| *p == Rgb([255, 255, 255])));
    }

    #[test]
    fn test_crop_window_is_clamped_to_frame() {
        assert_eq!(CropPolicy::kitti().resolve(1920, 1080), Some((0, 525, 1920, 555)));
        assert_eq!(CropPolicy::kitti().resolve(3840, 2160), Some((0, 525, 3840, 1110)));
        assert_eq!(CropPolicy::kitti().resolve(640, 480), None);
        assert_eq!(CropPolicy::None.resolve(640, 480), Some((0, 0, 640, 480)));
    }

    #[test]
    fn test_crop_outside_frame_is_an_error() {
        let pre = Preprocessor::new(TensorShape::new(3, 4, 4), CropPolicy::kitti()).unwrap();
        let result = pre.preprocess(&RgbImage::new(64, 64));
        assert!(matches!(result, Err(PipelineError::InvalidDimensions(64, 64))));
    }

    #[test]
    fn test_rejects_non_rgb_target() {
        assert!(matches!(
            Preprocessor::new(TensorShape::new(1, 4, 4), CropPolicy::None),
            Err(PipelineError::ShapeMismatch { .. })
        ));
        assert!(matches!(
            Preprocessor::new(TensorShape::new(3, 0, 4), CropPolicy::None),
            Err(PipelineError::InvalidDimensions(4, 0))
        ));
    }

    #[test]
    fn test_to_tensor_checks_view_size() {
        let pre = Preprocessor::new(TensorShape::new(3, 4, 4), CropPolicy::None).unwrap();
        assert!(matches!(
            pre.to_tensor(&RgbImage::new(5, 4)),
            Err(PipelineError::ShapeMismatch { .. })
        ));
    }
}
