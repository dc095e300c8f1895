use image::RgbImage;

use crate::depth_pipeline::{
    engine::DepthMap,
    postprocess::colormap::ColorCurve,
};

/// Fixed value range mapped onto the color curve. Never derived from the data.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DepthRange {
    pub min: f32,
    pub max: f32,
}

impl DepthRange {
    pub fn new(min: f32, max: f32) -> Self {
        Self { min, max }
    }

    /// Position of `value` inside the range, clamped to `[0, 1]`. NaN stays NaN.
    pub fn normalize(&self, value: f32) -> f32 {
        let span = self.max - self.min;
        if span <= 0.0 {
            return if value >= self.max { 1.0 } else { 0.0 };
        }
        ((value - self.min) / span).clamp(0.0, 1.0)
    }
}

impl Default for DepthRange {
    fn default() -> Self {
        Self { min: 0.0, max: 8.0 }
    }
}

/// Renders a depth map as an 8-bit color image of the same size.
pub fn colorize(depth: &DepthMap, range: DepthRange, curve: ColorCurve) -> RgbImage {
    let mut out = RgbImage::new(depth.width as u32, depth.height as u32);
    for (pixel, &value) in out.pixels_mut().zip(depth.data.iter()) {
        *pixel = curve.color(range.normalize(value));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn depth(values: &[f32]) -> DepthMap {
        DepthMap::from_flat(1, values.len(), values.to_vec()).unwrap()
    }

    #[test]
    fn test_values_outside_range_clamp_to_endpoints() {
        let range = DepthRange::new(0.0, 8.0);
        let img = colorize(&depth(&[0.0, -5.0, 8.0, 100.0]), range, ColorCurve::Inferno);

        assert_eq!(img.dimensions(), (4, 1));
        assert_eq!(img.get_pixel(0, 0), img.get_pixel(1, 0));
        assert_eq!(img.get_pixel(2, 0), img.get_pixel(3, 0));
        assert_eq!(*img.get_pixel(0, 0), ColorCurve::Inferno.color(0.0));
        assert_eq!(*img.get_pixel(2, 0), ColorCurve::Inferno.color(1.0));
    }

    #[test]
    fn test_nan_maps_to_low_end() {
        let img = colorize(&depth(&[f32::NAN, 0.0]), DepthRange::default(), ColorCurve::Magma);
        assert_eq!(img.get_pixel(0, 0), img.get_pixel(1, 0));
    }

    #[test]
    fn test_infinities_clamp() {
        let img = colorize(&depth(&[f32::INFINITY, f32::NEG_INFINITY]), DepthRange::default(), ColorCurve::Gray);
        assert_eq!(img.get_pixel(0, 0).0, [255, 255, 255]);
        assert_eq!(img.get_pixel(1, 0).0, [0, 0, 0]);
    }

    #[test]
    fn test_range_is_fixed_not_auto() {
        // A map that only spans [1, 2] must not be stretched over the whole curve.
        let img = colorize(&depth(&[1.0, 2.0]), DepthRange::new(0.0, 8.0), ColorCurve::Gray);
        assert_eq!(img.get_pixel(0, 0).0, [31, 31, 31]);
        assert_eq!(img.get_pixel(1, 0).0, [63, 63, 63]);
    }

    #[test]
    fn test_shape_follows_depth_map() {
        let map = DepthMap::from_flat(3, 5, vec![4.0; 15]).unwrap();
        let img = colorize(&map, DepthRange::default(), ColorCurve::Viridis);
        assert_eq!(img.dimensions(), (5, 3));
        assert!(img.pixels().all(|p| *p == ColorCurve::Viridis.color(0.5)));
    }

    #[test]
    fn test_degenerate_range_is_a_step() {
        let range = DepthRange::new(2.0, 2.0);
        assert_eq!(range.normalize(1.0), 0.0);
        assert_eq!(range.normalize(2.0), 1.0);
    }
}
