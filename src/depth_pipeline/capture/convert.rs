//! Pixel format conversions for camera buffers

use image::RgbImage;

/// Converts a packed YUYV (YUV 4:2:2) buffer to RGB using BT.601 full-range coefficients.
///
/// Returns `None` when the width is odd or the buffer is shorter than `width * height * 2`;
/// drivers occasionally hand back truncated buffers and those frames are simply skipped.
pub fn yuyv_to_rgb(data: &[u8], width: u32, height: u32) -> Option<RgbImage> {
    if width % 2 != 0 {
        return None;
    }
    let needed = width as usize * height as usize * 2;
    if data.len() < needed {
        return None;
    }

    let mut rgb = Vec::with_capacity(width as usize * height as usize * 3);
    for chunk in data[..needed].chunks_exact(4) {
        let u = chunk[1] as f32 - 128.0;
        let v = chunk[3] as f32 - 128.0;
        for y in [chunk[0] as f32, chunk[2] as f32] {
            rgb.push((y + 1.402 * v).round().clamp(0.0, 255.0) as u8);
            rgb.push((y - 0.344_136 * u - 0.714_136 * v).round().clamp(0.0, 255.0) as u8);
            rgb.push((y + 1.772 * u).round().clamp(0.0, 255.0) as u8);
        }
    }

    RgbImage::from_raw(width, height, rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn test_neutral_chroma_gives_gray() {
        let data = [128u8, 128, 128, 128].repeat(4 * 2 / 2);
        let img = yuyv_to_rgb(&data, 4, 2).unwrap();
        assert_eq!(img.dimensions(), (4, 2));
        assert!(img.pixels().all(|p| *p == Rgb([128, 128, 128])));
    }

    #[test]
    fn test_luma_is_per_pixel_and_chroma_shared() {
        // Two pixels: black and white, no chroma.
        let img = yuyv_to_rgb(&[0, 128, 255, 128], 2, 1).unwrap();
        assert_eq!(img.get_pixel(0, 0), &Rgb([0, 0, 0]));
        assert_eq!(img.get_pixel(1, 0), &Rgb([255, 255, 255]));
    }

    #[test]
    fn test_strong_red_chroma() {
        let img = yuyv_to_rgb(&[76, 85, 76, 255], 2, 1).unwrap();
        let p = img.get_pixel(0, 0);
        assert!(p[0] > 240 && p[1] < 20 && p[2] < 20, "got {:?}", p);
    }

    #[test]
    fn test_rejects_short_buffer_and_odd_width() {
        assert!(yuyv_to_rgb(&[0u8; 7], 2, 2).is_none());
        assert!(yuyv_to_rgb(&[0u8; 64], 3, 2).is_none());
    }
}
