//! Perceptual color curves for depth visualization
//!
//! Inferno, magma and viridis are evaluated from degree-6 polynomial fits of the matplotlib
//! tables. The fits drift from the tables by up to five 8-bit steps, mostly at the curve ends.

use std::fmt;
use std::str::FromStr;

use image::Rgb;

type Poly = [[f32; 3]; 7];

const INFERNO: Poly = [
    [0.000_218_940_37, 0.001_651_004_6, -0.019_480_898],
    [0.106_513_42, 0.563_956_4, 3.932_712_4],
    [11.602_493, -3.972_853_9, -15.942_394],
    [-41.703_996, 17.436_392, 44.354_145],
    [77.162_94, -33.402_36, -81.807_31],
    [-71.319_43, 32.626_064, 73.209_52],
    [25.131_126, -12.242_669, -23.070_325],
];

const MAGMA: Poly = [
    [-0.002_136_485, -0.000_749_655_05, -0.005_386_128],
    [0.251_660_54, 0.677_523_24, 2.494_026_6],
    [8.353_717, -3.577_719_4, 0.314_467_9],
    [-27.668_733, 14.264_731, -13.649_213],
    [52.176_14, -27.943_607, 12.944_169],
    [-50.768_524, 29.046_583, 4.234_153],
    [18.655_705, -11.489_774, -5.601_961_5],
];

const VIRIDIS: Poly = [
    [0.277_727_33, 0.005_407_344_5, 0.334_099_8],
    [0.105_093_04, 1.404_613_5, 1.384_590_2],
    [-0.330_861_83, 0.214_847_56, 0.095_095_16],
    [-4.634_230_6, -5.799_101, -19.332_441],
    [6.228_27, 14.179_933, 56.690_553],
    [4.776_385, -13.745_145, -65.353_03],
    [-5.435_456, 4.645_852_6, 26.312_435],
];

/// Named color curve used to render normalized depth
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ColorCurve {
    #[default]
    Inferno,
    Magma,
    Viridis,
    Gray,
}

impl ColorCurve {
    /// Color at position `t`, each channel in `[0, 1]`. `t` is clamped; NaN is treated as 0.
    pub fn sample(self, t: f32) -> [f32; 3] {
        let t = if t.is_nan() { 0.0 } else { t.clamp(0.0, 1.0) };
        let poly = match self {
            ColorCurve::Inferno => &INFERNO,
            ColorCurve::Magma => &MAGMA,
            ColorCurve::Viridis => &VIRIDIS,
            ColorCurve::Gray => return [t; 3],
        };

        let mut rgb = [0.0f32; 3];
        for (c, out) in rgb.iter_mut().enumerate() {
            // Horner, highest degree first
            let v = poly.iter().rev().fold(0.0f32, |acc, coeff| acc * t + coeff[c]);
            *out = v.clamp(0.0, 1.0);
        }
        rgb
    }

    /// 8-bit color at position `t`, quantized by truncation.
    pub fn color(self, t: f32) -> Rgb<u8> {
        let [r, g, b] = self.sample(t);
        Rgb([(r * 255.0) as u8, (g * 255.0) as u8, (b * 255.0) as u8])
    }

    pub fn name(self) -> &'static str {
        match self {
            ColorCurve::Inferno => "inferno",
            ColorCurve::Magma => "magma",
            ColorCurve::Viridis => "viridis",
            ColorCurve::Gray => "gray",
        }
    }
}

impl fmt::Display for ColorCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for ColorCurve {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "inferno" => Ok(ColorCurve::Inferno),
            "magma" => Ok(ColorCurve::Magma),
            "viridis" => Ok(ColorCurve::Viridis),
            "gray" | "grey" => Ok(ColorCurve::Gray),
            other => Err(format!(
                "unknown colormap '{}', expected one of: inferno, magma, viridis, gray",
                other
            )),
        }
    }
}
