//! Dominant-color analysis for the `auto` background.
//!
//! The screenshot is shrunk to a small cover-fit grid, every sample is
//! bucketed into a coarse RGB histogram, and the most populated bucket
//! becomes the dominant color. A handful of saturation heuristics decide
//! whether the result should be a grey wash or an analogous-hue gradient.

use super::hsl::{Hsl, Rgb, QUANT_BUCKET};
use crate::background::{GradientSpec, DEFAULT_GRADIENT};
use image::imageops::FilterType;
use image::DynamicImage;

/// Edge length of the sampling grid (the source is cover-fit to N×N).
pub const SAMPLE_GRID: u32 = 50;

/// Angle used for every auto-derived gradient.
pub const AUTO_GRADIENT_ANGLE: f64 = 135.0;

/// Average saturation (percent) below which the whole image reads as grey.
const NEUTRAL_AVG_SATURATION: f64 = 25.0;
/// Saturation (percent) below which the dominant bucket itself is grey.
const NEUTRAL_DOMINANT_SATURATION: f64 = 15.0;
/// Channel spread below which the dominant bucket is grey.
const NEUTRAL_CHANNEL_SPREAD: u8 = 40;

const BUCKETS_PER_CHANNEL: usize = 256 / QUANT_BUCKET as usize;
const BUCKET_COUNT: usize = BUCKETS_PER_CHANNEL * BUCKETS_PER_CHANNEL * BUCKETS_PER_CHANNEL;

/// Result of analysing a screenshot's sampled pixels.
#[derive(Debug, Clone, PartialEq)]
pub struct DominantColor {
    /// The quantized mode bucket.
    pub color: Rgb,
    pub hsl: Hsl,
    /// Mean saturation over every counted sample, in percent.
    pub average_saturation: f64,
    /// Number of samples that fell into the mode bucket.
    pub count: u32,
    /// Number of samples considered (fully transparent pixels are skipped).
    pub samples: u32,
}

impl DominantColor {
    /// Analyses `image`. Returns `None` when every sample is transparent.
    pub fn analyze(image: &DynamicImage) -> Option<Self> {
        let grid = image
            .resize_to_fill(SAMPLE_GRID, SAMPLE_GRID, FilterType::Triangle)
            .to_rgba8();

        let mut counts = vec![0u32; BUCKET_COUNT];
        // Sample index at which each bucket was first hit, for stable ties.
        let mut first_seen = vec![u32::MAX; BUCKET_COUNT];
        let mut saturation_sum = 0.0;
        let mut samples = 0u32;

        for px in grid.pixels() {
            if px[3] == 0 {
                continue;
            }
            let rgb = Rgb::new(px[0], px[1], px[2]);
            saturation_sum += rgb.to_hsl().s;

            let idx = bucket_index(rgb.quantize(QUANT_BUCKET));
            if counts[idx] == 0 {
                first_seen[idx] = samples;
            }
            counts[idx] += 1;
            samples += 1;
        }

        if samples == 0 {
            return None;
        }

        let (mode, count) = counts
            .iter()
            .enumerate()
            .filter(|(_, c)| **c > 0)
            .max_by(|(ia, ca), (ib, cb)| {
                ca.cmp(cb).then_with(|| first_seen[*ib].cmp(&first_seen[*ia]))
            })
            .map(|(i, &c)| (i, c))?;

        let color = bucket_color(mode);
        Some(Self {
            color,
            hsl: color.to_hsl(),
            average_saturation: saturation_sum / f64::from(samples),
            count,
            samples,
        })
    }

    /// True when the image should get a grey-to-grey wash.
    ///
    /// Any one signal is enough: a mostly-grey screenshot with a few
    /// saturated accents still has a low average, and a grey mode bucket
    /// can hide behind a colorful average.
    pub fn is_neutral(&self) -> bool {
        self.average_saturation < NEUTRAL_AVG_SATURATION
            || self.hsl.s < NEUTRAL_DOMINANT_SATURATION
            || self.color.spread() < NEUTRAL_CHANNEL_SPREAD
    }

    /// The two gradient endpoints derived from the dominant color.
    pub fn gradient_endpoints(&self) -> (Hsl, Hsl) {
        let Hsl { h, s, l } = self.hsl;
        if self.is_neutral() {
            (
                Hsl::new(h, 0.0, (l + 8.0).min(55.0)),
                Hsl::new(h, 0.0, (l - 5.0).max(20.0)),
            )
        } else {
            (
                Hsl::new(h, (s + 5.0).min(60.0), (l + 10.0).min(60.0)),
                Hsl::new((h + 15.0) % 360.0, s, (l - 5.0).max(25.0)),
            )
        }
    }

    pub fn to_gradient(&self) -> GradientSpec {
        let (start, end) = self.gradient_endpoints();
        GradientSpec::new(vec![start.to_rgb(), end.to_rgb()], AUTO_GRADIENT_ANGLE)
    }
}

/// Derives the `auto` background gradient for a screenshot.
pub fn extract_auto_gradient(image: &DynamicImage) -> GradientSpec {
    match DominantColor::analyze(image) {
        Some(dominant) => {
            log::debug!(
                "[AUTO] Dominant {} ({}/{} samples, avg sat {:.1}%, neutral={})",
                dominant.color,
                dominant.count,
                dominant.samples,
                dominant.average_saturation,
                dominant.is_neutral()
            );
            dominant.to_gradient()
        }
        None => {
            log::warn!("[AUTO] Image is fully transparent — using default gradient");
            DEFAULT_GRADIENT.to_spec()
        }
    }
}

fn bucket_index(c: Rgb) -> usize {
    let q = |v: u8| usize::from(v / QUANT_BUCKET);
    (q(c.r) * BUCKETS_PER_CHANNEL + q(c.g)) * BUCKETS_PER_CHANNEL + q(c.b)
}

fn bucket_color(idx: usize) -> Rgb {
    let b = idx % BUCKETS_PER_CHANNEL;
    let g = (idx / BUCKETS_PER_CHANNEL) % BUCKETS_PER_CHANNEL;
    let r = idx / (BUCKETS_PER_CHANNEL * BUCKETS_PER_CHANNEL);
    let v = |i: usize| (i * QUANT_BUCKET as usize) as u8;
    Rgb::new(v(r), v(g), v(b))
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{Rgba, RgbaImage};

    fn solid(w: u32, h: u32, c: [u8; 4]) -> DynamicImage {
        DynamicImage::ImageRgba8(RgbaImage::from_pixel(w, h, Rgba(c)))
    }

    #[test]
    fn bucket_index_round_trips() {
        for idx in [0, 1, 7, 8, 63, 64, 511] {
            assert_eq!(bucket_index(bucket_color(idx)), idx);
        }
    }

    #[test]
    fn uniform_grey_is_neutral() {
        let d = DominantColor::analyze(&solid(200, 120, [0x80, 0x80, 0x80, 255])).unwrap();
        assert_eq!(d.color, Rgb::new(128, 128, 128));
        assert_eq!(d.count, SAMPLE_GRID * SAMPLE_GRID);
        assert!(d.is_neutral());
    }

    #[test]
    fn uniform_color_is_within_one_bucket() {
        let src = Rgb::new(40, 120, 220);
        let d = DominantColor::analyze(&solid(640, 480, [src.r, src.g, src.b, 255])).unwrap();
        for (a, b) in [(d.color.r, src.r), (d.color.g, src.g), (d.color.b, src.b)] {
            assert!(b >= a && b - a < QUANT_BUCKET);
        }
        assert!(!d.is_neutral());
    }

    #[test]
    fn neutral_endpoints_are_grey_and_bounded() {
        let d = DominantColor::analyze(&solid(10, 10, [0x80, 0x80, 0x80, 255])).unwrap();
        let (a, b) = d.gradient_endpoints();
        assert_eq!(a.s, 0.0);
        assert_eq!(b.s, 0.0);
        // l ≈ 50.2 → +8 capped at 55, −5 stays above the 20 floor.
        assert_eq!(a.l, 55.0);
        assert!((b.l - 45.196).abs() < 0.01);
    }

    #[test]
    fn colorful_endpoints_shift_hue_and_respect_caps() {
        let d = DominantColor::analyze(&solid(10, 10, [0, 0, 224, 255])).unwrap();
        assert!(!d.is_neutral());
        let (a, b) = d.gradient_endpoints();
        assert_eq!(a.s, 60.0);
        assert!(a.l <= 60.0);
        assert!((b.h - 255.0).abs() < 1e-9);
        assert!(b.l >= 25.0);
    }

    #[test]
    fn hue_shift_wraps_past_360() {
        let d = DominantColor {
            color: Rgb::new(224, 0, 64),
            hsl: Hsl::new(350.0, 100.0, 44.0),
            average_saturation: 80.0,
            count: 1,
            samples: 1,
        };
        let (_, b) = d.gradient_endpoints();
        assert!((b.h - 5.0).abs() < 1e-9);
    }

    #[test]
    fn low_average_saturation_forces_neutral() {
        let d = DominantColor {
            color: Rgb::new(224, 0, 0),
            hsl: Rgb::new(224, 0, 0).to_hsl(),
            average_saturation: 10.0,
            count: 1,
            samples: 1,
        };
        assert!(d.is_neutral());
    }

    #[test]
    fn transparent_image_falls_back_to_default() {
        let img = solid(20, 20, [255, 0, 0, 0]);
        assert!(DominantColor::analyze(&img).is_none());
        assert_eq!(extract_auto_gradient(&img), DEFAULT_GRADIENT.to_spec());
    }

    #[test]
    fn analysis_is_deterministic() {
        let mut img = RgbaImage::new(64, 64);
        for (x, y, px) in img.enumerate_pixels_mut() {
            *px = Rgba([(x * 4) as u8, (y * 4) as u8, 90, 255]);
        }
        let img = DynamicImage::ImageRgba8(img);
        assert_eq!(extract_auto_gradient(&img), extract_auto_gradient(&img));
    }
}
