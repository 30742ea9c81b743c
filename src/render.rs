//! Samples the noise field over the target image and maps it to color.

use log::debug;

use crate::params::{ColorStyle, GenParams, NoisePattern};
use crate::perlin::PerlinNoise;
use crate::ppm::Ppm;

/// Depth slice the 2D image samples the 3D field at.
const Z_SLICE: f64 = 0.8;
/// Frequency and offset of the standard pattern window.
const FREQUENCY: f64 = 10.0;
const OFFSET: f64 = 15.0;
/// Ring count multiplier for the wood pattern.
const WOOD_RINGS: f64 = 20.0;
/// Gamma applied before banded thresholding.
const BAND_GAMMA: f64 = 2.85;

/// Render the configured pattern into a fresh pixel buffer.
///
/// Same parameters and same field always produce an identical buffer.
pub fn render(params: &GenParams, field: &PerlinNoise) -> Ppm {
    let width = params.resolution.width;
    let height = params.resolution.height;
    let mut image = Ppm::new(width, height);

    let sx = stride(width, 400);
    let sy = stride(height, 300);
    debug!("sampling window {sx}x{sy} over {width}x{height}");

    let mut k = 0;
    for row in 0..height {
        for col in 0..width {
            let fx = col as f64 * sx / width as f64;
            let fy = row as f64 * sy / height as f64;

            let n = match params.pattern {
                NoisePattern::Standard => {
                    field.noise(FREQUENCY * fx + OFFSET, FREQUENCY * fy + OFFSET, Z_SLICE)
                }
                NoisePattern::Wood => {
                    let n = WOOD_RINGS * field.noise(fx, fy, Z_SLICE);
                    n - n.floor()
                }
            };

            let (r, g, b) = match params.style {
                ColorStyle::Grayscale => {
                    let t = (255.0 * n).floor() as u8;
                    (t, t, t)
                }
                ColorStyle::Banded => banded(n),
            };
            image.r[k] = r;
            image.g[k] = g;
            image.b[k] = b;
            k += 1;
        }
    }
    image
}

// Window size fitting the noise's natural frequency to the output
// resolution; wider targets sample a proportionally wider window.
fn stride(dim: u32, base: u32) -> f64 {
    (dim / base).saturating_sub(1).max(1) as f64
}

/// Threshold bands over a gamma curve: lows go blue, the mid band green,
/// everything above stays gray.
fn banded(n: f64) -> (u8, u8, u8) {
    let t = (255.0 * n.powf(BAND_GAMMA)).floor();
    if (40.0..=130.0).contains(&t) {
        (0, (255.0 - t) as u8, 0)
    } else if t < 40.0 {
        (0, 0, (255.0 - t) as u8)
    } else {
        (t as u8, t as u8, t as u8)
    }
}
