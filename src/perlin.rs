// Classic gradient noise over a shuffled permutation table.

use rand::seq::SliceRandom;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;

/// Ken Perlin's reference permutation of 0..=255.
const PERMUTATION: [u8; 256] = [
    151, 160, 137, 91,  90,  15,  131, 13,  201, 95,  96,  53,  194, 233, 7,   225,
    140, 36,  103, 30,  69,  142, 8,   99,  37,  240, 21,  10,  23,  190, 6,   148,
    247, 120, 234, 75,  0,   26,  197, 62,  94,  252, 219, 203, 117, 35,  11,  32,
    57,  177, 33,  88,  237, 149, 56,  87,  174, 20,  125, 136, 171, 168, 68,  175,
    74,  165, 71,  134, 139, 48,  27,  166, 77,  146, 158, 231, 83,  111, 229, 122,
    60,  211, 133, 230, 220, 105, 92,  41,  55,  46,  245, 40,  244, 102, 143, 54,
    65,  25,  63,  161, 1,   216, 80,  73,  209, 76,  132, 187, 208, 89,  18,  169,
    200, 196, 135, 130, 116, 188, 159, 86,  164, 100, 109, 198, 173, 186, 3,   64,
    52,  217, 226, 250, 124, 123, 5,   202, 38,  147, 118, 126, 255, 82,  85,  212,
    207, 206, 59,  227, 47,  16,  58,  17,  182, 189, 28,  42,  223, 183, 170, 213,
    119, 248, 152, 2,   44,  154, 163, 70,  221, 153, 101, 155, 167, 43,  172, 9,
    129, 22,  39,  253, 19,  98,  108, 110, 79,  113, 224, 232, 178, 185, 112, 104,
    218, 246, 97,  228, 251, 34,  242, 193, 238, 210, 144, 12,  191, 179, 162, 241,
    81,  51,  145, 235, 249, 14,  239, 107, 49,  192, 214, 31,  181, 199, 106, 157,
    184, 84,  204, 176, 115, 121, 50,  45,  127, 4,   150, 254, 138, 236, 205, 93,
    222, 114, 67,  29,  24,  72,  243, 141, 128, 195, 78,  66,  215, 61,  156, 180,
];

/// Seedable gradient-noise field.
///
/// The permutation table is fixed at construction and `noise` only ever
/// reads it, so one field can be shared across threads freely.
pub struct PerlinNoise {
    perm: [u8; 512],
}

impl PerlinNoise {
    /// Field backed by the reference permutation table.
    pub fn new() -> Self {
        Self {
            perm: doubled(PERMUTATION),
        }
    }

    /// Field backed by a fresh permutation shuffled from `seed`.
    ///
    /// The shuffle runs on `ChaCha8Rng::seed_from_u64`, so the same seed
    /// produces the same table on every platform.
    pub fn with_seed(seed: u64) -> Self {
        let mut table: Vec<u8> = (0..=255).collect();
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        table.shuffle(&mut rng);

        let mut base = [0u8; 256];
        base.copy_from_slice(&table);
        Self {
            perm: doubled(base),
        }
    }

    /// Noise value at (x, y, z), remapped into [0, 1].
    pub fn noise(&self, x: f64, y: f64, z: f64) -> f64 {
        let p = &self.perm;

        // Unit cube that contains the point, wrapped into [0, 255]
        let xi = (x.floor() as i64 & 255) as usize;
        let yi = (y.floor() as i64 & 255) as usize;
        let zi = (z.floor() as i64 & 255) as usize;

        // Relative position within the cube
        let x = x - x.floor();
        let y = y - y.floor();
        let z = z - z.floor();

        let u = fade(x);
        let v = fade(y);
        let w = fade(z);

        // Hash coordinates of the 8 cube corners
        let a = p[xi] as usize + yi;
        let aa = p[a] as usize + zi;
        let ab = p[a + 1] as usize + zi;
        let b = p[xi + 1] as usize + yi;
        let ba = p[b] as usize + zi;
        let bb = p[b + 1] as usize + zi;

        // Blend the gradient contributions from all 8 corners
        let res = lerp(
            w,
            lerp(
                v,
                lerp(u, grad(p[aa], x, y, z), grad(p[ba], x - 1.0, y, z)),
                lerp(u, grad(p[ab], x, y - 1.0, z), grad(p[bb], x - 1.0, y - 1.0, z)),
            ),
            lerp(
                v,
                lerp(
                    u,
                    grad(p[aa + 1], x, y, z - 1.0),
                    grad(p[ba + 1], x - 1.0, y, z - 1.0),
                ),
                lerp(
                    u,
                    grad(p[ab + 1], x, y - 1.0, z - 1.0),
                    grad(p[bb + 1], x - 1.0, y - 1.0, z - 1.0),
                ),
            ),
        );

        (res + 1.0) / 2.0
    }
}

impl Default for PerlinNoise {
    fn default() -> Self {
        Self::new()
    }
}

// First 256 entries twice over, so corner hashes never need a wrap.
fn doubled(base: [u8; 256]) -> [u8; 512] {
    let mut perm = [0u8; 512];
    perm[..256].copy_from_slice(&base);
    perm[256..].copy_from_slice(&base);
    perm
}

/// Quintic smoothstep, zero first and second derivative at t = 0 and t = 1.
fn fade(t: f64) -> f64 {
    t * t * t * (t * (t * 6.0 - 15.0) + 10.0)
}

fn lerp(t: f64, a: f64, b: f64) -> f64 {
    a + t * (b - a)
}

/// Dot product with one of 12 edge directions picked by the low hash bits.
fn grad(hash: u8, x: f64, y: f64, z: f64) -> f64 {
    let h = hash & 15;
    let u = if h < 8 { x } else { y };
    let v = if h < 4 {
        y
    } else if h == 12 || h == 14 {
        x
    } else {
        z
    };
    let u = if h & 1 == 0 { u } else { -u };
    let v = if h & 2 == 0 { v } else { -v };
    u + v
}
