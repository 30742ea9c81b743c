//! Generation parameters and seed key derivation.
//!
//! Everything the driver needs is carried in [`GenParams`]; nothing is read
//! from ambient process state.

use std::path::PathBuf;

/// Salt baked into key derivation, so equal seed text maps to a stable key.
const KEY_SALT: u64 = 1_758_956_124;

/// Output file stem used when none is given.
pub const DEFAULT_STEM: &str = "perlinNoise";

/// Output resolution in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Resolution {
    pub width: u32,
    pub height: u32,
}

/// The standard resolution menu, choices 1 through 9.
pub const PRESETS: [Resolution; 9] = [
    Resolution { width: 640, height: 480 },
    Resolution { width: 800, height: 480 },
    Resolution { width: 800, height: 600 },
    Resolution { width: 1024, height: 768 },
    Resolution { width: 1280, height: 768 },
    Resolution { width: 1280, height: 1024 },
    Resolution { width: 1440, height: 1080 },
    Resolution { width: 1920, height: 1080 },
    Resolution { width: 3840, height: 2160 },
];

impl Resolution {
    /// Preset for a 1-based menu choice, if in range.
    pub fn preset(choice: u8) -> Option<Resolution> {
        (1..=9)
            .contains(&choice)
            .then(|| PRESETS[choice as usize - 1])
    }
}

/// Which noise pattern to sample.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoisePattern {
    /// The plain gradient-noise field.
    Standard,
    /// Wood rings: amplified noise reduced to its fractional part.
    Wood,
}

/// How a noise scalar becomes an RGB pixel.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColorStyle {
    Grayscale,
    /// Threshold bands: blue lows, a green mid band, gray above.
    Banded,
}

/// Output encoding.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageFormat {
    Ppm,
    Png,
}

/// Everything one generation run needs.
#[derive(Debug, Clone)]
pub struct GenParams {
    /// Seed text as the user typed it.
    pub seed_text: String,
    /// Treat `seed_text` as a raw image ID, skipping key derivation.
    pub raw_id: bool,
    pub pattern: NoisePattern,
    pub style: ColorStyle,
    pub resolution: Resolution,
    /// Output file stem; the extension follows `format`.
    pub output_stem: String,
    pub format: ImageFormat,
}

impl Default for GenParams {
    fn default() -> Self {
        Self {
            seed_text: "ABOBUS".to_string(),
            raw_id: false,
            pattern: NoisePattern::Standard,
            style: ColorStyle::Grayscale,
            resolution: Resolution { width: 800, height: 600 },
            output_stem: DEFAULT_STEM.to_string(),
            format: ImageFormat::Ppm,
        }
    }
}

impl GenParams {
    /// The ID printed after generation; feeding it back with `raw_id`
    /// recreates the same image.
    pub fn image_id(&self) -> String {
        if self.raw_id {
            self.seed_text.clone()
        } else {
            key_from_text(&self.seed_text, KEY_SALT)
        }
    }

    /// Numeric seed for the noise field.
    pub fn seed(&self) -> u32 {
        seed_from_text(&self.seed_text, self.raw_id)
    }

    /// Output path with the extension for the chosen format.
    pub fn output_path(&self) -> PathBuf {
        let stem = if self.output_stem.is_empty() {
            DEFAULT_STEM
        } else {
            &self.output_stem
        };
        let ext = match self.format {
            ImageFormat::Ppm => "ppm",
            ImageFormat::Png => "png",
        };
        PathBuf::from(format!("{stem}.{ext}"))
    }
}

/// Six-character key (A-Z and 0-9) derived from seed text.
///
/// Deterministic keyed character transform: the salt scatters which input
/// bytes are picked, each picked byte is mixed and folded into the 36-glyph
/// alphabet. Empty text yields an empty key.
pub fn key_from_text(text: &str, salt: u64) -> String {
    let bytes = text.as_bytes();
    if bytes.is_empty() {
        return String::new();
    }

    let scatter = (salt % 320_000 + salt % 623) as usize;
    let n = salt / 20;
    let mut key = String::with_capacity(6);
    for i in 0..6 {
        let b = bytes[(scatter % bytes.len() + i) % bytes.len()] as u64;
        let mixed = ((b ^ n.wrapping_add(scatter as u64)) % 36) as u8 + 65;
        // Glyphs past 'Z' fold over into '0'..'9'
        key.push(if mixed > 90 {
            (mixed % 90 - 1 + b'0') as char
        } else {
            mixed as char
        });
    }
    key
}

/// Numeric seed for a piece of seed text.
///
/// Raw IDs hash as typed; seed text goes through [`key_from_text`] first.
/// Either way the seed is the wrapping weighted byte sum of the material.
pub fn seed_from_text(text: &str, raw_id: bool) -> u32 {
    let material = if raw_id {
        text.to_string()
    } else {
        key_from_text(text, KEY_SALT)
    };
    material
        .bytes()
        .enumerate()
        .fold(0u32, |acc, (i, b)| {
            acc.wrapping_add((b as u32).wrapping_mul(i as u32 + 1))
        })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_derivation_is_deterministic() {
        assert_eq!(key_from_text("ABOBUS", KEY_SALT), "LFXURU");
        assert_eq!(key_from_text("hello", KEY_SALT), "XOONKX");
        assert_eq!(key_from_text("ABOBUS", KEY_SALT), key_from_text("ABOBUS", KEY_SALT));
    }

    #[test]
    fn key_uses_only_the_36_glyph_alphabet() {
        for text in ["a", "seed text", "0123456789", "\u{e9}tude"] {
            let key = key_from_text(text, KEY_SALT);
            assert_eq!(key.len(), 6);
            assert!(key.bytes().all(|b| b.is_ascii_uppercase() || b.is_ascii_digit()));
        }
    }

    #[test]
    fn seed_derivation_matches_recorded_values() {
        assert_eq!(seed_from_text("ABOBUS", false), 1740);
        assert_eq!(seed_from_text("ABOBUS", true), 1621);
        assert_eq!(seed_from_text("hello", false), 1698);
        assert_eq!(seed_from_text("hello", true), 1617);
    }

    #[test]
    fn empty_text_derives_the_zero_seed() {
        assert_eq!(key_from_text("", KEY_SALT), "");
        assert_eq!(seed_from_text("", false), 0);
        assert_eq!(seed_from_text("", true), 0);
    }

    #[test]
    fn printed_image_id_recreates_the_seed() {
        let params = GenParams {
            seed_text: "hello".to_string(),
            ..GenParams::default()
        };
        let id = params.image_id();
        assert_eq!(seed_from_text(&id, true), params.seed());
    }

    #[test]
    fn preset_lookup() {
        assert_eq!(
            Resolution::preset(3),
            Some(Resolution { width: 800, height: 600 })
        );
        assert_eq!(
            Resolution::preset(9),
            Some(Resolution { width: 3840, height: 2160 })
        );
        assert_eq!(Resolution::preset(0), None);
        assert_eq!(Resolution::preset(10), None);
    }

    #[test]
    fn output_path_tracks_format_and_stem() {
        let mut params = GenParams::default();
        assert_eq!(params.output_path(), PathBuf::from("perlinNoise.ppm"));
        params.format = ImageFormat::Png;
        params.output_stem = "cavern".to_string();
        assert_eq!(params.output_path(), PathBuf::from("cavern.png"));
        params.output_stem = String::new();
        assert_eq!(params.output_path(), PathBuf::from("perlinNoise.png"));
    }
}
