//! Command-line argument parsing and the interactive parameter flow.

use std::io::{self, Write};

use anyhow::{Context, Result};
use clap::Parser;
use crossterm::{cursor, execute, terminal};

use crate::params::{
    ColorStyle, GenParams, ImageFormat, NoisePattern, Resolution, DEFAULT_STEM, PRESETS,
};

/// Command line arguments
#[derive(Parser, Debug)]
#[command(name = "perlinpix")]
#[command(about = "Terminal-driven Perlin noise image generator", long_about = None)]
pub struct Args {
    /// Seed text; a 6-character image ID is derived from it
    #[arg(long, value_name = "TEXT", conflicts_with = "id")]
    pub seed: Option<String>,

    /// Raw image ID, hashed as typed (what a previous run printed)
    #[arg(long, value_name = "TEXT")]
    pub id: Option<String>,

    /// Resolution preset 1-9 (640x480 up to 3840x2160)
    #[arg(long, value_name = "N")]
    pub preset: Option<u8>,

    /// Custom output width in pixels (use together with --height)
    #[arg(long, value_name = "PIXELS", requires = "height")]
    pub width: Option<u32>,

    /// Custom output height in pixels (use together with --width)
    #[arg(long, value_name = "PIXELS", requires = "width")]
    pub height: Option<u32>,

    /// Wood-ring pattern instead of the standard field
    #[arg(long)]
    pub wood: bool,

    /// Banded color mapping instead of grayscale
    #[arg(long)]
    pub banded: bool,

    /// Output file stem; the format extension is appended
    #[arg(long, value_name = "STEM", default_value = DEFAULT_STEM)]
    pub output: String,

    /// Output format: ppm or png
    #[arg(long, value_name = "FORMAT", default_value = "ppm")]
    pub format: String,

    /// Walk through the interactive prompts even when flags are given
    #[arg(long)]
    pub interactive: bool,
}

impl Args {
    /// True when the interactive flow should run.
    pub fn wants_prompts(&self) -> bool {
        self.interactive || (self.seed.is_none() && self.id.is_none())
    }

    /// Parse the output format, falling back to ppm on unknown input.
    pub fn parse_format(&self) -> ImageFormat {
        match self.format.to_lowercase().as_str() {
            "png" => ImageFormat::Png,
            "ppm" => ImageFormat::Ppm,
            other => {
                eprintln!("Warning: unknown format '{}', using ppm", other);
                ImageFormat::Ppm
            }
        }
    }

    /// Assemble generation parameters from the flags alone.
    pub fn to_params(&self) -> GenParams {
        let mut params = GenParams::default();

        if let Some(id) = &self.id {
            params.seed_text = id.clone();
            params.raw_id = true;
        } else if let Some(seed) = &self.seed {
            params.seed_text = seed.clone();
        }

        if let Some(choice) = self.preset {
            match Resolution::preset(choice) {
                Some(resolution) => params.resolution = resolution,
                None => eprintln!(
                    "Warning: preset {} is out of range 1-9, using {}x{}",
                    choice, params.resolution.width, params.resolution.height
                ),
            }
        }
        if let (Some(width), Some(height)) = (self.width, self.height) {
            params.resolution = Resolution {
                width: width.max(1),
                height: height.max(1),
            };
        }

        if self.wood {
            params.pattern = NoisePattern::Wood;
        }
        if self.banded {
            params.style = ColorStyle::Banded;
        }
        params.output_stem = self.output.clone();
        params.format = self.parse_format();
        params
    }
}

/// Interactive parameter collection: the classic prompt sequence with a
/// summary and a rechoose loop at the end.
pub fn prompt_params(defaults: GenParams) -> Result<GenParams> {
    let mut params = defaults;
    loop {
        clear_screen()?;
        let keyed = read_flag("Create image using seed (1) or ID (0)?", true)?;
        params.raw_id = !keyed;

        clear_screen()?;
        let text = read_line(if keyed {
            "Enter the seed..."
        } else {
            "Enter ID..."
        })?;
        if !text.is_empty() {
            params.seed_text = text;
        }

        clear_screen()?;
        params.pattern = if read_flag("Standard pattern (1) or wood rings (0)?", true)? {
            NoisePattern::Standard
        } else {
            NoisePattern::Wood
        };

        clear_screen()?;
        params.style = if read_flag("Black-white (1) or banded color (0)?", true)? {
            ColorStyle::Grayscale
        } else {
            ColorStyle::Banded
        };

        clear_screen()?;
        let stem = read_line("Enter custom filename or press Enter for the default...")?;
        params.output_stem = if stem.is_empty() {
            DEFAULT_STEM.to_string()
        } else {
            stem
        };

        clear_screen()?;
        params.resolution = prompt_resolution()?;

        clear_screen()?;
        println!("Chosen parameters:");
        println!(
            "{}: {}",
            if params.raw_id { "ID" } else { "Seed" },
            params.seed_text
        );
        println!(
            "{}",
            match params.pattern {
                NoisePattern::Standard => "Standard pattern.",
                NoisePattern::Wood => "Wood-ring pattern.",
            }
        );
        println!(
            "{}",
            match params.style {
                ColorStyle::Grayscale => "Black-white.",
                ColorStyle::Banded => "Banded color.",
            }
        );
        println!("Filename: {}", params.output_stem);
        println!(
            "Resolution: {} x {}\n",
            params.resolution.width, params.resolution.height
        );
        if read_flag("Create with current parameters (1) or rechoose (0)?", true)? {
            clear_screen()?;
            return Ok(params);
        }
    }
}

fn prompt_resolution() -> Result<Resolution> {
    loop {
        println!("Choose a standard resolution (1-9) or enter custom (0):");
        for (i, preset) in PRESETS.iter().enumerate() {
            println!("{}) {} x {}", i + 1, preset.width, preset.height);
        }
        let line = read_line("")?;
        match line.parse::<u8>() {
            Ok(0) => {
                let width = read_number("Recommended width 1 - 15360.\nEnter the width...")?;
                let height = read_number("Recommended height 1 - 8640.\nEnter the height...")?;
                return Ok(Resolution { width, height });
            }
            Ok(choice) => {
                if let Some(resolution) = Resolution::preset(choice) {
                    return Ok(resolution);
                }
            }
            Err(_) => {}
        }
        println!("Please answer with a number from 0 to 9.");
    }
}

fn read_flag(prompt: &str, default: bool) -> Result<bool> {
    let line = read_line(prompt)?;
    Ok(match line.as_str() {
        "1" | "y" | "Y" => true,
        "0" | "n" | "N" => false,
        _ => default,
    })
}

fn read_number(prompt: &str) -> Result<u32> {
    loop {
        match read_line(prompt)?.parse::<u32>() {
            Ok(n) if n > 0 => return Ok(n),
            _ => println!("Please enter a positive number."),
        }
    }
}

fn read_line(prompt: &str) -> Result<String> {
    if !prompt.is_empty() {
        println!("{prompt}");
    }
    io::stdout().flush()?;
    let mut line = String::new();
    io::stdin()
        .read_line(&mut line)
        .context("stdin closed while prompting")?;
    Ok(line.trim().to_string())
}

fn clear_screen() -> Result<()> {
    execute!(
        io::stdout(),
        terminal::Clear(terminal::ClearType::All),
        cursor::MoveTo(0, 0)
    )?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn seed_flag_keeps_key_derivation() {
        let args = Args::parse_from(["perlinpix", "--seed", "hello"]);
        let params = args.to_params();
        assert_eq!(params.seed_text, "hello");
        assert!(!params.raw_id);
        assert!(!args.wants_prompts());
    }

    #[test]
    fn id_flag_is_raw() {
        let args = Args::parse_from(["perlinpix", "--id", "XOONKX"]);
        let params = args.to_params();
        assert_eq!(params.seed_text, "XOONKX");
        assert!(params.raw_id);
    }

    #[test]
    fn no_seed_material_means_prompts() {
        let args = Args::parse_from(["perlinpix"]);
        assert!(args.wants_prompts());
        let args = Args::parse_from(["perlinpix", "--seed", "x", "--interactive"]);
        assert!(args.wants_prompts());
    }

    #[test]
    fn preset_and_custom_dimensions() {
        let args = Args::parse_from(["perlinpix", "--seed", "x", "--preset", "8"]);
        let params = args.to_params();
        assert_eq!((params.resolution.width, params.resolution.height), (1920, 1080));

        let args = Args::parse_from([
            "perlinpix", "--seed", "x", "--width", "320", "--height", "200",
        ]);
        let params = args.to_params();
        assert_eq!((params.resolution.width, params.resolution.height), (320, 200));
    }

    #[test]
    fn style_flags_map_to_params() {
        let args = Args::parse_from(["perlinpix", "--seed", "x", "--wood", "--banded"]);
        let params = args.to_params();
        assert_eq!(params.pattern, NoisePattern::Wood);
        assert_eq!(params.style, ColorStyle::Banded);
    }

    #[test]
    fn format_parsing_falls_back_to_ppm() {
        let args = Args::parse_from(["perlinpix", "--seed", "x", "--format", "PNG"]);
        assert_eq!(args.parse_format(), ImageFormat::Png);
        let args = Args::parse_from(["perlinpix", "--seed", "x", "--format", "bmp"]);
        assert_eq!(args.parse_format(), ImageFormat::Ppm);
    }

    #[test]
    fn seed_and_id_conflict() {
        assert!(Args::try_parse_from(["perlinpix", "--seed", "a", "--id", "b"]).is_err());
    }
}
