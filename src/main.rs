use anyhow::{Context, Result};
use clap::Parser;
use log::info;

use perlinpix::cli::{self, Args};
use perlinpix::params::ImageFormat;
use perlinpix::perlin::PerlinNoise;
use perlinpix::render;

fn main() -> Result<()> {
    env_logger::init();

    let args = Args::parse();
    let params = if args.wants_prompts() {
        cli::prompt_params(args.to_params())?
    } else {
        args.to_params()
    };

    let seed = params.seed();
    info!("seed text {:?} -> numeric seed {}", params.seed_text, seed);

    let field = PerlinNoise::with_seed(seed as u64);
    println!("Generating image...");
    let image = render::render(&params, &field);

    let path = params.output_path();
    println!("Writing {}...", path.display());
    match params.format {
        ImageFormat::Ppm => image.write(&path)?,
        ImageFormat::Png => image
            .to_rgb_image()
            .save(&path)
            .with_context(|| format!("unable to write {}", path.display()))?,
    }
    info!("{} pixels written to {}", image.size(), path.display());

    println!("Image successfully saved.\nImage ID: {}", params.image_id());
    Ok(())
}
