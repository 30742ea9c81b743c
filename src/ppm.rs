//! Binary pixmap (P6) image buffer with per-channel planes.

use std::fs::File;
use std::io::{BufRead, BufReader, BufWriter, Read, Write};
use std::path::Path;

use anyhow::{bail, Context, Result};

/// Flat RGB image, one byte plane per channel, row-major.
#[derive(Debug)]
pub struct Ppm {
    pub width: u32,
    pub height: u32,
    pub max_col_val: u32,
    pub r: Vec<u8>,
    pub g: Vec<u8>,
    pub b: Vec<u8>,
}

impl Ppm {
    /// Black image of the given size.
    pub fn new(width: u32, height: u32) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            max_col_val: 255,
            r: vec![0; size],
            g: vec![0; size],
            b: vec![0; size],
        }
    }

    /// Total number of pixels.
    pub fn size(&self) -> usize {
        self.width as usize * self.height as usize
    }

    /// Parse a binary P6 file into channel planes.
    pub fn read(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let file =
            File::open(path).with_context(|| format!("unable to open {}", path.display()))?;
        let mut reader = BufReader::new(file);

        let magic = header_line(&mut reader)?;
        if magic.trim() != "P6" {
            bail!(
                "{}: unrecognized format {:?}, expected P6",
                path.display(),
                magic.trim()
            );
        }

        let dims = header_line(&mut reader)?;
        let mut parts = dims.split_whitespace();
        let width: u32 = parts
            .next()
            .context("missing width in header")?
            .parse()
            .context("malformed width in header")?;
        let height: u32 = parts
            .next()
            .context("missing height in header")?
            .parse()
            .context("malformed height in header")?;
        let max_col_val: u32 = header_line(&mut reader)?
            .trim()
            .parse()
            .context("malformed max channel value in header")?;

        let mut image = Ppm::new(width, height);
        image.max_col_val = max_col_val;

        let mut pixels = vec![0u8; image.size() * 3];
        reader
            .read_exact(&mut pixels)
            .with_context(|| format!("{}: truncated pixel data", path.display()))?;
        for i in 0..image.size() {
            image.r[i] = pixels[i * 3];
            image.g[i] = pixels[i * 3 + 1];
            image.b[i] = pixels[i * 3 + 2];
        }
        Ok(image)
    }

    /// Write the planes out as binary P6: textual header, then interleaved
    /// RGB bytes, no padding.
    pub fn write(&self, path: impl AsRef<Path>) -> Result<()> {
        let path = path.as_ref();
        let file =
            File::create(path).with_context(|| format!("unable to create {}", path.display()))?;
        let mut writer = BufWriter::new(file);

        write!(writer, "P6\n{} {}\n{}\n", self.width, self.height, self.max_col_val)?;
        let mut pixels = Vec::with_capacity(self.size() * 3);
        for i in 0..self.size() {
            pixels.push(self.r[i]);
            pixels.push(self.g[i]);
            pixels.push(self.b[i]);
        }
        writer.write_all(&pixels)?;
        writer
            .flush()
            .with_context(|| format!("unable to write {}", path.display()))?;
        Ok(())
    }

    /// Interleaved copy for the `image` crate encoders.
    pub fn to_rgb_image(&self) -> image::RgbImage {
        let mut out = image::RgbImage::new(self.width, self.height);
        for (i, pixel) in out.pixels_mut().enumerate() {
            *pixel = image::Rgb([self.r[i], self.g[i], self.b[i]]);
        }
        out
    }
}

// Next header line, skipping comment lines.
fn header_line(reader: &mut impl BufRead) -> Result<String> {
    loop {
        let mut line = String::new();
        let n = reader.read_line(&mut line).context("malformed header")?;
        if n == 0 {
            bail!("unexpected end of header");
        }
        if line.starts_with('#') {
            continue;
        }
        return Ok(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::PathBuf;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("perlinpix-{}-{}", std::process::id(), name))
    }

    #[test]
    fn new_image_is_black() {
        let image = Ppm::new(4, 3);
        assert_eq!(image.size(), 12);
        assert!(image.r.iter().all(|&v| v == 0));
        assert!(image.g.iter().all(|&v| v == 0));
        assert!(image.b.iter().all(|&v| v == 0));
    }

    #[test]
    fn write_then_read_round_trips() {
        let mut image = Ppm::new(5, 4);
        for i in 0..image.size() {
            image.r[i] = i as u8;
            image.g[i] = (i * 7) as u8;
            image.b[i] = 255 - i as u8;
        }

        let path = temp_path("roundtrip.ppm");
        image.write(&path).unwrap();
        let back = Ppm::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!(back.width, 5);
        assert_eq!(back.height, 4);
        assert_eq!(back.max_col_val, 255);
        assert_eq!(back.r, image.r);
        assert_eq!(back.g, image.g);
        assert_eq!(back.b, image.b);
    }

    #[test]
    fn header_comments_are_skipped() {
        let path = temp_path("comment.ppm");
        std::fs::write(&path, b"P6\n# made by hand\n2 1\n255\nabcdef").unwrap();
        let image = Ppm::read(&path).unwrap();
        let _ = std::fs::remove_file(&path);

        assert_eq!((image.width, image.height), (2, 1));
        assert_eq!(image.r, vec![b'a', b'd']);
        assert_eq!(image.g, vec![b'b', b'e']);
        assert_eq!(image.b, vec![b'c', b'f']);
    }

    #[test]
    fn wrong_magic_is_rejected() {
        let path = temp_path("magic.ppm");
        std::fs::write(&path, b"P5\n2 1\n255\nabcdef").unwrap();
        let err = Ppm::read(&path).unwrap_err();
        let _ = std::fs::remove_file(&path);
        assert!(err.to_string().contains("P6"));
    }

    #[test]
    fn truncated_pixel_data_is_rejected() {
        let path = temp_path("short.ppm");
        std::fs::write(&path, b"P6\n2 2\n255\nabc").unwrap();
        assert!(Ppm::read(&path).is_err());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        assert!(Ppm::read(temp_path("does-not-exist.ppm")).is_err());
    }
}
