//! Image buffer and file output.

use crate::{color_to_rgb, Color};
use std::io::{self, Write};
use std::path::Path;

/// Largest channel value written to P3 output.
pub const PPM_MAX_VALUE: u8 = 255;

/// Averaged linear colors in row-major order, top row first.
#[derive(Debug, Clone)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Color>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            pixels: vec![Color::ZERO; width as usize * height as usize],
        }
    }

    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Color {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Color) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Gamma-corrected 8-bit RGB bytes, three per pixel.
    pub fn to_rgb8(&self) -> Vec<u8> {
        let mut bytes = Vec::with_capacity(self.pixels.len() * 3);
        for color in &self.pixels {
            bytes.extend_from_slice(&color_to_rgb(*color));
        }
        bytes
    }

    /// Save as PNG.
    pub fn save_png(&self, path: impl AsRef<Path>) -> image::ImageResult<()> {
        let img = image::RgbImage::from_fn(self.width, self.height, |x, y| {
            image::Rgb(color_to_rgb(self.get(x, y)))
        });
        img.save_with_format(path, image::ImageFormat::Png)
    }
}

/// Write `image` as plain-text PPM (P3).
///
/// Header lines are the `P3` tag, `width height` and the max channel value,
/// followed by one `R G B` line per pixel.
pub fn write_ppm<W: Write>(image: &ImageBuffer, writer: W) -> io::Result<()> {
    let mut writer = io::BufWriter::new(writer);

    writeln!(writer, "P3")?;
    writeln!(writer, "{} {}", image.width, image.height)?;
    writeln!(writer, "{}", PPM_MAX_VALUE)?;

    for color in &image.pixels {
        let [r, g, b] = color_to_rgb(*color);
        writeln!(writer, "{} {} {}", r, g, b)?;
    }

    writer.flush()
}
