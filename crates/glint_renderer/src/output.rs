//! Image buffer and file output.
//!
//! Colors are stored linear and converted to 8-bit only on output: each
//! channel is clamped to [0, 1] and scaled linearly to [0, 255]. No gamma
//! curve is applied.

use crate::Color;
use glint_math::Interval;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::Path;
use thiserror::Error;

/// Errors that can occur while writing an image.
#[derive(Error, Debug)]
pub enum OutputError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Image encoding error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Unsupported output format: {0}")]
    UnsupportedFormat(String),
}

/// Errors from parsing a textual (P3) PPM image.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum PpmError {
    #[error("Expected magic 'P3', found {0:?}")]
    BadMagic(String),

    #[error("Unexpected end of data while reading {0}")]
    UnexpectedEnd(&'static str),

    #[error("Invalid number {0:?}")]
    InvalidNumber(String),

    #[error("Unsupported max channel value {0} (must be 1..=255)")]
    UnsupportedMaxValue(u32),

    #[error("Image size {width}x{height} does not fit in memory")]
    TooLarge { width: u32, height: u32 },

    #[error("Channel value {value} exceeds max {max}")]
    ValueOutOfRange { value: u32, max: u32 },

    #[error("Unexpected trailing data {0:?}")]
    TrailingData(String),
}

/// Convert a linear color to 8-bit RGB, clamping each channel to [0, 1].
pub fn color_to_rgb(color: Color) -> [u8; 3] {
    // 0.999 keeps 1.0 inside the top bucket after scaling by 256
    let intensity = Interval::new(0.0, 0.999);
    let channel = |c: f32| (256.0 * intensity.clamp(c)) as u8;
    [channel(color.x), channel(color.y), channel(color.z)]
}

/// Row-major image of linear colors; row 0 is the top of the image.
#[derive(Debug, Clone, PartialEq)]
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
        let idx = self.index(x, y);
        self.pixels[idx] = color;
    }

    /// 8-bit RGB triplets in row-major order.
    pub fn to_rgb_triplets(&self) -> Vec<[u8; 3]> {
        self.pixels.iter().copied().map(color_to_rgb).collect()
    }

    /// Packed 8-bit RGB bytes (for encoders).
    pub fn to_rgb8(&self) -> Vec<u8> {
        bytemuck::cast_slice::<[u8; 3], u8>(&self.to_rgb_triplets()).to_vec()
    }

    /// Write the image as textual PPM (P3).
    pub fn write_ppm<W: Write>(&self, writer: &mut W) -> std::io::Result<()> {
        writeln!(writer, "P3")?;
        writeln!(writer, "{} {}", self.width, self.height)?;
        writeln!(writer, "255")?;

        for [r, g, b] in self.to_rgb_triplets() {
            writeln!(writer, "{} {} {}", r, g, b)?;
        }

        Ok(())
    }

    /// Save to disk; the format follows the file extension (`ppm` or `png`).
    pub fn save(&self, path: impl AsRef<Path>) -> Result<(), OutputError> {
        let path = path.as_ref();
        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(str::to_ascii_lowercase)
            .unwrap_or_default();

        match extension.as_str() {
            "ppm" => {
                let mut writer = BufWriter::new(File::create(path)?);
                self.write_ppm(&mut writer)?;
                writer.flush()?;
            }
            "png" => {
                image::save_buffer_with_format(
                    path,
                    &self.to_rgb8(),
                    self.width,
                    self.height,
                    image::ColorType::Rgb8,
                    image::ImageFormat::Png,
                )?;
            }
            other => return Err(OutputError::UnsupportedFormat(other.to_string())),
        }

        log::info!("Saved {}x{} image to {}", self.width, self.height, path.display());
        Ok(())
    }
}

/// A decoded textual PPM image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PpmImage {
    pub width: u32,
    pub height: u32,
    pub max_value: u32,
    pub pixels: Vec<[u8; 3]>,
}

/// Upper bound on pixels reserved up front when parsing.
const MAX_PREALLOCATED_PIXELS: usize = 1 << 20;

/// Parse a textual (P3) PPM image. `#` starts a comment running to the end
/// of the line.
pub fn parse_ppm(text: &str) -> Result<PpmImage, PpmError> {
    let mut tokens = text
        .lines()
        .map(|line| line.split('#').next().unwrap_or(""))
        .flat_map(str::split_whitespace);

    let magic = tokens.next().ok_or(PpmError::UnexpectedEnd("magic"))?;
    if magic != "P3" {
        return Err(PpmError::BadMagic(magic.to_string()));
    }

    let mut number = |what: &'static str| -> Result<u32, PpmError> {
        let token = tokens.next().ok_or(PpmError::UnexpectedEnd(what))?;
        token
            .parse::<u32>()
            .map_err(|_| PpmError::InvalidNumber(token.to_string()))
    };

    let width = number("width")?;
    let height = number("height")?;
    let max_value = number("max value")?;
    if max_value == 0 || max_value > 255 {
        return Err(PpmError::UnsupportedMaxValue(max_value));
    }

    let count = (width as usize)
        .checked_mul(height as usize)
        .ok_or(PpmError::TooLarge { width, height })?;
    // Header sizes are untrusted; grow past this as pixel data actually arrives
    let mut pixels = Vec::with_capacity(count.min(MAX_PREALLOCATED_PIXELS));
    for _ in 0..count {
        let mut triplet = [0u8; 3];
        for channel in &mut triplet {
            let value = number("pixel data")?;
            if value > max_value {
                return Err(PpmError::ValueOutOfRange {
                    value,
                    max: max_value,
                });
            }
            *channel = value as u8;
        }
        pixels.push(triplet);
    }

    if let Some(extra) = tokens.next() {
        return Err(PpmError::TrailingData(extra.to_string()));
    }

    Ok(PpmImage {
        width,
        height,
        max_value,
        pixels,
    })
}
