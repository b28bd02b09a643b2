//! Background image loading
//!
//! Decodes a PNG into tightly packed RGBA8 once at startup.

use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use crate::error::{DemoError, DemoResult};

/// Decoded RGBA8 image
#[derive(Debug, Clone, PartialEq)]
pub struct BackgroundImage {
    pub width: u32,
    pub height: u32,
    /// Row-major RGBA8, `width * height * 4` bytes
    pub rgba: Vec<u8>,
}

impl BackgroundImage {
    /// Load and decode the PNG at `path`
    pub fn load(path: &Path) -> DemoResult<Self> {
        let file = File::open(path).map_err(|source| DemoError::StartupAsset {
            path: path.to_path_buf(),
            source,
        })?;
        let image = Self::decode(BufReader::new(file))?;
        log::info!(
            "Loaded background {} ({}x{})",
            path.display(),
            image.width,
            image.height
        );
        Ok(image)
    }

    /// Decode PNG bytes from any reader
    pub fn decode<R: Read>(reader: R) -> DemoResult<Self> {
        let mut decoder = png::Decoder::new(reader);
        // Palette -> RGB(A), sub-byte gray -> 8 bit, 16 bit -> 8 bit
        decoder.set_transformations(png::Transformations::EXPAND | png::Transformations::STRIP_16);
        let mut reader = decoder.read_info()?;
        let mut buf = vec![0; reader.output_buffer_size()];
        let info = reader.next_frame(&mut buf)?;
        buf.truncate(info.buffer_size());

        if info.width == 0 || info.height == 0 {
            return Err(DemoError::UnsupportedImage("zero-sized image".into()));
        }
        if info.bit_depth != png::BitDepth::Eight {
            return Err(DemoError::UnsupportedImage(format!(
                "bit depth {:?}",
                info.bit_depth
            )));
        }

        let rgba = match info.color_type {
            png::ColorType::Rgba => buf,
            png::ColorType::Rgb => buf
                .chunks_exact(3)
                .flat_map(|p| [p[0], p[1], p[2], 255])
                .collect(),
            png::ColorType::GrayscaleAlpha => buf
                .chunks_exact(2)
                .flat_map(|p| [p[0], p[0], p[0], p[1]])
                .collect(),
            png::ColorType::Grayscale => buf.iter().flat_map(|&g| [g, g, g, 255]).collect(),
            png::ColorType::Indexed => {
                return Err(DemoError::UnsupportedImage("unexpanded palette".into()));
            }
        };

        Ok(Self {
            width: info.width,
            height: info.height,
            rgba,
        })
    }

    pub fn size(&self) -> (u32, u32) {
        (self.width, self.height)
    }
}
