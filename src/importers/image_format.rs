//! Encoded image detection by magic bytes

use crate::error::{Error, Result};
use scroll::{Pread, BE, LE};
use serde::{Deserialize, Serialize};
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ImageFormat {
    Bmp,
    Jpeg,
    Png,
    Gif,
}

impl ImageFormat {
    /// Detect the format from the leading bytes
    pub fn sniff(bytes: &[u8]) -> Option<Self> {
        if bytes.starts_with(b"BM") {
            Some(ImageFormat::Bmp)
        } else if bytes.starts_with(&[0xFF, 0xD8]) {
            Some(ImageFormat::Jpeg)
        } else if bytes.starts_with(&[0x89, b'P', b'N', b'G']) {
            Some(ImageFormat::Png)
        } else if bytes.starts_with(b"GIF8") {
            Some(ImageFormat::Gif)
        } else {
            None
        }
    }

    /// Like `sniff`, failing with the name of the offending input
    pub fn detect(name: &str, bytes: &[u8]) -> Result<Self> {
        Self::sniff(bytes).ok_or_else(|| Error::UnsupportedImageFormat {
            name: name.to_string(),
        })
    }

    /// Pixel size read from the header, if the header is complete
    pub fn dimensions(&self, bytes: &[u8]) -> Option<(u32, u32)> {
        match self {
            ImageFormat::Png => {
                // IHDR is always the first chunk
                let ihdr: PngImageHeader = bytes.pread_with(16, BE).ok()?;
                Some((ihdr.width, ihdr.height))
            }
            ImageFormat::Gif => {
                let screen: GifScreenDescriptor = bytes.pread_with(6, LE).ok()?;
                Some((screen.width as u32, screen.height as u32))
            }
            ImageFormat::Bmp => {
                let info: BmpInfoSize = bytes.pread_with(18, LE).ok()?;
                // Negative height marks a top-down bitmap
                Some((info.width.unsigned_abs(), info.height.unsigned_abs()))
            }
            ImageFormat::Jpeg => jpeg_dimensions(bytes),
        }
    }
}

impl fmt::Display for ImageFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ImageFormat::Bmp => "BMP",
            ImageFormat::Jpeg => "JPEG",
            ImageFormat::Png => "PNG",
            ImageFormat::Gif => "GIF",
        };
        f.write_str(name)
    }
}

/// Width and height fields of the PNG `IHDR` chunk
#[derive(Debug, Clone, Copy, scroll::Pread)]
struct PngImageHeader {
    width: u32,
    height: u32,
}

/// Leading fields of the GIF logical screen descriptor
#[derive(Debug, Clone, Copy, scroll::Pread)]
struct GifScreenDescriptor {
    width: u16,
    height: u16,
}

/// Size fields of the BMP info header
#[derive(Debug, Clone, Copy, scroll::Pread)]
struct BmpInfoSize {
    width: i32,
    height: i32,
}

/// Start-of-frame segment up to the image size
#[derive(Debug, Clone, Copy, scroll::Pread)]
struct JpegFrameHeader {
    _length: u16,
    _precision: u8,
    height: u16,
    width: u16,
}

/// Walk the marker segments up to the first start-of-frame
fn jpeg_dimensions(bytes: &[u8]) -> Option<(u32, u32)> {
    let mut pos = 2;
    loop {
        if bytes.pread::<u8>(pos).ok()? != 0xFF {
            return None;
        }
        let marker: u8 = bytes.pread(pos + 1).ok()?;
        match marker {
            // Fill bytes
            0xFF => {
                pos += 1;
                continue;
            }
            0xD8 | 0x01 | 0xD0..=0xD7 => {
                pos += 2;
                continue;
            }
            0xC0..=0xCF if !matches!(marker, 0xC4 | 0xC8 | 0xCC) => {
                let frame: JpegFrameHeader = bytes.pread_with(pos + 2, BE).ok()?;
                return Some((frame.width as u32, frame.height as u32));
            }
            0xD9 | 0xDA => return None,
            _ => {}
        }
        let length: u16 = bytes.pread_with(pos + 2, BE).ok()?;
        pos += 2 + length as usize;
    }
}
