//! Tray icon loading.

use std::io::Cursor;
use std::path::Path;

use shoji_common::MenuError;
use tray_icon::Icon;

/// Decoded 8-bit RGBA image.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rgba {
    pub pixels: Vec<u8>,
    pub width: u32,
    pub height: u32,
}

/// Decode PNG bytes to RGBA, expanding palette, grey and RGB images.
pub fn decode_png(bytes: &[u8]) -> Result<Rgba, MenuError> {
    let mut decoder = png::Decoder::new(Cursor::new(bytes));
    decoder.set_transformations(png::Transformations::normalize_to_color8());
    let mut reader = decoder
        .read_info()
        .map_err(|e| MenuError::Icon(e.to_string()))?;
    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| MenuError::Icon(e.to_string()))?;
    let data = &buf[..info.buffer_size()];

    let pixels = match info.color_type {
        png::ColorType::Rgba => data.to_vec(),
        png::ColorType::Rgb => data
            .chunks_exact(3)
            .flat_map(|p| [p[0], p[1], p[2], 255])
            .collect(),
        png::ColorType::GrayscaleAlpha => data
            .chunks_exact(2)
            .flat_map(|p| [p[0], p[0], p[0], p[1]])
            .collect(),
        png::ColorType::Grayscale => data.iter().flat_map(|&g| [g, g, g, 255]).collect(),
        png::ColorType::Indexed => {
            return Err(MenuError::Icon("unexpanded palette image".into()));
        }
    };

    Ok(Rgba {
        pixels,
        width: info.width,
        height: info.height,
    })
}

/// Read a PNG file into a tray icon.
pub fn load_icon(path: &Path) -> Result<Icon, MenuError> {
    let bytes =
        std::fs::read(path).map_err(|e| MenuError::Icon(format!("{}: {e}", path.display())))?;
    let image = decode_png(&bytes)?;
    Icon::from_rgba(image.pixels, image.width, image.height)
        .map_err(|e| MenuError::Icon(e.to_string()))
}
