//! PNG encoding of finished previews.

use std::io::Cursor;

use image::{ImageFormat, RgbaImage};

use crate::error::{PreviewError, Result};

/// Encode an image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> Result<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|e| PreviewError::Encode {
            message: e.to_string(),
        })?;
    Ok(bytes)
}
