//! Signature image asset loading.
//!
//! The signature is placed at a fixed display size regardless of the
//! source image's pixel dimensions. The asset path is an explicit input
//! rather than a constant so tests and deployments can substitute their
//! own image.

use std::path::Path;

use crate::document::{ImageFormat, InlineImage, EMU_PER_INCH};
use crate::error::{FillError, Result};

/// Fixed signature display width: 1.5 in.
pub const SIGNATURE_WIDTH_EMU: u64 = EMU_PER_INCH * 3 / 2;
/// Fixed signature display height: 0.5 in.
pub const SIGNATURE_HEIGHT_EMU: u64 = EMU_PER_INCH / 2;

/// Read and validate the signature image at `path`.
///
/// The bytes are format-sniffed rather than trusted by extension; only PNG
/// and JPEG are accepted since those are the formats every Word viewer
/// renders inline.
pub fn load_signature(path: &Path) -> Result<InlineImage> {
    let data = std::fs::read(path)
        .map_err(|e| FillError::Asset(format!("cannot read {}: {e}", path.display())))?;
    let format = match image::guess_format(&data) {
        Ok(image::ImageFormat::Png) => ImageFormat::Png,
        Ok(image::ImageFormat::Jpeg) => ImageFormat::Jpeg,
        Ok(other) => {
            return Err(FillError::Asset(format!(
                "unsupported signature image format {other:?} in {}",
                path.display()
            )))
        }
        Err(e) => {
            return Err(FillError::Asset(format!(
                "cannot identify image format of {}: {e}",
                path.display()
            )))
        }
    };
    Ok(InlineImage {
        data,
        format,
        width_emu: SIGNATURE_WIDTH_EMU,
        height_emu: SIGNATURE_HEIGHT_EMU,
    })
}
