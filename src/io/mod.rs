// Copyright @yucwang 2021

pub mod exr_utils;
pub mod ldr_utils;

use crate::math::bitmap::Bitmap;
use std::path::Path;

/// Writes `image` as EXR or PNG depending on the file extension.
pub fn write_image(image: &Bitmap, file_path: &str) -> std::result::Result<(), String> {
    let ext = Path::new(file_path)
        .extension()
        .and_then(|s| s.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();
    match ext.as_str() {
        "exr" => exr_utils::write_exr_to_file(image, file_path),
        "png" => ldr_utils::write_png_to_file(image, file_path),
        _ => Err(format!("unsupported output format: {}", file_path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unknown_extension() {
        assert!(write_image(&Bitmap::new(2, 2), "frame.tiff").is_err());
    }
}
