/* Copyright 2020 @TwoCookingMice */

use crate::math::bitmap::Bitmap;

use exr::prelude::*;

/// Writes linear RGBA as 32-bit float OpenEXR.
pub fn write_exr_to_file(image: &Bitmap, file_path: &str) -> std::result::Result<(), String> {
    log::info!("Starting writing openexr image: {}.", file_path);

    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return Err(format!("refusing to write an empty {}x{} image", width, height));
    }
    let pixels = image.raw_copy();

    write_rgba_file(file_path, width, height, |x, y| pixels[y * width + x])
        .map_err(|e| format!("EXR write error for {}: {}", file_path, e))?;
    log::info!("EXR written to: {}.", file_path);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::constants::Vector4f;

    #[test]
    fn test_write_exr() {
        let mut bitmap = Bitmap::new(4, 3);
        bitmap[(1, 2)] = Vector4f::new(2.5, 0.5, 0.0, 1.0);
        let path = std::env::temp_dir().join("kerrtrace_exr_utils_test.exr");
        let path = path.to_string_lossy().to_string();
        write_exr_to_file(&bitmap, &path).unwrap();
        assert!(std::fs::metadata(&path).map(|m| m.len() > 0).unwrap_or(false));
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_empty_image_is_an_error() {
        assert!(write_exr_to_file(&Bitmap::new(0, 0), "unused.exr").is_err());
    }
}
