// Copyright @yucwang 2026

use crate::math::bitmap::Bitmap;
use crate::math::constants::Float;

/// Linear to sRGB transfer curve, input clamped to [0, 1].
pub fn linear_to_srgb(v: Float) -> Float {
    let v = if v.is_finite() { v.clamp(0.0, 1.0) } else { 0.0 };
    if v <= 0.0031308 {
        12.92 * v
    } else {
        1.055 * v.powf(1.0 / 2.4) - 0.055
    }
}

fn to_byte(v: Float) -> u8 {
    (v * 255.0 + 0.5).clamp(0.0, 255.0) as u8
}

/// 8-bit RGBA PNG. Colour is clamped and sRGB encoded, alpha stays linear.
pub fn write_png_to_file(image: &Bitmap, file_path: &str) -> std::result::Result<(), String> {
    let width = image.width();
    let height = image.height();
    if width == 0 || height == 0 {
        return Err(format!("refusing to write an empty {}x{} image", width, height));
    }

    let out = image::RgbaImage::from_fn(width as u32, height as u32, |x, y| {
        let p = image[(x as usize, y as usize)];
        image::Rgba([
            to_byte(linear_to_srgb(p.x)),
            to_byte(linear_to_srgb(p.y)),
            to_byte(linear_to_srgb(p.z)),
            to_byte(if p.w.is_finite() { p.w.clamp(0.0, 1.0) } else { 0.0 }),
        ])
    });
    out.save(file_path)
        .map_err(|e| format!("PNG write error for {}: {}", file_path, e))?;
    log::info!("PNG written to: {}.", file_path);
    Ok(())
}
