// Copyright @yucwang 2026

use crate::math::constants::{Float, Vector2f, Vector3f};
use crate::math::spectrum::RGBSpectrum;
use exr::prelude::*;
use image::io::Reader as ImageReader;
use image::GenericImageView;
use std::path::Path;

/// Linear RGB image sampled with bilinear filtering.
///
/// `u` repeats and `v` clamps, which is what a latitude-longitude sky map
/// needs: the seam at φ = ±π wraps while the poles do not.
pub struct ImageTexture {
    width: usize,
    height: usize,
    data: Vec<Vector3f>,
}

fn srgb_to_linear(v: Float) -> Float {
    if v <= 0.04045 {
        v / 12.92
    } else {
        ((v + 0.055) / 1.055).powf(2.4)
    }
}

struct ExrPixels {
    width: usize,
    data: Vec<Vector3f>,
}

impl ImageTexture {
    pub fn from_rgb(r: Float, g: Float, b: Float) -> Self {
        Self::from_pixels(1, 1, vec![Vector3f::new(r, g, b)])
    }

    pub fn from_pixels(width: usize, height: usize, data: Vec<Vector3f>) -> Self {
        assert_eq!(width * height, data.len());
        Self { width, height, data }
    }

    pub fn from_exr(path: &str) -> std::result::Result<Self, String> {
        let image = read()
            .no_deep_data()
            .largest_resolution_level()
            .rgba_channels(
                |resolution, _| {
                    let width = resolution.width();
                    let height = resolution.height();
                    ExrPixels {
                        width,
                        data: vec![Vector3f::zeros(); width * height],
                    }
                },
                |pixels, position, (r, g, b, _a): (f32, f32, f32, f32)| {
                    let idx = position.y() * pixels.width + position.x();
                    pixels.data[idx] = Vector3f::new(r as Float, g as Float, b as Float);
                },
            )
            .first_valid_layer()
            .all_attributes()
            .from_file(path)
            .map_err(|e| format!("failed to read exr {}: {}", path, e))?;

        let pixels = image.layer_data.channel_data.pixels;
        let width = pixels.width;
        let height = if width > 0 { pixels.data.len() / width } else { 0 };
        Self::checked(width, height, pixels.data, path)
    }

    pub fn from_image(path: &str, srgb: bool) -> std::result::Result<Self, String> {
        let img = ImageReader::open(path)
            .map_err(|e| format!("failed to open image {}: {}", path, e))?
            .decode()
            .map_err(|e| format!("failed to decode image {}: {}", path, e))?;

        let (width, height) = img.dimensions();
        let rgb = img.to_rgb32f();
        let mut data = Vec::with_capacity((width * height) as usize);
        for y in 0..height {
            for x in 0..width {
                let p = rgb.get_pixel(x, y);
                let mut c = Vector3f::new(p[0] as Float, p[1] as Float, p[2] as Float);
                if srgb {
                    c = c.map(srgb_to_linear);
                }
                data.push(c);
            }
        }

        Self::checked(width as usize, height as usize, data, path)
    }

    pub fn from_file(path: &str) -> std::result::Result<Self, String> {
        let ext = Path::new(path)
            .extension()
            .and_then(|s| s.to_str())
            .unwrap_or("")
            .to_ascii_lowercase();

        match ext.as_str() {
            "exr" => Self::from_exr(path),
            "jpg" | "jpeg" | "png" => Self::from_image(path, true),
            _ => Err(format!("unsupported texture format: {}", ext)),
        }
    }

    fn checked(width: usize, height: usize, data: Vec<Vector3f>, path: &str) -> std::result::Result<Self, String> {
        if width == 0 || height == 0 {
            return Err(format!("image {} has invalid resolution: {}x{}", path, width, height));
        }
        Ok(Self { width, height, data })
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width, self.height)
    }

    fn pixel_at(&self, x: usize, y: usize) -> Vector3f {
        self.data[y * self.width + x]
    }

    /// Bilinear lookup; `uv = (0, 0)` is the top-left corner of the image.
    pub fn eval(&self, uv: Vector2f) -> RGBSpectrum {
        if self.width == 0 || self.height == 0 {
            return RGBSpectrum::default();
        }

        let x = uv.x.rem_euclid(1.0) * (self.width as Float) - 0.5;
        let y = uv.y.clamp(0.0, 1.0) * (self.height as Float) - 0.5;
        let x0 = x.floor() as isize;
        let y0 = y.floor() as isize;
        let tx = x - x0 as Float;
        let ty = y - y0 as Float;

        let w = self.width as isize;
        let h = self.height as isize;
        let xa = x0.rem_euclid(w) as usize;
        let xb = (x0 + 1).rem_euclid(w) as usize;
        let ya = y0.clamp(0, h - 1) as usize;
        let yb = (y0 + 1).clamp(0, h - 1) as usize;

        let top = self.pixel_at(xa, ya) * (1.0 - tx) + self.pixel_at(xb, ya) * tx;
        let bottom = self.pixel_at(xa, yb) * (1.0 - tx) + self.pixel_at(xb, yb) * tx;
        RGBSpectrum::from_vec(top * (1.0 - ty) + bottom * ty)
    }
}
