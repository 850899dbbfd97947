// Copyright 2020 @TwoCookingMice

use super::constants::Vector4f;

use std::ops;
use std::vec::Vec;

/// Linear RGBA frame buffer, row-major.
#[derive(Debug, Clone)]
pub struct Bitmap {
    data: Vec<Vector4f>,
    height: usize,
    width: usize
}

impl ops::Index<(usize, usize)> for Bitmap {
    type Output = Vector4f;

    fn index(&self, index: (usize, usize)) -> &Vector4f {
        let transformed_index = index.0 + self.width * index.1;
        assert!(transformed_index < self.height * self.width);
        &self.data[transformed_index]
    }
}

impl ops::IndexMut<(usize, usize)> for Bitmap {
    fn index_mut(&mut self, index: (usize, usize)) -> &mut Vector4f {
        let transformed_index = index.0 + self.width * index.1;
        assert!(transformed_index < self.height * self.width);
        &mut self.data[transformed_index]
    }
}

impl Bitmap {
    pub fn new(width: usize, height: usize) -> Self {
        let pixel_number = width * height;
        Self { data: vec!(Vector4f::new(0.0, 0.0, 0.0, 0.0);
                          pixel_number),
               width: width,
               height: height }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn pixels(&self) -> &[Vector4f] {
        &self.data
    }

    pub fn raw_copy(&self) -> Vec<(f32, f32, f32, f32)> {
        self.data
            .iter()
            .map(|p| (p.x as f32, p.y as f32, p.z as f32, p.w as f32))
            .collect()
    }
}

/* Test for Bitmap */
