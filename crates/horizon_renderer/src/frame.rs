//! RGB8 pixel buffer owned by the renderers.

use std::path::Path;

use crate::Rgb;

/// Row-major image, top row first.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImageBuffer {
    pub width: u32,
    pub height: u32,
    pub pixels: Vec<Rgb>,
}

impl ImageBuffer {
    /// Create a new image buffer filled with black.
    pub fn new(width: u32, height: u32) -> Self {
        Self::filled(width, height, [0, 0, 0])
    }

    /// Create a new image buffer filled with one color.
    pub fn filled(width: u32, height: u32, color: Rgb) -> Self {
        Self {
            width,
            height,
            pixels: vec![color; width as usize * height as usize],
        }
    }

    #[inline]
    fn index(&self, x: u32, y: u32) -> usize {
        y as usize * self.width as usize + x as usize
    }

    /// Get the pixel at (x, y).
    pub fn get(&self, x: u32, y: u32) -> Rgb {
        self.pixels[self.index(x, y)]
    }

    /// Set the pixel at (x, y).
    pub fn set(&mut self, x: u32, y: u32, color: Rgb) {
        let i = self.index(x, y);
        self.pixels[i] = color;
    }

    /// Set the pixel at signed coordinates, ignoring anything off-image.
    pub fn set_clipped(&mut self, x: i32, y: i32, color: Rgb) {
        if x >= 0 && y >= 0 && (x as u32) < self.width && (y as u32) < self.height {
            self.set(x as u32, y as u32, color);
        }
    }

    /// Borrow one scanline.
    pub fn row(&self, y: u32) -> &[Rgb] {
        let start = self.index(0, y);
        &self.pixels[start..start + self.width as usize]
    }

    /// Mutably borrow one scanline.
    pub fn row_mut(&mut self, y: u32) -> &mut [Rgb] {
        let start = self.index(0, y);
        &mut self.pixels[start..start + self.width as usize]
    }

    /// Mutable slice over rows `[start, end)`, row-major.
    pub fn rows_mut(&mut self, start: u32, end: u32) -> &mut [Rgb] {
        let w = self.width as usize;
        &mut self.pixels[start as usize * w..end as usize * w]
    }

    /// Convert to RGBA bytes (for GPU upload).
    pub fn to_rgba(&self) -> Vec<[u8; 4]> {
        self.pixels.iter().map(|&[r, g, b]| [r, g, b, 255]).collect()
    }

    /// Flatten to packed RGB bytes.
    pub fn to_rgb_bytes(&self) -> Vec<u8> {
        self.pixels.iter().flatten().copied().collect()
    }

    /// Write the image as a PNG file.
    pub fn save_png<P: AsRef<Path>>(&self, path: P) -> image::ImageResult<()> {
        image::save_buffer_with_format(
            path,
            &self.to_rgb_bytes(),
            self.width,
            self.height,
            image::ColorType::Rgb8,
            image::ImageFormat::Png,
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_set() {
        let mut image = ImageBuffer::new(4, 3);
        image.set(3, 2, [1, 2, 3]);

        assert_eq!(image.get(3, 2), [1, 2, 3]);
        assert_eq!(image.get(0, 0), [0, 0, 0]);
        assert_eq!(image.pixels[11], [1, 2, 3]);
    }

    #[test]
    fn test_set_clipped() {
        let mut image = ImageBuffer::new(4, 3);
        image.set_clipped(-1, 0, [9, 9, 9]);
        image.set_clipped(4, 0, [9, 9, 9]);
        image.set_clipped(0, 3, [9, 9, 9]);
        assert!(image.pixels.iter().all(|&p| p == [0, 0, 0]));

        image.set_clipped(1, 1, [9, 9, 9]);
        assert_eq!(image.get(1, 1), [9, 9, 9]);
    }

    #[test]
    fn test_rows() {
        let mut image = ImageBuffer::new(2, 3);
        image.row_mut(1).fill([7, 7, 7]);

        assert_eq!(image.row(0), &[[0, 0, 0]; 2]);
        assert_eq!(image.row(1), &[[7, 7, 7]; 2]);
        assert_eq!(image.rows_mut(1, 3).len(), 4);
    }

    #[test]
    fn test_wide_row_indexing() {
        // 70000 * 70000 does not fit in u32; row offsets must not wrap
        let mut image = ImageBuffer::new(70_000, 2);
        image.set(69_999, 1, [5, 5, 5]);

        assert_eq!(image.pixels.len(), 140_000);
        assert_eq!(image.row(1)[69_999], [5, 5, 5]);
        assert_eq!(image.get(69_999, 1), [5, 5, 5]);
        assert_eq!(image.get(69_999, 0), [0, 0, 0]);
    }

    #[test]
    fn test_byte_conversions() {
        let image = ImageBuffer::filled(2, 1, [10, 20, 30]);

        assert_eq!(image.to_rgba(), vec![[10, 20, 30, 255]; 2]);
        assert_eq!(image.to_rgb_bytes(), vec![10, 20, 30, 10, 20, 30]);
    }

    #[test]
    fn test_save_png() {
        let image = ImageBuffer::filled(3, 2, [200, 120, 50]);
        let path = std::env::temp_dir().join(format!("horizon_frame_{}.png", std::process::id()));

        image.save_png(&path).unwrap();
        let loaded = image::open(&path).unwrap().to_rgb8();
        std::fs::remove_file(&path).ok();

        assert_eq!(loaded.dimensions(), (3, 2));
        assert_eq!(loaded.get_pixel(2, 1).0, [200, 120, 50]);
    }
}
