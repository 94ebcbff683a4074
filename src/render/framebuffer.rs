//! Color and depth buffers.
//!
//! The [`FrameBuffer`] owns a packed `0xAARRGGBB` color grid and a parallel
//! depth grid of identical dimensions, both row-major.
//!
//! # Depth Buffer
//!
//! Depth is the view-space z of the fragment. Larger values are closer to the
//! camera, so a fragment is written only when its depth is *greater* than the
//! stored value. Clearing resets depth to `f32::NEG_INFINITY`, meaning
//! "nothing drawn yet".

use std::path::Path;

use image::{ImageResult, RgbaImage};

use crate::colors::{self, Color};

#[derive(Debug, Clone)]
pub struct FrameBuffer {
    color_buffer: Vec<u32>,
    depth_buffer: Vec<f32>,
    width: usize,
    height: usize,
    background: u32,
}

impl FrameBuffer {
    pub fn new(width: usize, height: usize) -> Self {
        Self::with_background(width, height, colors::BACKGROUND)
    }

    pub fn with_background(width: usize, height: usize, background: Color) -> Self {
        let background = background.to_argb();
        let size = width * height;
        Self {
            color_buffer: vec![background; size],
            depth_buffer: vec![f32::NEG_INFINITY; size],
            width,
            height,
            background,
        }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn background(&self) -> Color {
        Color::from_argb(self.background)
    }

    /// Sets the clear color. Takes effect on the next [`FrameBuffer::clear`].
    pub fn set_background(&mut self, color: Color) {
        self.background = color.to_argb();
    }

    /// Reallocates both buffers for the new size and clears them.
    pub fn resize(&mut self, width: usize, height: usize) {
        let size = width * height;
        self.color_buffer = vec![self.background; size];
        self.depth_buffer = vec![f32::NEG_INFINITY; size];
        self.width = width;
        self.height = height;
    }

    /// Resets pixels to the background and depth to "nothing drawn yet".
    pub fn clear(&mut self) {
        self.color_buffer.fill(self.background);
        self.depth_buffer.fill(f32::NEG_INFINITY);
    }

    #[inline]
    fn index(&self, x: i32, y: i32) -> Option<usize> {
        if x >= 0 && (x as usize) < self.width && y >= 0 && (y as usize) < self.height {
            Some(y as usize * self.width + x as usize)
        } else {
            None
        }
    }

    /// Set a pixel at (x, y) with depth testing.
    ///
    /// The pixel is only written if `depth` is greater than the stored depth
    /// (nearer wins). Out-of-bounds coordinates and NaN depths are ignored.
    ///
    /// # Arguments
    /// * `x`, `y` - Pixel coordinates
    /// * `depth` - View-space z of the fragment (larger = closer)
    /// * `color` - Packed ARGB color written if the depth test passes
    ///
    /// Returns whether the pixel was written.
    #[inline]
    pub fn set_pixel_with_depth(&mut self, x: i32, y: i32, depth: f32, color: u32) -> bool {
        let Some(idx) = self.index(x, y) else {
            return false;
        };
        if depth > self.depth_buffer[idx] {
            self.depth_buffer[idx] = depth;
            self.color_buffer[idx] = color;
            true
        } else {
            false
        }
    }

    /// Packed color at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn pixel(&self, x: i32, y: i32) -> Option<u32> {
        self.index(x, y).map(|i| self.color_buffer[i])
    }

    /// Stored depth at (x, y), or `None` if out of bounds.
    #[inline]
    pub fn depth(&self, x: i32, y: i32) -> Option<f32> {
        self.index(x, y).map(|i| self.depth_buffer[i])
    }

    /// The packed color buffer, row-major.
    pub fn pixels(&self) -> &[u32] {
        &self.color_buffer
    }

    /// Number of pixels that passed a depth test since the last clear.
    pub fn covered_pixels(&self) -> usize {
        self.depth_buffer
            .iter()
            .filter(|d| **d != f32::NEG_INFINITY)
            .count()
    }

    /// Copies the color buffer into an RGBA image.
    pub fn to_rgba_image(&self) -> RgbaImage {
        let mut raw = Vec::with_capacity(self.color_buffer.len() * 4);
        for &argb in &self.color_buffer {
            let [a, r, g, b] = argb.to_be_bytes();
            raw.extend_from_slice(&[r, g, b, a]);
        }
        RgbaImage::from_raw(self.width as u32, self.height as u32, raw)
            .unwrap_or_else(|| RgbaImage::new(self.width as u32, self.height as u32))
    }

    /// Writes the color buffer to an image file (format from the extension).
    pub fn save_png(&self, path: impl AsRef<Path>) -> ImageResult<()> {
        self.to_rgba_image().save(path)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nearer_fragment_wins_in_either_order() {
        let red = Color::RED.to_argb();
        let green = Color::GREEN.to_argb();

        let mut fb = FrameBuffer::new(4, 4);
        fb.set_pixel_with_depth(1, 1, 5.0, red);
        fb.set_pixel_with_depth(1, 1, -5.0, green);
        assert_eq!(fb.pixel(1, 1), Some(red));

        fb.clear();
        fb.set_pixel_with_depth(1, 1, -5.0, green);
        fb.set_pixel_with_depth(1, 1, 5.0, red);
        assert_eq!(fb.pixel(1, 1), Some(red));
    }

    #[test]
    fn clear_resets_depth_sentinel() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.set_pixel_with_depth(0, 0, 1.0, 0);
        assert_eq!(fb.covered_pixels(), 1);
        fb.clear();
        assert_eq!(fb.depth(0, 0), Some(f32::NEG_INFINITY));
        assert_eq!(fb.pixel(0, 0), Some(colors::BACKGROUND.to_argb()));
        assert_eq!(fb.covered_pixels(), 0);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut fb = FrameBuffer::new(2, 2);
        assert!(!fb.set_pixel_with_depth(-1, 0, 1.0, 0));
        assert!(!fb.set_pixel_with_depth(0, 2, 1.0, 0));
        assert_eq!(fb.pixel(2, 0), None);
    }

    #[test]
    fn resize_reallocates_both_buffers() {
        let mut fb = FrameBuffer::new(2, 2);
        fb.resize(3, 5);
        assert_eq!(fb.pixels().len(), 15);
        assert_eq!(fb.depth(2, 4), Some(f32::NEG_INFINITY));

        fb.resize(0, 5);
        assert!(fb.is_empty());
    }

    #[test]
    fn image_export_keeps_channel_order() {
        let mut fb = FrameBuffer::with_background(1, 1, Color::BLACK);
        fb.set_pixel_with_depth(0, 0, 0.0, Color::from_rgba8(10, 20, 30, 255).to_argb());
        let image = fb.to_rgba_image();
        assert_eq!(image.get_pixel(0, 0).0, [10, 20, 30, 255]);
    }
}
