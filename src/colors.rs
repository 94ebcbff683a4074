//! Color type and packed ARGB helpers.
//!
//! Colors travel through the pipeline as [`Color`] (four `f32` channels in
//! `[0, 1]`) so they can be interpolated along edges and spans. They are
//! packed into `0xAARRGGBB` words only when written into the frame buffer.

use serde::{Deserialize, Serialize};

use crate::math::vec3::Vec3;

/// An RGBA color with channels nominally in `[0, 1]`.
///
/// Channels are not clamped on construction; clamping happens when the
/// color is packed for the frame buffer.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct Color {
    pub r: f32,
    pub g: f32,
    pub b: f32,
    #[serde(default = "opaque")]
    pub a: f32,
}

fn opaque() -> f32 {
    1.0
}

impl Color {
    pub const BLACK: Color = Color::rgb(0.0, 0.0, 0.0);
    pub const WHITE: Color = Color::rgb(1.0, 1.0, 1.0);
    pub const RED: Color = Color::rgb(1.0, 0.0, 0.0);
    pub const GREEN: Color = Color::rgb(0.0, 1.0, 0.0);
    pub const BLUE: Color = Color::rgb(0.0, 0.0, 1.0);

    pub const fn new(r: f32, g: f32, b: f32, a: f32) -> Self {
        Self { r, g, b, a }
    }

    pub const fn rgb(r: f32, g: f32, b: f32) -> Self {
        Self::new(r, g, b, 1.0)
    }

    /// Builds a color from 8-bit channels.
    pub fn from_rgba8(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self::new(
            r as f32 / 255.0,
            g as f32 / 255.0,
            b as f32 / 255.0,
            a as f32 / 255.0,
        )
    }

    /// Builds an opaque color from an RGB vector (x = red, y = green, z = blue).
    pub fn from_vec3(v: Vec3) -> Self {
        Self::rgb(v.x, v.y, v.z)
    }

    /// RGB channels as a vector, dropping alpha.
    pub fn to_vec3(self) -> Vec3 {
        Vec3::new(self.r, self.g, self.b)
    }

    /// Clamps every channel into `[0, 1]`.
    pub fn clamped(self) -> Self {
        Self::new(
            self.r.clamp(0.0, 1.0),
            self.g.clamp(0.0, 1.0),
            self.b.clamp(0.0, 1.0),
            self.a.clamp(0.0, 1.0),
        )
    }

    /// Clamped 8-bit channels in `[r, g, b, a]` order.
    pub fn to_rgba8(self) -> [u8; 4] {
        let c = self.clamped();
        [
            (c.r * 255.0).round() as u8,
            (c.g * 255.0).round() as u8,
            (c.b * 255.0).round() as u8,
            (c.a * 255.0).round() as u8,
        ]
    }

    /// Packs into a `0xAARRGGBB` word.
    pub fn to_argb(self) -> u32 {
        let [r, g, b, a] = self.to_rgba8();
        u32::from_be_bytes([a, r, g, b])
    }

    /// Unpacks a `0xAARRGGBB` word.
    pub fn from_argb(argb: u32) -> Self {
        let [a, r, g, b] = argb.to_be_bytes();
        Self::from_rgba8(r, g, b, a)
    }

    /// Linear interpolation of all four channels.
    #[inline]
    pub fn lerp(self, other: Color, t: f32) -> Color {
        Color::new(
            self.r + (other.r - self.r) * t,
            self.g + (other.g - self.g) * t,
            self.b + (other.b - self.b) * t,
            self.a + (other.a - self.a) * t,
        )
    }

    /// Per-channel difference `self - other`, used as an interpolation step.
    #[inline]
    pub fn delta(self, other: Color) -> Color {
        Color::new(
            self.r - other.r,
            self.g - other.g,
            self.b - other.b,
            self.a - other.a,
        )
    }

    /// Adds a scaled step to every channel.
    #[inline]
    pub fn step(self, delta: Color, times: f32) -> Color {
        Color::new(
            self.r + delta.r * times,
            self.g + delta.g * times,
            self.b + delta.b * times,
            self.a + delta.a * times,
        )
    }
}

impl Default for Color {
    fn default() -> Self {
        Color::BLUE
    }
}

/// Default background of a cleared frame (white, as in the classic viewer).
pub const BACKGROUND: Color = Color::WHITE;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argb_packing_orders_channels() {
        let c = Color::from_rgba8(0x12, 0x34, 0x56, 0xFF);
        assert_eq!(c.to_argb(), 0xFF123456);
        assert_eq!(Color::from_argb(0xFF123456).to_rgba8(), [0x12, 0x34, 0x56, 0xFF]);
    }

    #[test]
    fn packing_clamps_out_of_range_channels() {
        let c = Color::new(1.7, -0.3, 0.5, 2.0);
        assert_eq!(c.to_rgba8(), [255, 0, 128, 255]);
    }

    #[test]
    fn lerp_interpolates_alpha_too() {
        let a = Color::new(0.0, 0.0, 0.0, 0.0);
        let b = Color::new(1.0, 1.0, 1.0, 1.0);
        assert_eq!(a.lerp(b, 0.25), Color::new(0.25, 0.25, 0.25, 0.25));
    }

    #[test]
    fn step_accumulates_delta() {
        let start = Color::rgb(0.0, 0.5, 1.0);
        let end = Color::rgb(1.0, 0.5, 0.0);
        let d = end.delta(start);
        assert_eq!(start.step(d, 1.0), end);
    }
}
