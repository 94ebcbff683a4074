//! Light source and Phong material coefficients.

use serde::{Deserialize, Serialize};

use crate::colors::Color;
use crate::math::vec3::Vec3;

/// Upper bound of [`LightSource::intensity`].
pub const MAX_INTENSITY: f32 = 255.0;

/// A point light in world space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LightSource {
    pub position: Vec3,
    pub color: Color,
    /// Brightness in `[0, 255]`.
    pub intensity: f32,
}

impl Default for LightSource {
    fn default() -> Self {
        Self {
            position: Vec3::new(0.0, 0.0, 1000.0),
            color: Color::WHITE,
            intensity: MAX_INTENSITY,
        }
    }
}

impl LightSource {
    /// Creates a light, clamping `intensity` into `[0, 255]`.
    pub fn new(position: Vec3, color: Color, intensity: f32) -> Self {
        Self {
            position,
            color,
            intensity: clamp_intensity(intensity),
        }
    }

    /// Intensity as a `[0, 1]` factor.
    pub fn strength(&self) -> f32 {
        clamp_intensity(self.intensity) / MAX_INTENSITY
    }
}

pub(crate) fn clamp_intensity(intensity: f32) -> f32 {
    if intensity.is_nan() {
        0.0
    } else {
        intensity.clamp(0.0, MAX_INTENSITY)
    }
}

/// Phong reflection coefficients.
///
/// The three coefficient colors weight the ambient, diffuse, and specular
/// terms per RGB channel; each channel is expected in `[0, 1]` and only
/// the RGB part is used.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightModel {
    pub ambient_color: Color,
    pub ambient: Color,
    pub diffuse: Color,
    pub specular: Color,
    /// Specular exponent; larger values give tighter highlights.
    pub sharpness: f32,
}

impl Default for LightModel {
    fn default() -> Self {
        Self {
            ambient_color: Color::WHITE,
            ambient: Color::rgb(0.1, 0.1, 0.1),
            diffuse: Color::rgb(0.3, 0.5, 0.9),
            specular: Color::rgb(0.3, 0.3, 0.3),
            sharpness: 8.0,
        }
    }
}

impl LightModel {
    /// Copy with every coefficient channel clamped into `[0, 1]` and a
    /// non-negative sharpness.
    pub fn sanitized(&self) -> Self {
        Self {
            ambient_color: self.ambient_color.clamped(),
            ambient: self.ambient.clamped(),
            diffuse: self.diffuse.clamped(),
            specular: self.specular.clamped(),
            sharpness: if self.sharpness.is_finite() {
                self.sharpness.max(0.0)
            } else {
                0.0
            },
        }
    }
}
