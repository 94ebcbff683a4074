//! Orbit-style viewing camera.
//!
//! # Orientation
//!
//! The viewing direction is given by two spherical angles (radians):
//!
//! - **Zenith** (ζ): angle of the view normal from the world +Z axis
//! - **Azimuth** (α): rotation of the view normal around the world Z axis
//!
//! They define an orthonormal camera basis:
//!
//! ```text
//! n = (sin ζ sin α, sin ζ cos α,  cos ζ)
//! u = (cos ζ sin α, cos ζ cos α, -sin ζ)
//! v = n × u
//! ```
//!
//! A world point `p` maps to view space as `((p - position)·u, (p - position)·v,
//! (p - position)·n)`. The camera looks down view-space -Z, so larger view z
//! means nearer to the viewer.
//!
//! # Projection
//!
//! `center_of_projection` selects the projection: `0` is orthographic, any
//! other value is the distance from the image plane to the eye for a
//! perspective projection.

use std::f32::consts::TAU;

use crate::math::mat4::Mat4;
use crate::math::vec3::Vec3;

#[derive(Debug, Clone, PartialEq)]
pub struct Camera {
    position: Vec3,
    zenith: f32,
    azimuth: f32,
    center_of_projection: f32,
    zoom: f32,
}

impl Default for Camera {
    fn default() -> Self {
        Self::new(Vec3::ZERO, 0.0, 0.0, 0.0)
    }
}

impl Camera {
    /// Creates a camera. Angles are in radians and wrapped into `[0, 2π)`.
    pub fn new(position: Vec3, zenith: f32, azimuth: f32, center_of_projection: f32) -> Self {
        Self {
            position,
            zenith: zenith.rem_euclid(TAU),
            azimuth: azimuth.rem_euclid(TAU),
            center_of_projection,
            zoom: 1.0,
        }
    }

    pub fn position(&self) -> Vec3 {
        self.position
    }

    pub fn zenith(&self) -> f32 {
        self.zenith
    }

    pub fn azimuth(&self) -> f32 {
        self.azimuth
    }

    pub fn center_of_projection(&self) -> f32 {
        self.center_of_projection
    }

    pub fn zoom(&self) -> f32 {
        self.zoom
    }

    pub fn is_perspective(&self) -> bool {
        self.center_of_projection != 0.0
    }

    /// Eye position in view space: `(0, 0, d)`, or `None` for orthographic.
    pub fn eye(&self) -> Option<Vec3> {
        self.is_perspective()
            .then(|| Vec3::new(0.0, 0.0, self.center_of_projection))
    }

    /// Replaces position, angles, and projection distance. Zoom is kept.
    pub fn set(&mut self, position: Vec3, zenith: f32, azimuth: f32, center_of_projection: f32) {
        let zoom = self.zoom;
        *self = Self::new(position, zenith, azimuth, center_of_projection);
        self.zoom = zoom;
    }

    /// Adds angle deltas (radians) to zenith and azimuth.
    pub fn rotate(&mut self, d_zenith: f32, d_azimuth: f32) {
        self.zenith = (self.zenith + d_zenith).rem_euclid(TAU);
        self.azimuth = (self.azimuth + d_azimuth).rem_euclid(TAU);
    }

    /// Multiplies the zoom factor.
    ///
    /// Returns `false` and leaves the zoom unchanged when `factor` is not a
    /// positive finite number.
    pub fn scale(&mut self, factor: f32) -> bool {
        if !(factor.is_finite() && factor > 0.0) {
            return false;
        }
        self.zoom *= factor;
        true
    }

    /// The `(u, v, n)` camera basis.
    pub fn basis(&self) -> (Vec3, Vec3, Vec3) {
        let (sin_z, cos_z) = self.zenith.sin_cos();
        let (sin_a, cos_a) = self.azimuth.sin_cos();

        let n = Vec3::new(sin_z * sin_a, sin_z * cos_a, cos_z);
        let u = Vec3::new(cos_z * sin_a, cos_z * cos_a, -sin_z);
        let v = n.cross(u);
        (u, v, n)
    }

    /// World-to-view matrix: translate by `-position`, then project onto the basis.
    pub fn view_matrix(&self) -> Mat4 {
        let (u, v, n) = self.basis();
        Mat4::from_rows(u, v, n)
            * Mat4::translation(-self.position.x, -self.position.y, -self.position.z)
    }
}
