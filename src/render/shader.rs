//! Phong illumination.
//!
//! Colors are evaluated in view space, before projection:
//!
//! ```text
//! ambient  = ka ⊙ ambient_color
//! diffuse  = max(0, N·L) · s · light_color ⊙ kd
//! specular = max(0, R·V)^sharpness · s · light_color ⊙ ks      (0 when N·L <= 0)
//! ```
//!
//! where `s = intensity / 255`, `L` points from the surface to the light,
//! `R` is `L` reflected about `N`, and `V` points from the surface to the eye.
//! The eye sits at `(0, 0, d)` under perspective; orthographic views use the
//! constant direction `(0, 0, 1)`.

use crate::camera::Camera;
use crate::colors::Color;
use crate::light::{LightModel, LightSource};
use crate::math::vec3::Vec3;

#[derive(Debug, Clone, Copy)]
pub struct PhongShader {
    /// Light position in view space.
    light_position: Vec3,
    /// Light color scaled by its strength.
    light: Vec3,
    eye: Option<Vec3>,
    model: LightModel,
}

impl PhongShader {
    /// Prepares a shader for one frame, moving the light into view space.
    pub fn new(light: &LightSource, model: &LightModel, camera: &Camera) -> Self {
        Self {
            light_position: camera.view_matrix() * light.position,
            light: light.color.to_vec3() * light.strength(),
            eye: camera.eye(),
            model: model.sanitized(),
        }
    }

    pub fn light_position(&self) -> Vec3 {
        self.light_position
    }

    /// Shades a view-space point with the given surface normal.
    ///
    /// Every channel of the result is clamped to `[0, 1]`.
    pub fn shade(&self, point: Vec3, normal: Vec3) -> Color {
        let model = &self.model;
        let ambient = model.ambient.to_vec3().component_mul(model.ambient_color.to_vec3());

        let n = normal.normalize();
        let l = (self.light_position - point).normalize();
        let n_dot_l = n.dot(l);

        let mut total = ambient;
        if n_dot_l > 0.0 {
            total += self.light.component_mul(model.diffuse.to_vec3()) * n_dot_l;

            let view_dir = match self.eye {
                Some(eye) => (eye - point).normalize(),
                None => Vec3::FORWARD,
            };
            let reflected = n * (2.0 * n_dot_l) - l;
            let r_dot_v = reflected.dot(view_dir).max(0.0);
            if r_dot_v > 0.0 {
                total += self.light.component_mul(model.specular.to_vec3())
                    * r_dot_v.powf(model.sharpness);
            }
        }

        Color::from_vec3(total).clamped()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    fn plain_model() -> LightModel {
        LightModel {
            ambient_color: Color::WHITE,
            ambient: Color::rgb(0.1, 0.1, 0.1),
            diffuse: Color::rgb(0.5, 0.5, 0.5),
            specular: Color::rgb(0.4, 0.4, 0.4),
            sharpness: 4.0,
        }
    }

    fn head_on_light() -> LightSource {
        LightSource::new(Vec3::new(0.0, 0.0, 100.0), Color::WHITE, 255.0)
    }

    #[test]
    fn head_on_light_gives_full_terms() {
        let shader = PhongShader::new(&head_on_light(), &plain_model(), &Camera::default());
        let c = shader.shade(Vec3::ZERO, Vec3::FORWARD);
        // 0.1 ambient + 0.5 diffuse + 0.4 specular (R == V)
        assert_relative_eq!(c.r, 1.0, epsilon = 1e-5);
        assert_relative_eq!(c.b, 1.0, epsilon = 1e-5);
    }

    #[test]
    fn back_facing_surface_gets_ambient_only() {
        let shader = PhongShader::new(&head_on_light(), &plain_model(), &Camera::default());
        let c = shader.shade(Vec3::ZERO, -Vec3::FORWARD);
        assert_relative_eq!(c.g, 0.1, epsilon = 1e-6);
    }

    #[test]
    fn intensity_scales_diffuse_and_specular() {
        let light = LightSource::new(Vec3::new(0.0, 0.0, 100.0), Color::WHITE, 127.5);
        let shader = PhongShader::new(&light, &plain_model(), &Camera::default());
        let c = shader.shade(Vec3::ZERO, Vec3::FORWARD);
        assert_relative_eq!(c.r, 0.1 + 0.25 + 0.2, epsilon = 1e-5);
    }

    #[test]
    fn grazing_light_has_no_diffuse() {
        let light = LightSource::new(Vec3::new(100.0, 0.0, 0.0), Color::WHITE, 255.0);
        let shader = PhongShader::new(&light, &plain_model(), &Camera::default());
        let c = shader.shade(Vec3::ZERO, Vec3::FORWARD);
        assert_relative_eq!(c.r, 0.1, epsilon = 1e-5);
    }

    #[test]
    fn light_color_tints_result() {
        let light = LightSource::new(Vec3::new(0.0, 0.0, 100.0), Color::RED, 255.0);
        let shader = PhongShader::new(&light, &plain_model(), &Camera::default());
        let c = shader.shade(Vec3::ZERO, Vec3::FORWARD);
        assert_relative_eq!(c.g, 0.1, epsilon = 1e-5);
        assert!(c.r > 0.9);
    }

    #[test]
    fn light_is_moved_into_view_space() {
        let camera = Camera::new(Vec3::new(0.0, 0.0, 10.0), 0.0, 0.0, 0.0);
        let shader = PhongShader::new(&head_on_light(), &plain_model(), &camera);
        assert_relative_eq!(shader.light_position().z, 90.0, epsilon = 1e-5);
    }
}
