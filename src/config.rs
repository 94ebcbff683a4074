//! JSON render configuration.
//!
//! Every field is optional; missing fields take the defaults below.
//!
//! ```json
//! {
//!     "width": 640,
//!     "height": 480,
//!     "coloring_mode": "filled_by_vertex",
//!     "raster_algorithm": "bresenham",
//!     "camera": { "zenith_deg": 60, "azimuth_deg": 30, "center_of_projection": 900 },
//!     "light": { "position": [300, 300, 800], "intensity": 200 },
//!     "light_model": { "sharpness": 16 }
//! }
//! ```

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::camera::Camera;
use crate::clipper::DEFAULT_MARGIN;
use crate::colors::{self, Color};
use crate::light::{LightModel, LightSource};
use crate::math::vec3::Vec3;
use crate::render::rasterizer::RasterAlgorithm;
use crate::render::renderer::ColoringMode;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("could not read config: {0}")]
    Io(#[from] std::io::Error),

    #[error("invalid config JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("config field `{field}`: {message}")]
    Invalid {
        field: &'static str,
        message: String,
    },
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    pub width: usize,
    pub height: usize,
    /// Inset of the clip rectangle from every image border, in pixels.
    pub margin: usize,
    pub background: Color,
    pub global_color: Color,
    pub coloring_mode: ColoringMode,
    pub raster_algorithm: RasterAlgorithm,
    /// Loaded meshes are scaled so their largest extent spans this fraction
    /// of the smaller viewport side. `0` keeps the original size.
    pub fit_fraction: f32,
    pub camera: CameraConfig,
    pub light: LightConfig,
    pub light_model: LightModel,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            width: 800,
            height: 600,
            margin: DEFAULT_MARGIN,
            background: colors::BACKGROUND,
            global_color: Color::BLUE,
            coloring_mode: ColoringMode::default(),
            raster_algorithm: RasterAlgorithm::default(),
            fit_fraction: 0.8,
            camera: CameraConfig::default(),
            light: LightConfig::default(),
            light_model: LightModel::default(),
        }
    }
}

/// Camera settings; angles are in degrees here and converted on use.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CameraConfig {
    pub position: [f32; 3],
    pub zenith_deg: f32,
    pub azimuth_deg: f32,
    /// `0` for orthographic, otherwise the eye distance for perspective.
    pub center_of_projection: f32,
    pub zoom: f32,
}

impl Default for CameraConfig {
    fn default() -> Self {
        Self {
            position: [0.0; 3],
            zenith_deg: 0.0,
            azimuth_deg: 0.0,
            center_of_projection: 0.0,
            zoom: 1.0,
        }
    }
}

impl CameraConfig {
    pub fn to_camera(&self) -> Camera {
        let mut camera = Camera::new(
            Vec3::from(self.position),
            self.zenith_deg.to_radians(),
            self.azimuth_deg.to_radians(),
            self.center_of_projection,
        );
        camera.scale(self.zoom);
        camera
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LightConfig {
    pub position: [f32; 3],
    pub color: Color,
    pub intensity: f32,
}

impl Default for LightConfig {
    fn default() -> Self {
        let light = LightSource::default();
        Self {
            position: [light.position.x, light.position.y, light.position.z],
            color: light.color,
            intensity: light.intensity,
        }
    }
}

impl LightConfig {
    pub fn to_light(&self) -> LightSource {
        LightSource::new(Vec3::from(self.position), self.color, self.intensity)
    }
}

impl RenderConfig {
    pub fn from_json_str(text: &str) -> Result<Self, ConfigError> {
        let config: RenderConfig = serde_json::from_str(text)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let config = Self::from_json_str(&fs::read_to_string(path)?)?;
        log::info!("loaded render config from {}", path.display());
        Ok(config)
    }

    /// Rejects values no renderer state can represent.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if !(self.fit_fraction.is_finite() && self.fit_fraction >= 0.0) {
            return Err(ConfigError::Invalid {
                field: "fit_fraction",
                message: format!("must be a non-negative number, got {}", self.fit_fraction),
            });
        }
        if !(self.camera.zoom.is_finite() && self.camera.zoom > 0.0) {
            return Err(ConfigError::Invalid {
                field: "camera.zoom",
                message: format!("must be positive, got {}", self.camera.zoom),
            });
        }
        if !self.camera.center_of_projection.is_finite() {
            return Err(ConfigError::Invalid {
                field: "camera.center_of_projection",
                message: "must be finite".to_string(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn empty_object_gives_defaults() {
        let config = RenderConfig::from_json_str("{}").unwrap();
        assert_eq!(config, RenderConfig::default());
    }

    #[test]
    fn partial_config_overrides_named_fields() {
        let config = RenderConfig::from_json_str(
            r#"{
                "width": 320,
                "coloring_mode": "filled_by_side",
                "raster_algorithm": "bresenham",
                "camera": { "zenith_deg": 90, "center_of_projection": 500 },
                "background": { "r": 0, "g": 0, "b": 0 }
            }"#,
        )
        .unwrap();

        assert_eq!(config.width, 320);
        assert_eq!(config.height, 600);
        assert_eq!(config.coloring_mode, ColoringMode::FilledBySide);
        assert_eq!(config.raster_algorithm, RasterAlgorithm::Bresenham);
        assert_eq!(config.background, Color::BLACK);

        let camera = config.camera.to_camera();
        assert_relative_eq!(camera.zenith(), std::f32::consts::FRAC_PI_2, epsilon = 1e-6);
        assert!(camera.is_perspective());
    }

    #[test]
    fn unknown_mode_is_a_json_error() {
        let err = RenderConfig::from_json_str(r#"{ "coloring_mode": "shaded" }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Json(_)));
    }

    #[test]
    fn non_positive_zoom_is_invalid() {
        let err = RenderConfig::from_json_str(r#"{ "camera": { "zoom": 0 } }"#).unwrap_err();
        assert!(matches!(err, ConfigError::Invalid { field: "camera.zoom", .. }));
    }

    #[test]
    fn light_config_clamps_intensity() {
        let light = LightConfig {
            intensity: 1000.0,
            ..LightConfig::default()
        };
        assert_relative_eq!(light.to_light().intensity, 255.0);
    }
}
