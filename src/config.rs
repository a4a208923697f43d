use std::path::Path;

use serde::Deserialize;

use crate::{
    camera::OrbitCamera,
    error::{ConfigError, RenderError},
    pixel::Bgra,
    scene::Scene,
    tiles::{partition_count, TileScheduler},
};

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum ScenePreset {
    #[default]
    Showcase,
    Minimal,
}

impl ScenePreset {
    pub fn build(self) -> Scene {
        match self {
            Self::Showcase => Scene::showcase(),
            Self::Minimal => Scene::minimal(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct CameraSettings {
    /// Vertical field of view, degrees.
    pub fov: f32,
    /// Orbit speed, radians per second.
    pub angular_speed: f32,
}

impl Default for CameraSettings {
    fn default() -> Self {
        let cam = OrbitCamera::default();
        Self { fov: cam.fov, angular_speed: cam.angular_speed }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq)]
#[serde(default)]
pub struct RenderSettings {
    pub width: u32,
    pub height: u32,
    /// Rows per tile; ignored when `tiles` is set.
    pub rows_per_tile: u32,
    /// Split the image into this many equal bands instead.
    pub tiles: Option<u32>,
    /// Worker threads; rayon's default when absent.
    pub threads: Option<usize>,
    /// Frames the headless driver renders before exiting.
    pub frames: u32,
    pub scene: ScenePreset,
    pub camera: CameraSettings,
}

impl Default for RenderSettings {
    fn default() -> Self {
        Self {
            width: 640,
            height: 480,
            rows_per_tile: 18,
            tiles: None,
            threads: None,
            frames: 120,
            scene: ScenePreset::default(),
            camera: CameraSettings::default(),
        }
    }
}

impl RenderSettings {
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let data = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        let settings: Self = serde_json::from_str(&data).map_err(|source| ConfigError::Parse {
            path: path.to_path_buf(),
            source,
        })?;
        settings.validate()?;
        Ok(settings)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.width == 0 || self.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "image size must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        let frame_bytes = (self.width as usize)
            .checked_mul(self.height as usize)
            .and_then(|n| n.checked_mul(Bgra::BYTES));
        if frame_bytes.is_none() {
            return Err(ConfigError::Invalid(format!(
                "a {}x{} frame does not fit in memory",
                self.width, self.height
            )));
        }
        if self.rows_per_tile == 0 {
            return Err(ConfigError::Invalid("rows_per_tile must be at least 1".into()));
        }
        if self.tiles == Some(0) {
            return Err(ConfigError::Invalid("tiles must be at least 1".into()));
        }
        if self.threads == Some(0) {
            return Err(ConfigError::Invalid("threads must be at least 1".into()));
        }
        if !(self.camera.fov > 0.0 && self.camera.fov < 180.0) {
            return Err(ConfigError::Invalid(format!("fov must be in (0, 180), got {}", self.camera.fov)));
        }
        Ok(())
    }

    pub fn scheduler(&self) -> Result<TileScheduler, RenderError> {
        match self.tiles {
            Some(count) => TileScheduler::new(self.width, self.height, partition_count(self.height, count)),
            None => TileScheduler::with_rows_per_tile(self.width, self.height, self.rows_per_tile),
        }
    }

    pub fn orbit_camera(&self) -> OrbitCamera {
        OrbitCamera {
            fov: self.camera.fov,
            angular_speed: self.camera.angular_speed,
            ..OrbitCamera::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_reference_layout() {
        let settings = RenderSettings::default();
        settings.validate().unwrap();
        let scheduler = settings.scheduler().unwrap();
        assert_eq!(scheduler.tiles().len(), 27);
        assert_eq!(settings.orbit_camera(), OrbitCamera::default());
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let settings: RenderSettings =
            serde_json::from_str(r#"{ "width": 320, "tiles": 8, "scene": "minimal", "camera": { "fov": 60 } }"#)
                .unwrap();
        assert_eq!(settings.width, 320);
        assert_eq!(settings.height, 480);
        assert_eq!(settings.scene, ScenePreset::Minimal);
        assert_eq!(settings.camera.fov, 60.0);
        assert_eq!(settings.camera.angular_speed, 2.0);
        assert_eq!(settings.scheduler().unwrap().tiles().len(), 8);
    }

    #[test]
    fn test_invalid_settings() {
        let bad = RenderSettings { width: 0, ..RenderSettings::default() };
        assert!(matches!(bad.validate(), Err(ConfigError::Invalid(_))));

        let bad = RenderSettings { tiles: Some(0), ..RenderSettings::default() };
        assert!(matches!(bad.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_frame_byte_count_must_fit() {
        let huge = RenderSettings { width: u32::MAX, height: u32::MAX, ..RenderSettings::default() };
        assert!(matches!(huge.validate(), Err(ConfigError::Invalid(_))));

        let big = RenderSettings { width: 70_000, height: 70_000, frames: 0, ..RenderSettings::default() };
        assert_eq!(big.validate().is_ok(), cfg!(target_pointer_width = "64"));
    }

    #[test]
    fn test_load_missing_file() {
        let err = RenderSettings::load("/definitely/not/here.json").unwrap_err();
        assert!(matches!(err, ConfigError::Io { .. }));
    }

    #[test]
    fn test_load_malformed_file() {
        let path = std::env::temp_dir().join(format!("whitted-config-{}.json", std::process::id()));
        std::fs::write(&path, "{ width: nope }").unwrap();
        let err = RenderSettings::load(&path).unwrap_err();
        std::fs::remove_file(&path).unwrap();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }
}
