use crate::assets::Assets;
use caustic_gl as cgl;
use caustic_math::*;
use prelude_plus::*;
use serde::{Deserialize, Serialize};

pub const CONFIG_FILE_PATH: &str = "config.json";

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(default)]
pub struct DemoConfig {
  pub window_size: Vec2u32,
  pub vsync: bool,
  pub context: cgl::ContextConfig,
  /// Vertical field of view in degrees.
  pub fov: f32,
  pub clear_color: Colorf,
  /// Relative to the assets directory. A checkerboard is generated when unset.
  pub texture_path: Option<String>,
  pub texture: cgl::TextureConfig,
  pub frame_time_window: usize,
  /// Seconds between frame time reports. Zero turns them off.
  pub frame_time_log_interval: f32,
}

impl Default for DemoConfig {
  fn default() -> Self {
    Self {
      window_size: vec2(800, 600),
      vsync: true,
      context: cgl::ContextConfig::default(),
      fov: 60.0,
      clear_color: colorn(0.1, 1.0),
      texture_path: None,
      texture: cgl::TextureConfig {
        min_filter: cgl::FilterMode::LinearMipmapLinear,
        ..Default::default()
      },
      frame_time_window: 60,
      frame_time_log_interval: 5.0,
    }
  }
}

impl DemoConfig {
  pub fn parse(json: &str) -> AnyResult<Self> {
    let config: Self = serde_json::from_str(json).context("Failed to parse the config")?;
    config.validate()?;
    Ok(config)
  }

  pub fn validate(&self) -> AnyResult<()> {
    ensure!(self.window_size.x > 0 && self.window_size.y > 0, "The window size can't be zero");
    ensure!(self.fov > 0.0 && self.fov < 180.0, "The field of view must be within (0; 180) degrees");
    ensure!(self.frame_time_log_interval >= 0.0, "The frame time log interval can't be negative");
    Ok(())
  }

  /// Reads the config from the assets directory, falling back to the
  /// defaults if there is no config file.
  pub fn load(assets: &Assets) -> AnyResult<Self> {
    if !assets.exists(CONFIG_FILE_PATH) {
      info!("No '{}' found, using the default config", CONFIG_FILE_PATH);
      return Ok(Self::default());
    }
    let json = assets.read_text_file(CONFIG_FILE_PATH)?;
    Self::parse(&json).with_context(|| format!("Invalid config in '{}'", CONFIG_FILE_PATH))
  }

  pub fn frame_time_log_interval(&self) -> Option<Duration> {
    if self.frame_time_log_interval > 0.0 {
      Some(Duration::from_secs_f32(self.frame_time_log_interval))
    } else {
      None
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn empty_object_gives_defaults() {
    assert_eq!(DemoConfig::parse("{}").unwrap(), DemoConfig::default());
  }

  #[test]
  fn partial_config_keeps_other_defaults() {
    let config = DemoConfig::parse(
      r#"{
        "window_size": { "x": 1280, "y": 720 },
        "context": { "api_version": "gl20" },
        "texture_path": "textures/crate.png",
        "texture": { "mag_filter": "Nearest" }
      }"#,
    )
    .unwrap();

    assert_eq!(config.window_size, vec2(1280, 720));
    assert_eq!(config.context.api_version, Some(cgl::GlApiVersion::Gl20));
    assert_eq!(config.texture_path.as_deref(), Some("textures/crate.png"));
    assert_eq!(config.texture.mag_filter, cgl::FilterMode::Nearest);
    assert_eq!(config.texture.wrap_s, cgl::WrapMode::Repeat);
    assert_eq!(config.fov, DemoConfig::default().fov);
  }

  #[test]
  fn rejects_bad_values() {
    assert!(DemoConfig::parse(r#"{ "fov": 0.0 }"#).is_err());
    assert!(DemoConfig::parse(r#"{ "window_size": { "x": 0, "y": 10 } }"#).is_err());
    assert!(DemoConfig::parse(r#"{ "frame_time_log_interval": -1.0 }"#).is_err());
    assert!(DemoConfig::parse("[]").is_err());
  }

  #[test]
  fn zero_interval_disables_reports() {
    let config = DemoConfig { frame_time_log_interval: 0.0, ..Default::default() };
    assert_eq!(config.frame_time_log_interval(), None);
    assert_eq!(DemoConfig::default().frame_time_log_interval(), Some(Duration::from_secs(5)));
  }
}
