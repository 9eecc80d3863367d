//! Configuration system
//!
//! Every setting has a default that reproduces the stock demo: a 640x480
//! window, 24 frames per second, an RGB888 / 16-bit depth EGL config and an
//! OpenGL ES 2 context. Files may be TOML or RON, picked by extension.

pub use serde::{Serialize, Deserialize};

/// Configuration trait
pub trait Config: Serialize + for<'de> Deserialize<'de> + Default {
    /// Load configuration from file
    fn load_from_file(path: &str) -> Result<Self, ConfigError> {
        let contents = std::fs::read_to_string(path)?;
        Self::from_str_with_format(&contents, path)
    }

    /// Parse configuration text, using `path` only to pick the format
    fn from_str_with_format(contents: &str, path: &str) -> Result<Self, ConfigError> {
        if path.ends_with(".toml") {
            toml::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else if path.ends_with(".ron") {
            ron::from_str(contents).map_err(|e| ConfigError::Parse(e.to_string()))
        } else {
            Err(ConfigError::UnsupportedFormat(path.to_string()))
        }
    }

    /// Save configuration to file
    fn save_to_file(&self, path: &str) -> Result<(), ConfigError> {
        let contents = if path.ends_with(".toml") {
            toml::to_string_pretty(self).map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else if path.ends_with(".ron") {
            ron::ser::to_string_pretty(self, ron::ser::PrettyConfig::default())
                .map_err(|e| ConfigError::Serialize(e.to_string()))?
        } else {
            return Err(ConfigError::UnsupportedFormat(path.to_string()));
        };

        std::fs::write(path, contents).map_err(ConfigError::Io)
    }
}

/// Configuration errors
#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Parse error
    #[error("Parse error: {0}")]
    Parse(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialize(String),

    /// Unsupported format
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),

    /// A value outside its allowed range
    #[error("Invalid value: {0}")]
    Invalid(String),
}

/// Where the EGL surface is presented
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
    /// An X11 window created through glfw
    #[default]
    Xorg,
    /// The driver's own framebuffer output (embedded boards without X)
    Framebuffer,
}

/// Top level demo configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DemoConfig {
    /// Window settings
    pub window: WindowConfig,
    /// Render loop settings
    pub render: RenderConfig,
    /// EGL surface and context attributes
    pub egl: EglConfig,
}

impl Config for DemoConfig {}

impl DemoConfig {
    /// Check values that would otherwise fail deep inside setup
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.render.frames_per_second == 0 {
            return Err(ConfigError::Invalid("frames_per_second must be positive".to_string()));
        }
        if self.window.width == 0 || self.window.height == 0 {
            return Err(ConfigError::Invalid(format!(
                "window size {}x{} is empty",
                self.window.width, self.window.height
            )));
        }
        if self.egl.client_version < 2 {
            return Err(ConfigError::Invalid(format!(
                "OpenGL ES client version {} has no shader support",
                self.egl.client_version
            )));
        }
        Ok(())
    }
}

/// Window configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    /// Window title
    pub title: String,
    /// Initial width in pixels
    pub width: u32,
    /// Initial height in pixels
    pub height: u32,
    /// Presentation target
    pub target: TargetKind,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            title: "GLES triangle".to_string(),
            width: 640,
            height: 480,
            target: TargetKind::Xorg,
        }
    }
}

/// Render loop configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RenderConfig {
    /// Fixed frame rate of the ticker
    pub frames_per_second: u32,
    /// Background color (RGBA)
    pub clear_color: [f32; 4],
    /// `eglSwapInterval` value; left to the driver when unset
    pub swap_interval: Option<i32>,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            frames_per_second: 24,
            clear_color: [0.0, 0.0, 0.0, 1.0],
            swap_interval: None,
        }
    }
}

/// EGL config and context attributes
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EglConfig {
    /// Red channel bits
    pub red_size: i32,
    /// Green channel bits
    pub green_size: i32,
    /// Blue channel bits
    pub blue_size: i32,
    /// Depth buffer bits
    pub depth_size: i32,
    /// `EGL_CONTEXT_CLIENT_VERSION`
    pub client_version: i32,
}

impl Default for EglConfig {
    fn default() -> Self {
        Self {
            red_size: 8,
            green_size: 8,
            blue_size: 8,
            depth_size: 16,
            client_version: 2,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_match_stock_demo() {
        let config = DemoConfig::default();
        assert_eq!(config.window.width, 640);
        assert_eq!(config.window.height, 480);
        assert_eq!(config.window.target, TargetKind::Xorg);
        assert_eq!(config.render.frames_per_second, 24);
        assert_eq!(config.render.clear_color, [0.0, 0.0, 0.0, 1.0]);
        assert_eq!(config.egl.client_version, 2);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_partial_toml_keeps_defaults() {
        let text = r#"
            [render]
            frames_per_second = 60

            [window]
            target = "framebuffer"
        "#;
        let config = DemoConfig::from_str_with_format(text, "demo.toml").unwrap();
        assert_eq!(config.render.frames_per_second, 60);
        assert_eq!(config.window.target, TargetKind::Framebuffer);
        assert_eq!(config.window.width, 640);
        assert_eq!(config.egl, EglConfig::default());
    }

    #[test]
    fn test_ron_config() {
        let text = "(window: (title: \"ron\", width: 320, height: 240))";
        let config = DemoConfig::from_str_with_format(text, "demo.ron").unwrap();
        assert_eq!(config.window.title, "ron");
        assert_eq!(config.window.width, 320);
        assert_eq!(config.render.frames_per_second, 24);
    }

    #[test]
    fn test_unsupported_extension() {
        let result = DemoConfig::from_str_with_format("", "demo.json");
        assert!(matches!(result, Err(ConfigError::UnsupportedFormat(_))));
    }

    #[test]
    fn test_malformed_toml() {
        let result = DemoConfig::from_str_with_format("[render\nframes", "demo.toml");
        assert!(matches!(result, Err(ConfigError::Parse(_))));
    }

    #[test]
    fn test_validate_rejects_zero_fps() {
        let mut config = DemoConfig::default();
        config.render.frames_per_second = 0;
        assert!(matches!(config.validate(), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn test_validate_rejects_gles1() {
        let mut config = DemoConfig::default();
        config.egl.client_version = 1;
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_save_and_load_toml() {
        let file_name = format!("gles_engine_config_{}.toml", std::process::id());
        let path = std::env::temp_dir().join(file_name);
        let path = path.to_string_lossy().into_owned();

        let mut config = DemoConfig::default();
        config.render.swap_interval = Some(1);
        config.save_to_file(&path).unwrap();

        let loaded = DemoConfig::load_from_file(&path).unwrap();
        let _ = std::fs::remove_file(&path);
        assert_eq!(loaded, config);
    }
}
