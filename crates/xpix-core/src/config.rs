//! Runtime configuration: watermark and output defaults.
//!
//! Configuration is an explicit value threaded into the stages that need
//! it. It is stored as JSON, by default at
//! `$XDG_CONFIG_HOME/xpix/config.json` or `~/.config/xpix/config.json`.
//!
//! Earlier xpix releases wrote `config.toml`. Those files are not read;
//! run `xpix config init` and copy the values over.

use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{XpixError, XpixResult};

const APP_DIR: &str = "xpix";
const CONFIG_FILE: &str = "config.json";

/// Top-level configuration file.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub watermark: WatermarkConfig,
    pub output: OutputConfig,
}

/// Defaults applied to watermark requests.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WatermarkConfig {
    /// Font size as a fraction of the canvas width.
    pub font_size: f64,
    /// Anchor name used when a request gives none.
    pub position: String,
    /// Opacity used when a request gives none, `[0, 1]`.
    pub opacity: f64,
    /// Text color as `#RRGGBB`.
    pub color: String,
    /// Inset of the text anchor point from the canvas edge, in pixels.
    pub margin: u32,
    /// Inset of an overlay image from the canvas edge, in pixels.
    pub image_margin: u32,
    /// Font file for text watermarks. `None` uses the platform default.
    pub font_path: Option<PathBuf>,
}

impl Default for WatermarkConfig {
    fn default() -> Self {
        Self {
            font_size: 0.01,
            position: "bottom-center".to_string(),
            opacity: 0.7,
            color: "#FFFFFF".to_string(),
            margin: 160,
            image_margin: 20,
            font_path: None,
        }
    }
}

/// Encoded output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// Pick from the output file extension.
    #[default]
    Auto,
    Jpeg,
    Png,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Jpeg => write!(f, "jpeg"),
            Self::Png => write!(f, "png"),
        }
    }
}

/// Encoder settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// JPEG quality, `[1, 100]`.
    pub quality: u8,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            quality: 95,
            format: OutputFormat::Auto,
        }
    }
}

impl Config {
    /// Load configuration.
    ///
    /// With an explicit `path` the file must exist. Without one, the default
    /// location is tried and built-in defaults are used when it is absent.
    pub fn load(path: Option<&Path>) -> XpixResult<Self> {
        match path {
            Some(path) => {
                if !path.exists() {
                    return Err(XpixError::config(format!(
                        "config file not found: {}",
                        path.display()
                    )));
                }
                Self::read(path)
            }
            None => match default_config_path() {
                Some(path) if path.exists() => Self::read(&path),
                _ => {
                    tracing::info!("no config file found, using defaults");
                    Ok(Self::default())
                }
            },
        }
    }

    /// Parse a config file.
    pub fn read(path: &Path) -> XpixResult<Self> {
        let text = fs::read_to_string(path)?;
        let config = Self::from_json(&text)
            .map_err(|e| XpixError::config(format!("{}: {e}", path.display())))?;
        tracing::info!("loaded config from {}", path.display());
        Ok(config)
    }

    pub fn from_json(text: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(text)
    }

    pub fn to_json(&self) -> String {
        // A struct of strings and numbers always serializes.
        serde_json::to_string_pretty(self).unwrap_or_default()
    }

    /// Write this configuration as pretty JSON, creating parent directories.
    pub fn save(&self, path: &Path) -> XpixResult<()> {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        fs::write(path, self.to_json())?;
        tracing::info!("wrote config to {}", path.display());
        Ok(())
    }
}

/// Default config location, or `None` when no home directory is known.
pub fn default_config_path() -> Option<PathBuf> {
    config_path_from(
        std::env::var_os("XDG_CONFIG_HOME").map(PathBuf::from),
        std::env::var_os("HOME").map(PathBuf::from),
    )
}

fn config_path_from(xdg_config_home: Option<PathBuf>, home: Option<PathBuf>) -> Option<PathBuf> {
    let base = match xdg_config_home.filter(|p| !p.as_os_str().is_empty()) {
        Some(xdg) => xdg,
        None => home?.join(".config"),
    };
    Some(base.join(APP_DIR).join(CONFIG_FILE))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_path(name: &str) -> PathBuf {
        std::env::temp_dir()
            .join(format!("xpix-config-test-{}", std::process::id()))
            .join(name)
    }

    #[test]
    fn test_defaults_match_reference_values() {
        let config = Config::default();
        assert_eq!(config.watermark.font_size, 0.01);
        assert_eq!(config.watermark.position, "bottom-center");
        assert_eq!(config.watermark.opacity, 0.7);
        assert_eq!(config.watermark.color, "#FFFFFF");
        assert_eq!(config.watermark.margin, 160);
        assert_eq!(config.output.quality, 95);
        assert_eq!(config.output.format, OutputFormat::Auto);
    }

    #[test]
    fn test_partial_file_keeps_defaults() {
        let json = r#"{ "watermark": { "opacity": 0.3 }, "output": { "format": "png" } }"#;
        let config = Config::from_json(json).unwrap();
        assert_eq!(config.watermark.opacity, 0.3);
        assert_eq!(config.watermark.margin, 160);
        assert_eq!(config.output.format, OutputFormat::Png);
        assert_eq!(config.output.quality, 95);
    }

    #[test]
    fn test_json_round_trip() {
        let mut config = Config::default();
        config.watermark.font_path = Some(PathBuf::from("/fonts/mono.ttf"));
        config.output.format = OutputFormat::Jpeg;
        assert_eq!(Config::from_json(&config.to_json()).unwrap(), config);
    }

    #[test]
    fn test_save_then_load() {
        let path = temp_path("save_then_load/config.json");
        let mut config = Config::default();
        config.watermark.color = "#000000".into();
        config.save(&path).unwrap();

        let loaded = Config::load(Some(&path)).unwrap();
        assert_eq!(loaded, config);
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_explicit_missing_file_is_an_error() {
        let err = Config::load(Some(&temp_path("does-not-exist.json"))).unwrap_err();
        assert!(matches!(err, XpixError::Config(_)));
    }

    #[test]
    fn test_malformed_file_is_a_config_error() {
        let path = temp_path("malformed/config.json");
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(&path, "{ not json").unwrap();
        let err = Config::read(&path).unwrap_err();
        assert!(matches!(err, XpixError::Config(_)));
        let _ = fs::remove_dir_all(path.parent().unwrap());
    }

    #[test]
    fn test_toml_text_is_a_parse_error() {
        let toml = "[watermark]\nopacity = 0.3\n";
        assert!(Config::from_json(toml).is_err());
        assert!(CONFIG_FILE.ends_with(".json"));
    }

    #[test]
    fn test_config_path_prefers_xdg() {
        let path = config_path_from(Some("/xdg".into()), Some("/home/u".into())).unwrap();
        assert_eq!(path, PathBuf::from("/xdg/xpix/config.json"));

        let path = config_path_from(None, Some("/home/u".into())).unwrap();
        assert_eq!(path, PathBuf::from("/home/u/.config/xpix/config.json"));

        let path = config_path_from(Some("".into()), Some("/home/u".into())).unwrap();
        assert_eq!(path, PathBuf::from("/home/u/.config/xpix/config.json"));

        assert!(config_path_from(None, None).is_none());
    }
}
