//! Surface configuration schema and loader
//!
//! Configuration is stored as YAML.
//! Default location: ~/.config/kontrol/surface.yaml

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Root surface configuration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurfaceConfig {
    /// Rack the surface edits
    pub rack_id: String,

    /// Module shown after startup
    pub initial_module: String,

    /// Screen endpoint and geometry
    pub screen: ScreenConfig,

    /// Popup and menu timeouts
    pub timing: TimingConfig,

    /// Pot calibration
    pub pots: PotConfig,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            rack_id: "local".to_string(),
            initial_module: "Module 1".to_string(),
            screen: ScreenConfig::default(),
            timing: TimingConfig::default(),
            pots: PotConfig::default(),
        }
    }
}

/// OLED screen host (receives OSC draw commands over UDP)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScreenConfig {
    /// Host running the display process
    pub host: String,

    /// UDP port of the display process
    pub port: u16,

    /// Screen id sent as the first argument of every draw command
    pub screen_id: i32,

    /// Characters per text line
    pub width_chars: usize,
}

impl Default for ScreenConfig {
    fn default() -> Self {
        Self {
            host: "127.0.0.1".to_string(),
            port: 4001,
            screen_id: 3,
            width_chars: 21,
        }
    }
}

/// Timeouts, in poll ticks
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TimingConfig {
    /// How long the page name popup stays up after a page switch
    pub page_switch_ticks: i32,

    /// Menu inactivity timeout before returning to parameter mode
    pub menu_timeout_ticks: i32,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            page_switch_ticks: 5,
            menu_timeout_ticks: 35,
        }
    }
}

/// Pot calibration
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PotConfig {
    /// Raw reading at full clockwise travel
    pub max_raw: f32,
}

impl Default for PotConfig {
    fn default() -> Self {
        Self { max_raw: 1023.0 }
    }
}

/// Get the default surface config file path
///
/// Returns: ~/.config/kontrol/surface.yaml (platform config dir)
pub fn default_surface_config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("kontrol")
        .join("surface.yaml")
}

/// Load surface configuration from a YAML file
///
/// If the file doesn't exist, returns the default config.
/// If the file exists but is invalid, logs a warning and returns the default config.
pub fn load_surface_config(path: &Path) -> SurfaceConfig {
    log::info!("load_surface_config: Loading from {:?}", path);

    if !path.exists() {
        log::info!("load_surface_config: Config file doesn't exist, using defaults");
        return SurfaceConfig::default();
    }

    match std::fs::read_to_string(path) {
        Ok(contents) => match serde_yaml::from_str::<SurfaceConfig>(&contents) {
            Ok(config) => {
                log::info!(
                    "load_surface_config: rack '{}', screen {}:{}",
                    config.rack_id,
                    config.screen.host,
                    config.screen.port
                );
                config
            }
            Err(e) => {
                log::warn!("load_surface_config: Failed to parse config: {}", e);
                SurfaceConfig::default()
            }
        },
        Err(e) => {
            log::warn!("load_surface_config: Failed to read config file: {}", e);
            SurfaceConfig::default()
        }
    }
}

/// Save surface configuration to a YAML file
///
/// Creates parent directories if they don't exist.
pub fn save_surface_config(config: &SurfaceConfig, path: &Path) -> anyhow::Result<()> {
    use anyhow::Context;

    log::info!("save_surface_config: Saving to {:?}", path);

    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config directory: {:?}", parent))?;
    }

    let yaml =
        serde_yaml::to_string(config).context("Failed to serialize surface config to YAML")?;

    std::fs::write(path, yaml)
        .with_context(|| format!("Failed to write surface config file: {:?}", path))?;

    log::info!("save_surface_config: Config saved successfully");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SurfaceConfig::default();
        assert_eq!(config.initial_module, "Module 1");
        assert_eq!(config.screen.port, 4001);
        assert_eq!(config.screen.screen_id, 3);
        assert_eq!(config.screen.width_chars, 21);
        assert_eq!(config.timing.page_switch_ticks, 5);
        assert_eq!(config.timing.menu_timeout_ticks, 35);
        assert_eq!(config.pots.max_raw, 1023.0);
    }

    #[test]
    fn test_yaml_parsing_partial() {
        let yaml = r#"
rack_id: "organelle"
screen:
  port: 4005
timing:
  menu_timeout_ticks: 100
"#;

        let config: SurfaceConfig = serde_yaml::from_str(yaml).unwrap();
        assert_eq!(config.rack_id, "organelle");
        assert_eq!(config.screen.port, 4005);
        // Unspecified fields keep their defaults
        assert_eq!(config.screen.host, "127.0.0.1");
        assert_eq!(config.timing.menu_timeout_ticks, 100);
        assert_eq!(config.timing.page_switch_ticks, 5);
        assert_eq!(config.initial_module, "Module 1");
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let config = load_surface_config(Path::new("/nonexistent/kontrol/surface.yaml"));
        assert_eq!(config, SurfaceConfig::default());
    }

    #[test]
    fn test_invalid_file_gives_defaults() {
        let path = std::env::temp_dir().join(format!("kontrol-bad-{}.yaml", std::process::id()));
        std::fs::write(&path, "screen: [not, a, map]").unwrap();
        assert_eq!(load_surface_config(&path), SurfaceConfig::default());
        let _ = std::fs::remove_file(&path);
    }

    #[test]
    fn test_save_and_reload() {
        let dir = std::env::temp_dir().join(format!("kontrol-cfg-{}", std::process::id()));
        let path = dir.join("nested").join("surface.yaml");

        let mut config = SurfaceConfig::default();
        config.rack_id = "saved".to_string();
        save_surface_config(&config, &path).unwrap();

        assert_eq!(load_surface_config(&path), config);
        let _ = std::fs::remove_dir_all(&dir);
    }
}
