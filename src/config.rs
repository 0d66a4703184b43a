use serde::{Deserialize, Serialize};

use crate::types::TerminalContract;

fn default_fps() -> u32 {
    24
}
fn default_width() -> u16 {
    96
}
fn default_height() -> u16 {
    30
}

/// Output shape for rendered scenes. None of these values change what a scene does,
/// only how densely it is sampled and how large the cell grid is.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderConfig {
    #[serde(default = "default_fps")]
    pub fps: u32,
    #[serde(default = "default_width")]
    pub width: u16,
    #[serde(default = "default_height")]
    pub height: u16,
}

impl Default for RenderConfig {
    fn default() -> Self {
        RenderConfig {
            fps: default_fps(),
            width: default_width(),
            height: default_height(),
        }
    }
}

impl RenderConfig {
    pub fn load() -> Self {
        let config_path = Self::config_path();
        match std::fs::read_to_string(&config_path) {
            Ok(json) => match serde_json::from_str::<RenderConfig>(&json) {
                Ok(config) => match config.validate() {
                    Ok(()) => config,
                    Err(e) => {
                        tracing::warn!(path = %config_path.display(), "invalid render config ({e}), using defaults");
                        Self::default()
                    }
                },
                Err(e) => {
                    tracing::warn!(path = %config_path.display(), "unparseable render config ({e}), using defaults");
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    pub fn contract(&self) -> TerminalContract {
        TerminalContract {
            width: self.width,
            height: self.height,
        }
    }

    pub fn validate(&self) -> anyhow::Result<()> {
        if self.fps == 0 {
            anyhow::bail!("fps must be > 0");
        }
        if self.width < 20 || self.height < 10 {
            anyhow::bail!(
                "grid must be at least 20x10 cells, got {}x{}",
                self.width,
                self.height
            );
        }
        Ok(())
    }

    fn config_path() -> std::path::PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = std::path::PathBuf::from(home);
        path.push(".config");
        path.push("distance-scenes");
        path.push("render.json");
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn partial_json_fills_defaults() {
        let config: RenderConfig = serde_json::from_str(r#"{"fps": 12}"#).unwrap();
        assert_eq!(config.fps, 12);
        assert_eq!(config.width, 96);
        assert_eq!(config.height, 30);
    }

    #[test]
    fn validate_rejects_zero_fps_and_tiny_grids() {
        let mut config = RenderConfig::default();
        assert!(config.validate().is_ok());
        config.fps = 0;
        assert!(config.validate().is_err());
        config.fps = 24;
        config.width = 10;
        assert!(config.validate().is_err());
    }
}
