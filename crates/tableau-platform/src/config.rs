use std::path::Path;
use std::time::Duration;

use anyhow::Context;
use serde::{Deserialize, Serialize};
use tableau_core::{Size, Style, SurfaceSpec};

/// User-editable settings, persisted as TOML.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    /// Output device index.
    pub display: u32,
    pub caption: String,
    /// Frame cap; 0 runs uncapped.
    pub fps: u32,
    /// Draw the per-phase timing overlay.
    pub show_timings: bool,
    pub size: Size,
    pub style: Style,
}

impl Default for AppConfig {
    fn default() -> Self {
        let surface = SurfaceSpec::default();
        Self {
            display: surface.display,
            caption: surface.caption,
            fps: 60,
            show_timings: true,
            size: surface.size,
            style: Style::default(),
        }
    }
}

impl AppConfig {
    /// Reads `path`. A missing or unreadable file gives the defaults.
    pub fn load(path: &Path) -> Self {
        let text = match std::fs::read_to_string(path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("no settings at {}; using defaults", path.display());
                return Self::default();
            }
            Err(e) => {
                log::warn!("can't read settings {}: {e}; using defaults", path.display());
                return Self::default();
            }
        };
        match toml::from_str(&text) {
            Ok(config) => config,
            Err(e) => {
                log::warn!("bad settings file {}: {e}; using defaults", path.display());
                Self::default()
            }
        }
    }

    pub fn save(&self, path: &Path) -> anyhow::Result<()> {
        let text = toml::to_string_pretty(self).context("serialising settings")?;
        if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
            std::fs::create_dir_all(dir)
                .with_context(|| format!("creating {}", dir.display()))?;
        }
        std::fs::write(path, text).with_context(|| format!("writing {}", path.display()))?;
        log::debug!("settings saved to {}", path.display());
        Ok(())
    }

    pub fn surface(&self) -> SurfaceSpec {
        SurfaceSpec {
            size: self.size,
            display: self.display,
            caption: self.caption.clone(),
        }
    }

    /// Minimum wall time per frame, if capped.
    pub fn frame_budget(&self) -> Option<Duration> {
        (self.fps > 0).then(|| Duration::from_secs(1) / self.fps)
    }
}

#[cfg(test)]
mod tests {
    use std::path::PathBuf;

    use super::*;

    fn scratch(name: &str) -> PathBuf {
        std::env::temp_dir().join(format!("tableau-{}-{name}.toml", std::process::id()))
    }

    #[test]
    fn test_missing_file_gives_defaults() {
        let path = scratch("missing");
        let _ = std::fs::remove_file(&path);
        assert_eq!(AppConfig::load(&path), AppConfig::default());
    }

    #[test]
    fn test_unparsable_file_gives_defaults() {
        let path = scratch("garbage");
        std::fs::write(&path, "fps = [[[").unwrap();
        assert_eq!(AppConfig::load(&path), AppConfig::default());
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let path = scratch("partial");
        std::fs::write(&path, "fps = 30\n\n[style]\nfade_time_ms = 400\n").unwrap();
        let config = AppConfig::load(&path);
        std::fs::remove_file(&path).unwrap();

        assert_eq!(config.fps, 30);
        assert_eq!(config.style.fade_time_ms, 400);
        assert_eq!(config.style.padding.button, 3);
        assert_eq!(config.size, Size::new(1600, 900));
    }

    #[test]
    fn test_save_then_load() {
        let path = scratch("saved");
        let config = AppConfig {
            caption: "saved".into(),
            show_timings: false,
            ..Default::default()
        };
        config.save(&path).unwrap();
        assert_eq!(AppConfig::load(&path), config);
        std::fs::remove_file(&path).unwrap();
    }

    #[test]
    fn test_frame_budget() {
        let config = AppConfig {
            fps: 50,
            ..Default::default()
        };
        assert_eq!(config.frame_budget(), Some(Duration::from_millis(20)));
        let uncapped = AppConfig {
            fps: 0,
            ..Default::default()
        };
        assert_eq!(uncapped.frame_budget(), None);
    }
}
