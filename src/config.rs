//! Application configuration.
//!
//! Settings live in `$HOME/.scrollscrub/config.json`. Every field is optional
//! in the file; anything missing falls back to [`Config::default`].

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::error::{PlaybackError, PlaybackResult};

/// Env variable that overrides the configured video path.
pub const VIDEO_ENV: &str = "SCROLLSCRUB_VIDEO";

/// Frame rate assumed until the source reports something better.
pub const DEFAULT_FRAME_RATE: f64 = 30.0;

/// How scroll progress is derived when the text panel is no taller than the
/// viewport (`max_scroll <= 0`).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DegenerateRange {
    /// Plain float division followed by the clamp. `0 / 0` yields NaN and
    /// produces no seek; a positive offset over zero yields the end.
    #[default]
    Float,
    /// Progress is pinned to 1.
    End,
}

/// Flags applied to the playback source when it is opened.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourceFlags {
    pub muted: bool,
    pub autoplay: bool,
    /// Render the video beside the text panel instead of behind it.
    pub plays_inline: bool,
}

impl Default for SourceFlags {
    fn default() -> Self {
        SourceFlags {
            muted: true,
            autoplay: true,
            plays_inline: true,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub title: String,
    pub default_frame_rate: f64,
    pub degenerate_range: DegenerateRange,
    pub source: SourceFlags,
    pub video: Option<PathBuf>,
    /// Replaces the built-in narrative when non-empty.
    pub paragraphs: Vec<String>,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            title: "Scrollscrub".to_string(),
            default_frame_rate: DEFAULT_FRAME_RATE,
            degenerate_range: DegenerateRange::default(),
            source: SourceFlags::default(),
            video: None,
            paragraphs: Vec::new(),
        }
    }
}

impl Config {
    /// Load the config file, then apply the env variable and CLI overrides.
    pub fn load() -> Self {
        let mut config = match get_config_path() {
            Some(path) => match Config::from_file(&path) {
                Ok(Some(config)) => {
                    log::info!("Loaded config from {}", path.display());
                    config
                }
                Ok(None) => Config::default(),
                Err(e) => {
                    log::warn!("Ignoring config {}: {}", path.display(), e);
                    Config::default()
                }
            },
            None => Config::default(),
        };

        let env_video = std::env::var_os(VIDEO_ENV).map(PathBuf::from);
        let arg_video = std::env::args_os().nth(1).map(PathBuf::from);
        config.apply_overrides(env_video, arg_video);
        config
    }

    /// Read a config file. A missing file is `Ok(None)`.
    pub fn from_file(path: &Path) -> PlaybackResult<Option<Self>> {
        let content = match std::fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(PlaybackError::config(e.to_string())),
        };
        let config: Config =
            serde_json::from_str(&content).map_err(|e| PlaybackError::config(e.to_string()))?;
        config.validate()?;
        Ok(Some(config))
    }

    /// CLI argument wins over the env variable, which wins over the file.
    pub fn apply_overrides(&mut self, env_video: Option<PathBuf>, arg_video: Option<PathBuf>) {
        if let Some(path) = arg_video.or(env_video) {
            self.video = Some(path);
        }
    }

    fn validate(&self) -> PlaybackResult<()> {
        if !(self.default_frame_rate.is_finite() && self.default_frame_rate > 0.0) {
            return Err(PlaybackError::config(format!(
                "default_frame_rate must be a positive number, got {}",
                self.default_frame_rate
            )));
        }
        Ok(())
    }
}

/// Get the path to the config file.
fn get_config_path() -> Option<PathBuf> {
    std::env::var("HOME")
        .ok()
        .map(|home| PathBuf::from(home).join(".scrollscrub").join("config.json"))
}
