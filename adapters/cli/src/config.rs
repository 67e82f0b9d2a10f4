use std::{
    fs,
    path::{Path, PathBuf},
    time::Duration,
};

use anyhow::{Context, Result};
use serde::Deserialize;
use unblock_jam_system_auto_advance::DEFAULT_ADVANCE_DELAY;

/// Configuration file consulted when `--config` is not supplied.
pub(crate) const DEFAULT_CONFIG_FILE: &str = "unblock-jam.toml";

const DEFAULT_LEVELS_FILE: &str = "levels.json";
const DEFAULT_SCORES_DIR: &str = ".unblock-jam";

/// Runtime settings merged from the configuration file and command-line flags.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub(crate) struct Settings {
    /// Level definition file.
    pub(crate) levels: PathBuf,
    /// Directory backing the score store.
    pub(crate) scores_dir: PathBuf,
    /// Pause between a win and the next level, in milliseconds.
    pub(crate) advance_delay_ms: u64,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            levels: PathBuf::from(DEFAULT_LEVELS_FILE),
            scores_dir: PathBuf::from(DEFAULT_SCORES_DIR),
            advance_delay_ms: u64::try_from(DEFAULT_ADVANCE_DELAY.as_millis())
                .unwrap_or(u64::MAX),
        }
    }
}

impl Settings {
    /// Loads settings from `explicit`, or from [`DEFAULT_CONFIG_FILE`] when it
    /// exists. An explicitly named file must be readable.
    pub(crate) fn load(explicit: Option<&Path>) -> Result<Self> {
        match explicit {
            Some(path) => Self::from_file(path),
            None => {
                let path = Path::new(DEFAULT_CONFIG_FILE);
                if path.is_file() {
                    Self::from_file(path)
                } else {
                    Ok(Self::default())
                }
            }
        }
    }

    fn from_file(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("failed to read config file {}", path.display()))?;
        let settings = Self::parse(&contents)
            .with_context(|| format!("failed to parse config file {}", path.display()))?;
        tracing::debug!(path = %path.display(), ?settings, "loaded configuration");
        Ok(settings)
    }

    pub(crate) fn parse(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("config is not valid TOML")
    }

    /// Replaces file values with those given on the command line.
    #[must_use]
    pub(crate) fn with_overrides(
        mut self,
        levels: Option<PathBuf>,
        scores_dir: Option<PathBuf>,
        advance_delay_ms: Option<u64>,
    ) -> Self {
        if let Some(levels) = levels {
            self.levels = levels;
        }
        if let Some(scores_dir) = scores_dir {
            self.scores_dir = scores_dir;
        }
        if let Some(delay) = advance_delay_ms {
            self.advance_delay_ms = delay;
        }
        self
    }

    pub(crate) fn advance_delay(&self) -> Duration {
        Duration::from_millis(self.advance_delay_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_keys_fall_back_to_defaults() {
        let settings = Settings::parse("levels = \"puzzles/pack.json\"\n").expect("parse");
        assert_eq!(settings.levels, PathBuf::from("puzzles/pack.json"));
        assert_eq!(settings.scores_dir, PathBuf::from(DEFAULT_SCORES_DIR));
        assert_eq!(settings.advance_delay(), Duration::from_secs(1));
    }

    #[test]
    fn full_file_is_honoured() {
        let settings = Settings::parse(
            "levels = \"a.json\"\nscores_dir = \"/var/lib/jam\"\nadvance_delay_ms = 250\n",
        )
        .expect("parse");
        assert_eq!(
            settings,
            Settings {
                levels: PathBuf::from("a.json"),
                scores_dir: PathBuf::from("/var/lib/jam"),
                advance_delay_ms: 250,
            }
        );
    }

    #[test]
    fn unknown_keys_are_rejected() {
        assert!(Settings::parse("level_file = \"a.json\"\n").is_err());
    }

    #[test]
    fn command_line_overrides_file_values() {
        let settings = Settings::default().with_overrides(
            Some(PathBuf::from("other.json")),
            None,
            Some(0),
        );
        assert_eq!(settings.levels, PathBuf::from("other.json"));
        assert_eq!(settings.scores_dir, PathBuf::from(DEFAULT_SCORES_DIR));
        assert_eq!(settings.advance_delay(), Duration::ZERO);
    }

    #[test]
    fn explicit_config_must_exist() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.toml");
        assert!(Settings::load(Some(missing.as_path())).is_err());

        let present = dir.path().join("present.toml");
        fs::write(&present, "advance_delay_ms = 10\n").expect("write config");
        let settings = Settings::load(Some(present.as_path())).expect("load");
        assert_eq!(settings.advance_delay(), Duration::from_millis(10));
    }
}
