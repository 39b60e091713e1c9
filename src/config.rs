use std::path::{Path, PathBuf};

/// Session settings. Every key is optional in the TOML file.
///
/// ```toml
/// input = "game_input.csv"
/// output = "game_output.csv"
/// seed = 42
/// ```
#[derive(Clone, Debug, PartialEq, serde::Deserialize)]
pub struct Config {
    /// Starting grid (CSV). Missing or malformed files start from an empty grid.
    #[serde(default = "defaults::input")]
    pub input: PathBuf,
    /// Transition log (CSV), truncated at startup.
    #[serde(default = "defaults::output")]
    pub output: PathBuf,
    /// Seed for tile spawning. Fixed per session.
    #[serde(default = "defaults::seed")]
    pub seed: u64,
}

impl Default for Config {
    fn default() -> Self {
        Self { input: defaults::input(), output: defaults::output(), seed: defaults::seed() }
    }
}

#[derive(thiserror::Error, Debug)]
pub enum ConfigError {
    #[error("cannot read {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid config: {0}")]
    Parse(#[from] toml::de::Error),
}

impl Config {
    pub fn from_toml<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path)
            .map_err(|source| ConfigError::Read { path: path.to_path_buf(), source })?;
        Self::from_toml_str(&contents)
    }

    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }
}

mod defaults {
    use std::path::PathBuf;

    pub fn input() -> PathBuf { PathBuf::from("game_input.csv") }
    pub fn output() -> PathBuf { PathBuf::from("game_output.csv") }
    pub fn seed() -> u64 { crate::controller::DEFAULT_SEED }
}
