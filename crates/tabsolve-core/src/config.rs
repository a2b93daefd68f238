//! User configuration loaded from `config.toml`.
//!
//! Configuration problems never fail a run: anything unusable is reported as
//! a warning and the affected setting falls back to its default.

use directories::ProjectDirs;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tabsolve_engine::engine::{DEFAULT_MARKER, Operator};

const MAX_CONFIG_FILE_BYTES: u64 = 1_048_576; // 1 MiB
const MAX_DECIMAL_PLACES: usize = 15;

/// Settings shared by the document model and the renderer.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct Config {
    /// Character that introduces a formula.
    pub marker: char,
    /// Precision used when displaying non-integral numbers.
    pub decimal_places: usize,
    /// Colour terminal output.
    pub color: bool,
    /// Cell separator in table files.
    pub delimiter: char,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            marker: DEFAULT_MARKER,
            decimal_places: 3,
            color: true,
            delimiter: '|',
        }
    }
}

impl Config {
    /// Parse configuration text, then reset any setting that cannot work.
    pub fn from_toml_str(content: &str) -> Result<(Config, Vec<String>), toml::de::Error> {
        let mut config: Config = toml::from_str(content)?;
        let warnings = config.sanitize();
        Ok((config, warnings))
    }

    fn sanitize(&mut self) -> Vec<String> {
        let defaults = Config::default();
        let mut warnings = Vec::new();

        if !is_usable_marker(self.marker) {
            warnings.push(format!(
                "Unusable formula marker '{}'; using '{}'",
                self.marker, defaults.marker
            ));
            self.marker = defaults.marker;
        }

        if self.delimiter.is_alphanumeric()
            || self.delimiter.is_whitespace()
            || Operator::is_operator_char(self.delimiter)
        {
            warnings.push(format!(
                "Unusable delimiter '{}'; using '{}'",
                self.delimiter, defaults.delimiter
            ));
            self.delimiter = defaults.delimiter;
        }

        // The defaults never collide, so resetting one side always separates them.
        if self.marker == self.delimiter {
            if self.delimiter != defaults.delimiter {
                warnings.push(format!(
                    "Delimiter '{}' is also the formula marker; using '{}'",
                    self.delimiter, defaults.delimiter
                ));
                self.delimiter = defaults.delimiter;
            } else {
                warnings.push(format!(
                    "Formula marker '{}' is also the delimiter; using '{}'",
                    self.marker, defaults.marker
                ));
                self.marker = defaults.marker;
            }
        }

        if self.decimal_places > MAX_DECIMAL_PLACES {
            warnings.push(format!(
                "decimal_places {} is too large (max {})",
                self.decimal_places, MAX_DECIMAL_PLACES
            ));
            self.decimal_places = MAX_DECIMAL_PLACES;
        }

        warnings
    }
}

fn is_usable_marker(c: char) -> bool {
    !(c.is_alphanumeric()
        || c.is_whitespace()
        || c == '.'
        || c == '#'
        || Operator::is_operator_char(c))
}

/// Load the configuration from `config_file`, or from the user config
/// directory when no file is given. Returns the config and any warnings.
pub fn load_config(config_file: Option<&Path>) -> (Config, Vec<String>) {
    let mut warnings: Vec<String> = Vec::new();
    let config_path = config_file.map(Path::to_path_buf).or_else(user_config_path);

    let Some(path) = config_path else {
        return (Config::default(), warnings);
    };

    if !path.exists() {
        if config_file.is_some() {
            warnings.push(format!("Config file not found: {}", path.display()));
        }
        return (Config::default(), warnings);
    }

    let content = match std::fs::metadata(&path) {
        Ok(meta) if meta.len() > MAX_CONFIG_FILE_BYTES => {
            warnings.push(format!(
                "Refusing to read {}: file too large ({} bytes, max {})",
                path.display(),
                meta.len(),
                MAX_CONFIG_FILE_BYTES
            ));
            return (Config::default(), warnings);
        }
        Ok(_) => match std::fs::read_to_string(&path) {
            Ok(content) => content,
            Err(err) => {
                warnings.push(format!("Failed to read {}: {}", path.display(), err));
                return (Config::default(), warnings);
            }
        },
        Err(err) => {
            warnings.push(format!(
                "Failed to read metadata for {}: {}",
                path.display(),
                err
            ));
            return (Config::default(), warnings);
        }
    };

    match Config::from_toml_str(&content) {
        Ok((config, mut extra)) => {
            log::debug!("loaded config from {}", path.display());
            warnings.append(&mut extra);
            (config, warnings)
        }
        Err(err) => {
            warnings.push(format!("Failed to parse {}: {}", path.display(), err));
            (Config::default(), warnings)
        }
    }
}

fn user_config_path() -> Option<PathBuf> {
    let proj = ProjectDirs::from("", "", "tabsolve")?;
    let mut path = proj.config_dir().to_path_buf();
    path.push("config.toml");
    Some(path)
}
