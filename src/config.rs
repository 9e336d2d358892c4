use std::fs;
use std::path::{Path, PathBuf};

use cross_xdg::BaseDirs;
use nu_ansi_term::Color;
use serde::Deserialize;

use crate::eval::MAX_RECURSION_DEPTH;
use crate::theme::catppuccin::Mocha;

/// Errors raised while loading `bf.toml`.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config {}: {source}", .path.display())]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse config {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: toml::de::Error,
    },

    #[error("invalid config: {0}")]
    Invalid(String),
}

/// User configuration (`bf.toml`). Missing fields keep their defaults.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Config {
    pub run: RunConfig,
    pub colors: ColorConfig,
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct RunConfig {
    /// Loop-nesting ceiling applied during evaluation.
    pub max_depth: usize,
    /// Print "(Finished execution)" after a successful run.
    pub finished_notice: bool,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            max_depth: MAX_RECURSION_DEPTH,
            finished_notice: true,
        }
    }
}

/// Colors as written in the file: a name like `"red"` or `"#RRGGBB"`.
#[derive(Debug, Clone, Default, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColorConfig {
    pub error: Option<String>,
    pub notice: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Colors {
    pub error: Color,
    pub notice: Color,
}

impl Default for Colors {
    fn default() -> Self {
        Self {
            error: Mocha::RED,
            notice: Mocha::MAUVE,
        }
    }
}

impl Config {
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.run.max_depth == 0 {
            return Err(ConfigError::Invalid("run.max_depth must be > 0".to_string()));
        }
        let named = [("colors.error", &self.colors.error), ("colors.notice", &self.colors.notice)];
        for (key, value) in named {
            if let Some(v) = value {
                if parse_color(v).is_none() {
                    return Err(ConfigError::Invalid(format!("{key}: unknown color {v:?}")));
                }
            }
        }
        Ok(())
    }

    /// Resolved colors; unset entries fall back to the built-in theme.
    pub fn colors(&self) -> Colors {
        let defaults = Colors::default();
        let pick = |value: &Option<String>, fallback| {
            value.as_deref().and_then(parse_color).unwrap_or(fallback)
        };
        Colors {
            error: pick(&self.colors.error, defaults.error),
            notice: pick(&self.colors.notice, defaults.notice),
        }
    }
}

/// Where `bf.toml` lives: `$BF_CONFIG` if set, otherwise the XDG config home.
pub fn default_path() -> Option<PathBuf> {
    if let Some(p) = std::env::var_os("BF_CONFIG") {
        return Some(PathBuf::from(p));
    }

    // On Linux: resolves to /home/<user>/.config
    // On Windows: resolves to C:\Users\<user>\.config
    // On macOS: resolves to /Users/<user>/.config
    let base_dirs = BaseDirs::new().ok()?;
    let mut path = PathBuf::from(base_dirs.config_home());
    path.push("bf.toml");
    Some(path)
}

/// Load config from `path`. A missing file yields the defaults.
pub fn load(path: &Path) -> Result<Config, ConfigError> {
    if !path.exists() {
        return Ok(Config::default());
    }
    let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let cfg: Config = toml::from_str(&content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
    })?;
    cfg.validate()?;
    tracing::debug!(path = %path.display(), "loaded config");
    Ok(cfg)
}

/// Resolve the nesting ceiling: flag -> `BF_MAX_DEPTH` -> config file.
pub fn resolve_max_depth(flag: Option<usize>, env: Option<&str>, config: &Config) -> usize {
    flag.filter(|&n| n > 0)
        .or_else(|| env.and_then(|s| s.trim().parse::<usize>().ok()).filter(|&n| n > 0))
        .unwrap_or(config.run.max_depth)
}

pub fn parse_color(value: &str) -> Option<Color> {
    let s = value.trim();
    if let Some(hex) = s.strip_prefix('#') {
        if hex.len() == 6 && hex.is_ascii() {
            if let (Ok(r), Ok(g), Ok(b)) = (
                u8::from_str_radix(&hex[0..2], 16),
                u8::from_str_radix(&hex[2..4], 16),
                u8::from_str_radix(&hex[4..6], 16),
            ) {
                return Some(Color::Rgb(r, g, b));
            }
        }
        return None;
    }

    let name = s.to_ascii_lowercase();
    Some(match name.as_str() {
        "black" => Color::Black,
        "red" => Color::Red,
        "green" => Color::Green,
        "yellow" => Color::Yellow,
        "blue" => Color::Blue,
        "magenta" | "purple" => Color::Purple,
        "cyan" => Color::Cyan,
        "gray" | "grey" => Color::LightGray,
        "darkgray" | "dark_grey" | "darkgrey" | "dark_gray" => Color::DarkGray,
        "lightred" | "light_red" => Color::LightRed,
        "lightgreen" | "light_green" => Color::LightGreen,
        "lightblue" | "light_blue" => Color::LightBlue,
        "lightmagenta" | "light_magenta" => Color::LightPurple,
        "lightcyan" | "light_cyan" => Color::LightCyan,
        "white" => Color::White,
        _ => return None,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn write_config(content: &str) -> tempfile::TempDir {
        let dir = tempfile::tempdir().expect("tempdir");
        fs::write(dir.path().join("bf.toml"), content).expect("write config");
        dir
    }

    #[test]
    fn missing_file_returns_default() {
        let dir = tempfile::tempdir().expect("tempdir");
        let cfg = load(&dir.path().join("bf.toml")).expect("load");
        assert_eq!(cfg, Config::default());
        assert_eq!(cfg.run.max_depth, 100);
        assert!(cfg.run.finished_notice);
    }

    #[test]
    fn partial_file_keeps_other_defaults() {
        let dir = write_config("[run]\nmax_depth = 12\n");
        let cfg = load(&dir.path().join("bf.toml")).expect("load");
        assert_eq!(cfg.run.max_depth, 12);
        assert!(cfg.run.finished_notice);
        assert_eq!(cfg.colors(), Colors::default());
    }

    #[test]
    fn colors_accept_names_and_hex() {
        let dir = write_config("[colors]\nerror = \"yellow\"\nnotice = \"#010203\"\n");
        let cfg = load(&dir.path().join("bf.toml")).expect("load");
        assert_eq!(cfg.colors().error, Color::Yellow);
        assert_eq!(cfg.colors().notice, Color::Rgb(1, 2, 3));
    }

    #[test]
    fn malformed_toml_is_parse_error() {
        let dir = write_config("[run\nmax_depth = ");
        let err = load(&dir.path().join("bf.toml")).unwrap_err();
        assert!(matches!(err, ConfigError::Parse { .. }));
    }

    #[test]
    fn zero_depth_and_unknown_colors_are_invalid() {
        let dir = write_config("[run]\nmax_depth = 0\n");
        assert!(matches!(load(&dir.path().join("bf.toml")), Err(ConfigError::Invalid(_))));

        let dir = write_config("[colors]\nerror = \"ultraviolet\"\n");
        assert!(matches!(load(&dir.path().join("bf.toml")), Err(ConfigError::Invalid(_))));
    }

    #[test]
    fn depth_precedence_is_flag_then_env_then_file() {
        let mut cfg = Config::default();
        cfg.run.max_depth = 7;
        assert_eq!(resolve_max_depth(Some(3), Some("5"), &cfg), 3);
        assert_eq!(resolve_max_depth(None, Some("5"), &cfg), 5);
        assert_eq!(resolve_max_depth(None, Some("not a number"), &cfg), 7);
        assert_eq!(resolve_max_depth(None, Some("0"), &cfg), 7);
        assert_eq!(resolve_max_depth(None, None, &cfg), 7);
    }

    #[test]
    fn parse_color_rejects_bad_hex() {
        assert_eq!(parse_color("#12345"), None);
        assert_eq!(parse_color("#zzzzzz"), None);
        assert_eq!(parse_color(" Grey "), Some(Color::LightGray));
    }
}
