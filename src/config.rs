use crate::cmds::Cmd;
use crate::error::Result;
use crate::hal::Rgb565;
use serde::Deserialize;
use std::collections::HashMap;
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use termion::event::Key;

pub type KeyMap = HashMap<Key, Cmd>;

const CONFIG_PATH_ENV_VAR: &str = "ARMLET_CONFIG_FILE";

/// Candidate config files, most specific first: the environment override,
/// then the platform config directory, then a dotfile in the home directory.
pub(crate) fn find_configfile_locations() -> Vec<PathBuf> {
    let mut locations = Vec::new();

    if let Ok(path) = env::var(CONFIG_PATH_ENV_VAR) {
        locations.push(PathBuf::from(path));
    }
    if let Some(config_dir) = dirs::config_dir() {
        locations.push(config_dir.join("armlet").join("config.toml"));
    }
    if let Some(home) = dirs::home_dir() {
        locations.push(home.join(".armlet.toml"));
    }

    locations
}

/// Display palette in the device's RGB565 color model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Theme {
    pub bright: Rgb565,
    pub mid: Rgb565,
    pub highlight_bg: Rgb565,
}

impl Default for Theme {
    fn default() -> Theme {
        Theme {
            bright: 0xffff,
            mid: 0xb5b6,
            highlight_bg: 0x64c8,
        }
    }
}

impl Theme {
    /// Dim variant of `mid`, used for adjacent-month day cells.
    pub fn dim(&self) -> Rgb565 {
        darken(self.mid, 2)
    }
}

/// Reduce an RGB565 color's channels by `amount` steps, saturating at black.
/// The green channel has twice the resolution and is reduced twice as far to
/// keep grays balanced.
pub fn darken(color: Rgb565, amount: u16) -> Rgb565 {
    let r = ((color >> 11) & 0x1f).saturating_sub(amount);
    let g = ((color >> 5) & 0x3f).saturating_sub(amount * 2);
    let b = (color & 0x1f).saturating_sub(amount);
    (r << 11) | (g << 5) | b
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Period of the host tick event in milliseconds.
    pub tick_rate_ms: u64,
    /// Root directory for application data files. Defaults to the platform
    /// data directory.
    pub data_dir: Option<PathBuf>,
    pub theme: Theme,
}

impl Default for Config {
    fn default() -> Config {
        Config {
            tick_rate_ms: 500,
            data_dir: None,
            theme: Theme::default(),
        }
    }
}

impl Config {
    pub fn load(path: &Path) -> Result<Config> {
        let content = fs::read_to_string(path)?;
        Ok(toml::from_str(&content)?)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms)
    }

    pub fn data_dir(&self) -> PathBuf {
        self.data_dir.clone().unwrap_or_else(|| {
            dirs::data_dir()
                .unwrap_or_else(|| PathBuf::from("."))
                .join("armlet")
        })
    }

    pub fn key_map(&self) -> KeyMap {
        let mut key_map = KeyMap::new();

        key_map.insert(Key::Up, Cmd::SwipeUp);
        key_map.insert(Key::Char('k'), Cmd::SwipeUp);
        key_map.insert(Key::Down, Cmd::SwipeDown);
        key_map.insert(Key::Char('j'), Cmd::SwipeDown);
        key_map.insert(Key::Char('\n'), Cmd::Button);
        key_map.insert(Key::Char('b'), Cmd::Button);
        key_map.insert(Key::Char('\t'), Cmd::SwitchApp);
        key_map.insert(Key::Char('q'), Cmd::Exit);

        for row in 0..6u8 {
            key_map.insert(Key::Char((b'1' + row) as char), Cmd::SelectRow(row));
        }

        key_map
    }
}

pub fn load_suitable_config(path: Option<&Path>) -> Result<Config> {
    if let Some(path) = path {
        return Config::load(path);
    }

    for location in find_configfile_locations() {
        if location.exists() {
            return Config::load(&location);
        }
    }

    Ok(Config::default())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = Config::default();

        assert_eq!(config.tick_rate(), Duration::from_millis(500));
        assert_eq!(config.theme, Theme::default());
        assert_eq!(config.theme.highlight_bg, 0x64c8);
    }

    #[test]
    fn parses_partial_toml() {
        let config: Config = toml::from_str(
            r#"
            tick_rate_ms = 1000

            [theme]
            bright = 0xffff
            mid = 0x8410
            "#,
        )
        .unwrap();

        assert_eq!(config.tick_rate_ms, 1000);
        assert_eq!(config.theme.mid, 0x8410);
        // untouched fields keep their defaults
        assert_eq!(config.theme.highlight_bg, 0x64c8);
        assert!(config.data_dir.is_none());
    }

    #[test]
    fn darken_saturates() {
        assert_eq!(darken(0x0000, 2), 0x0000);

        let dimmed = darken(0xffff, 2);
        assert_eq!((dimmed >> 11) & 0x1f, 0x1d);
        assert_eq!((dimmed >> 5) & 0x3f, 0x3b);
        assert_eq!(dimmed & 0x1f, 0x1d);
    }

    #[test]
    fn env_override_is_checked_first() {
        env::set_var(CONFIG_PATH_ENV_VAR, "/tmp/armlet-test.toml");
        let locations = find_configfile_locations();
        env::remove_var(CONFIG_PATH_ENV_VAR);

        assert_eq!(locations[0], PathBuf::from("/tmp/armlet-test.toml"));
        assert!(locations
            .iter()
            .skip(1)
            .all(|path| path.ends_with("armlet/config.toml") || path.ends_with(".armlet.toml")));
    }

    #[test]
    fn default_key_map_covers_core_commands() {
        let key_map = Config::default().key_map();

        assert_eq!(key_map.get(&Key::Char('q')), Some(&Cmd::Exit));
        assert_eq!(key_map.get(&Key::Up), Some(&Cmd::SwipeUp));
        assert_eq!(key_map.get(&Key::Char('3')), Some(&Cmd::SelectRow(2)));
    }
}
