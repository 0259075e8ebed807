use std::path::{Path, PathBuf};

use crossterm::event::{KeyCode, KeyEvent, KeyModifiers};
use log::warn;
use serde::{Deserialize, Serialize};

use crate::engine::Tuning;
use crate::engine::input::Control;

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GalleryConfig {
    pub key_bindings: KeyBindings,
    pub tuning: Tuning,
    pub display: DisplaySettings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeyBindings {
    pub left: String,
    pub right: String,
    pub activate: String,
    pub cancel: String,
    pub quit: String,
}

impl Default for KeyBindings {
    fn default() -> Self {
        KeyBindings {
            left: "Left".into(),
            right: "Right".into(),
            activate: "e".into(),
            cancel: "Esc".into(),
            quit: "q".into(),
        }
    }
}

impl KeyBindings {
    /// Map a key to the session control it drives, if any.
    pub fn control_for(&self, event: &KeyEvent) -> Option<Control> {
        [
            (&self.left, Control::Left),
            (&self.right, Control::Right),
            (&self.activate, Control::Activate),
            (&self.cancel, Control::Cancel),
        ]
        .into_iter()
        .find(|(binding, _)| matches_binding(binding, event))
        .map(|(_, control)| control)
    }

    pub fn is_quit(&self, event: &KeyEvent) -> bool {
        matches_binding(&self.quit, event)
    }
}

/// How the world maps onto terminal cells and how fast the host ticks.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DisplaySettings {
    pub tick_rate: u32,
    /// Fallback for terminals without key release events: a key counts as
    /// held until no press or repeat arrives for this long. It has to outlast
    /// the keyboard's repeat delay or a held key reads as a fresh press.
    pub hold_window_ms: u64,
    /// Same fallback, for activate and cancel: a press closer than this to
    /// the previous one is auto-repeat, anything slower is a new tap.
    pub repeat_gap_ms: u64,
    /// World units per terminal column. Rows always fit the world's height.
    pub units_per_column: f64,
}

impl Default for DisplaySettings {
    fn default() -> Self {
        DisplaySettings {
            tick_rate: 30,
            hold_window_ms: 500,
            repeat_gap_ms: 100,
            units_per_column: 40.0,
        }
    }
}

impl GalleryConfig {
    pub fn load() -> Self {
        Self::load_from(&Self::config_path())
    }

    /// Missing file means defaults. A file that doesn't parse is reported and
    /// also falls back to defaults.
    pub fn load_from(path: &Path) -> Self {
        match std::fs::read_to_string(path) {
            Ok(json) => match serde_json::from_str::<GalleryConfig>(&json) {
                Ok(config) => config.validated(),
                Err(e) => {
                    warn!("invalid config {} ({e}), using defaults", path.display());
                    Self::default()
                }
            },
            Err(_) => Self::default(),
        }
    }

    /// Replace numbers the session can't run with by their defaults.
    fn validated(mut self) -> Self {
        let tuning = Tuning::default();
        let display = DisplaySettings::default();
        let positive = |v: f64| v.is_finite() && v > 0.0;

        self.tuning.proximity_threshold = checked(
            "tuning.proximity_threshold",
            self.tuning.proximity_threshold,
            tuning.proximity_threshold,
            positive,
        );
        self.tuning.walk_speed = checked(
            "tuning.walk_speed",
            self.tuning.walk_speed,
            tuning.walk_speed,
            positive,
        );
        self.tuning.reveal_interval_ms = checked(
            "tuning.reveal_interval_ms",
            self.tuning.reveal_interval_ms,
            tuning.reveal_interval_ms,
            |v| v > 0,
        );
        self.tuning.animation_fps = checked(
            "tuning.animation_fps",
            self.tuning.animation_fps,
            tuning.animation_fps,
            |v| v > 0,
        );
        self.display.tick_rate = checked(
            "display.tick_rate",
            self.display.tick_rate,
            display.tick_rate,
            |v| v > 0,
        );
        self.display.units_per_column = checked(
            "display.units_per_column",
            self.display.units_per_column,
            display.units_per_column,
            positive,
        );
        self
    }

    pub fn config_dir() -> PathBuf {
        let home = std::env::var("HOME").unwrap_or_else(|_| ".".into());
        let mut path = PathBuf::from(home);
        path.push(".config");
        path.push("photo-walk");
        path
    }

    fn config_path() -> PathBuf {
        Self::config_dir().join("config.json")
    }
}

fn checked<T: Copy + std::fmt::Display>(
    name: &str,
    value: T,
    default: T,
    valid: impl Fn(T) -> bool,
) -> T {
    if valid(value) {
        value
    } else {
        warn!("config {name} = {value} is out of range, using {default}");
        default
    }
}

/// Check whether a crossterm `KeyEvent` matches a binding string from config.
pub fn matches_binding(binding: &str, event: &KeyEvent) -> bool {
    if let Some(rest) = binding.strip_prefix("Alt-") {
        if !event.modifiers.contains(KeyModifiers::ALT) {
            return false;
        }
        return match_key_name(rest, event.code);
    }

    if let Some(rest) = binding.strip_prefix("Ctrl-") {
        if !event.modifiers.contains(KeyModifiers::CONTROL) {
            return false;
        }
        return match_key_name(rest, event.code);
    }

    // Plain bindings never fire with Ctrl or Alt held, so "e" is not Alt-e.
    if event.modifiers.contains(KeyModifiers::CONTROL)
        || event.modifiers.contains(KeyModifiers::ALT)
    {
        return false;
    }

    match_key_name(binding, event.code)
}

fn match_key_name(name: &str, code: KeyCode) -> bool {
    match name {
        "Right" => code == KeyCode::Right,
        "Left" => code == KeyCode::Left,
        "Up" => code == KeyCode::Up,
        "Down" => code == KeyCode::Down,
        "Enter" => code == KeyCode::Enter,
        "Esc" => code == KeyCode::Esc,
        "Space" => code == KeyCode::Char(' '),
        "Tab" => code == KeyCode::Tab,
        "Backspace" => code == KeyCode::Backspace,
        "Home" => code == KeyCode::Home,
        "End" => code == KeyCode::End,
        s => {
            if let Some(rest) = s.strip_prefix('F') {
                if let Ok(n) = rest.parse::<u8>() {
                    return code == KeyCode::F(n);
                }
            }
            // Letters match either case so Shift doesn't lock the player out.
            let mut chars = s.chars();
            match (chars.next(), chars.next(), code) {
                (Some(c), None, KeyCode::Char(k)) => c.eq_ignore_ascii_case(&k),
                _ => false,
            }
        }
    }
}

/// Human label for a binding, as shown in prompts: "e" reads as "E".
pub fn binding_label(binding: &str) -> String {
    let mut chars = binding.chars();
    match (chars.next(), chars.next()) {
        (Some(c), None) => c.to_uppercase().collect(),
        _ => binding.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    #[test]
    fn default_bindings_map_controls() {
        let bindings = KeyBindings::default();
        assert_eq!(bindings.control_for(&key(KeyCode::Left)), Some(Control::Left));
        assert_eq!(bindings.control_for(&key(KeyCode::Right)), Some(Control::Right));
        assert_eq!(bindings.control_for(&key(KeyCode::Char('e'))), Some(Control::Activate));
        assert_eq!(bindings.control_for(&key(KeyCode::Char('E'))), Some(Control::Activate));
        assert_eq!(bindings.control_for(&key(KeyCode::Esc)), Some(Control::Cancel));
        assert_eq!(bindings.control_for(&key(KeyCode::Char('x'))), None);
        assert!(bindings.is_quit(&key(KeyCode::Char('q'))));
    }

    #[test]
    fn modifiers_gate_plain_bindings() {
        let alt_e = KeyEvent::new(KeyCode::Char('e'), KeyModifiers::ALT);
        assert!(!matches_binding("e", &alt_e));
        assert!(matches_binding("Alt-e", &alt_e));

        let ctrl_c = KeyEvent::new(KeyCode::Char('c'), KeyModifiers::CONTROL);
        assert!(matches_binding("Ctrl-c", &ctrl_c));
        assert!(!matches_binding("Ctrl-c", &key(KeyCode::Char('c'))));
        assert!(matches_binding("F5", &key(KeyCode::F(5))));
        assert!(matches_binding("Space", &key(KeyCode::Char(' '))));
    }

    #[test]
    fn partial_config_fills_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{ "key_bindings": { "activate": "Enter" }, "tuning": { "walk_speed": 500 } }"#,
        )
        .unwrap();

        let config = GalleryConfig::load_from(&path);
        assert_eq!(config.key_bindings.activate, "Enter");
        assert_eq!(config.key_bindings.cancel, "Esc");
        assert_eq!(config.tuning.walk_speed, 500.0);
        assert_eq!(config.tuning.reveal_interval_ms, 75);
        assert_eq!(config.display, DisplaySettings::default());
    }

    #[test]
    fn invalid_or_missing_config_uses_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        assert_eq!(GalleryConfig::load_from(&path), GalleryConfig::default());

        std::fs::write(&path, "{ not json").unwrap();
        assert_eq!(GalleryConfig::load_from(&path), GalleryConfig::default());
    }

    #[test]
    fn out_of_range_numbers_fall_back_per_field() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.json");
        std::fs::write(
            &path,
            r#"{
                "tuning": { "walk_speed": -350, "proximity_threshold": 0, "reveal_interval_ms": 40 },
                "display": { "units_per_column": 0, "tick_rate": 0, "hold_window_ms": 250 }
            }"#,
        )
        .unwrap();

        let config = GalleryConfig::load_from(&path);
        assert_eq!(config.tuning.walk_speed, 350.0);
        assert_eq!(config.tuning.proximity_threshold, 150.0);
        assert_eq!(config.tuning.reveal_interval_ms, 40);
        assert_eq!(config.display.units_per_column, 40.0);
        assert_eq!(config.display.tick_rate, 30);
        assert_eq!(config.display.hold_window_ms, 250);
    }

    #[test]
    fn labels_single_keys_in_upper_case() {
        assert_eq!(binding_label("e"), "E");
        assert_eq!(binding_label("Enter"), "Enter");
    }
}
