use crate::kiosk_core::keyboard::KeyboardMode;
use crate::kiosk_core::keys::KeySymbol;
use crate::kiosk_core::layouts::is_language;
use crate::theme::ThemeMode;
use serde::Deserialize;
use std::collections::HashMap;

#[derive(Debug, Deserialize, Clone)]
pub struct FieldLabels {
    #[serde(default = "default_temperature_label")]
    pub temperature: String,
    #[serde(default = "default_minutes_label")]
    pub minutes: String,
    #[serde(default = "default_seconds_label")]
    pub seconds: String,
    #[serde(default = "default_trend_label")]
    pub trend: String,
}

impl Default for FieldLabels {
    fn default() -> Self {
        Self {
            temperature: default_temperature_label(),
            minutes: default_minutes_label(),
            seconds: default_seconds_label(),
            trend: default_trend_label(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KeyboardConfig {
    #[serde(default = "default_langs")]
    pub langs: Vec<String>,
    #[serde(default)]
    pub mode: KeyboardMode,
    // Hold time (ms) after which a {shift} release counts as a long press
    #[serde(default = "default_long_press_ms")]
    pub long_press_ms: u64,
    // Icon overrides keyed by key token, e.g. "{enter}": "check"
    #[serde(default)]
    pub icons: HashMap<String, String>,
}

impl Default for KeyboardConfig {
    fn default() -> Self {
        Self {
            langs: default_langs(),
            mode: KeyboardMode::default(),
            long_press_ms: default_long_press_ms(),
            icons: HashMap::new(),
        }
    }
}

#[derive(Debug, Deserialize, Clone)]
pub struct KioskConfig {
    #[serde(default = "default_title")]
    pub title: String,
    #[serde(default)]
    pub labels: FieldLabels,
    #[serde(default)]
    pub keyboard: KeyboardConfig,
    #[serde(default)]
    pub theme: ThemeMode,
    // Show the debug log pane on start
    #[serde(default)]
    pub debug: bool,
}

impl Default for KioskConfig {
    fn default() -> Self {
        Self {
            title: default_title(),
            labels: FieldLabels::default(),
            keyboard: KeyboardConfig::default(),
            theme: ThemeMode::default(),
            debug: false,
        }
    }
}

fn default_title() -> String {
    "Setpoints".to_string()
}

fn default_temperature_label() -> String {
    "Temperature, °C".to_string()
}

fn default_minutes_label() -> String {
    "Minutes".to_string()
}

fn default_seconds_label() -> String {
    "Seconds".to_string()
}

fn default_trend_label() -> String {
    "Trend".to_string()
}

fn default_langs() -> Vec<String> {
    vec!["ru".to_string(), "en".to_string()]
}

fn default_long_press_ms() -> u64 {
    1000
}

pub fn validate_kiosk_config(cfg: &KioskConfig) -> Result<(), String> {
    let kb = &cfg.keyboard;
    if kb.langs.is_empty() {
        return Err("keyboard.langs must list at least one language".into());
    }
    if kb.long_press_ms == 0 {
        return Err("keyboard.long_press_ms must be greater than 0".into());
    }
    if kb.mode == KeyboardMode::Alpha {
        for lang in &kb.langs {
            if !is_language(lang) {
                return Err(format!("keyboard.langs: '{lang}' is not a keyboard language"));
            }
        }
    }
    for token in kb.icons.keys() {
        if KeySymbol::parse(token).is_none() {
            return Err(format!("keyboard.icons: invalid key token '{token}'"));
        }
    }
    Ok(())
}
