//! Layout state machine and key decorations for the on-screen keyboard.
//!
//! The engine never draws anything. It tells the renderer which layout to show
//! and hands out a `{symbol -> decoration}` map computed after every change.

use super::keys::KeySymbol;
use super::layouts::{
    is_digital, layout_keys, LangLayouts, DIGITAL, DOT_DIGITAL, DOT_DIGITAL_PLUS_MINUS, NUMBERS,
};
use serde::Deserialize;
use std::collections::{BTreeMap, HashMap};
use std::time::{Duration, Instant};

pub const DEFAULT_LONG_PRESS: Duration = Duration::from_millis(1000);
pub const PLUS_MINUS_CLASS: &str = "keyboard-plusminus";

/// How the hosting form configures the keyboard.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyboardMode {
    /// Language layouts with shift, numbers and language switching.
    Alpha,
    Digital,
    #[default]
    DotDigital,
    DotDigitalPlusMinus,
}

impl KeyboardMode {
    fn fixed_layout(self) -> Option<&'static str> {
        match self {
            KeyboardMode::Alpha => None,
            KeyboardMode::Digital => Some(DIGITAL),
            KeyboardMode::DotDigital => Some(DOT_DIGITAL),
            KeyboardMode::DotDigitalPlusMinus => Some(DOT_DIGITAL_PLUS_MINUS),
        }
    }

    fn has_dot_control(self) -> bool {
        matches!(
            self,
            KeyboardMode::DotDigital | KeyboardMode::DotDigitalPlusMinus
        )
    }
}

/// Immutable key symbol -> icon id table.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct IconMap(BTreeMap<KeySymbol, String>);

impl Default for IconMap {
    fn default() -> Self {
        let pairs = [
            (KeySymbol::Lock, "arrow-big-up-dash"),
            (KeySymbol::Backspace, "delete"),
            (KeySymbol::Shift, "arrow-big-up"),
            (KeySymbol::Enter, "corner-down-left"),
            (KeySymbol::Space, "space"),
            (KeySymbol::Tab, "arrow-right-to-line"),
            (KeySymbol::Lang, "globe"),
            (KeySymbol::ArrowUp, "arrow-up"),
            (KeySymbol::ArrowDown, "arrow-down"),
            (KeySymbol::PlusMinus, "diff"),
        ];
        IconMap(
            pairs
                .into_iter()
                .map(|(k, v)| (k, v.to_string()))
                .collect(),
        )
    }
}

impl IconMap {
    /// Default table with entries replaced or added from `overrides`
    /// (`{token: icon_id}`). Tokens that do not parse are skipped.
    pub fn with_overrides(overrides: &HashMap<String, String>) -> Self {
        let mut map = IconMap::default();
        for (token, icon) in overrides {
            if let Some(sym) = KeySymbol::parse(token) {
                map.0.insert(sym, icon.clone());
            }
        }
        map
    }

    pub fn get(&self, key: &KeySymbol) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct KeyDecoration {
    pub icon: Option<String>,
    pub disabled: bool,
    pub class: Option<&'static str>,
}

pub type Decorations = BTreeMap<KeySymbol, KeyDecoration>;

#[derive(Clone, Debug)]
pub struct KeyboardEngine {
    mode: KeyboardMode,
    langs: Vec<String>,
    lang_layouts: LangLayouts,
    layout: String,
    shift_lock: bool,
    disable_dot: bool,
    pressed_at: Option<Instant>,
    long_press: Duration,
    icons: IconMap,
    decorations: Decorations,
}

impl KeyboardEngine {
    pub fn new(mode: KeyboardMode, langs: Vec<String>, icons: IconMap) -> Self {
        let lang_layouts = LangLayouts::new(langs.clone(), mode != KeyboardMode::Alpha);
        let layout = mode
            .fixed_layout()
            .unwrap_or(lang_layouts.default_layout())
            .to_string();
        let mut engine = Self {
            mode,
            langs,
            lang_layouts,
            layout,
            shift_lock: false,
            disable_dot: false,
            pressed_at: None,
            long_press: DEFAULT_LONG_PRESS,
            icons,
            decorations: Decorations::new(),
        };
        engine.decorate();
        engine
    }

    pub fn with_long_press(mut self, threshold: Duration) -> Self {
        self.long_press = threshold;
        self
    }

    pub fn mode(&self) -> KeyboardMode {
        self.mode
    }

    pub fn layout(&self) -> &str {
        &self.layout
    }

    pub fn shift_lock(&self) -> bool {
        self.shift_lock
    }

    pub fn disable_dot(&self) -> bool {
        self.disable_dot
    }

    pub fn decorations(&self) -> &Decorations {
        &self.decorations
    }

    /// Host reconfiguration: the only way out of a digit-only layout.
    pub fn set_mode(&mut self, mode: KeyboardMode) -> &str {
        self.mode = mode;
        self.lang_layouts = LangLayouts::new(self.langs.clone(), mode != KeyboardMode::Alpha);
        self.layout = mode
            .fixed_layout()
            .unwrap_or(self.lang_layouts.default_layout())
            .to_string();
        self.shift_lock = false;
        self.decorate();
        &self.layout
    }

    /// Returns true when the decorations changed.
    pub fn set_disable_dot(&mut self, disable: bool) -> bool {
        if self.disable_dot == disable {
            return false;
        }
        self.disable_dot = disable;
        let before = self.decorations.clone();
        self.decorate();
        before != self.decorations
    }

    pub fn on_key_press(&mut self, _key: &KeySymbol, at: Instant) {
        self.pressed_at = Some(at);
    }

    /// Finishes a key press. Returns the new layout name when it changed.
    pub fn on_key_release(&mut self, key: &KeySymbol, at: Instant) -> Option<&str> {
        let held = self
            .pressed_at
            .take()
            .map(|start| at.saturating_duration_since(start))
            .unwrap_or_default();
        let long_tap = held >= self.long_press;
        if self.handle_shift(key, long_tap) {
            Some(&self.layout)
        } else {
            None
        }
    }

    /// Resolves the layout after `key`. Returns true when the layout changed.
    pub fn handle_shift(&mut self, key: &KeySymbol, long_tap: bool) -> bool {
        let current = self.layout.clone();
        if is_digital(&current) {
            return false;
        }

        if *key == KeySymbol::Shift {
            if long_tap {
                self.shift_lock = !self.shift_lock;
            } else if self.shift_lock {
                self.shift_lock = false;
            }
        }

        let mut next = current.clone();
        match key {
            KeySymbol::Lang => self.lang_layouts.next(),
            KeySymbol::Numbers => next = NUMBERS.to_string(),
            KeySymbol::Abc => next = self.lang_layouts.default_layout().to_string(),
            _ => {}
        }

        if self.shift_lock {
            next = self.lang_layouts.shift_layout().to_string();
        } else if *key == KeySymbol::Shift {
            next = if current == self.lang_layouts.default_layout() {
                self.lang_layouts.shift_layout().to_string()
            } else {
                self.lang_layouts.default_layout().to_string()
            };
        } else if next != NUMBERS && !is_digital(&next) {
            // one-shot shift: any other key falls back to the default letters
            next = self.lang_layouts.default_layout().to_string();
        }

        let shift_icon_changed = *key == KeySymbol::Shift;
        if next != current {
            self.layout = next;
            self.decorate();
            return true;
        }
        if shift_icon_changed {
            self.decorate();
        }
        false
    }

    fn decorate(&mut self) {
        let dot_control = self.mode.has_dot_control();
        let mut out = Decorations::new();
        for key in layout_keys(&self.layout).into_iter().flatten() {
            let lookup = if key == KeySymbol::Shift && self.shift_lock {
                KeySymbol::Lock
            } else {
                key.clone()
            };
            let deco = KeyDecoration {
                icon: self.icons.get(&lookup).map(str::to_string),
                disabled: dot_control && self.disable_dot && key == KeySymbol::Char('.'),
                class: (key == KeySymbol::PlusMinus).then_some(PLUS_MINUS_CLASS),
            };
            out.insert(key, deco);
        }
        self.decorations = out;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn alpha() -> KeyboardEngine {
        KeyboardEngine::new(
            KeyboardMode::Alpha,
            vec!["en".into(), "ru".into()],
            IconMap::default(),
        )
    }

    fn tap(kb: &mut KeyboardEngine, key: KeySymbol, t0: Instant, held_ms: u64) -> Option<String> {
        kb.on_key_press(&key, t0);
        kb.on_key_release(&key, t0 + Duration::from_millis(held_ms))
            .map(str::to_string)
    }

    #[test]
    fn long_press_locks_and_short_press_unlocks() {
        let mut kb = alpha();
        let t0 = Instant::now();
        assert_eq!(tap(&mut kb, KeySymbol::Shift, t0, 1200).as_deref(), Some("en_shift"));
        assert!(kb.shift_lock());
        // letters keep the shifted layout while locked
        assert_eq!(tap(&mut kb, KeySymbol::Char('Q'), t0, 50), None);
        assert_eq!(kb.layout(), "en_shift");

        assert_eq!(tap(&mut kb, KeySymbol::Shift, t0, 200).as_deref(), Some("en"));
        assert!(!kb.shift_lock());
    }

    #[test]
    fn exact_threshold_counts_as_long_press() {
        let mut kb = alpha();
        let t0 = Instant::now();
        tap(&mut kb, KeySymbol::Shift, t0, 1000);
        assert!(kb.shift_lock());
        let mut kb = alpha().with_long_press(Duration::from_millis(300));
        tap(&mut kb, KeySymbol::Shift, t0, 299);
        assert!(!kb.shift_lock());
        assert_eq!(kb.layout(), "en_shift");
    }

    #[test]
    fn short_shift_is_one_shot() {
        let mut kb = alpha();
        let t0 = Instant::now();
        tap(&mut kb, KeySymbol::Shift, t0, 100);
        assert_eq!(kb.layout(), "en_shift");
        tap(&mut kb, KeySymbol::Char('A'), t0, 100);
        assert_eq!(kb.layout(), "en");
        tap(&mut kb, KeySymbol::Shift, t0, 100);
        tap(&mut kb, KeySymbol::Shift, t0, 100);
        assert_eq!(kb.layout(), "en");
    }

    #[test]
    fn numbers_abc_and_lang_transitions() {
        let mut kb = alpha();
        let t0 = Instant::now();
        assert_eq!(tap(&mut kb, KeySymbol::Numbers, t0, 10).as_deref(), Some(NUMBERS));
        // typing on the numbers layout stays there
        assert_eq!(tap(&mut kb, KeySymbol::Char('5'), t0, 10), None);
        assert_eq!(tap(&mut kb, KeySymbol::Abc, t0, 10).as_deref(), Some("en"));
        assert_eq!(tap(&mut kb, KeySymbol::Lang, t0, 10).as_deref(), Some("ru"));
        tap(&mut kb, KeySymbol::Shift, t0, 10);
        assert_eq!(kb.layout(), "ru_shift");
    }

    #[test]
    fn shift_lock_overrides_numbers() {
        let mut kb = alpha();
        let t0 = Instant::now();
        tap(&mut kb, KeySymbol::Shift, t0, 1500);
        assert_eq!(tap(&mut kb, KeySymbol::Numbers, t0, 10), None);
        assert_eq!(kb.layout(), "en_shift");
    }

    #[test]
    fn digital_layouts_are_sticky() {
        let mut kb = KeyboardEngine::new(
            KeyboardMode::DotDigital,
            vec!["ru".into(), "en".into()],
            IconMap::default(),
        );
        let t0 = Instant::now();
        assert_eq!(kb.layout(), DOT_DIGITAL);
        for key in [KeySymbol::Shift, KeySymbol::Lang, KeySymbol::Numbers, KeySymbol::Abc] {
            assert_eq!(tap(&mut kb, key, t0, 1500), None);
        }
        assert_eq!(kb.layout(), DOT_DIGITAL);
        assert!(!kb.shift_lock());

        assert_eq!(kb.set_mode(KeyboardMode::Alpha), "ru");
        assert_eq!(kb.set_mode(KeyboardMode::Digital), DIGITAL);
    }

    #[test]
    fn decorations_map_icons_and_plus_minus_class() {
        let kb = KeyboardEngine::new(
            KeyboardMode::DotDigitalPlusMinus,
            vec!["en".into()],
            IconMap::default(),
        );
        let d = kb.decorations();
        assert_eq!(d[&KeySymbol::Backspace].icon.as_deref(), Some("delete"));
        assert_eq!(d[&KeySymbol::Enter].icon.as_deref(), Some("corner-down-left"));
        assert_eq!(d[&KeySymbol::PlusMinus].class, Some(PLUS_MINUS_CLASS));
        assert_eq!(d[&KeySymbol::PlusMinus].icon.as_deref(), Some("diff"));
        assert_eq!(d[&KeySymbol::Char('7')], KeyDecoration::default());
    }

    #[test]
    fn dot_key_disabled_only_in_dot_modes() {
        let mut kb = KeyboardEngine::new(KeyboardMode::DotDigital, vec![], IconMap::default());
        assert!(kb.set_disable_dot(true));
        assert!(kb.decorations()[&KeySymbol::Char('.')].disabled);
        assert!(!kb.set_disable_dot(true));
        assert!(kb.set_disable_dot(false));
        assert!(!kb.decorations()[&KeySymbol::Char('.')].disabled);

        let mut kb = KeyboardEngine::new(KeyboardMode::Digital, vec![], IconMap::default());
        assert!(!kb.set_disable_dot(true));
        assert!(!kb.decorations()[&KeySymbol::Char('.')].disabled);
    }

    #[test]
    fn locked_shift_shows_lock_icon() {
        let mut kb = alpha();
        let t0 = Instant::now();
        assert_eq!(
            kb.decorations()[&KeySymbol::Shift].icon.as_deref(),
            Some("arrow-big-up")
        );
        tap(&mut kb, KeySymbol::Shift, t0, 1200);
        assert_eq!(
            kb.decorations()[&KeySymbol::Shift].icon.as_deref(),
            Some("arrow-big-up-dash")
        );
    }

    #[test]
    fn icon_overrides_replace_defaults() {
        let mut o = HashMap::new();
        o.insert("{enter}".to_string(), "check".to_string());
        o.insert("{tab}".to_string(), "tab".to_string());
        let icons = IconMap::with_overrides(&o);
        assert_eq!(icons.get(&KeySymbol::Enter), Some("check"));
        assert_eq!(icons.get(&KeySymbol::Backspace), Some("delete"));
    }
}
