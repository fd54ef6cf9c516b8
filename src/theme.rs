use ratatui::style::{Color, Modifier, Style};
use serde::Deserialize;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ThemeMode {
    Light,
    #[default]
    Dark,
}

#[derive(Clone, Debug)]
pub struct Theme {
    pub mode: ThemeMode,
    pub bg: Color,
    pub fg: Color,
    pub accent: Color,
    pub frame: Color,
    pub selected: Color,
    pub key_bg: Color,
    pub success: Color,
    pub error: Color,
    pub muted: Color,
}

impl Theme {
    pub fn kiosk_dark() -> Self {
        Self {
            mode: ThemeMode::Dark,
            bg: Color::Rgb(24, 24, 26),
            fg: Color::White,
            accent: Color::Rgb(64, 160, 255),
            frame: Color::Rgb(90, 90, 100),
            selected: Color::Rgb(255, 120, 0),
            key_bg: Color::Rgb(48, 48, 56),
            success: Color::Green,
            error: Color::Red,
            muted: Color::DarkGray,
        }
    }

    pub fn kiosk_light() -> Self {
        Self {
            mode: ThemeMode::Light,
            bg: Color::Rgb(245, 245, 247),
            fg: Color::Rgb(20, 20, 22),
            accent: Color::Rgb(40, 120, 220),
            frame: Color::Rgb(200, 200, 210),
            selected: Color::Rgb(220, 100, 0),
            key_bg: Color::Rgb(255, 255, 255),
            success: Color::Rgb(0, 150, 0),
            error: Color::Rgb(200, 0, 0),
            muted: Color::Rgb(120, 120, 130),
        }
    }

    pub fn from_mode(mode: ThemeMode) -> Self {
        match mode {
            ThemeMode::Dark => Self::kiosk_dark(),
            ThemeMode::Light => Self::kiosk_light(),
        }
    }
}

impl Default for Theme {
    fn default() -> Self {
        Self::kiosk_dark()
    }
}

// Style helpers that use the theme
impl Theme {
    pub fn border_focused(&self) -> Style {
        Style::default().fg(self.selected)
    }

    pub fn border_unfocused(&self) -> Style {
        Style::default().fg(self.frame)
    }

    pub fn title_style(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_active_bold(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_editing_bold(&self) -> Style {
        Style::default()
            .fg(self.selected)
            .add_modifier(Modifier::BOLD)
    }

    pub fn text_muted(&self) -> Style {
        Style::default().fg(self.muted)
    }

    pub fn text_error(&self) -> Style {
        Style::default().fg(self.error)
    }

    pub fn key_style(&self, disabled: bool, pressed: bool) -> Style {
        if disabled {
            return Style::default().fg(self.muted).bg(self.bg);
        }
        if pressed {
            return Style::default()
                .fg(self.bg)
                .bg(self.selected)
                .add_modifier(Modifier::BOLD);
        }
        Style::default().fg(self.fg).bg(self.key_bg)
    }

    /// Distinct look for keys carrying the plus/minus class.
    pub fn key_plus_minus(&self) -> Style {
        Style::default()
            .fg(self.accent)
            .bg(self.key_bg)
            .add_modifier(Modifier::BOLD)
    }

    pub fn button_style(&self, highlighted: bool) -> Style {
        if highlighted {
            Style::default()
                .fg(self.bg)
                .bg(self.accent)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(self.accent).bg(self.key_bg)
        }
    }

    pub fn toast_color(&self, level: crate::ui::ToastLevel) -> Color {
        match level {
            crate::ui::ToastLevel::Success => self.success,
            crate::ui::ToastLevel::Error => self.error,
            crate::ui::ToastLevel::Info => self.accent,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn from_mode_picks_matching_palette() {
        assert_eq!(Theme::from_mode(ThemeMode::Light).mode, ThemeMode::Light);
        assert_eq!(Theme::default().mode, ThemeMode::Dark);
    }

    #[test]
    fn disabled_keys_are_muted() {
        let t = Theme::default();
        assert_eq!(t.key_style(true, true).fg, Some(t.muted));
        assert_eq!(t.key_style(false, true).bg, Some(t.selected));
    }
}
