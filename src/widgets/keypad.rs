//! On-screen keypad: draws the layout the keyboard engine selected and applies
//! its per-key decorations. Also answers which key sits under a mouse position.

use crate::kiosk_core::keyboard::{Decorations, KeyDecoration, PLUS_MINUS_CLASS};
use crate::kiosk_core::keys::KeySymbol;
use crate::kiosk_core::layouts::layout_keys;
use crate::theme::Theme;
use crate::widgets::chrome::{contains, panel_block};
use ratatui::prelude::*;
use ratatui::widgets::*;

#[derive(Default)]
pub struct KeypadWidget {
    pub layout: String,
    pub rows: Vec<Vec<KeySymbol>>,
    pub decorations: Decorations,
    pub pressed: Option<KeySymbol>,
    pub theme: Theme,
    hits: Vec<(Rect, KeySymbol)>,
}

impl KeypadWidget {
    pub fn new(theme: Theme) -> Self {
        Self {
            theme,
            ..Default::default()
        }
    }

    pub fn apply(&mut self, layout: String, decorations: Decorations) {
        self.rows = layout_keys(&layout);
        self.layout = layout;
        self.decorations = decorations;
    }

    pub fn decoration(&self, key: &KeySymbol) -> Option<&KeyDecoration> {
        self.decorations.get(key)
    }

    /// Key under the given cell, if it is enabled.
    pub fn key_at(&self, col: u16, row: u16) -> Option<KeySymbol> {
        let (_, key) = self.hits.iter().find(|(r, _)| contains(*r, col, row))?;
        if self.decoration(key).map(|d| d.disabled).unwrap_or(false) {
            return None;
        }
        Some(key.clone())
    }
}

pub fn glyph_for_icon(icon: &str) -> &str {
    match icon {
        "delete" => "⌫",
        "corner-down-left" => "⏎",
        "arrow-up" => "↑",
        "arrow-down" => "↓",
        "arrow-big-up" => "⇧",
        "arrow-big-up-dash" => "⇪",
        "space" => "␣",
        "arrow-right-to-line" => "⇥",
        "globe" => "◍",
        "diff" => "±",
        "check" => "✓",
        other => other,
    }
}

pub fn key_label(key: &KeySymbol, deco: Option<&KeyDecoration>) -> String {
    if let Some(icon) = deco.and_then(|d| d.icon.as_deref()) {
        return glyph_for_icon(icon).to_string();
    }
    match key {
        KeySymbol::Numbers => "123".into(),
        KeySymbol::Abc => "ABC".into(),
        other => other.token(),
    }
}

impl crate::widgets::Widget for KeypadWidget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, _tick: u64) {
        let title = format!("Keyboard · {}", self.layout);
        let block = panel_block(&title, focused, &self.theme);
        let inner = block.inner(area);
        f.render_widget(block, area);
        self.hits.clear();
        if self.rows.is_empty() || inner.height == 0 {
            return;
        }
        let row_areas = Layout::default()
            .direction(Direction::Vertical)
            .constraints(vec![
                Constraint::Ratio(1, self.rows.len() as u32);
                self.rows.len()
            ])
            .split(inner);
        for (keys, row_area) in self.rows.iter().zip(row_areas.iter()) {
            if keys.is_empty() {
                continue;
            }
            let cells = Layout::default()
                .direction(Direction::Horizontal)
                .constraints(vec![Constraint::Ratio(1, keys.len() as u32); keys.len()])
                .split(*row_area);
            for (key, cell) in keys.iter().zip(cells.iter()) {
                let deco = self.decorations.get(key);
                let disabled = deco.map(|d| d.disabled).unwrap_or(false);
                let pressed = self.pressed.as_ref() == Some(key);
                let mut style = self.theme.key_style(disabled, pressed);
                if !pressed && deco.and_then(|d| d.class) == Some(PLUS_MINUS_CLASS) {
                    style = self.theme.key_plus_minus();
                }
                // one column gap between keys
                let button = Rect {
                    width: cell.width.saturating_sub(1).max(1),
                    ..*cell
                };
                let top_pad = button.height.saturating_sub(1) / 2;
                let mut lines: Vec<Line> = vec![Line::from(""); top_pad as usize];
                lines.push(Line::from(key_label(key, deco)));
                let p = Paragraph::new(lines)
                    .alignment(Alignment::Center)
                    .style(style);
                f.render_widget(p, button);
                self.hits.push((button, key.clone()));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kiosk_core::keyboard::{IconMap, KeyboardEngine, KeyboardMode};
    use crate::widgets::Widget;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn keypad(mode: KeyboardMode, disable_dot: bool) -> KeypadWidget {
        let mut kb = KeyboardEngine::new(mode, vec!["en".into()], IconMap::default());
        kb.set_disable_dot(disable_dot);
        let mut w = KeypadWidget::new(Theme::default());
        w.apply(kb.layout().to_string(), kb.decorations().clone());
        w
    }

    fn buffer_text(t: &Terminal<TestBackend>) -> String {
        t.backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect()
    }

    #[test]
    fn renders_icons_for_control_keys() {
        let mut w = keypad(KeyboardMode::DotDigitalPlusMinus, false);
        let mut term = Terminal::new(TestBackend::new(40, 14)).unwrap();
        term.draw(|f| w.render(f, f.area(), false, 0)).unwrap();
        let text = buffer_text(&term);
        assert!(text.contains('⌫'));
        assert!(text.contains('±'));
        assert!(text.contains('7'));
        assert!(text.contains("dot_digital_plus_minus"));
    }

    #[test]
    fn key_at_finds_keys_and_skips_disabled_dot() {
        let mut w = keypad(KeyboardMode::DotDigital, true);
        let mut term = Terminal::new(TestBackend::new(40, 14)).unwrap();
        term.draw(|f| w.render(f, f.area(), false, 0)).unwrap();
        let seven = w
            .hits
            .iter()
            .find(|(_, k)| *k == KeySymbol::Char('7'))
            .map(|(r, _)| *r)
            .unwrap();
        assert_eq!(w.key_at(seven.x, seven.y), Some(KeySymbol::Char('7')));
        let dot = w
            .hits
            .iter()
            .find(|(_, k)| *k == KeySymbol::Char('.'))
            .map(|(r, _)| *r)
            .unwrap();
        assert_eq!(w.key_at(dot.x, dot.y), None);
        assert_eq!(w.key_at(0, 0), None);
    }

    #[test]
    fn labels_fall_back_to_display_names() {
        assert_eq!(key_label(&KeySymbol::Numbers, None), "123");
        assert_eq!(key_label(&KeySymbol::Abc, None), "ABC");
        assert_eq!(key_label(&KeySymbol::Char('x'), None), "x");
        let deco = KeyDecoration {
            icon: Some("unknown-icon".into()),
            ..Default::default()
        };
        assert_eq!(key_label(&KeySymbol::Tab, Some(&deco)), "unknown-icon");
    }
}
