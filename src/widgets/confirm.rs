use crate::kiosk_core::form::Snapshot;
use crate::theme::Theme;
use crate::widgets::chrome::{centered_rect, contains, panel_block};
use ratatui::prelude::*;
use ratatui::widgets::*;

/// Modal that shows a submitted snapshot and asks for confirmation.
pub struct ConfirmDialog {
    pub snapshot: Snapshot,
    pub theme: Theme,
    // true when "OK" is the highlighted button
    pub ok_selected: bool,
    hits: Vec<(Rect, bool)>,
}

impl ConfirmDialog {
    pub fn new(snapshot: Snapshot, theme: Theme) -> Self {
        Self {
            snapshot,
            theme,
            ok_selected: true,
            hits: Vec::new(),
        }
    }

    pub fn toggle(&mut self) {
        self.ok_selected = !self.ok_selected;
    }

    /// Which button (true = OK) sits under the given cell.
    pub fn button_at(&self, col: u16, row: u16) -> Option<bool> {
        self.hits
            .iter()
            .find(|(r, _)| contains(*r, col, row))
            .map(|(_, ok)| *ok)
    }
}

impl crate::widgets::Widget for ConfirmDialog {
    fn render(&mut self, f: &mut Frame, area: Rect, _focused: bool, _tick: u64) {
        let rect = centered_rect(60, 40, area);
        f.render_widget(Clear, rect);
        let block = panel_block("Confirm setpoints", true, &self.theme);
        let inner = block.inner(rect);
        f.render_widget(block, rect);

        let parts = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(2), Constraint::Length(1)])
            .split(inner);
        let lines: Vec<Line> = self
            .snapshot
            .summary_lines()
            .into_iter()
            .map(Line::from)
            .collect();
        f.render_widget(Paragraph::new(lines).wrap(Wrap { trim: true }), parts[0]);

        let buttons = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(parts[1]);
        self.hits.clear();
        for (label, ok, cell) in [("  OK  ", true, buttons[0]), (" Cancel ", false, buttons[1])] {
            let style = self.theme.button_style(self.ok_selected == ok);
            f.render_widget(
                Paragraph::new(label).alignment(Alignment::Center).style(style),
                cell,
            );
            self.hits.push((cell, ok));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kiosk_core::form::FormState;
    use crate::widgets::Widget;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    #[test]
    fn renders_summary_and_maps_buttons() {
        let mut form = FormState::default();
        form.temperature.value = Some(36.6);
        form.time.minutes = Some(2);
        form.time.seconds = Some(5);
        let mut d = ConfirmDialog::new(form.snapshot(), Theme::default());
        let mut term = Terminal::new(TestBackend::new(80, 24)).unwrap();
        term.draw(|f| d.render(f, f.area(), true, 0)).unwrap();
        let text: String = term
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        assert!(text.contains("36.6"));
        assert!(text.contains("Cancel"));
        let (ok_rect, _) = d.hits[0];
        let (cancel_rect, _) = d.hits[1];
        assert_eq!(d.button_at(ok_rect.x, ok_rect.y), Some(true));
        assert_eq!(d.button_at(cancel_rect.x, cancel_rect.y), Some(false));
        d.toggle();
        assert!(!d.ok_selected);
    }
}
