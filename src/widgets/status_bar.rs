use ratatui::prelude::*;
use ratatui::text::{Line, Span};
use ratatui::widgets::*;

use crate::ui::{AppState, ToastLevel};

pub const HELP_TEXT: &str =
    "Tab field • F5/F6 trend • F7 keyboard mode • Ctrl+S submit • Ctrl+C copy • F12 log • Esc quit";

pub fn draw_status(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans: Vec<Span> = Vec::new();
    if let Some(t) = &state.toast {
        let color = state.theme.toast_color(t.level);
        let tag = match t.level {
            ToastLevel::Success => "[OK]",
            ToastLevel::Error => "[ERROR]",
            ToastLevel::Info => "[INFO]",
        };
        spans.push(Span::styled(
            format!("{tag} "),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        ));
        spans.push(Span::styled(t.text.clone(), Style::default().fg(color)));
        spans.push(Span::raw("  |  "));
    }
    let editing = match state.session.editor.active() {
        Some(field) => format!("editing {}", field.name()),
        None => "idle".to_string(),
    };
    spans.push(Span::styled(editing, state.theme.text_active_bold()));
    spans.push(Span::raw(format!("  |  {}", state.keyboard.layout())));
    if state.keyboard.shift_lock() {
        spans.push(Span::styled("  ⇪ lock", state.theme.text_editing_bold()));
    }
    spans.push(Span::styled(
        format!("  |  {HELP_TEXT}"),
        state.theme.text_muted(),
    ));
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

pub fn draw_debug_log(f: &mut Frame, area: Rect, state: &AppState) {
    let block = crate::widgets::chrome::panel_block("Log", false, &state.theme);
    let visible = block.inner(area).height as usize;
    let skip = state.debug_log.len().saturating_sub(visible);
    let lines: Vec<Line> = state
        .debug_log
        .iter()
        .skip(skip)
        .map(|l| Line::from(l.as_str()))
        .collect();
    f.render_widget(Paragraph::new(lines).block(block), area);
}
