use crate::kiosk_core::form::{FieldId, Trend, TrendGroup};
use crate::kiosk_core::Session;
use crate::model::FieldLabels;
use crate::theme::Theme;
use crate::widgets::chrome::panel_block;
use ratatui::prelude::*;
use ratatui::widgets::*;

/// Tap targets produced while drawing the form.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum FormHit {
    Field(FieldId),
    Trend(TrendGroup, Trend),
    Submit,
}

fn field_label(labels: &FieldLabels, field: FieldId) -> &str {
    match field {
        FieldId::Temperature => &labels.temperature,
        FieldId::Minutes => &labels.minutes,
        FieldId::Seconds => &labels.seconds,
    }
}

fn draw_field(
    f: &mut Frame,
    area: Rect,
    session: &Session,
    field: FieldId,
    label: &str,
    theme: &Theme,
    cursor_on: bool,
) {
    let active = session.editor.active() == Some(field);
    let mut block = panel_block(label, active, theme);
    let show_error = session.form.touched.get(field) && session.errors.get(field).is_some();
    if show_error && !active {
        block = block.border_style(theme.text_error());
    }
    let mut val = session.editor.display_text(&session.form, field);
    if active && cursor_on {
        val.push('▏');
    }
    let style = if active {
        theme.text_editing_bold()
    } else {
        theme.text_active_bold()
    };
    f.render_widget(Paragraph::new(Span::styled(val, style)).block(block), area);
}

fn draw_error(f: &mut Frame, area: Rect, session: &Session, field: FieldId, theme: &Theme) {
    if !session.form.touched.get(field) {
        return;
    }
    if let Some(msg) = session.errors.get(field) {
        f.render_widget(Paragraph::new(Span::styled(msg, theme.text_error())), area);
    }
}

fn draw_trend(
    f: &mut Frame,
    area: Rect,
    label: &str,
    group: TrendGroup,
    current: Trend,
    theme: &Theme,
    hits: &mut Vec<(Rect, FormHit)>,
) {
    let prefix = format!("{label}: ");
    let mut spans = vec![Span::styled(prefix.clone(), theme.text_muted())];
    let mut x = area.x.saturating_add(prefix.chars().count() as u16);
    for trend in Trend::ALL {
        let mark = if trend == current { "(•)" } else { "( )" };
        let text = format!("{mark} {}", trend.label());
        let w = text.chars().count() as u16;
        let style = if trend == current {
            theme.text_active_bold()
        } else {
            Style::default()
        };
        hits.push((
            Rect::new(x, area.y, w.min(area.right().saturating_sub(x)), 1),
            FormHit::Trend(group, trend),
        ));
        spans.push(Span::styled(text, style));
        spans.push(Span::raw("  "));
        x = x.saturating_add(w + 2);
    }
    f.render_widget(Paragraph::new(Line::from(spans)), area);
}

/// Draws the setpoint form and returns its tap targets.
pub fn draw_form_panel(
    f: &mut Frame,
    area: Rect,
    session: &Session,
    labels: &FieldLabels,
    title: &str,
    theme: &Theme,
    tick: u64,
) -> Vec<(Rect, FormHit)> {
    let mut hits: Vec<(Rect, FormHit)> = Vec::new();
    let block = panel_block(title, false, theme);
    let inner = block.inner(area);
    f.render_widget(block, area);
    let cursor_on = tick % 2 == 0;

    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // temperature
            Constraint::Length(1), // error
            Constraint::Length(1), // temperature trend
            Constraint::Length(1),
            Constraint::Length(3), // minutes | seconds
            Constraint::Length(1), // errors
            Constraint::Length(1), // time trend
            Constraint::Length(1),
            Constraint::Length(1), // submit
            Constraint::Min(0),
        ])
        .split(inner);

    let temp = FieldId::Temperature;
    draw_field(f, rows[0], session, temp, field_label(labels, temp), theme, cursor_on);
    hits.push((rows[0], FormHit::Field(temp)));
    draw_error(f, rows[1], session, temp, theme);
    draw_trend(
        f,
        rows[2],
        &labels.trend,
        TrendGroup::Temperature,
        session.form.temperature.trend,
        theme,
        &mut hits,
    );

    let time_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[4]);
    let err_cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(rows[5]);
    for (i, field) in [FieldId::Minutes, FieldId::Seconds].into_iter().enumerate() {
        draw_field(f, time_cols[i], session, field, field_label(labels, field), theme, cursor_on);
        hits.push((time_cols[i], FormHit::Field(field)));
        draw_error(f, err_cols[i], session, field, theme);
    }
    draw_trend(
        f,
        rows[6],
        &labels.trend,
        TrendGroup::Time,
        session.form.time.trend,
        theme,
        &mut hits,
    );

    let submit_w = 12.min(rows[8].width);
    let submit = Rect::new(rows[8].x, rows[8].y, submit_w, rows[8].height);
    f.render_widget(
        Paragraph::new("Submit")
            .alignment(Alignment::Center)
            .style(theme.button_style(true)),
        submit,
    );
    hits.push((submit, FormHit::Submit));
    hits
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::kiosk_core::keys::KeySymbol;
    use ratatui::backend::TestBackend;
    use ratatui::Terminal;

    fn render(session: &Session) -> (String, Vec<(Rect, FormHit)>) {
        let mut term = Terminal::new(TestBackend::new(70, 20)).unwrap();
        let mut hits = Vec::new();
        term.draw(|f| {
            hits = draw_form_panel(
                f,
                f.area(),
                session,
                &FieldLabels::default(),
                "Setpoints",
                &Theme::default(),
                1,
            );
        })
        .unwrap();
        let text = term
            .backend()
            .buffer()
            .content()
            .iter()
            .map(|c| c.symbol())
            .collect();
        (text, hits)
    }

    #[test]
    fn shows_buffer_of_active_field() {
        let mut s = Session::default();
        s.activate(FieldId::Minutes);
        s.handle_key(&KeySymbol::Char('4'));
        s.handle_key(&KeySymbol::Char('2'));
        let (text, hits) = render(&s);
        assert!(text.contains("42"));
        assert!(text.contains("Minutes"));
        assert!(hits
            .iter()
            .any(|(_, h)| *h == FormHit::Trend(TrendGroup::Time, Trend::Ascending)));
        assert!(hits.iter().any(|(_, h)| *h == FormHit::Submit));
    }

    #[test]
    fn shows_errors_after_invalid_submit() {
        let mut s = Session::default();
        let (text, _) = render(&s);
        assert!(!text.contains("required"));
        let _ = s.submit();
        let (text, _) = render(&s);
        assert!(text.contains("This field is required"));
    }
}
