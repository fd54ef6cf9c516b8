pub mod chrome;
pub mod confirm;
pub mod form_panel;
pub mod keypad;
pub mod status_bar;

use ratatui::prelude::*;

pub trait Widget {
    fn render(&mut self, f: &mut Frame, area: Rect, focused: bool, tick: u64);
}
