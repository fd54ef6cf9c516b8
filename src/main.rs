mod app;
mod kiosk_core;
mod model;
mod nav;
mod theme;
mod ui;
mod widgets;

use anyhow::Result;

fn main() -> Result<()> {
    ui::run()
}
