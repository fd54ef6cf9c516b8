use crate::app::{update, AppMsg, Effect};
use crate::kiosk_core::form::FieldId;
use crate::kiosk_core::keyboard::{IconMap, KeyboardEngine};
use crate::kiosk_core::keys::KeySymbol;
use crate::kiosk_core::Session;
use crate::model::{validate_kiosk_config, KioskConfig};
use crate::nav::keys::{map_key, next_keyboard_mode, parse_script, step_field, Intent};
use crate::theme::Theme;
use crate::widgets::confirm::ConfirmDialog;
use crate::widgets::form_panel::{draw_form_panel, FormHit};
use crate::widgets::keypad::KeypadWidget;
use crate::widgets::status_bar::{draw_debug_log, draw_status};
use crate::widgets::Widget;
use anyhow::{Context, Result};
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyEventKind, MouseButton,
    MouseEventKind,
};
use crossterm::execute;
use crossterm::terminal::{
    disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen,
};
use ratatui::prelude::*;
use ratatui::widgets::*;
use std::collections::VecDeque;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

const CONFIG_FILE: &str = "kiosk.yaml";
const CONFIG_DIR: &str = ".kiosk";
const TICK_RATE: Duration = Duration::from_millis(200);
// Press-to-release gap for scripted taps
const SCRIPT_TAP: Duration = Duration::from_millis(80);

pub(crate) struct AppState {
    pub(crate) config: KioskConfig,
    pub(crate) session: Session,
    pub(crate) keyboard: KeyboardEngine,
    pub(crate) keypad: KeypadWidget,
    pub(crate) confirm: Option<ConfirmDialog>,
    // Tap targets from the last drawn form
    pub(crate) form_hits: Vec<(Rect, FormHit)>,
    pub(crate) tick: u64,
    pub(crate) toast: Option<Toast>,
    pub(crate) last_error: Option<String>,
    pub(crate) show_debug: bool,
    // Debug log (rendered in bottom debug pane)
    pub(crate) debug_log: VecDeque<String>,
    pub(crate) theme: Theme,
    pub(crate) quit: bool,
}

impl AppState {
    pub fn new(config: KioskConfig) -> Self {
        let kb = &config.keyboard;
        let keyboard = KeyboardEngine::new(
            kb.mode,
            kb.langs.clone(),
            IconMap::with_overrides(&kb.icons),
        )
        .with_long_press(Duration::from_millis(kb.long_press_ms));
        let theme = Theme::from_mode(config.theme);
        let mut keypad = KeypadWidget::new(theme.clone());
        keypad.apply(
            keyboard.layout().to_string(),
            keyboard.decorations().clone(),
        );
        Self {
            show_debug: config.debug,
            config,
            session: Session::default(),
            keyboard,
            keypad,
            confirm: None,
            form_hits: Vec::new(),
            tick: 0,
            toast: None,
            last_error: None,
            debug_log: VecDeque::new(),
            theme,
            quit: false,
        }
    }

    pub fn dbg(&mut self, msg: impl Into<String>) {
        const MAX_LOG_LINES: usize = 200;
        if self.debug_log.len() >= MAX_LOG_LINES {
            self.debug_log.pop_front();
        }
        self.debug_log.push_back(msg.into());
    }

    fn show_toast(&mut self, text: impl Into<String>, level: ToastLevel, seconds: u64) {
        self.toast = Some(Toast {
            text: text.into(),
            level,
            expires_at_tick: self.tick + seconds * 5,
        });
    }
}

impl Default for AppState {
    fn default() -> Self {
        Self::new(KioskConfig::default())
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ToastLevel {
    Info,
    Success,
    Error,
}

pub struct Toast {
    pub text: String,
    pub level: ToastLevel,
    pub expires_at_tick: u64,
}

fn run_effects(state: &mut AppState, effects: Vec<Effect>) {
    for eff in effects {
        match eff {
            Effect::ApplyLayout {
                layout,
                decorations,
            } => {
                state.keypad.apply(layout, decorations);
            }
            Effect::OpenConfirm(snapshot) => {
                state.confirm = Some(ConfirmDialog::new(snapshot, state.theme.clone()));
            }
            Effect::ShowToast {
                text,
                level,
                seconds,
            } => state.show_toast(text, level, seconds),
        }
    }
}

pub(crate) fn dispatch(state: &mut AppState, msg: AppMsg) {
    let effects = update(state, msg);
    run_effects(state, effects);
}

/// Runs one intent. Taps are a press and a release `SCRIPT_TAP` apart;
/// holds release after their own duration. Returns the instant the intent
/// finished at.
pub(crate) fn handle_intent(state: &mut AppState, intent: Intent, now: Instant) -> Instant {
    match intent {
        Intent::Key(key) => {
            let release = now + SCRIPT_TAP;
            press_and_release(state, key, now, release);
            return release;
        }
        Intent::Hold(key, ms) => {
            let release = now + Duration::from_millis(ms);
            press_and_release(state, key, now, release);
            return release;
        }
        Intent::Tap(field) => dispatch(state, AppMsg::TapField(field)),
        Intent::NextField => {
            let field = step_field(state.session.editor.active(), true);
            dispatch(state, AppMsg::TapField(field));
        }
        Intent::PrevField => {
            let field = step_field(state.session.editor.active(), false);
            dispatch(state, AppMsg::TapField(field));
        }
        Intent::CycleTrend(group) => dispatch(state, AppMsg::CycleTrend(group)),
        Intent::CycleKeyboardMode => {
            let mode = next_keyboard_mode(state.keyboard.mode());
            dispatch(state, AppMsg::SetKeyboardMode(mode));
        }
        Intent::Submit => dispatch(state, AppMsg::Submit),
        Intent::ConfirmAnswer(accepted) => {
            if state.confirm.is_some() {
                dispatch(state, AppMsg::ConfirmClosed { accepted });
            }
        }
        Intent::ConfirmSelected => {
            if let Some(accepted) = state.confirm.as_ref().map(|d| d.ok_selected) {
                dispatch(state, AppMsg::ConfirmClosed { accepted });
            }
        }
        Intent::ConfirmToggle => {
            if let Some(d) = &mut state.confirm {
                d.toggle();
            }
        }
        Intent::ToggleDebug => state.show_debug = !state.show_debug,
        Intent::Copy => copy_last_submitted(state),
        Intent::Quit => state.quit = true,
    }
    now
}

fn press_and_release(state: &mut AppState, key: KeySymbol, pressed: Instant, released: Instant) {
    dispatch(
        state,
        AppMsg::KeyPress {
            key: key.clone(),
            at: pressed,
        },
    );
    dispatch(state, AppMsg::KeyRelease { key, at: released });
}

/// Mouse presses are the touch surface: a press on a keypad button is held
/// until the button comes back up.
pub(crate) fn handle_mouse(state: &mut AppState, kind: MouseEventKind, col: u16, row: u16) {
    let now = Instant::now();
    match kind {
        MouseEventKind::Down(MouseButton::Left) => {
            if state.confirm.is_some() {
                let answer = state.confirm.as_ref().and_then(|d| d.button_at(col, row));
                if let Some(accepted) = answer {
                    dispatch(state, AppMsg::ConfirmClosed { accepted });
                }
                return;
            }
            if let Some(key) = state.keypad.key_at(col, row) {
                state.keypad.pressed = Some(key.clone());
                dispatch(state, AppMsg::KeyPress { key, at: now });
                return;
            }
            let hit = state
                .form_hits
                .iter()
                .find(|(r, _)| crate::widgets::chrome::contains(*r, col, row))
                .map(|(_, h)| *h);
            match hit {
                Some(FormHit::Field(field)) => dispatch(state, AppMsg::TapField(field)),
                Some(FormHit::Trend(group, trend)) => {
                    dispatch(state, AppMsg::SetTrend { group, trend })
                }
                Some(FormHit::Submit) => dispatch(state, AppMsg::Submit),
                None => {}
            }
        }
        MouseEventKind::Up(MouseButton::Left) => {
            if let Some(key) = state.keypad.pressed.take() {
                dispatch(state, AppMsg::KeyRelease { key, at: now });
            }
        }
        _ => {}
    }
}

fn copy_last_submitted(state: &mut AppState) {
    let Some(snapshot) = &state.session.last_submitted else {
        state.show_toast("Nothing submitted yet", ToastLevel::Info, 2);
        return;
    };
    let content = match serde_json::to_string_pretty(snapshot) {
        Ok(s) => s,
        Err(e) => {
            state.show_toast(format!("Copy failed: {e}"), ToastLevel::Error, 3);
            return;
        }
    };
    match arboard::Clipboard::new().and_then(|mut c| c.set_text(content)) {
        Ok(()) => {
            state.dbg("copied last submitted snapshot");
            state.show_toast("Copied to clipboard!", ToastLevel::Success, 2);
        }
        Err(e) => {
            let msg = format!("Clipboard unavailable: {e}");
            state.dbg(&msg);
            state.show_toast(msg, ToastLevel::Error, 3);
        }
    }
}

fn env_flag(name: &str) -> bool {
    std::env::var(name)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true") || v.eq_ignore_ascii_case("yes"))
        .unwrap_or(false)
}

pub fn run() -> Result<()> {
    let (cfg, source) = match load_config()? {
        Some((cfg, path)) => (cfg, Some(path)),
        None => (KioskConfig::default(), None),
    };
    let mut state = match validate_kiosk_config(&cfg) {
        Ok(()) => AppState::new(cfg),
        Err(e) => {
            let mut state = AppState::default();
            let msg = format!("Invalid config, using defaults: {e}");
            state.dbg(&msg);
            state.last_error = Some(msg.clone());
            state.show_toast(msg, ToastLevel::Error, 5);
            state
        }
    };
    match source {
        Some(p) => state.dbg(format!("config: {}", p.display())),
        None => state.dbg("config: built-in defaults"),
    }
    if env_flag("KIOSK_HEADLESS") {
        return run_headless(&mut state);
    }
    run_interactive(&mut state)
}

fn run_headless(state: &mut AppState) -> Result<()> {
    let ticks: u64 = std::env::var("KIOSK_TICKS")
        .ok()
        .and_then(|s| s.parse::<u64>().ok())
        .unwrap_or(10);
    let summary = env_flag("KIOSK_SMOKE_SUMMARY");
    let mut steps: VecDeque<Intent> = match std::env::var("KIOSK_HEADLESS_SCRIPT") {
        Ok(script) => match parse_script(&script) {
            Ok(steps) => steps.into(),
            Err(e) => {
                let msg = format!("script: {e}");
                state.dbg(&msg);
                state.last_error = Some(msg);
                VecDeque::new()
            }
        },
        Err(_) => VecDeque::new(),
    };
    let backend = ratatui::backend::TestBackend::new(100, 30);
    let mut terminal = Terminal::new(backend)?;
    // Scripted time runs on its own clock so long presses need no real waiting.
    let mut now = Instant::now();
    let mut executed = 0usize;
    let total = ticks.max(steps.len() as u64);
    for _ in 0..total {
        terminal.draw(|f| ui(f, state))?;
        if let Some(intent) = steps.pop_front() {
            now = handle_intent(state, intent, now);
            executed += 1;
        }
        now += TICK_RATE;
        state.tick = state.tick.wrapping_add(1);
    }
    terminal.draw(|f| ui(f, state))?;
    if summary {
        let out = serde_json::json!({
            "ok": state.last_error.is_none(),
            "steps": executed,
            "active_field": state.session.editor.active().map(FieldId::name),
            "layout": state.keyboard.layout(),
            "shift_lock": state.keyboard.shift_lock(),
            "confirm_open": state.confirm.is_some(),
            "form": state.session.form.snapshot(),
            "submitted": state.session.last_submitted,
            "toast": state.toast.as_ref().map(|t| t.text.clone()),
        });
        println!("{out}");
    }
    Ok(())
}

fn run_interactive(state: &mut AppState) -> Result<()> {
    enable_raw_mode().context("enabling raw mode")?;
    let mut stdout = std::io::stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;
    let mut last_tick = Instant::now();
    let res = loop {
        if let Err(e) = terminal.draw(|f| ui(f, state)) {
            break Err(e.into());
        }
        let timeout = TICK_RATE
            .checked_sub(last_tick.elapsed())
            .unwrap_or_else(|| Duration::from_millis(0));
        match poll_event(timeout) {
            Ok(Some(Event::Key(key))) if key.kind == KeyEventKind::Press => {
                if let Some(intent) = map_key(key.code, key.modifiers, state.confirm.is_some()) {
                    // Physical keys have no hold time.
                    match intent {
                        Intent::Key(k) => {
                            let now = Instant::now();
                            press_and_release(state, k, now, now);
                        }
                        other => {
                            handle_intent(state, other, Instant::now());
                        }
                    }
                }
            }
            Ok(Some(Event::Mouse(m))) => handle_mouse(state, m.kind, m.column, m.row),
            Ok(_) => {}
            Err(e) => break Err(e),
        }
        if state.quit {
            break Ok(());
        }
        if last_tick.elapsed() >= TICK_RATE {
            state.tick = state.tick.wrapping_add(1);
            last_tick = Instant::now();
        }
    };
    // Restore
    disable_raw_mode()?;
    let mut stdout = std::io::stdout();
    execute!(stdout, LeaveAlternateScreen, DisableMouseCapture)?;
    terminal.show_cursor()?;
    res
}

fn poll_event(timeout: Duration) -> Result<Option<Event>> {
    if event::poll(timeout).context("polling terminal events")? {
        return Ok(Some(event::read().context("reading terminal event")?));
    }
    Ok(None)
}

/// Where `kiosk.yaml` lives: `<cwd>/kiosk.yaml`, `<cwd>/.kiosk/kiosk.yaml`,
/// then `<ancestor>/.kiosk/kiosk.yaml`, then `<home>/.kiosk/kiosk.yaml`.
pub(crate) fn discover_config(cwd: &Path, home: Option<&Path>) -> Option<PathBuf> {
    let candidates = [
        cwd.join(CONFIG_FILE),
        cwd.join(CONFIG_DIR).join(CONFIG_FILE),
    ];
    if let Some(p) = candidates.into_iter().find(|p| p.exists()) {
        return Some(p);
    }
    let mut cur = cwd;
    while let Some(parent) = cur.parent() {
        let p = parent.join(CONFIG_DIR).join(CONFIG_FILE);
        if p.exists() {
            return Some(p);
        }
        cur = parent;
    }
    home.map(|h| h.join(CONFIG_DIR).join(CONFIG_FILE))
        .filter(|p| p.exists())
}

fn read_config(path: &Path) -> Result<KioskConfig> {
    let s = fs::read_to_string(path).with_context(|| format!("reading {path:?}"))?;
    serde_yaml::from_str(&s).with_context(|| format!("parsing {path:?}"))
}

fn load_config() -> Result<Option<(KioskConfig, PathBuf)>> {
    // KIOSK_CONFIG_DIR, when set, must hold kiosk.yaml
    if let Ok(base) = std::env::var("KIOSK_CONFIG_DIR") {
        let entry = PathBuf::from(base).join(CONFIG_FILE);
        let cfg = read_config(&entry)?;
        return Ok(Some((cfg, entry)));
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    let home = std::env::var("HOME")
        .ok()
        .or_else(|| std::env::var("USERPROFILE").ok())
        .map(PathBuf::from);
    match discover_config(&cwd, home.as_deref()) {
        Some(p) => Ok(Some((read_config(&p)?, p))),
        None => Ok(None),
    }
}

fn ui(f: &mut Frame, state: &mut AppState) {
    // Clear expired toast
    if let Some(t) = &state.toast {
        if state.tick >= t.expires_at_tick {
            state.toast = None;
        }
    }

    let screen = f.area();
    let bg = Block::default().style(Style::default().bg(state.theme.bg).fg(state.theme.fg));
    f.render_widget(bg, screen);

    let debug_h = if state.show_debug { 8 } else { 0 };
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(10),
            Constraint::Length(debug_h),
            Constraint::Length(1),
        ])
        .split(screen);
    let cols = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(rows[0]);

    state.form_hits = draw_form_panel(
        f,
        cols[0],
        &state.session,
        &state.config.labels,
        &state.config.title,
        &state.theme,
        state.tick,
    );
    let keypad_focused = state.session.editor.active().is_some();
    state.keypad.render(f, cols[1], keypad_focused, state.tick);
    if state.show_debug {
        draw_debug_log(f, rows[1], state);
    }
    draw_status(f, rows[2], state);

    if let Some(d) = &mut state.confirm {
        d.render(f, screen, true, state.tick);
    }
}
