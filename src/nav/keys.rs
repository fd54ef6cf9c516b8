use crate::kiosk_core::form::{FieldId, TrendGroup};
use crate::kiosk_core::keyboard::KeyboardMode;
use crate::kiosk_core::keys::KeySymbol;
use crossterm::event::{KeyCode, KeyModifiers};

/// What a physical key or a script token asks the kiosk to do.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Intent {
    Key(KeySymbol),
    /// A key held for the given number of milliseconds.
    Hold(KeySymbol, u64),
    Tap(FieldId),
    NextField,
    PrevField,
    CycleTrend(TrendGroup),
    CycleKeyboardMode,
    Submit,
    ConfirmAnswer(bool),
    /// Answer with whichever dialog button is highlighted.
    ConfirmSelected,
    ConfirmToggle,
    ToggleDebug,
    Copy,
    Quit,
}

pub fn map_key(code: KeyCode, mods: KeyModifiers, dialog_open: bool) -> Option<Intent> {
    let ctrl = mods.contains(KeyModifiers::CONTROL);
    if dialog_open {
        return match code {
            KeyCode::Enter => Some(Intent::ConfirmSelected),
            KeyCode::Esc => Some(Intent::ConfirmAnswer(false)),
            KeyCode::Left | KeyCode::Right | KeyCode::Tab => Some(Intent::ConfirmToggle),
            KeyCode::Char('y') => Some(Intent::ConfirmAnswer(true)),
            KeyCode::Char('n') => Some(Intent::ConfirmAnswer(false)),
            _ => None,
        };
    }
    let intent = match code {
        KeyCode::Char('c') if ctrl => Intent::Copy,
        KeyCode::Char('s') if ctrl => Intent::Submit,
        KeyCode::Char('q') if ctrl => Intent::Quit,
        KeyCode::Char(c) => Intent::Key(KeySymbol::Char(c)),
        KeyCode::Backspace => Intent::Key(KeySymbol::Backspace),
        KeyCode::Enter => Intent::Key(KeySymbol::Enter),
        KeyCode::Up => Intent::Key(KeySymbol::ArrowUp),
        KeyCode::Down => Intent::Key(KeySymbol::ArrowDown),
        KeyCode::Tab => Intent::NextField,
        KeyCode::BackTab => Intent::PrevField,
        KeyCode::F(1) => Intent::Tap(FieldId::Temperature),
        KeyCode::F(2) => Intent::Tap(FieldId::Minutes),
        KeyCode::F(3) => Intent::Tap(FieldId::Seconds),
        KeyCode::F(5) => Intent::CycleTrend(TrendGroup::Temperature),
        KeyCode::F(6) => Intent::CycleTrend(TrendGroup::Time),
        KeyCode::F(7) => Intent::CycleKeyboardMode,
        KeyCode::F(10) => Intent::Submit,
        KeyCode::F(12) => Intent::ToggleDebug,
        KeyCode::Esc => Intent::Quit,
        _ => return None,
    };
    Some(intent)
}

/// Field that Tab (forward) or Shift+Tab moves to from `current`.
pub fn step_field(current: Option<FieldId>, forward: bool) -> FieldId {
    let all = FieldId::ALL;
    let Some(cur) = current else {
        return if forward { all[0] } else { all[all.len() - 1] };
    };
    let idx = all.iter().position(|f| *f == cur).unwrap_or(0);
    let next = if forward {
        (idx + 1) % all.len()
    } else {
        (idx + all.len() - 1) % all.len()
    };
    all[next]
}

pub fn next_keyboard_mode(mode: KeyboardMode) -> KeyboardMode {
    match mode {
        KeyboardMode::Alpha => KeyboardMode::Digital,
        KeyboardMode::Digital => KeyboardMode::DotDigital,
        KeyboardMode::DotDigital => KeyboardMode::DotDigitalPlusMinus,
        KeyboardMode::DotDigitalPlusMinus => KeyboardMode::Alpha,
    }
}

/// Parses a headless script: `@field` taps a field, `!submit`, `!confirm`,
/// `!cancel`, `!trend-temperature`, `!trend-time` and `!mode` run commands,
/// `{key}@ms` holds a key, anything else is a key token.
pub fn parse_script(script: &str) -> Result<Vec<Intent>, String> {
    let mut out = Vec::new();
    for tok in script.split_whitespace() {
        if let Some(name) = tok.strip_prefix('@') {
            let field = FieldId::from_name(name).ok_or_else(|| format!("unknown field '{name}'"))?;
            out.push(Intent::Tap(field));
            continue;
        }
        if let Some(cmd) = tok.strip_prefix('!') {
            let intent = match cmd {
                "submit" => Intent::Submit,
                "confirm" => Intent::ConfirmAnswer(true),
                "cancel" => Intent::ConfirmAnswer(false),
                "trend-temperature" => Intent::CycleTrend(TrendGroup::Temperature),
                "trend-time" => Intent::CycleTrend(TrendGroup::Time),
                "mode" => Intent::CycleKeyboardMode,
                other => return Err(format!("unknown command '!{other}'")),
            };
            out.push(intent);
            continue;
        }
        if let Some((key, ms)) = tok.rsplit_once('@') {
            if !key.is_empty() {
                let ms: u64 = ms
                    .parse()
                    .map_err(|_| format!("bad hold duration in '{tok}'"))?;
                let sym = KeySymbol::parse(key).ok_or_else(|| format!("bad key '{tok}'"))?;
                out.push(Intent::Hold(sym, ms));
                continue;
            }
        }
        let sym = KeySymbol::parse(tok).ok_or_else(|| format!("bad key '{tok}'"))?;
        out.push(Intent::Key(sym));
    }
    Ok(out)
}
