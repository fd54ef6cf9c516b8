use std::fmt;

/// A key symbol as delivered by the virtual keyboard.
///
/// Control keys travel as `{name}` tokens, printable keys as the character itself.
#[derive(Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum KeySymbol {
    Char(char),
    Backspace,
    Enter,
    ArrowUp,
    ArrowDown,
    Shift,
    Lock,
    Lang,
    Numbers,
    Abc,
    Space,
    Tab,
    PlusMinus,
    Other(String),
}

impl KeySymbol {
    pub fn parse(token: &str) -> Option<KeySymbol> {
        if token.is_empty() {
            return None;
        }
        let sym = match token {
            "{bksp}" => KeySymbol::Backspace,
            "{enter}" => KeySymbol::Enter,
            "{arrowup}" => KeySymbol::ArrowUp,
            "{arrowdown}" => KeySymbol::ArrowDown,
            "{shift}" => KeySymbol::Shift,
            "{lock}" => KeySymbol::Lock,
            "{lang}" => KeySymbol::Lang,
            "{numbers}" => KeySymbol::Numbers,
            "{abc}" => KeySymbol::Abc,
            "{space}" => KeySymbol::Space,
            "{tab}" => KeySymbol::Tab,
            "{plus_minus}" => KeySymbol::PlusMinus,
            t if t.starts_with('{') && t.ends_with('}') && t.len() > 2 => {
                KeySymbol::Other(t.to_string())
            }
            t => {
                let mut chars = t.chars();
                match (chars.next(), chars.next()) {
                    (Some(c), None) => KeySymbol::Char(c),
                    _ => KeySymbol::Other(t.to_string()),
                }
            }
        };
        Some(sym)
    }

    /// Token understood by the keyboard collaborator.
    pub fn token(&self) -> String {
        match self {
            KeySymbol::Char(c) => c.to_string(),
            KeySymbol::Backspace => "{bksp}".into(),
            KeySymbol::Enter => "{enter}".into(),
            KeySymbol::ArrowUp => "{arrowup}".into(),
            KeySymbol::ArrowDown => "{arrowdown}".into(),
            KeySymbol::Shift => "{shift}".into(),
            KeySymbol::Lock => "{lock}".into(),
            KeySymbol::Lang => "{lang}".into(),
            KeySymbol::Numbers => "{numbers}".into(),
            KeySymbol::Abc => "{abc}".into(),
            KeySymbol::Space => "{space}".into(),
            KeySymbol::Tab => "{tab}".into(),
            KeySymbol::PlusMinus => "{plus_minus}".into(),
            KeySymbol::Other(s) => s.clone(),
        }
    }
}

impl fmt::Display for KeySymbol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.token())
    }
}

/// Split a layout row such as `"7 8 9 {bksp}"` into symbols.
pub fn parse_row(row: &str) -> Vec<KeySymbol> {
    row.split_whitespace().filter_map(KeySymbol::parse).collect()
}
