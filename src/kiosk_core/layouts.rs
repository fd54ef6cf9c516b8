use super::keys::{parse_row, KeySymbol};

pub const DIGITAL: &str = "digital";
pub const DOT_DIGITAL: &str = "dot_digital";
pub const DOT_DIGITAL_PLUS_MINUS: &str = "dot_digital_plus_minus";
pub const NUMBERS: &str = "numbers";

/// Digit-only layouts never change in response to keys.
pub fn is_digital(name: &str) -> bool {
    matches!(name, DIGITAL | DOT_DIGITAL | DOT_DIGITAL_PLUS_MINUS)
}

/// Rows of the named layout, as space-separated key tokens.
pub fn layout_rows(name: &str) -> Option<&'static [&'static str]> {
    let rows: &'static [&'static str] = match name {
        DIGITAL | DOT_DIGITAL => &[
            "7 8 9 {bksp}",
            "4 5 6 {arrowup}",
            "1 2 3 {arrowdown}",
            "0 . {enter}",
        ],
        DOT_DIGITAL_PLUS_MINUS => &[
            "7 8 9 {bksp}",
            "4 5 6 {arrowup}",
            "1 2 3 {arrowdown}",
            "{plus_minus} 0 . {enter}",
        ],
        NUMBERS => &[
            "1 2 3 4 5 6 7 8 9 0",
            "- / : ; ( ) . , ? !",
            "{abc} {space} {bksp} {enter}",
        ],
        "en" => &[
            "q w e r t y u i o p {bksp}",
            "a s d f g h j k l {enter}",
            "{shift} z x c v b n m . {shift}",
            "{numbers} {lang} {space}",
        ],
        "en_shift" => &[
            "Q W E R T Y U I O P {bksp}",
            "A S D F G H J K L {enter}",
            "{shift} Z X C V B N M , {shift}",
            "{numbers} {lang} {space}",
        ],
        "ru" => &[
            "й ц у к е н г ш щ з х ъ {bksp}",
            "ф ы в а п р о л д ж э {enter}",
            "{shift} я ч с м и т ь б ю . {shift}",
            "{numbers} {lang} {space}",
        ],
        "ru_shift" => &[
            "Й Ц У К Е Н Г Ш Щ З Х Ъ {bksp}",
            "Ф Ы В А П Р О Л Д Ж Э {enter}",
            "{shift} Я Ч С М И Т Ь Б Ю , {shift}",
            "{numbers} {lang} {space}",
        ],
        _ => return None,
    };
    Some(rows)
}

/// True for a base language id such as `en`: a letter layout that also has a
/// `<lang>_shift` companion.
pub fn is_language(name: &str) -> bool {
    if is_digital(name) || name == NUMBERS || layout_rows(name).is_none() {
        return false;
    }
    layout_rows(&format!("{name}_shift")).is_some()
}

pub fn layout_keys(name: &str) -> Vec<Vec<KeySymbol>> {
    layout_rows(name)
        .unwrap_or(&[])
        .iter()
        .map(|r| parse_row(r))
        .collect()
}

/// Cycles through the configured languages and names the default and shift
/// layouts for the current one.
#[derive(Clone, Debug)]
pub struct LangLayouts {
    langs: Vec<String>,
    idx: usize,
    numeric: bool,
    default: String,
    shift: String,
}

impl LangLayouts {
    /// With `numeric` set both layouts are always [`DIGITAL`].
    pub fn new(langs: Vec<String>, numeric: bool) -> Self {
        let mut l = Self {
            langs,
            idx: 0,
            numeric,
            default: String::new(),
            shift: String::new(),
        };
        l.update();
        l
    }

    fn update(&mut self) {
        if self.numeric {
            self.default = DIGITAL.to_string();
            self.shift = DIGITAL.to_string();
            return;
        }
        let lang = self.name().to_string();
        self.shift = format!("{lang}_shift");
        self.default = lang;
    }

    pub fn next(&mut self) {
        if !self.langs.is_empty() {
            self.idx = (self.idx + 1) % self.langs.len();
        }
        self.update();
    }

    pub fn name(&self) -> &str {
        self.langs.get(self.idx).map(String::as_str).unwrap_or("en")
    }

    pub fn default_layout(&self) -> &str {
        &self.default
    }

    pub fn shift_layout(&self) -> &str {
        &self.shift
    }
}
