use super::validators::{
    validate_minutes, validate_seconds, validate_temperature_text, SECONDS_MAX,
};
use serde::Serialize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Trend {
    Ascending,
    Descending,
    #[default]
    Disabled,
}

impl Trend {
    pub const ALL: [Trend; 3] = [Trend::Ascending, Trend::Descending, Trend::Disabled];

    pub fn label(self) -> &'static str {
        match self {
            Trend::Ascending => "Ascending",
            Trend::Descending => "Descending",
            Trend::Disabled => "Disabled",
        }
    }

    pub fn next(self) -> Trend {
        match self {
            Trend::Ascending => Trend::Descending,
            Trend::Descending => Trend::Disabled,
            Trend::Disabled => Trend::Ascending,
        }
    }
}

/// A form field that accepts keypad input.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum FieldId {
    Temperature,
    Minutes,
    Seconds,
}

impl FieldId {
    pub const ALL: [FieldId; 3] = [FieldId::Temperature, FieldId::Minutes, FieldId::Seconds];

    pub fn name(self) -> &'static str {
        match self {
            FieldId::Temperature => "temperature",
            FieldId::Minutes => "minutes",
            FieldId::Seconds => "seconds",
        }
    }

    pub fn from_name(s: &str) -> Option<FieldId> {
        FieldId::ALL.into_iter().find(|f| f.name() == s)
    }

    pub fn is_integer(self) -> bool {
        !matches!(self, FieldId::Temperature)
    }
}

/// Which trend group a radio selection applies to.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TrendGroup {
    Temperature,
    Time,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TemperatureSetpoint {
    pub value: Option<f64>,
    pub trend: Trend,
}

#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct TimeSetpoint {
    pub minutes: Option<u32>,
    pub seconds: Option<u32>,
    pub trend: Trend,
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Touched {
    pub temperature: bool,
    pub minutes: bool,
    pub seconds: bool,
}

impl Touched {
    pub fn mark(&mut self, field: FieldId) {
        match field {
            FieldId::Temperature => self.temperature = true,
            FieldId::Minutes => self.minutes = true,
            FieldId::Seconds => self.seconds = true,
        }
    }

    pub fn mark_all(&mut self) {
        for f in FieldId::ALL {
            self.mark(f);
        }
    }

    pub fn get(&self, field: FieldId) -> bool {
        match field {
            FieldId::Temperature => self.temperature,
            FieldId::Minutes => self.minutes,
            FieldId::Seconds => self.seconds,
        }
    }
}

/// Committed, validated setpoints.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FormState {
    pub temperature: TemperatureSetpoint,
    pub time: TimeSetpoint,
    pub touched: Touched,
}

/// Numeric view of a committed value, shared by every field type.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum FieldValue {
    Decimal(f64),
    Integer(u32),
}

impl FieldValue {
    pub fn as_f64(self) -> f64 {
        match self {
            FieldValue::Decimal(v) => v,
            FieldValue::Integer(n) => n as f64,
        }
    }
}

impl std::fmt::Display for FieldValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            FieldValue::Decimal(v) => write!(f, "{v}"),
            FieldValue::Integer(n) => write!(f, "{n}"),
        }
    }
}

impl FormState {
    pub fn value(&self, field: FieldId) -> Option<FieldValue> {
        match field {
            FieldId::Temperature => self.temperature.value.map(FieldValue::Decimal),
            FieldId::Minutes => self.time.minutes.map(FieldValue::Integer),
            FieldId::Seconds => self.time.seconds.map(FieldValue::Integer),
        }
    }

    /// Writes a parsed value into the committed state, normalizing it through
    /// the field's rule. Returns false when the rule rejects the value.
    pub(crate) fn store(&mut self, field: FieldId, value: Option<f64>) -> bool {
        match (field, value) {
            (FieldId::Temperature, Some(v)) if !v.is_finite() => false,
            (FieldId::Temperature, v) => {
                self.temperature.value = v;
                true
            }
            (FieldId::Minutes, None) => {
                self.time.minutes = None;
                true
            }
            (FieldId::Minutes, Some(v)) => match validate_minutes(v.floor() as i64) {
                Some(m) => {
                    self.time.minutes = Some(m);
                    true
                }
                None => false,
            },
            (FieldId::Seconds, None) => {
                self.time.seconds = None;
                true
            }
            (FieldId::Seconds, Some(v)) => {
                self.time.seconds = Some(validate_seconds(v.floor() as i64));
                true
            }
        }
    }

    pub fn trend(&self, group: TrendGroup) -> Trend {
        match group {
            TrendGroup::Temperature => self.temperature.trend,
            TrendGroup::Time => self.time.trend,
        }
    }

    pub fn set_trend(&mut self, group: TrendGroup, trend: Trend) {
        match group {
            TrendGroup::Temperature => self.temperature.trend = trend,
            TrendGroup::Time => self.time.trend = trend,
        }
    }

    pub fn snapshot(&self) -> Snapshot {
        Snapshot {
            temperature: self.temperature.clone(),
            time: self.time.clone(),
        }
    }
}

/// The payload handed to the confirmation dialog on a successful submit.
#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct Snapshot {
    pub temperature: TemperatureSetpoint,
    pub time: TimeSetpoint,
}

impl Snapshot {
    pub fn summary_lines(&self) -> Vec<String> {
        let fmt_opt = |v: Option<String>| v.unwrap_or_else(|| "—".into());
        vec![
            format!(
                "Temperature: {} °C, trend: {}",
                fmt_opt(self.temperature.value.map(|v| v.to_string())),
                self.temperature.trend.label()
            ),
            format!(
                "Time: {} min {} s, trend: {}",
                fmt_opt(self.time.minutes.map(|v| v.to_string())),
                fmt_opt(self.time.seconds.map(|v| v.to_string())),
                self.time.trend.label()
            ),
        ]
    }
}

#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldErrors {
    pub temperature: Option<&'static str>,
    pub minutes: Option<&'static str>,
    pub seconds: Option<&'static str>,
}

impl FieldErrors {
    pub fn is_empty(&self) -> bool {
        self.temperature.is_none() && self.minutes.is_none() && self.seconds.is_none()
    }

    pub fn get(&self, field: FieldId) -> Option<&'static str> {
        match field {
            FieldId::Temperature => self.temperature,
            FieldId::Minutes => self.minutes,
            FieldId::Seconds => self.seconds,
        }
    }
}

const REQUIRED: &str = "This field is required";

/// Whole-form check run on submit: every value is required and must satisfy
/// its field rule.
pub fn validate_form(form: &FormState) -> Result<(), FieldErrors> {
    let mut errors = FieldErrors::default();
    match form.temperature.value {
        None => errors.temperature = Some(REQUIRED),
        Some(v) => {
            if !v.is_finite() || v < 0.0 || !validate_temperature_text(&v.to_string()) {
                errors.temperature = Some("At most two digits after the point");
            }
        }
    }
    if form.time.minutes.is_none() {
        errors.minutes = Some(REQUIRED);
    }
    match form.time.seconds {
        None => errors.seconds = Some(REQUIRED),
        Some(s) if s > SECONDS_MAX => errors.seconds = Some("Must be between 0 and 59"),
        Some(_) => {}
    }
    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}
