use regex::Regex;
use std::sync::OnceLock;

pub const SECONDS_MAX: u32 = 59;
pub const TEMPERATURE_MAX_FRACTION_DIGITS: usize = 2;

fn temperature_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d*\.?\d*$").expect("static temperature pattern"))
}

/// Accepts a (possibly partial) temperature literal.
///
/// Empty text is valid and means "no value yet". Digits with at most one `.`
/// and at most two digits after it are valid; anything else is rejected.
pub fn validate_temperature_text(text: &str) -> bool {
    if text.is_empty() {
        return true;
    }
    if !temperature_pattern().is_match(text) {
        return false;
    }
    match text.split_once('.') {
        Some((_, frac)) => frac.chars().count() <= TEMPERATURE_MAX_FRACTION_DIGITS,
        None => true,
    }
}

pub fn validate_seconds(n: i64) -> u32 {
    n.clamp(0, SECONDS_MAX as i64) as u32
}

pub fn validate_minutes(n: i64) -> Option<u32> {
    if n < 0 {
        return None;
    }
    u32::try_from(n).ok()
}

/// Rounds to the number of fractional digits a temperature may carry.
pub fn round_temperature(v: f64) -> f64 {
    let scaled = v * 100.0;
    if !scaled.is_finite() {
        return v;
    }
    scaled.round() / 100.0
}
