//! Routes keypad symbols into the currently active form field.
//!
//! [`FieldEditor`] owns the active-field selector and the edit buffer. Typing only
//! touches the buffer and the live value; the committed [`FormState`] changes on
//! `{enter}` alone.

use super::form::{FieldId, FieldValue, FormState};
use super::keys::KeySymbol;
use super::validators::{
    round_temperature, validate_minutes, validate_seconds, validate_temperature_text,
};

/// What a key did to the editor; the shell only logs it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyOutcome {
    /// No field is active.
    Ignored,
    /// The key is not acceptable for the active field; nothing changed.
    Rejected,
    /// The buffer and live value were updated.
    Edited,
    /// The buffer was written to the form and the field deactivated.
    Committed,
    /// An empty buffer reset the committed value to null.
    Cleared,
    /// The buffer could not be parsed; the committed value was kept.
    Dropped,
}

#[derive(Clone, Debug, Default)]
pub struct FieldEditor {
    active: Option<FieldId>,
    buffer: String,
    live: Option<FieldValue>,
}

impl FieldEditor {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn active(&self) -> Option<FieldId> {
        self.active
    }

    pub fn buffer(&self) -> &str {
        &self.buffer
    }

    pub fn live(&self) -> Option<FieldValue> {
        self.live
    }

    /// Makes `field` the input target, discarding any uncommitted edit of the
    /// previously active field.
    pub fn activate(&mut self, form: &mut FormState, field: FieldId) {
        let current = form.value(field);
        self.active = Some(field);
        self.buffer = current.map(|v| v.to_string()).unwrap_or_default();
        self.live = current;
        form.touched.mark(field);
    }

    /// Text shown for `field`: the buffer while it is being edited, otherwise the
    /// committed value.
    pub fn display_text(&self, form: &FormState, field: FieldId) -> String {
        if self.active == Some(field) {
            return self.buffer.clone();
        }
        form.value(field).map(|v| v.to_string()).unwrap_or_default()
    }

    pub fn handle_key(&mut self, form: &mut FormState, key: &KeySymbol) -> KeyOutcome {
        let Some(field) = self.active else {
            return KeyOutcome::Ignored;
        };
        match key {
            KeySymbol::Backspace => self.backspace(field),
            KeySymbol::Enter => self.commit(form),
            KeySymbol::ArrowUp => self.step(field, 1),
            KeySymbol::ArrowDown => self.step(field, -1),
            _ if field.is_integer() => self.type_integer(field, key),
            _ => self.type_temperature(key),
        }
    }

    fn type_integer(&mut self, field: FieldId, key: &KeySymbol) -> KeyOutcome {
        let KeySymbol::Char(c) = key else {
            return KeyOutcome::Rejected;
        };
        if !c.is_ascii_digit() {
            return KeyOutcome::Rejected;
        }
        let mut candidate = self.buffer.clone();
        candidate.push(*c);
        if self.reflect_integer(field, candidate) {
            KeyOutcome::Edited
        } else {
            KeyOutcome::Rejected
        }
    }

    /// Parses `text` as the integer field's value and stores both buffer and
    /// live value. Seconds are clamped and the clamped value replaces the text.
    fn reflect_integer(&mut self, field: FieldId, text: String) -> bool {
        let Ok(n) = text.parse::<u32>() else {
            return false;
        };
        match field {
            FieldId::Seconds => {
                let clamped = validate_seconds(n as i64);
                self.buffer = if clamped == n { text } else { clamped.to_string() };
                self.live = Some(FieldValue::Integer(clamped));
            }
            _ => {
                let Some(m) = validate_minutes(n as i64) else {
                    return false;
                };
                self.buffer = text;
                self.live = Some(FieldValue::Integer(m));
            }
        }
        true
    }

    fn type_temperature(&mut self, key: &KeySymbol) -> KeyOutcome {
        let KeySymbol::Char(c) = key else {
            return KeyOutcome::Rejected;
        };
        if *c == '.' && self.buffer.contains('.') {
            return KeyOutcome::Rejected;
        }
        let mut candidate = self.buffer.clone();
        candidate.push(*c);
        if !validate_temperature_text(&candidate) {
            return KeyOutcome::Rejected;
        }
        let live = match candidate.parse::<f64>() {
            Ok(v) if !v.is_finite() => return KeyOutcome::Rejected,
            Ok(v) => Some(FieldValue::Decimal(v)),
            Err(_) => None,
        };
        self.live = live;
        self.buffer = candidate;
        KeyOutcome::Edited
    }

    fn backspace(&mut self, field: FieldId) -> KeyOutcome {
        if self.buffer.is_empty() {
            return KeyOutcome::Ignored;
        }
        match (field, self.buffer.find('.')) {
            (FieldId::Temperature, Some(point)) if point + 1 == self.buffer.len() => {
                self.buffer.truncate(point);
            }
            _ => {
                self.buffer.pop();
            }
        }
        self.live = match field {
            FieldId::Temperature => self.buffer.parse::<f64>().ok().map(FieldValue::Decimal),
            _ => self.buffer.parse::<u32>().ok().map(FieldValue::Integer),
        };
        KeyOutcome::Edited
    }

    fn step(&mut self, field: FieldId, delta: i32) -> KeyOutcome {
        let current = self.live.map(FieldValue::as_f64).unwrap_or(0.0);
        let next = current + delta as f64;
        if next < 0.0 {
            return KeyOutcome::Rejected;
        }
        if field.is_integer() {
            let n = next.floor() as u64;
            if !self.reflect_integer(field, n.to_string()) {
                return KeyOutcome::Rejected;
            }
        } else {
            let v = round_temperature(next);
            if !v.is_finite() {
                return KeyOutcome::Rejected;
            }
            self.buffer = v.to_string();
            self.live = Some(FieldValue::Decimal(v));
        }
        KeyOutcome::Edited
    }

    /// Writes the buffer into the committed form state.
    pub fn commit(&mut self, form: &mut FormState) -> KeyOutcome {
        let Some(field) = self.active else {
            return KeyOutcome::Ignored;
        };
        if self.buffer.trim().is_empty() {
            form.store(field, None);
            self.buffer.clear();
            self.live = None;
            return KeyOutcome::Cleared;
        }
        let outcome = match self.buffer.trim().parse::<f64>() {
            Ok(v) if form.store(field, Some(v)) => KeyOutcome::Committed,
            _ => KeyOutcome::Dropped,
        };
        self.buffer.clear();
        self.live = None;
        self.active = None;
        outcome
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn type_keys(ed: &mut FieldEditor, form: &mut FormState, keys: &str) -> Vec<KeyOutcome> {
        crate::kiosk_core::keys::parse_row(keys)
            .iter()
            .map(|k| ed.handle_key(form, k))
            .collect()
    }

    #[test]
    fn keys_are_ignored_without_active_field() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        assert_eq!(type_keys(&mut ed, &mut form, "5 {enter}"), vec![KeyOutcome::Ignored; 2]);
        assert_eq!(form, FormState::default());
    }

    #[test]
    fn activation_seeds_buffer_from_committed_value() {
        let mut form = FormState::default();
        form.temperature.value = Some(21.5);
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Temperature);
        assert_eq!(ed.buffer(), "21.5");
        assert!(form.touched.temperature);
        ed.activate(&mut form, FieldId::Minutes);
        assert_eq!(ed.buffer(), "");
        assert_eq!(ed.active(), Some(FieldId::Minutes));
    }

    #[test]
    fn temperature_stops_at_two_fraction_digits() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Temperature);
        let out = type_keys(&mut ed, &mut form, "1 2 . 3 4 5");
        assert_eq!(out[5], KeyOutcome::Rejected);
        assert_eq!(ed.buffer(), "12.34");
        assert_eq!(ed.live(), Some(FieldValue::Decimal(12.34)));
    }

    #[test]
    fn temperature_rejects_second_point_and_letters() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Temperature);
        type_keys(&mut ed, &mut form, "1 . . a {plus_minus} 5");
        assert_eq!(ed.buffer(), "1.5");
    }

    #[test]
    fn backspace_removes_fraction_digits_then_point() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Temperature);
        type_keys(&mut ed, &mut form, "1 2 . 5");
        type_keys(&mut ed, &mut form, "{bksp}");
        assert_eq!(ed.buffer(), "12.");
        type_keys(&mut ed, &mut form, "{bksp}");
        assert_eq!(ed.buffer(), "12");
        type_keys(&mut ed, &mut form, "{bksp} {bksp}");
        assert_eq!(ed.buffer(), "");
        assert_eq!(ed.live(), None);
        assert_eq!(type_keys(&mut ed, &mut form, "{bksp}"), vec![KeyOutcome::Ignored]);
    }

    #[test]
    fn seconds_never_exceed_fifty_nine() {
        for digits in ["7 5", "9 9 9", "5 9", "0 0 7", "6 0 {arrowup}"] {
            let mut form = FormState::default();
            let mut ed = FieldEditor::new();
            ed.activate(&mut form, FieldId::Seconds);
            type_keys(&mut ed, &mut form, digits);
            assert_eq!(ed.commit(&mut form), KeyOutcome::Committed);
            let s = form.time.seconds.unwrap();
            assert!(s <= 59, "{digits} committed {s}");
        }
        let mut form = FormState::default();
        form.time.seconds = Some(59);
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Seconds);
        type_keys(&mut ed, &mut form, "{bksp} {bksp} 7 5");
        assert_eq!(ed.buffer(), "59");
        assert_eq!(ed.live(), Some(FieldValue::Integer(59)));
    }

    #[test]
    fn minutes_accept_digits_only() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Minutes);
        let out = type_keys(&mut ed, &mut form, "1 . 2 x");
        assert_eq!(
            out,
            vec![
                KeyOutcome::Edited,
                KeyOutcome::Rejected,
                KeyOutcome::Edited,
                KeyOutcome::Rejected
            ]
        );
        assert_eq!(ed.commit(&mut form), KeyOutcome::Committed);
        assert_eq!(form.time.minutes, Some(12));
        assert_eq!(ed.active(), None);
    }

    #[test]
    fn minutes_reject_overflowing_digit() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Minutes);
        type_keys(&mut ed, &mut form, "4 2 9 4 9 6 7 2 9 6");
        assert_eq!(ed.buffer(), "429496729");
    }

    #[test]
    fn arrow_down_at_zero_is_rejected() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Minutes);
        type_keys(&mut ed, &mut form, "0");
        assert_eq!(type_keys(&mut ed, &mut form, "{arrowdown}"), vec![KeyOutcome::Rejected]);
        assert_eq!(ed.buffer(), "0");
        assert_eq!(ed.live(), Some(FieldValue::Integer(0)));

        ed.activate(&mut form, FieldId::Temperature);
        assert_eq!(type_keys(&mut ed, &mut form, "{arrowdown}"), vec![KeyOutcome::Rejected]);
        assert_eq!(ed.buffer(), "");
    }

    #[test]
    fn arrows_step_from_live_value() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Temperature);
        type_keys(&mut ed, &mut form, "{arrowup}");
        assert_eq!(ed.buffer(), "1");
        type_keys(&mut ed, &mut form, ". 0 7 {arrowup}");
        assert_eq!(ed.buffer(), "2.07");
        assert!(validate_temperature_text(ed.buffer()));

        ed.activate(&mut form, FieldId::Seconds);
        type_keys(&mut ed, &mut form, "5 9 {arrowup}");
        assert_eq!(ed.buffer(), "59");
        type_keys(&mut ed, &mut form, "{arrowdown}");
        assert_eq!(ed.buffer(), "58");
    }

    #[test]
    fn committing_empty_buffer_resets_to_null() {
        let mut form = FormState::default();
        form.time.minutes = Some(5);
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Minutes);
        type_keys(&mut ed, &mut form, "{bksp}");
        assert_eq!(ed.commit(&mut form), KeyOutcome::Cleared);
        assert_eq!(form.time.minutes, None);
        assert_eq!(ed.active(), Some(FieldId::Minutes));
        assert_eq!(ed.buffer(), "");
    }

    #[test]
    fn unparseable_commit_keeps_prior_value() {
        let mut form = FormState::default();
        form.temperature.value = Some(3.0);
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Temperature);
        type_keys(&mut ed, &mut form, "{bksp} .");
        assert_eq!(ed.buffer(), ".");
        assert_eq!(ed.commit(&mut form), KeyOutcome::Dropped);
        assert_eq!(form.temperature.value, Some(3.0));
        assert_eq!(ed.active(), None);
    }

    #[test]
    fn temperature_never_overflows_to_infinity() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Temperature);
        let mut rejected = false;
        for _ in 0..400 {
            if ed.handle_key(&mut form, &KeySymbol::Char('9')) == KeyOutcome::Rejected {
                rejected = true;
            }
        }
        assert!(rejected);
        let live = ed.live().map(FieldValue::as_f64).unwrap();
        assert!(live.is_finite());
        assert!(validate_temperature_text(ed.buffer()));

        assert_eq!(ed.handle_key(&mut form, &KeySymbol::ArrowUp), KeyOutcome::Edited);
        assert!(validate_temperature_text(ed.buffer()));
        assert_ne!(ed.buffer(), "inf");

        assert_eq!(ed.commit(&mut form), KeyOutcome::Committed);
        assert!(form.temperature.value.map(f64::is_finite).unwrap_or(false));
    }

    #[test]
    fn store_refuses_non_finite_temperature() {
        let mut form = FormState::default();
        form.temperature.value = Some(20.0);
        assert!(!form.store(FieldId::Temperature, Some(f64::INFINITY)));
        assert!(!form.store(FieldId::Temperature, Some(f64::NAN)));
        assert_eq!(form.temperature.value, Some(20.0));
    }

    #[test]
    fn switching_fields_discards_uncommitted_edit() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Minutes);
        type_keys(&mut ed, &mut form, "5");
        ed.activate(&mut form, FieldId::Seconds);
        assert_eq!(form.time.minutes, None);
        assert_eq!(ed.buffer(), "");
        assert_eq!(ed.display_text(&form, FieldId::Minutes), "");
    }

    #[test]
    fn enter_commits_temperature_and_deactivates() {
        let mut form = FormState::default();
        let mut ed = FieldEditor::new();
        ed.activate(&mut form, FieldId::Temperature);
        let out = type_keys(&mut ed, &mut form, "3 6 . 6 {enter}");
        assert_eq!(out.last(), Some(&KeyOutcome::Committed));
        assert_eq!(form.temperature.value, Some(36.6));
        assert_eq!(ed.active(), None);
        assert_eq!(ed.display_text(&form, FieldId::Temperature), "36.6");
    }
}
