pub mod editor;
pub mod form;
pub mod keyboard;
pub mod keys;
pub mod layouts;
pub mod validators;

use editor::{FieldEditor, KeyOutcome};
use form::{validate_form, FieldErrors, FieldId, FormState, Snapshot, Trend, TrendGroup};
use keys::KeySymbol;

#[derive(Clone, Debug, PartialEq)]
pub enum SubmitOutcome {
    /// Some fields are missing or invalid; every field is now marked touched.
    Invalid(FieldErrors),
    /// The form is valid; the snapshot goes to the confirmation dialog.
    Ready(Snapshot),
}

/// One kiosk form: committed values, the edit in progress, and the last
/// submitted snapshot.
#[derive(Clone, Debug, Default)]
pub struct Session {
    pub form: FormState,
    pub editor: FieldEditor,
    pub errors: FieldErrors,
    pub last_submitted: Option<Snapshot>,
}

impl Session {
    pub fn activate(&mut self, field: FieldId) {
        self.editor.activate(&mut self.form, field);
    }

    pub fn handle_key(&mut self, key: &KeySymbol) -> KeyOutcome {
        let out = self.editor.handle_key(&mut self.form, key);
        if matches!(out, KeyOutcome::Committed | KeyOutcome::Cleared) && !self.errors.is_empty() {
            // keep shown errors in step with the committed values
            self.errors = validate_form(&self.form).err().unwrap_or_default();
        }
        out
    }

    pub fn set_trend(&mut self, group: TrendGroup, trend: Trend) {
        self.form.set_trend(group, trend);
    }

    pub fn submit(&mut self) -> SubmitOutcome {
        match validate_form(&self.form) {
            Err(errors) => {
                self.form.touched.mark_all();
                self.errors = errors.clone();
                SubmitOutcome::Invalid(errors)
            }
            Ok(()) => {
                self.errors = FieldErrors::default();
                let snap = self.form.snapshot();
                self.last_submitted = Some(snap.clone());
                SubmitOutcome::Ready(snap)
            }
        }
    }
}
