use crate::kiosk_core::editor::KeyOutcome;
use crate::kiosk_core::form::{FieldId, Snapshot, Trend, TrendGroup};
use crate::kiosk_core::keyboard::{Decorations, KeyboardMode};
use crate::kiosk_core::keys::KeySymbol;
use crate::kiosk_core::SubmitOutcome;
use crate::ui::{AppState, ToastLevel};
use std::time::Instant;

pub enum AppMsg {
    TapField(FieldId),
    KeyPress {
        key: KeySymbol,
        at: Instant,
    },
    KeyRelease {
        key: KeySymbol,
        at: Instant,
    },
    SetTrend {
        group: TrendGroup,
        trend: Trend,
    },
    CycleTrend(TrendGroup),
    SetKeyboardMode(KeyboardMode),
    Submit,
    ConfirmClosed {
        accepted: bool,
    },
}

pub enum Effect {
    ApplyLayout {
        layout: String,
        decorations: Decorations,
    },
    OpenConfirm(Snapshot),
    ShowToast {
        text: String,
        level: ToastLevel,
        seconds: u64,
    },
}

fn apply_layout(state: &AppState) -> Effect {
    Effect::ApplyLayout {
        layout: state.keyboard.layout().to_string(),
        decorations: state.keyboard.decorations().clone(),
    }
}

pub fn update(state: &mut AppState, msg: AppMsg) -> Vec<Effect> {
    use AppMsg::*;
    let mut effects: Vec<Effect> = Vec::new();
    // The confirmation dialog is modal: only its own answer gets through.
    if state.confirm.is_some() && !matches!(msg, ConfirmClosed { .. }) {
        return effects;
    }
    match msg {
        TapField(field) => {
            state.session.activate(field);
            state.dbg(format!(
                "activate {} seed={:?}",
                field.name(),
                state.session.editor.buffer()
            ));
            if state.keyboard.set_disable_dot(field.is_integer()) {
                effects.push(apply_layout(state));
            }
        }
        KeyPress { key, at } => {
            state.keyboard.on_key_press(&key, at);
            let outcome = state.session.handle_key(&key);
            match outcome {
                KeyOutcome::Ignored => {}
                KeyOutcome::Rejected => state.dbg(format!("key {key} rejected")),
                KeyOutcome::Edited => state.dbg(format!(
                    "key {key} -> {:?}",
                    state.session.editor.buffer()
                )),
                KeyOutcome::Committed => {
                    state.dbg(format!("key {key} committed"));
                    if state.keyboard.set_disable_dot(false) {
                        effects.push(apply_layout(state));
                    }
                }
                KeyOutcome::Cleared => state.dbg(format!("key {key} cleared field")),
                KeyOutcome::Dropped => {
                    state.dbg(format!("key {key} dropped unparseable input"));
                    if state.keyboard.set_disable_dot(false) {
                        effects.push(apply_layout(state));
                    }
                }
            }
        }
        KeyRelease { key, at } => {
            let was_locked = state.keyboard.shift_lock();
            let changed = state.keyboard.on_key_release(&key, at).map(str::to_string);
            let lock_changed = was_locked != state.keyboard.shift_lock();
            if let Some(layout) = &changed {
                state.dbg(format!("layout -> {layout}"));
            }
            if lock_changed {
                state.dbg(format!("shift lock = {}", state.keyboard.shift_lock()));
            }
            if changed.is_some() || lock_changed {
                effects.push(apply_layout(state));
            }
        }
        SetTrend { group, trend } => {
            state.session.set_trend(group, trend);
            state.dbg(format!("trend {group:?} = {}", trend.label()));
        }
        CycleTrend(group) => {
            let trend = state.session.form.trend(group).next();
            state.session.set_trend(group, trend);
            state.dbg(format!("trend {group:?} = {}", trend.label()));
        }
        SetKeyboardMode(mode) => {
            let layout = state.keyboard.set_mode(mode).to_string();
            let disable = state
                .session
                .editor
                .active()
                .map(FieldId::is_integer)
                .unwrap_or(false);
            state.keyboard.set_disable_dot(disable);
            state.dbg(format!("keyboard mode {mode:?} -> {layout}"));
            effects.push(apply_layout(state));
        }
        Submit => match state.session.submit() {
            SubmitOutcome::Invalid(errors) => {
                let missing: Vec<&str> = FieldId::ALL
                    .into_iter()
                    .filter(|f| errors.get(*f).is_some())
                    .map(FieldId::name)
                    .collect();
                state.dbg(format!("submit rejected: {}", missing.join(", ")));
                effects.push(Effect::ShowToast {
                    text: "Fill in all fields".into(),
                    level: ToastLevel::Error,
                    seconds: 3,
                });
            }
            SubmitOutcome::Ready(snapshot) => {
                let json = serde_json::to_string(&snapshot).unwrap_or_default();
                state.dbg(format!("submit {json}"));
                effects.push(Effect::OpenConfirm(snapshot));
            }
        },
        ConfirmClosed { accepted } => {
            state.confirm = None;
            state.dbg(format!("confirm closed accepted={accepted}"));
            let (text, level) = if accepted {
                ("Setpoints confirmed", ToastLevel::Success)
            } else {
                ("Confirmation cancelled", ToastLevel::Info)
            };
            effects.push(Effect::ShowToast {
                text: text.into(),
                level,
                seconds: 3,
            });
        }
    }
    effects
}
