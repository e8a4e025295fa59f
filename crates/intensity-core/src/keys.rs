//! Keyboard shortcuts shared by the front-ends.
//!
//! Keys are named the way DOM `KeyboardEvent.key` reports them; the native
//! host translates its key events into the same names.

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum KeyAction {
    Nudge(i32),
    Jump(u8),
    ToggleMode,
    DeepScan,
    DumpCharacteristics,
}

pub fn key_action(key: &str) -> Option<KeyAction> {
    match key {
        "ArrowUp" | "ArrowRight" | "+" | "=" => Some(KeyAction::Nudge(1)),
        "ArrowDown" | "ArrowLeft" | "-" | "_" => Some(KeyAction::Nudge(-1)),
        "PageUp" => Some(KeyAction::Nudge(10)),
        "PageDown" => Some(KeyAction::Nudge(-10)),
        "Home" => Some(KeyAction::Jump(0)),
        "End" => Some(KeyAction::Jump(100)),
        "Tab" | "m" | "M" => Some(KeyAction::ToggleMode),
        "s" | "S" => Some(KeyAction::DeepScan),
        "d" | "D" => Some(KeyAction::DumpCharacteristics),
        _ => None,
    }
}
