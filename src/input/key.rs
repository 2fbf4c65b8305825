use std::collections::BTreeSet;
use std::path::PathBuf;

use super::ecodes::{EV_KEY, KEY_LEFTSHIFT, KEY_RIGHTSHIFT};
use super::keymap;
use super::scan::DeviceInfo;
use super::state::Frame;

/// Kernel values of an `EV_KEY` report.
const RELEASE: i32 = 0;
const PRESS: i32 = 1;
const REPEAT: i32 = 2;

/// Key reports of one frame, with the set of keys held at its end.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyEvent {
    pub device: PathBuf,
    pub frame: Frame,
    /// Keys held down once the frame is applied
    pub pressed: BTreeSet<u16>,
    /// Keys let go during this frame
    pub released: BTreeSet<u16>,
}

impl KeyEvent {
    pub fn new(info: &DeviceInfo, frame: Frame) -> KeyEvent {
        let pressed = frame
            .slot_values()
            .map(|values| {
                values
                    .iter()
                    .filter(|((type_, _), value)| *type_ == EV_KEY && **value != RELEASE)
                    .map(|((_, code), _)| *code)
                    .collect()
            })
            .unwrap_or_default();
        let released = frame
            .raw_events
            .iter()
            .filter(|e| e.type_ == EV_KEY && e.value == RELEASE)
            .map(|e| e.code)
            .collect();
        KeyEvent {
            device: info.path.clone(),
            frame,
            pressed,
            released,
        }
    }

    /// The key this frame reports on, the last one if it reports several.
    pub fn keycode(&self) -> Option<u16> {
        self.frame
            .raw_events
            .iter()
            .rev()
            .find(|e| e.type_ == EV_KEY)
            .map(|e| e.code)
    }

    fn key_value(&self) -> Option<i32> {
        self.frame
            .raw_events
            .iter()
            .rev()
            .find(|e| e.type_ == EV_KEY)
            .map(|e| e.value)
    }

    pub fn is_press(&self) -> bool {
        self.key_value() == Some(PRESS)
    }

    pub fn is_release(&self) -> bool {
        self.key_value() == Some(RELEASE)
    }

    pub fn is_repeat(&self) -> bool {
        self.key_value() == Some(REPEAT)
    }

    pub fn is_shift_active(&self) -> bool {
        self.pressed.contains(&KEY_LEFTSHIFT) || self.pressed.contains(&KEY_RIGHTSHIFT)
    }

    /// What typing `keycode` produces, given the shift keys currently held.
    pub fn text(&self) -> Option<&'static str> {
        keymap::text(self.keycode()?, self.is_shift_active())
    }
}
