//! Per-device reassembly of raw kernel reports into frames.
//!
//! The kernel describes one atomic input frame as a burst of `(type, code, value)`
//! reports closed by a sync boundary. Multi-touch devices multiplex their contacts
//! through `ABS_MT_SLOT` reports, so a burst can describe several slots; each
//! slot switch with reports pending closes a frame of its own.

use fxhash::FxHashMap;
use log::debug;

use super::ecodes::{ABS_MT_SLOT, EV_ABS, EV_SYN, SYN_DROPPED, SYN_MT_REPORT, SYN_REPORT};

/// One kernel input report.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct RawEvent {
    pub type_: u16,
    pub code: u16,
    pub value: i32,
}

impl RawEvent {
    pub fn new(type_: u16, code: u16, value: i32) -> RawEvent {
        RawEvent { type_, code, value }
    }
}

impl From<&evdev::InputEvent> for RawEvent {
    fn from(event: &evdev::InputEvent) -> RawEvent {
        RawEvent::new(event.event_type().0, event.code(), event.value())
    }
}

/// Last known value of every `(type, code)` reported for a slot.
pub type SlotValues = FxHashMap<(u16, u16), i32>;

/// Slot index to its values. Devices without slots only use slot 0.
pub type Snapshot = FxHashMap<i32, SlotValues>;

/// Everything known about a device at one sync boundary.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Frame {
    /// Slot the reports of this frame were addressed to
    pub slot: i32,
    /// Reports accumulated since the previous frame, boundary excluded
    pub raw_events: Vec<RawEvent>,
    pub current: Snapshot,
    /// `current` as of the previous frame
    pub previous: Snapshot,
}

impl Frame {
    pub fn value(&self, type_: u16, code: u16) -> Option<i32> {
        lookup(&self.current, self.slot, type_, code)
    }

    pub fn previous_value(&self, type_: u16, code: u16) -> Option<i32> {
        lookup(&self.previous, self.slot, type_, code)
    }

    pub fn slot_values(&self) -> Option<&SlotValues> {
        self.current.get(&self.slot)
    }
}

fn lookup(snapshot: &Snapshot, slot: i32, type_: u16, code: u16) -> Option<i32> {
    snapshot
        .get(&slot)
        .and_then(|values| values.get(&(type_, code)))
        .copied()
}

/// The accumulator of one device: `Idle` while `raw_events` is empty,
/// `Accumulating` otherwise.
#[derive(Debug, Default)]
pub struct DeviceEventState {
    raw_events: Vec<RawEvent>,
    current_slot: i32,
    /// `current_slot` as of the last flush
    previous_slot: i32,
    current: Snapshot,
    previous: Snapshot,
}

impl DeviceEventState {
    pub fn new() -> DeviceEventState {
        DeviceEventState::default()
    }

    pub fn current_slot(&self) -> i32 {
        self.current_slot
    }

    pub fn pending(&self) -> &[RawEvent] {
        &self.raw_events
    }

    pub fn current(&self) -> &Snapshot {
        &self.current
    }

    pub fn previous(&self) -> &Snapshot {
        &self.previous
    }

    /// Feeds one report, returning the frame it closes, if any.
    pub fn push(&mut self, event: RawEvent) -> Option<Frame> {
        match (event.type_, event.code) {
            (EV_SYN, SYN_DROPPED) => {
                debug!(
                    "kernel dropped reports, discarding {} pending",
                    self.raw_events.len()
                );
                self.current = self.previous.clone();
                self.current_slot = self.previous_slot;
                self.raw_events.clear();
                None
            }
            (EV_SYN, SYN_REPORT) | (EV_SYN, SYN_MT_REPORT) => Some(self.flush()),
            (EV_ABS, ABS_MT_SLOT) => {
                let flushed = if self.raw_events.is_empty() {
                    None
                } else {
                    Some(self.flush())
                };
                self.current_slot = event.value;
                flushed
            }
            (type_, code) => {
                self.current
                    .entry(self.current_slot)
                    .or_default()
                    .insert((type_, code), event.value);
                self.raw_events.push(event);
                None
            }
        }
    }

    /// Emits what has accumulated and snapshots `current` as the new `previous`.
    fn flush(&mut self) -> Frame {
        self.previous_slot = self.current_slot;
        Frame {
            slot: self.current_slot,
            raw_events: std::mem::take(&mut self.raw_events),
            current: self.current.clone(),
            previous: std::mem::replace(&mut self.previous, self.current.clone()),
        }
    }
}
