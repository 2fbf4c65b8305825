use std::path::PathBuf;

use cgmath::Point2;

use crate::device::{InputDevicePlacement, Model};
use crate::dimensions::{DISPLAYHEIGHT, DISPLAYWIDTH};

/// Linux input event codes used by the decoders
pub mod ecodes;

/// US keyboard layout
pub mod keymap;

/// Finding and classifying `/dev/input/event*` devices
pub mod scan;

/// Per-device reassembly of raw reports into frames
pub mod state;

/// Contains the code to decode multitouch events
pub mod multitouch;

/// Contains the code to decode Wacom events
pub mod wacom;

/// Contains the code to decode keyboard and button events
pub mod key;

/// Contains the epoll loop multiplexing every open device
pub mod ev;

pub use self::ev::Input;
pub use self::key::KeyEvent;
pub use self::multitouch::TouchEvent;
pub use self::scan::{DeviceClass, DeviceInfo};
pub use self::state::{Frame, RawEvent};
pub use self::wacom::WacomEvent;

/// A frame from a device we could not classify.
#[derive(Debug, Clone, PartialEq)]
pub struct GenericEvent {
    pub device: PathBuf,
    pub frame: Frame,
}

/// One reassembled input frame, decoded according to the class of its device.
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    Touch(TouchEvent),
    Wacom(WacomEvent),
    Key(KeyEvent),
    Generic(GenericEvent),
}

impl InputEvent {
    pub fn device(&self) -> &std::path::Path {
        match self {
            InputEvent::Touch(event) => &event.device,
            InputEvent::Wacom(event) => &event.device,
            InputEvent::Key(event) => &event.device,
            InputEvent::Generic(event) => &event.device,
        }
    }

    pub fn frame(&self) -> &Frame {
        match self {
            InputEvent::Touch(event) => &event.frame,
            InputEvent::Wacom(event) => &event.frame,
            InputEvent::Key(event) => &event.frame,
            InputEvent::Generic(event) => &event.frame,
        }
    }

    /// Wraps `frame` in the event type matching the class of `info`.
    pub fn decode(info: &DeviceInfo, mapping: &ScreenMapping, frame: Frame) -> InputEvent {
        match info.class {
            DeviceClass::Touch => InputEvent::Touch(TouchEvent::new(info, mapping, frame)),
            DeviceClass::Wacom => InputEvent::Wacom(WacomEvent::new(info, mapping, frame)),
            DeviceClass::Key => InputEvent::Key(KeyEvent::new(info, frame)),
            DeviceClass::Unknown => InputEvent::Generic(GenericEvent {
                device: info.path.clone(),
                frame,
            }),
        }
    }
}

/// Range an absolute axis reports in.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub struct AxisRange {
    pub min: i32,
    pub max: i32,
}

impl AxisRange {
    /// Maps a reported value onto `[0, 1]`.
    pub fn normalize(&self, value: i32) -> f32 {
        if self.max <= self.min {
            return 0.0;
        }
        (value - self.min) as f32 / (self.max - self.min) as f32
    }
}

/// Turns normalized device coordinates into panel pixels.
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct ScreenMapping {
    pub model: Model,
    pub width: u32,
    pub height: u32,
}

impl ScreenMapping {
    pub fn new(model: Model) -> ScreenMapping {
        ScreenMapping {
            model,
            width: u32::from(DISPLAYWIDTH),
            height: u32::from(DISPLAYHEIGHT),
        }
    }

    pub fn touch(&self, x: Option<f32>, y: Option<f32>) -> Option<Point2<u32>> {
        self.place(self.model.get_multitouch_placement(), x?, y?)
    }

    pub fn wacom(&self, x: Option<f32>, y: Option<f32>) -> Option<Point2<u32>> {
        self.place(self.model.get_wacom_placement(), x?, y?)
    }

    fn place(&self, placement: InputDevicePlacement, x: f32, y: f32) -> Option<Point2<u32>> {
        let p = placement.apply(Point2 { x, y });
        Some(Point2 {
            x: (p.x * self.width.saturating_sub(1) as f32) as u32,
            y: (p.y * self.height.saturating_sub(1) as f32) as u32,
        })
    }
}
