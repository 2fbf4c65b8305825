use std::path::PathBuf;

use cgmath::Point2;

use super::ecodes::{
    ABS_MT_POSITION_X, ABS_MT_POSITION_Y, ABS_MT_PRESSURE, ABS_MT_TRACKING_ID, EV_ABS,
};
use super::scan::DeviceInfo;
use super::state::Frame;
use super::ScreenMapping;

/// The state of one touch slot at a sync boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct TouchEvent {
    pub device: PathBuf,
    pub frame: Frame,
    /// Position on the panel, `None` until both axes have been reported
    pub screen_pos: Option<Point2<u32>>,
    pub previous_screen_pos: Option<Point2<u32>>,
}

impl TouchEvent {
    pub fn new(info: &DeviceInfo, mapping: &ScreenMapping, frame: Frame) -> TouchEvent {
        let normalize = |range: Option<super::AxisRange>, value: Option<i32>| {
            Some(range?.normalize(value?))
        };
        let screen_pos = mapping.touch(
            normalize(info.x_range, frame.value(EV_ABS, ABS_MT_POSITION_X)),
            normalize(info.y_range, frame.value(EV_ABS, ABS_MT_POSITION_Y)),
        );
        let previous_screen_pos = mapping.touch(
            normalize(info.x_range, frame.previous_value(EV_ABS, ABS_MT_POSITION_X)),
            normalize(info.y_range, frame.previous_value(EV_ABS, ABS_MT_POSITION_Y)),
        );
        TouchEvent {
            device: info.path.clone(),
            frame,
            screen_pos,
            previous_screen_pos,
        }
    }

    pub fn slot(&self) -> i32 {
        self.frame.slot
    }

    /// `-1` once the contact has been lifted.
    pub fn tracking_id(&self) -> Option<i32> {
        self.frame.value(EV_ABS, ABS_MT_TRACKING_ID)
    }

    pub fn x(&self) -> Option<i32> {
        self.frame.value(EV_ABS, ABS_MT_POSITION_X)
    }

    pub fn y(&self) -> Option<i32> {
        self.frame.value(EV_ABS, ABS_MT_POSITION_Y)
    }

    pub fn pressure(&self) -> Option<i32> {
        self.frame.value(EV_ABS, ABS_MT_PRESSURE)
    }

    pub fn previous_tracking_id(&self) -> Option<i32> {
        self.frame.previous_value(EV_ABS, ABS_MT_TRACKING_ID)
    }

    pub fn previous_x(&self) -> Option<i32> {
        self.frame.previous_value(EV_ABS, ABS_MT_POSITION_X)
    }

    pub fn previous_y(&self) -> Option<i32> {
        self.frame.previous_value(EV_ABS, ABS_MT_POSITION_Y)
    }

    pub fn previous_pressure(&self) -> Option<i32> {
        self.frame.previous_value(EV_ABS, ABS_MT_PRESSURE)
    }

    pub fn is_lifted(&self) -> bool {
        self.tracking_id() == Some(-1)
    }
}
