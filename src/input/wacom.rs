use std::path::PathBuf;

use cgmath::Point2;

use super::ecodes::*;
use super::scan::DeviceInfo;
use super::state::Frame;
use super::{AxisRange, ScreenMapping};

#[repr(u16)]
#[derive(Debug, PartialEq, Copy, Clone)]
pub enum WacomPen {
    ToolPen = BTN_TOOL_PEN,
    ToolRubber = BTN_TOOL_RUBBER,
    Touch = BTN_TOUCH,
    Stylus = BTN_STYLUS,
    Stylus2 = BTN_STYLUS2,
}

/// The state of the digitizer at a sync boundary.
#[derive(Debug, Clone, PartialEq)]
pub struct WacomEvent {
    pub device: PathBuf,
    pub frame: Frame,
    pub screen_pos: Option<Point2<u32>>,
    pub previous_screen_pos: Option<Point2<u32>>,
}

fn normalized(range: Option<AxisRange>, value: Option<i32>) -> Option<f32> {
    Some(range?.normalize(value?))
}

impl WacomEvent {
    pub fn new(info: &DeviceInfo, mapping: &ScreenMapping, frame: Frame) -> WacomEvent {
        let screen_pos = mapping.wacom(
            normalized(info.x_range, frame.value(EV_ABS, ABS_X)),
            normalized(info.y_range, frame.value(EV_ABS, ABS_Y)),
        );
        let previous_screen_pos = mapping.wacom(
            normalized(info.x_range, frame.previous_value(EV_ABS, ABS_X)),
            normalized(info.y_range, frame.previous_value(EV_ABS, ABS_Y)),
        );
        WacomEvent {
            device: info.path.clone(),
            frame,
            screen_pos,
            previous_screen_pos,
        }
    }

    pub fn x(&self) -> Option<i32> {
        self.frame.value(EV_ABS, ABS_X)
    }

    pub fn y(&self) -> Option<i32> {
        self.frame.value(EV_ABS, ABS_Y)
    }

    pub fn pressure(&self) -> Option<i32> {
        self.frame.value(EV_ABS, ABS_PRESSURE)
    }

    pub fn distance(&self) -> Option<i32> {
        self.frame.value(EV_ABS, ABS_DISTANCE)
    }

    pub fn tilt(&self) -> (Option<i32>, Option<i32>) {
        (
            self.frame.value(EV_ABS, ABS_TILT_X),
            self.frame.value(EV_ABS, ABS_TILT_Y),
        )
    }

    pub fn previous_x(&self) -> Option<i32> {
        self.frame.previous_value(EV_ABS, ABS_X)
    }

    pub fn previous_y(&self) -> Option<i32> {
        self.frame.previous_value(EV_ABS, ABS_Y)
    }

    pub fn previous_pressure(&self) -> Option<i32> {
        self.frame.previous_value(EV_ABS, ABS_PRESSURE)
    }

    pub fn previous_distance(&self) -> Option<i32> {
        self.frame.previous_value(EV_ABS, ABS_DISTANCE)
    }

    pub fn previous_tilt(&self) -> (Option<i32>, Option<i32>) {
        (
            self.frame.previous_value(EV_ABS, ABS_TILT_X),
            self.frame.previous_value(EV_ABS, ABS_TILT_Y),
        )
    }

    pub fn is_pressed(&self, pen: WacomPen) -> bool {
        self.frame.value(EV_KEY, pen as u16).map_or(false, |v| v != 0)
    }

    /// The tip is on the surface.
    pub fn is_down(&self) -> bool {
        self.is_pressed(WacomPen::Touch)
    }

    /// A tool is in range but not touching.
    pub fn is_hover(&self) -> bool {
        !self.is_down()
            && (self.is_pressed(WacomPen::ToolPen) || self.is_pressed(WacomPen::ToolRubber))
    }

    pub fn is_rubber(&self) -> bool {
        self.is_pressed(WacomPen::ToolRubber)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::device::Model;
    use crate::input::scan::{Capabilities, DeviceClass};
    use crate::input::state::{DeviceEventState, RawEvent};

    fn wacom_info() -> DeviceInfo {
        DeviceInfo {
            path: PathBuf::from("/dev/input/event1"),
            name: "Wacom I2C Digitizer".into(),
            class: DeviceClass::Wacom,
            capabilities: Capabilities {
                absolute: true,
                keys: true,
                stylus: true,
                tracking_id_max: 0,
            },
            x_range: Some(AxisRange { min: 0, max: 20000 }),
            y_range: Some(AxisRange { min: 0, max: 10000 }),
        }
    }

    fn frame(events: &[RawEvent]) -> Frame {
        let mut state = DeviceEventState::new();
        for e in events {
            state.push(*e);
        }
        state
            .push(RawEvent::new(EV_SYN, SYN_REPORT, 0))
            .unwrap_or_default()
    }

    #[test]
    fn hover_then_down() {
        let mapping = ScreenMapping {
            model: Model::Gen2,
            width: 101,
            height: 201,
        };
        let hover = WacomEvent::new(
            &wacom_info(),
            &mapping,
            frame(&[
                RawEvent::new(EV_KEY, BTN_TOOL_PEN, 1),
                RawEvent::new(EV_ABS, ABS_X, 5000),
                RawEvent::new(EV_ABS, ABS_Y, 5000),
                RawEvent::new(EV_ABS, ABS_DISTANCE, 20),
            ]),
        );
        assert!(hover.is_hover());
        assert!(!hover.is_down());
        assert_eq!(hover.distance(), Some(20));
        // (0.25, 0.5) rotated by 270 degrees
        assert_eq!(hover.screen_pos, Some(Point2 { x: 50, y: 150 }));

        let down = WacomEvent::new(
            &wacom_info(),
            &mapping,
            frame(&[
                RawEvent::new(EV_KEY, BTN_TOOL_PEN, 1),
                RawEvent::new(EV_KEY, BTN_TOUCH, 1),
                RawEvent::new(EV_ABS, ABS_PRESSURE, 1200),
                RawEvent::new(EV_ABS, ABS_TILT_X, -300),
            ]),
        );
        assert!(down.is_down());
        assert!(!down.is_hover());
        assert_eq!(down.pressure(), Some(1200));
        assert_eq!(down.tilt(), (Some(-300), None));
        assert_eq!(down.screen_pos, None);
    }
}
