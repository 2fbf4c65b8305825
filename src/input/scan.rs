use std::io;
use std::path::{Path, PathBuf};

use evdev::raw_stream::RawDevice;
use evdev::{EventType, Key};
use log::debug;

use super::ecodes;
use super::AxisRange;

#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum DeviceClass {
    /// Multi-touch panel
    Touch,
    /// Stylus digitizer
    Wacom,
    /// Buttons and keyboards
    Key,
    Unknown,
}

/// The parts of a device's capabilities classification looks at.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct Capabilities {
    pub absolute: bool,
    pub keys: bool,
    pub stylus: bool,
    /// Maximum of `ABS_MT_TRACKING_ID`, 0 when the axis is absent
    pub tracking_id_max: i32,
}

impl Capabilities {
    pub fn of(device: &RawDevice, abs: Option<&[libc::input_absinfo]>) -> Capabilities {
        let absolute = device.supported_events().contains(EventType::ABSOLUTE);
        Capabilities {
            absolute,
            keys: device.supported_events().contains(EventType::KEY),
            stylus: device
                .supported_keys()
                .map_or(false, |keys| keys.contains(Key::BTN_STYLUS)),
            tracking_id_max: abs
                .and_then(|abs| abs.get(ecodes::ABS_MT_TRACKING_ID as usize))
                .map_or(0, |info| info.maximum),
        }
    }

    pub fn classify(&self) -> DeviceClass {
        if self.absolute && self.tracking_id_max != 0 {
            DeviceClass::Touch
        } else if self.absolute && self.stylus {
            DeviceClass::Wacom
        } else if self.keys && !self.absolute {
            DeviceClass::Key
        } else {
            DeviceClass::Unknown
        }
    }
}

/// What we learnt about a device when it was opened.
#[derive(Debug, Clone, PartialEq)]
pub struct DeviceInfo {
    pub path: PathBuf,
    pub name: String,
    pub class: DeviceClass,
    pub capabilities: Capabilities,
    /// Range of the axis carrying the horizontal position, if the device has one
    pub x_range: Option<AxisRange>,
    pub y_range: Option<AxisRange>,
}

impl DeviceInfo {
    pub fn probe(path: &Path, device: &RawDevice) -> io::Result<DeviceInfo> {
        let abs = if device.supported_events().contains(EventType::ABSOLUTE) {
            Some(device.get_abs_state()?)
        } else {
            None
        };
        let capabilities = Capabilities::of(device, abs.as_ref().map(|abs| &abs[..]));
        let class = capabilities.classify();

        let (x_axis, y_axis) = match class {
            DeviceClass::Touch => (ecodes::ABS_MT_POSITION_X, ecodes::ABS_MT_POSITION_Y),
            _ => (ecodes::ABS_X, ecodes::ABS_Y),
        };
        let range = |axis: u16| {
            abs.as_ref()
                .and_then(|abs| abs.get(axis as usize))
                .filter(|info| info.maximum > info.minimum)
                .map(|info| AxisRange {
                    min: info.minimum,
                    max: info.maximum,
                })
        };

        Ok(DeviceInfo {
            path: path.to_path_buf(),
            name: device.name().unwrap_or_default().to_owned(),
            class,
            capabilities,
            x_range: range(x_axis),
            y_range: range(y_axis),
        })
    }

    pub fn is_position(&self) -> bool {
        self.capabilities.absolute
    }
}

/// All `event*` nodes of `dir`, sorted.
pub fn event_paths(dir: &Path) -> io::Result<Vec<PathBuf>> {
    let mut paths = Vec::new();
    for entry in dir.read_dir()? {
        let entry = entry?;
        if entry.file_name().to_string_lossy().starts_with("event") {
            paths.push(entry.path());
        }
    }
    paths.sort();
    Ok(paths)
}

/// Opens and probes every input device of `dir`. Devices that cannot be opened
/// are skipped.
pub fn scan(dir: &Path) -> io::Result<Vec<DeviceInfo>> {
    let mut found = Vec::new();
    for path in event_paths(dir)? {
        match RawDevice::open(&path).and_then(|device| DeviceInfo::probe(&path, &device)) {
            Ok(info) => found.push(info),
            Err(e) => debug!("skipping {:?}: {}", path, e),
        }
    }
    Ok(found)
}
