use cgmath::Point2;

/// Describing the rotation of input devices.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum InputDeviceRotation {
    /// When viewing the device in the standard portrait roation,
    /// the origin of this input device is on the top left
    Rot0,

    /// When viewing the device in the standard portrait roation,
    /// the origin of this input device is on the top right
    Rot90,

    /// When viewing the device in the standard portrait roation,
    /// the origin of this input device is on the bottom right
    Rot180,

    /// When viewing the device in the standard portrait roation,
    /// the origin of this input device is on the bottom left
    Rot270,
}

impl InputDeviceRotation {
    /// Rotates a point whose axes are normalized to `[0, 1]` about the center `(0.5, 0.5)`.
    pub fn rotate_normalized(&self, point: Point2<f32>) -> Point2<f32> {
        match self {
            InputDeviceRotation::Rot0 => point,
            InputDeviceRotation::Rot90 => Point2 {
                x: 1.0 - point.y,
                y: point.x,
            },
            InputDeviceRotation::Rot180 => Point2 {
                x: 1.0 - point.x,
                y: 1.0 - point.y,
            },
            InputDeviceRotation::Rot270 => Point2 {
                x: point.y,
                y: 1.0 - point.x,
            },
        }
    }
}

#[cfg(test)]
mod test {
    use super::InputDeviceRotation::*;
    use cgmath::Point2;

    #[test]
    fn check_rotations() {
        let origin = Point2 { x: 0.0, y: 0.0 };
        assert_eq!(Rot0.rotate_normalized(origin), Point2 { x: 0.0, y: 0.0 });
        assert_eq!(Rot90.rotate_normalized(origin), Point2 { x: 1.0, y: 0.0 });
        assert_eq!(Rot180.rotate_normalized(origin), Point2 { x: 1.0, y: 1.0 });
        assert_eq!(Rot270.rotate_normalized(origin), Point2 { x: 0.0, y: 1.0 });
    }

    #[test]
    fn center_is_fixed() {
        let center = Point2 { x: 0.5, y: 0.5 };
        for rot in &[Rot0, Rot90, Rot180, Rot270] {
            assert_eq!(rot.rotate_normalized(center), center);
        }
    }

    #[test]
    fn quarter_turns_compose() {
        let p = Point2 { x: 0.25, y: 0.125 };
        let twice = Rot90.rotate_normalized(Rot90.rotate_normalized(p));
        assert_eq!(twice, Rot180.rotate_normalized(p));
        assert_eq!(Rot270.rotate_normalized(Rot90.rotate_normalized(p)), p);
    }
}
