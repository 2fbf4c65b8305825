//! The panel stores 16-bit `rgb565` cells:
//!
//! ```text
//!    red     : offset = 11,  length = 5,      msb_right = 0
//!    green   : offset = 5,   length = 6,      msb_right = 0
//!    blue    : offset = 0,   length = 5,      msb_right = 0
//! ```

pub const WHITE: u16 = 0xFFFF;
pub const BLACK: u16 = 0x0000;

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Color {
    BLACK,
    WHITE,
    /// 0 is white, 255 is black
    GRAY(u8),
    RGB(u8, u8, u8),
    NATIVE(u16),
}

impl Default for Color {
    fn default() -> Self {
        Color::WHITE
    }
}

impl Color {
    pub fn as_native(self) -> u16 {
        match self {
            Color::BLACK => BLACK,
            Color::WHITE => WHITE,
            Color::GRAY(level) => rgb888_to_rgb565(255 - level, 255 - level, 255 - level),
            Color::RGB(r, g, b) => rgb888_to_rgb565(r, g, b),
            Color::NATIVE(v) => v,
        }
    }

    pub fn to_rgb8(self) -> [u8; 3] {
        let (r, g, b) = rgb565_to_rgb888(self.as_native());
        [r, g, b]
    }

    /// Looks up a named color, case-insensitively.
    pub fn from_name(name: &str) -> Option<Color> {
        let (r, g, b) = match name.to_ascii_lowercase().as_str() {
            "white" => return Some(Color::WHITE),
            "black" => return Some(Color::BLACK),
            "gray" | "grey" => (128, 128, 128),
            "silver" => (192, 192, 192),
            "lightgray" | "lightgrey" => (211, 211, 211),
            "darkgray" | "darkgrey" => (169, 169, 169),
            "red" => (255, 0, 0),
            "green" => (0, 128, 0),
            "lime" => (0, 255, 0),
            "blue" => (0, 0, 255),
            "yellow" => (255, 255, 0),
            "cyan" | "aqua" => (0, 255, 255),
            "magenta" | "fuchsia" => (255, 0, 255),
            _ => return None,
        };
        Some(Color::RGB(r, g, b))
    }
}

impl From<u16> for Color {
    fn from(v: u16) -> Color {
        Color::NATIVE(v)
    }
}

/// Pixel value for a named color, `None` if the name isn't known.
pub fn get_color(name: &str) -> Option<u16> {
    Color::from_name(name).map(Color::as_native)
}

pub fn rgb888_to_rgb565(r: u8, g: u8, b: u8) -> u16 {
    let r5 = u16::from(r >> 3);
    let g6 = u16::from(g >> 2);
    let b5 = u16::from(b >> 3);
    (r5 << 11) | (g6 << 5) | b5
}

pub fn rgb565_to_rgb888(color: u16) -> (u8, u8, u8) {
    let r5 = u32::from((color >> 11) & 0x1F);
    let g6 = u32::from((color >> 5) & 0x3F);
    let b5 = u32::from(color & 0x1F);
    (
        ((r5 * 527 + 23) >> 6) as u8,
        ((g6 * 259 + 33) >> 6) as u8,
        ((b5 * 527 + 23) >> 6) as u8,
    )
}
