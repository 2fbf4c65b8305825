/// Bitfield which is a part of VarScreeninfo.
#[repr(C)]
#[derive(Clone, Debug, Default)]
pub struct Bitfield {
    pub offset: u32,
    pub length: u32,
    pub msb_right: u32,
}

/// Struct as defined in /usr/include/linux/fb.h
#[repr(C)]
#[derive(Clone, Debug, Default)]
pub struct VarScreeninfo {
    pub xres: u32,
    pub yres: u32,
    pub xres_virtual: u32,
    pub yres_virtual: u32,
    pub xoffset: u32,
    pub yoffset: u32,
    pub bits_per_pixel: u32,
    pub grayscale: u32,
    pub red: Bitfield,
    pub green: Bitfield,
    pub blue: Bitfield,
    pub transp: Bitfield,
    pub nonstd: u32,
    pub activate: u32,
    pub height: u32,
    pub width: u32,
    pub accel_flags: u32,
    pub pixclock: u32,
    pub left_margin: u32,
    pub right_margin: u32,
    pub upper_margin: u32,
    pub lower_margin: u32,
    pub hsync_len: u32,
    pub vsync_len: u32,
    pub sync: u32,
    pub vmode: u32,
    pub rotate: u32,
    pub colorspace: u32,
    pub reserved: [u32; 4],
}

/// Struct as defined in /usr/include/linux/fb.h Note: type is a keyword in Rust and therefore has been
/// changed to fb_type.
#[repr(C)]
#[derive(Clone, Debug, Default)]
pub struct FixScreeninfo {
    pub id: [u8; 16],
    pub smem_start: libc::c_ulong,
    pub smem_len: u32,
    pub fb_type: u32,
    pub type_aux: u32,
    pub visual: u32,
    pub xpanstep: u16,
    pub ypanstep: u16,
    pub ywrapstep: u16,
    pub line_length: u32,
    pub mmio_start: libc::c_ulong,
    pub mmio_len: u32,
    pub accel: u32,
    pub capabilities: u16,
    pub reserved: [u16; 2],
}

/// Layout of the pixel buffer, in cells.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Geometry {
    pub width: u32,
    pub height: u32,
    pub virtual_width: u32,
    pub virtual_height: u32,
    pub x_offset: u32,
    pub y_offset: u32,
    /// Bytes per cell
    pub pixel_size: u32,
}

impl Geometry {
    /// A buffer with no hidden area around the visible one.
    pub fn packed(width: u32, height: u32, pixel_size: u32) -> Geometry {
        Geometry {
            width,
            height,
            virtual_width: width,
            virtual_height: height,
            x_offset: 0,
            y_offset: 0,
            pixel_size,
        }
    }

    /// Cell index of a visible pixel within the backing store.
    pub fn offset(&self, x: u32, y: u32) -> usize {
        (y + self.y_offset) as usize * self.virtual_width as usize + (x + self.x_offset) as usize
    }

    /// Bytes of backing store the visible area reaches into.
    pub fn required_len(&self) -> usize {
        if self.width == 0 || self.height == 0 {
            return 0;
        }
        (self.offset(self.width - 1, self.height - 1) + 1) * self.pixel_size as usize
    }

    /// Bytes of the whole backing store.
    pub fn size(&self) -> usize {
        self.virtual_width as usize * self.virtual_height as usize * self.pixel_size as usize
    }
}

impl From<&VarScreeninfo> for Geometry {
    fn from(info: &VarScreeninfo) -> Geometry {
        Geometry {
            width: info.xres,
            height: info.yres,
            virtual_width: info.xres_virtual,
            virtual_height: info.yres_virtual,
            x_offset: info.xoffset,
            y_offset: info.yoffset,
            pixel_size: info.bits_per_pixel / 8,
        }
    }
}
