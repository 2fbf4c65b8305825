#![allow(non_camel_case_types)]

use crate::framebuffer::common::mxcfb_rect;

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct mxcfb_update_marker_data {
    pub update_marker: u32,
    pub collision_test: u32,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct mxcfb_alt_buffer_data {
    pub phys_addr: u32,
    pub width: u32,
    pub height: u32,
    pub alt_update_region: mxcfb_rect,
}

/// Argument of `MXCFB_SEND_UPDATE`, and the payload of an rm2fb `Update` message.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct mxcfb_update_data {
    pub update_region: mxcfb_rect,
    pub waveform_mode: u32,
    pub update_mode: u32,
    pub update_marker: u32,
    pub temp: i32,
    pub flags: u32,
    pub dither_mode: i32,
    pub quant_bit: i32,
    pub alt_buffer_data: mxcfb_alt_buffer_data,
}

pub const MXCFB_UPDATE_DATA_SIZE: usize = 72;

fn put_rect(out: &mut Vec<u8>, rect: &mxcfb_rect) {
    out.extend_from_slice(&rect.top.to_ne_bytes());
    out.extend_from_slice(&rect.left.to_ne_bytes());
    out.extend_from_slice(&rect.width.to_ne_bytes());
    out.extend_from_slice(&rect.height.to_ne_bytes());
}

impl mxcfb_update_data {
    /// Field-by-field native-endian encoding, identical to the in-memory C layout.
    pub fn to_bytes(&self) -> [u8; MXCFB_UPDATE_DATA_SIZE] {
        let mut out = Vec::with_capacity(MXCFB_UPDATE_DATA_SIZE);
        put_rect(&mut out, &self.update_region);
        out.extend_from_slice(&self.waveform_mode.to_ne_bytes());
        out.extend_from_slice(&self.update_mode.to_ne_bytes());
        out.extend_from_slice(&self.update_marker.to_ne_bytes());
        out.extend_from_slice(&self.temp.to_ne_bytes());
        out.extend_from_slice(&self.flags.to_ne_bytes());
        out.extend_from_slice(&self.dither_mode.to_ne_bytes());
        out.extend_from_slice(&self.quant_bit.to_ne_bytes());
        out.extend_from_slice(&self.alt_buffer_data.phys_addr.to_ne_bytes());
        out.extend_from_slice(&self.alt_buffer_data.width.to_ne_bytes());
        out.extend_from_slice(&self.alt_buffer_data.height.to_ne_bytes());
        put_rect(&mut out, &self.alt_buffer_data.alt_update_region);

        let mut bytes = [0u8; MXCFB_UPDATE_DATA_SIZE];
        bytes.copy_from_slice(&out);
        bytes
    }
}
