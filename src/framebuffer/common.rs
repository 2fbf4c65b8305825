#![allow(non_camel_case_types)]
use std::sync::atomic::{AtomicU32, Ordering};

use crate::framebuffer::mxcfb::{mxcfb_update_data, mxcfb_update_marker_data};

pub const MXCFB_SEND_UPDATE: u32 = iow!(b'F', 0x2E, std::mem::size_of::<mxcfb_update_data>()) as u32;
pub const MXCFB_WAIT_FOR_UPDATE_COMPLETE: u32 =
    iowr!(b'F', 0x2F, std::mem::size_of::<mxcfb_update_marker_data>()) as u32;

pub const FBIOGET_VSCREENINFO: u32 = 0x4600;
pub const FBIOGET_FSCREENINFO: u32 = 0x4602;

/// xochitl draws with this temperature and it has the lowest latency of the lot
pub const TEMP_USE_REMARKABLE_DRAW: i32 = 0x0018;

/// Raw waveform identifiers understood by the EPDC.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum waveform_mode {
    WAVEFORM_MODE_INIT = 0x0,
    WAVEFORM_MODE_DU = 0x1,
    WAVEFORM_MODE_GC16 = 0x2,
    WAVEFORM_MODE_GL16 = 0x3,
    WAVEFORM_MODE_GLR16 = 0x4,
    WAVEFORM_MODE_GLD16 = 0x5,
    WAVEFORM_MODE_A2 = 0x6,
    WAVEFORM_MODE_DU4 = 0x7,
    WAVEFORM_MODE_UNKNOWN = 0x8,
    WAVEFORM_MODE_INIT2 = 0x9,
}

/// Refresh profile, trading speed against grayscale fidelity and ghosting.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum WaveformMode {
    /// Screen goes to white, flashing once
    Initialize,
    /// Fast direct update, black and white only
    Mono,
    Grayscale,
    /// Slow, flashes, best fidelity
    HighQualityGrayscale,
    Highlight,
}

impl WaveformMode {
    pub fn raw(self) -> waveform_mode {
        match self {
            WaveformMode::Initialize => waveform_mode::WAVEFORM_MODE_INIT,
            WaveformMode::Mono => waveform_mode::WAVEFORM_MODE_DU,
            WaveformMode::Grayscale => waveform_mode::WAVEFORM_MODE_GL16,
            WaveformMode::HighQualityGrayscale => waveform_mode::WAVEFORM_MODE_GC16,
            WaveformMode::Highlight => waveform_mode::WAVEFORM_MODE_UNKNOWN,
        }
    }
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(u32)]
pub enum UpdateMode {
    /// Returns a marker, no locking, no waiting on the
    /// clean state on the update region
    Partial = 0,

    /// Waits for all other updates in the region and performs
    /// in an ordered fashion after them
    Full = 1,
}

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[repr(C)]
pub struct mxcfb_rect {
    pub top: u32,
    pub left: u32,
    pub width: u32,
    pub height: u32,
}

impl mxcfb_rect {
    pub fn new(left: u32, top: u32, width: u32, height: u32) -> mxcfb_rect {
        mxcfb_rect {
            top,
            left,
            width,
            height,
        }
    }
}

/// One refresh of a region of the panel.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct UpdateRequest {
    pub region: mxcfb_rect,
    pub waveform: WaveformMode,
    pub mode: UpdateMode,
    pub marker: u32,
}

impl UpdateRequest {
    pub fn to_mxcfb(&self) -> mxcfb_update_data {
        mxcfb_update_data {
            update_region: self.region,
            waveform_mode: self.waveform.raw() as u32,
            update_mode: self.mode as u32,
            update_marker: self.marker,
            temp: TEMP_USE_REMARKABLE_DRAW,
            ..Default::default()
        }
    }
}

static MARKER: AtomicU32 = AtomicU32::new(1);

/// Hands out update markers, unique for the life of the process.
pub fn next_marker() -> u32 {
    MARKER.fetch_add(1, Ordering::Relaxed)
}
