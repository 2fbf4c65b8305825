pub mod common;
pub mod mxcfb;
pub mod screeninfo;

pub mod buffer;
pub mod ioctl;
pub mod swtfb_client;
pub mod swtfb_ipc;

use std::path::Path;

use cgmath::Point2;

use crate::error::Result;
use crate::geometry::Region;

pub mod core;
pub trait FramebufferBase {
    /// Acquires the active backend's resources. Calling it again while open is a no-op.
    fn open(&mut self) -> Result<core::BackendKind>;
    /// Lets go of the mapping and channel, if any. Safe to call repeatedly.
    fn release(&mut self);
    fn is_open(&self) -> bool;

    /// Geometry of the active backend: queried from the kernel once for `/dev/fb0`,
    /// fixed for rm2fb.
    fn geometry(&mut self) -> Result<screeninfo::Geometry>;
    /// Bytes of backing store mapped.
    fn size(&mut self) -> Result<usize>;
    /// Device or segment the active backend maps.
    fn path(&mut self) -> Result<&Path>;

    fn width(&mut self) -> Result<u32> {
        Ok(self.geometry()?.width)
    }
    fn height(&mut self) -> Result<u32> {
        Ok(self.geometry()?.height)
    }
    fn virtual_width(&mut self) -> Result<u32> {
        Ok(self.geometry()?.virtual_width)
    }
    fn virtual_height(&mut self) -> Result<u32> {
        Ok(self.geometry()?.virtual_height)
    }
    fn x_offset(&mut self) -> Result<u32> {
        Ok(self.geometry()?.x_offset)
    }
    fn y_offset(&mut self) -> Result<u32> {
        Ok(self.geometry()?.y_offset)
    }
    fn pixel_size(&mut self) -> Result<u32> {
        Ok(self.geometry()?.pixel_size)
    }
}

pub mod io;
/// Bounds-checked access to the pixel buffer. Nothing is written when any part
/// of the target lies outside the visible area.
pub trait FramebufferIO {
    fn get_pixel(&mut self, x: u32, y: u32) -> Result<u16>;
    fn set_pixel(&mut self, x: u32, y: u32, color: u16) -> Result<()>;
    fn set_row(&mut self, x: u32, y: u32, width: u32, color: u16) -> Result<()>;
    fn set_col(&mut self, x: u32, y: u32, height: u32, color: u16) -> Result<()>;
    fn set_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: u16) -> Result<()>;
    /// Paints the whole panel without refreshing it.
    fn fill(&mut self, color: u16) -> Result<()>;
    /// Reads back the cells of a rectangle, row-major.
    fn dump_region(&mut self, rect: common::mxcfb_rect) -> Result<Vec<u16>>;
}

pub mod refresh;
pub trait FramebufferRefresh {
    /// Refreshes `region`, clipped to the panel, and returns the marker of the update.
    ///
    /// Without a `marker` the next one from the process-wide counter is used. With
    /// `sync` set, does not return before the update has completed.
    fn update(
        &mut self,
        region: &common::mxcfb_rect,
        waveform: common::WaveformMode,
        marker: Option<u32>,
        mode: common::UpdateMode,
        sync: bool,
    ) -> Result<u32>;

    /// Full, non-partial refresh of the whole panel.
    fn update_full(
        &mut self,
        waveform: common::WaveformMode,
        marker: Option<u32>,
        sync: bool,
    ) -> Result<u32>;

    /// Partial refresh of the bounding rectangle of a damage region.
    /// Returns `None` when there is nothing to refresh.
    fn update_region(
        &mut self,
        damage: &Region<u32>,
        waveform: common::WaveformMode,
        sync: bool,
    ) -> Result<Option<u32>>;

    /// Blocks until the update identified by `marker` has reached the panel.
    fn wait(&mut self, marker: u32) -> Result<()>;
}

pub mod draw;
pub trait FramebufferDraw {
    /// Draws a straight line `width` pixels thick, clipped to the panel.
    /// Returns the rectangle that was touched.
    fn draw_line(
        &mut self,
        start: Point2<i32>,
        end: Point2<i32>,
        width: u32,
        color: u16,
    ) -> Result<common::mxcfb_rect>;
    /// Draws the border of a rectangle, `border_px` thick, growing inwards.
    fn draw_rect(
        &mut self,
        rect: common::mxcfb_rect,
        border_px: u32,
        color: u16,
    ) -> Result<common::mxcfb_rect>;
    /// Whitens the panel without refreshing it.
    fn clear(&mut self) -> Result<()>;
}
