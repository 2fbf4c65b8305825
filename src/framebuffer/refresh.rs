use log::debug;

use crate::error::{Error, Result};
use crate::framebuffer::common::{next_marker, mxcfb_rect, UpdateMode, UpdateRequest, WaveformMode};
use crate::framebuffer::core::Framebuffer;
use crate::framebuffer::screeninfo::Geometry;
use crate::framebuffer::FramebufferRefresh;
use crate::geometry::Region;

/// Trims `region` to the visible area. Regions that are empty, or start off the
/// panel, are refused rather than silently dropped.
fn clip_to_panel(region: &mxcfb_rect, geometry: &Geometry) -> Result<mxcfb_rect> {
    if region.width == 0 || region.height == 0 {
        return Err(Error::InvalidArgument(format!(
            "empty update region {:?}",
            region
        )));
    }
    if region.left >= geometry.width || region.top >= geometry.height {
        return Err(Error::InvalidArgument(format!(
            "update region {:?} starts outside the {}x{} panel",
            region, geometry.width, geometry.height
        )));
    }
    Ok(mxcfb_rect {
        top: region.top,
        left: region.left,
        width: region.width.min(geometry.width - region.left),
        height: region.height.min(geometry.height - region.top),
    })
}

impl FramebufferRefresh for Framebuffer {
    fn update(
        &mut self,
        region: &mxcfb_rect,
        waveform: WaveformMode,
        marker: Option<u32>,
        mode: UpdateMode,
        sync: bool,
    ) -> Result<u32> {
        let backend = self.backend()?;
        let request = UpdateRequest {
            region: clip_to_panel(region, backend.buffer().geometry())?,
            waveform,
            mode,
            marker: marker.unwrap_or_else(next_marker),
        };

        backend.send_update(&request.to_mxcfb())?;
        debug!("sent {:?}", request);

        if sync {
            backend.wait(request.marker)?;
        }
        Ok(request.marker)
    }

    fn update_full(
        &mut self,
        waveform: WaveformMode,
        marker: Option<u32>,
        sync: bool,
    ) -> Result<u32> {
        let geometry = *self.backend()?.buffer().geometry();
        self.update(
            &mxcfb_rect::new(0, 0, geometry.width, geometry.height),
            waveform,
            marker,
            UpdateMode::Full,
            sync,
        )
    }

    fn update_region(
        &mut self,
        damage: &Region<u32>,
        waveform: WaveformMode,
        sync: bool,
    ) -> Result<Option<u32>> {
        let bounds = match damage.bounding_rect() {
            Some(bounds) if !bounds.is_empty() => bounds,
            _ => return Ok(None),
        };
        let region = mxcfb_rect::new(bounds.left, bounds.top, bounds.width(), bounds.height());
        self.update(&region, waveform, None, UpdateMode::Partial, sync)
            .map(Some)
    }

    fn wait(&mut self, marker: u32) -> Result<()> {
        self.backend()?.wait(marker)
    }
}
