//! Paints a few shapes and refreshes only what changed, through whichever
//! backend the device calls for.

use log::info;
use remarkable_hw::color::{self, Color};
use remarkable_hw::framebuffer::common::{mxcfb_rect, UpdateMode, WaveformMode};
use remarkable_hw::framebuffer::core::Framebuffer;
use remarkable_hw::framebuffer::{
    FramebufferBase, FramebufferDraw, FramebufferIO, FramebufferRefresh,
};
use remarkable_hw::geometry::{Rect, Region};

fn main() -> remarkable_hw::Result<()> {
    env_logger::init();

    let mut fb = Framebuffer::new();
    let kind = fb.open()?;
    let geometry = fb.geometry()?;
    info!(
        "{} via {:?}: {}x{}",
        fb.model(),
        kind,
        geometry.width,
        geometry.height
    );

    fb.clear()?;
    let marker = fb.update_full(WaveformMode::HighQualityGrayscale, None, true)?;
    info!("full refresh {} done", marker);

    let mut damage = Region::new();
    fb.set_rect(100, 100, 400, 300, Color::GRAY(128).as_native())?;
    damage.add(Rect::from_size(100, 100, 400, 300));
    let touched = fb.draw_rect(mxcfb_rect::new(600, 200, 500, 500), 8, color::BLACK)?;
    damage.add(Rect::from_size(
        touched.left,
        touched.top,
        touched.width,
        touched.height,
    ));

    if let Some(marker) = fb.update_region(&damage, WaveformMode::Grayscale, false)? {
        fb.wait(marker)?;
        info!("damage refresh {} done", marker);
    }

    // Small black-and-white area, fastest waveform
    let rect = mxcfb_rect::new(100, 1000, 200, 200);
    fb.set_rect(rect.left, rect.top, rect.width, rect.height, color::BLACK)?;
    fb.update(&rect, WaveformMode::Mono, None, UpdateMode::Partial, true)?;

    fb.release();
    Ok(())
}
