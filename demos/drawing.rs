//! Draw with the pen, erase with the rubber end. Touching the panel with a
//! finger clears it.
//!
//! Drawing goes straight to the framebuffer without any caching.

use cgmath::Point2;
use log::{debug, warn};
use remarkable_hw::color;
use remarkable_hw::framebuffer::common::WaveformMode;
use remarkable_hw::framebuffer::core::Framebuffer;
use remarkable_hw::framebuffer::{FramebufferDraw, FramebufferRefresh};
use remarkable_hw::geometry::{Rect, Region};
use remarkable_hw::input::{Input, InputEvent};

fn main() -> remarkable_hw::Result<()> {
    env_logger::init();

    let mut fb = Framebuffer::new();
    let mut input = Input::new()?;

    fb.clear()?;
    fb.update_full(WaveformMode::HighQualityGrayscale, None, true)?;

    while let Some(event) = input.poll(true)? {
        match event {
            InputEvent::Wacom(pen) if pen.is_down() => {
                let (to, from) = match (pen.screen_pos, pen.previous_screen_pos) {
                    (Some(to), Some(from)) => (to, from),
                    (Some(to), None) => (to, to),
                    _ => continue,
                };
                let (width, ink) = if pen.is_rubber() {
                    (24, color::WHITE)
                } else {
                    (3, color::BLACK)
                };
                let touched = fb.draw_line(
                    Point2::new(from.x as i32, from.y as i32),
                    Point2::new(to.x as i32, to.y as i32),
                    width,
                    ink,
                )?;
                let mut damage = Region::new();
                damage.add(Rect::from_size(
                    touched.left,
                    touched.top,
                    touched.width,
                    touched.height,
                ));
                fb.update_region(&damage, WaveformMode::Mono, false)?;
            }
            InputEvent::Touch(touch) if touch.is_lifted() => {
                debug!("slot {} lifted, clearing", touch.slot());
                fb.clear()?;
                fb.update_full(WaveformMode::HighQualityGrayscale, None, false)?;
            }
            InputEvent::Generic(event) => {
                warn!("unclassified device {:?}", event.device);
            }
            _ => {}
        }
    }
    Ok(())
}
