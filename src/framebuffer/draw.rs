use cgmath::Point2;
use line_drawing::Bresenham;

use crate::color::WHITE;
use crate::error::{Error, Result};
use crate::framebuffer::common::mxcfb_rect;
use crate::framebuffer::core::Framebuffer;
use crate::framebuffer::{FramebufferBase, FramebufferDraw, FramebufferIO};

impl FramebufferDraw for Framebuffer {
    fn draw_line(
        &mut self,
        start: Point2<i32>,
        end: Point2<i32>,
        width: u32,
        color: u16,
    ) -> Result<mxcfb_rect> {
        let geometry = self.geometry()?;
        let (panel_w, panel_h) = (i64::from(geometry.width), i64::from(geometry.height));
        let width = i64::from(width.max(1));
        let half = width / 2;

        let (mut min_x, mut min_y) = (panel_w, panel_h);
        let (mut max_x, mut max_y) = (-1i64, -1i64);
        for (x, y) in Bresenham::new((start.x, start.y), (end.x, end.y)) {
            // Square brush centered on the line, clipped to the panel
            let left = (i64::from(x) - half).max(0);
            let top = (i64::from(y) - half).max(0);
            let right = (i64::from(x) - half + width).min(panel_w);
            let bottom = (i64::from(y) - half + width).min(panel_h);
            if left >= right || top >= bottom {
                continue;
            }
            self.set_rect(
                left as u32,
                top as u32,
                (right - left) as u32,
                (bottom - top) as u32,
                color,
            )?;
            min_x = min_x.min(left);
            min_y = min_y.min(top);
            max_x = max_x.max(right);
            max_y = max_y.max(bottom);
        }

        if max_x < 0 {
            return Ok(mxcfb_rect::default());
        }
        Ok(mxcfb_rect::new(
            min_x as u32,
            min_y as u32,
            (max_x - min_x) as u32,
            (max_y - min_y) as u32,
        ))
    }

    fn draw_rect(&mut self, rect: mxcfb_rect, border_px: u32, color: u16) -> Result<mxcfb_rect> {
        if border_px == 0 {
            return Err(Error::InvalidArgument("border must be at least 1px".into()));
        }
        let mxcfb_rect {
            left,
            top,
            width,
            height,
        } = rect;
        let geometry = self.geometry()?;
        let fits = |origin: u32, extent: u32, bound: u32| {
            origin.checked_add(extent).map_or(false, |end| end <= bound)
        };
        if !fits(left, width, geometry.width) || !fits(top, height, geometry.height) {
            return Err(Error::OutOfBounds {
                what: "rect",
                x: left,
                y: top,
                width,
                height,
                bound_width: geometry.width,
                bound_height: geometry.height,
            });
        }
        let bw = border_px.min(width);
        let bh = border_px.min(height);

        self.set_rect(left, top, width, bh, color)?;
        self.set_rect(left, top + height - bh, width, bh, color)?;
        self.set_rect(left, top, bw, height, color)?;
        self.set_rect(left + width - bw, top, bw, height, color)?;
        Ok(rect)
    }

    fn clear(&mut self) -> Result<()> {
        self.fill(WHITE)
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::color::BLACK;
    use crate::config::Config;
    use crate::device::Model;
    use crate::framebuffer::core::test::memory_framebuffer;

    #[test]
    fn horizontal_line() {
        let (mut fb, _) = memory_framebuffer(Model::Gen1, Config::default(), 30, 20);
        fb.clear().unwrap();
        let bounds = fb
            .draw_line(Point2::new(2, 5), Point2::new(9, 5), 1, BLACK)
            .unwrap();
        assert_eq!(bounds, mxcfb_rect::new(2, 5, 8, 1));
        assert_eq!(fb.dump_region(bounds).unwrap(), vec![BLACK; 8]);
        assert_eq!(fb.get_pixel(10, 5).unwrap(), WHITE);
    }

    #[test]
    fn thick_line_is_clipped() {
        let (mut fb, _) = memory_framebuffer(Model::Gen1, Config::default(), 30, 20);
        let bounds = fb
            .draw_line(Point2::new(-5, 0), Point2::new(3, 0), 3, 0x1234)
            .unwrap();
        assert_eq!(bounds, mxcfb_rect::new(0, 0, 5, 2));
        assert_eq!(fb.get_pixel(4, 1).unwrap(), 0x1234);

        let nothing = fb
            .draw_line(Point2::new(-10, -10), Point2::new(-5, -5), 1, BLACK)
            .unwrap();
        assert_eq!(nothing, mxcfb_rect::default());
    }

    #[test]
    fn rect_border() {
        let (mut fb, _) = memory_framebuffer(Model::Gen1, Config::default(), 30, 20);
        fb.clear().unwrap();
        fb.draw_rect(mxcfb_rect::new(2, 3, 10, 8), 2, BLACK)
            .unwrap();
        assert_eq!(fb.get_pixel(2, 3).unwrap(), BLACK);
        assert_eq!(fb.get_pixel(11, 10).unwrap(), BLACK);
        assert_eq!(fb.get_pixel(3, 6).unwrap(), BLACK);
        assert_eq!(fb.get_pixel(4, 5).unwrap(), WHITE);
        assert_eq!(fb.get_pixel(12, 3).unwrap(), WHITE);
        assert!(fb.draw_rect(mxcfb_rect::new(25, 0, 10, 5), 1, BLACK).is_err());
        assert!(fb.draw_rect(mxcfb_rect::new(0, 0, 5, 5), 0, BLACK).is_err());
    }

    #[test]
    fn rect_past_an_edge_draws_nothing() {
        let (mut fb, _) = memory_framebuffer(Model::Gen1, Config::default(), 30, 20);
        fb.clear().unwrap();
        // Top border would fit, bottom one would not
        let err = fb
            .draw_rect(mxcfb_rect::new(0, 18, 5, 5), 1, BLACK)
            .unwrap_err();
        assert!(matches!(err, Error::OutOfBounds { .. }));
        assert_eq!(fb.get_pixel(0, 18).unwrap(), WHITE);

        // Likewise for the right edge
        assert!(fb.draw_rect(mxcfb_rect::new(27, 2, 5, 5), 1, BLACK).is_err());
        assert_eq!(fb.get_pixel(27, 2).unwrap(), WHITE);
        assert_eq!(fb.get_pixel(29, 2).unwrap(), WHITE);

        assert!(fb
            .draw_rect(mxcfb_rect::new(u32::MAX, 0, 2, 2), 1, BLACK)
            .is_err());
        assert_eq!(
            fb.dump_region(mxcfb_rect::new(0, 0, 30, 20)).unwrap(),
            vec![WHITE; 600]
        );
    }
}
