use crate::error::Result;
use crate::framebuffer::common::mxcfb_rect;
use crate::framebuffer::core::Framebuffer;
use crate::framebuffer::FramebufferIO;

impl FramebufferIO for Framebuffer {
    fn get_pixel(&mut self, x: u32, y: u32) -> Result<u16> {
        self.backend()?.buffer().get_pixel(x, y)
    }

    fn set_pixel(&mut self, x: u32, y: u32, color: u16) -> Result<()> {
        self.backend()?.buffer_mut().set_pixel(x, y, color)
    }

    fn set_row(&mut self, x: u32, y: u32, width: u32, color: u16) -> Result<()> {
        self.backend()?.buffer_mut().set_row(x, y, width, color)
    }

    fn set_col(&mut self, x: u32, y: u32, height: u32, color: u16) -> Result<()> {
        self.backend()?.buffer_mut().set_col(x, y, height, color)
    }

    fn set_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: u16) -> Result<()> {
        self.backend()?
            .buffer_mut()
            .set_rect(x, y, width, height, color)
    }

    fn fill(&mut self, color: u16) -> Result<()> {
        self.backend()?.buffer_mut().fill(color)
    }

    fn dump_region(&mut self, rect: mxcfb_rect) -> Result<Vec<u16>> {
        self.backend()?
            .buffer()
            .read_rect(rect.left, rect.top, rect.width, rect.height)
    }
}
