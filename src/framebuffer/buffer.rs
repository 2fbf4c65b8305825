use memmap2::MmapMut;

use crate::error::{Error, Result};
use crate::framebuffer::screeninfo::Geometry;

const CELL: usize = std::mem::size_of::<u16>();

/// A mapped RGB565 scan buffer and the geometry needed to address it.
///
/// Every write is bounds-checked against the visible area before anything is
/// touched. Bulk fills are done as whole-row copies of a pre-expanded run of
/// cells rather than one pixel at a time.
pub struct PixelBuffer {
    map: MmapMut,
    geometry: Geometry,
}

impl PixelBuffer {
    pub fn new(map: MmapMut, geometry: Geometry) -> Result<PixelBuffer> {
        if geometry.pixel_size as usize != CELL {
            return Err(Error::InvalidArgument(format!(
                "unsupported pixel size of {} bytes",
                geometry.pixel_size
            )));
        }
        if geometry.required_len() > map.len() {
            return Err(Error::InvalidArgument(format!(
                "mapping of {} bytes is too small for {:?}",
                map.len(),
                geometry
            )));
        }
        Ok(PixelBuffer { map, geometry })
    }

    /// An anonymous, zero-filled buffer.
    pub fn anonymous(geometry: Geometry) -> Result<PixelBuffer> {
        let map = MmapMut::map_anon(geometry.size().max(geometry.required_len()))?;
        PixelBuffer::new(map, geometry)
    }

    pub fn geometry(&self) -> &Geometry {
        &self.geometry
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    fn check(&self, what: &'static str, x: u32, y: u32, width: u32, height: u32) -> Result<()> {
        let g = &self.geometry;
        let fits = x < g.width
            && y < g.height
            && u64::from(x) + u64::from(width) <= u64::from(g.width)
            && u64::from(y) + u64::from(height) <= u64::from(g.height);
        if fits {
            Ok(())
        } else {
            Err(Error::OutOfBounds {
                what,
                x,
                y,
                width,
                height,
                bound_width: g.width,
                bound_height: g.height,
            })
        }
    }

    fn byte_offset(&self, x: u32, y: u32) -> usize {
        self.geometry.offset(x, y) * CELL
    }

    pub fn get_pixel(&self, x: u32, y: u32) -> Result<u16> {
        self.check("pixel", x, y, 1, 1)?;
        let o = self.byte_offset(x, y);
        Ok(u16::from_ne_bytes([self.map[o], self.map[o + 1]]))
    }

    pub fn set_pixel(&mut self, x: u32, y: u32, color: u16) -> Result<()> {
        self.check("pixel", x, y, 1, 1)?;
        let o = self.byte_offset(x, y);
        self.map[o..o + CELL].copy_from_slice(&color.to_ne_bytes());
        Ok(())
    }

    pub fn set_row(&mut self, x: u32, y: u32, width: u32, color: u16) -> Result<()> {
        self.set_rect(x, y, width, 1, color)
    }

    pub fn set_col(&mut self, x: u32, y: u32, height: u32, color: u16) -> Result<()> {
        self.set_rect(x, y, 1, height, color)
    }

    pub fn set_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: u16) -> Result<()> {
        self.check("rect", x, y, width, height)?;
        let run = color.to_ne_bytes().repeat(width as usize);
        for row in y..y + height {
            let o = self.byte_offset(x, row);
            self.map[o..o + run.len()].copy_from_slice(&run);
        }
        Ok(())
    }

    /// Paints the whole visible area.
    pub fn fill(&mut self, color: u16) -> Result<()> {
        let (width, height) = (self.geometry.width, self.geometry.height);
        if width == 0 || height == 0 {
            return Ok(());
        }
        self.set_rect(0, 0, width, height, color)
    }

    /// Copies out the cells of a rectangle, row by row.
    pub fn read_rect(&self, x: u32, y: u32, width: u32, height: u32) -> Result<Vec<u16>> {
        self.check("rect", x, y, width, height)?;
        let mut out = Vec::with_capacity(width as usize * height as usize);
        for row in y..y + height {
            let o = self.byte_offset(x, row);
            out.extend(
                self.map[o..o + width as usize * CELL]
                    .chunks_exact(CELL)
                    .map(|c| u16::from_ne_bytes([c[0], c[1]])),
            );
        }
        Ok(out)
    }
}
