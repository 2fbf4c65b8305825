//! The kernel `mxcfb` interface: `/dev/fb0` mapped into memory, with updates and
//! waits issued as ioctls on the same descriptor.

use std::fs::{File, OpenOptions};
use std::os::unix::io::AsRawFd;
use std::path::{Path, PathBuf};

use log::debug;
use memmap2::MmapOptions;

use crate::error::{Error, Result};
use crate::framebuffer::buffer::PixelBuffer;
use crate::framebuffer::common::{
    FBIOGET_FSCREENINFO, FBIOGET_VSCREENINFO, MXCFB_SEND_UPDATE, MXCFB_WAIT_FOR_UPDATE_COMPLETE,
};
use crate::framebuffer::core::Backend;
use crate::framebuffer::mxcfb::{mxcfb_update_data, mxcfb_update_marker_data};
use crate::framebuffer::screeninfo::{FixScreeninfo, Geometry, VarScreeninfo};

pub struct IoctlDevice {
    device: File,
    path: PathBuf,
    buffer: PixelBuffer,
    var_screen_info: VarScreeninfo,
    fix_screen_info: FixScreeninfo,
}

impl IoctlDevice {
    /// Opens the device read/write, queries its screen info once and maps it.
    pub fn open(path: impl AsRef<Path>) -> Result<IoctlDevice> {
        let path = path.as_ref().to_path_buf();
        let device = OpenOptions::new().read(true).write(true).open(&path)?;

        let var_screen_info = IoctlDevice::get_var_screeninfo(&device)?;
        let fix_screen_info = IoctlDevice::get_fix_screeninfo(&device)?;
        let geometry = Geometry::from(&var_screen_info);

        let len = match fix_screen_info.smem_len as usize {
            0 => geometry.size(),
            len => len,
        };
        let map = unsafe { MmapOptions::new().len(len).map_mut(&device)? };
        debug!("mapped {} bytes of {:?} as {:?}", len, path, geometry);

        Ok(IoctlDevice {
            buffer: PixelBuffer::new(map, geometry)?,
            device,
            path,
            var_screen_info,
            fix_screen_info,
        })
    }

    pub fn get_var_screeninfo(device: &File) -> Result<VarScreeninfo> {
        let mut info = VarScreeninfo::default();
        let result = unsafe {
            libc::ioctl(
                device.as_raw_fd(),
                FBIOGET_VSCREENINFO as _,
                &mut info as *mut VarScreeninfo,
            )
        };
        if result < 0 {
            return Err(Error::last_os("FBIOGET_VSCREENINFO"));
        }
        Ok(info)
    }

    pub fn get_fix_screeninfo(device: &File) -> Result<FixScreeninfo> {
        let mut info = FixScreeninfo::default();
        let result = unsafe {
            libc::ioctl(
                device.as_raw_fd(),
                FBIOGET_FSCREENINFO as _,
                &mut info as *mut FixScreeninfo,
            )
        };
        if result < 0 {
            return Err(Error::last_os("FBIOGET_FSCREENINFO"));
        }
        Ok(info)
    }

    pub fn var_screen_info(&self) -> &VarScreeninfo {
        &self.var_screen_info
    }

    pub fn fix_screen_info(&self) -> &FixScreeninfo {
        &self.fix_screen_info
    }
}

impl Backend for IoctlDevice {
    fn path(&self) -> &Path {
        &self.path
    }

    fn buffer(&self) -> &PixelBuffer {
        &self.buffer
    }

    fn buffer_mut(&mut self) -> &mut PixelBuffer {
        &mut self.buffer
    }

    fn send_update(&mut self, update: &mxcfb_update_data) -> Result<()> {
        let result = unsafe {
            libc::ioctl(
                self.device.as_raw_fd(),
                MXCFB_SEND_UPDATE as _,
                update as *const mxcfb_update_data,
            )
        };
        if result < 0 {
            return Err(Error::last_os("MXCFB_SEND_UPDATE"));
        }
        Ok(())
    }

    fn wait(&mut self, marker: u32) -> Result<()> {
        let mut data = mxcfb_update_marker_data {
            update_marker: marker,
            collision_test: 0,
        };
        let result = unsafe {
            libc::ioctl(
                self.device.as_raw_fd(),
                MXCFB_WAIT_FOR_UPDATE_COMPLETE as _,
                &mut data as *mut mxcfb_update_marker_data,
            )
        };
        if result < 0 {
            return Err(Error::last_os("MXCFB_WAIT_FOR_UPDATE_COMPLETE"));
        }
        Ok(())
    }
}
