//! Client side of the rm2fb compositor (https://github.com/ddvk/remarkable2-framebuffer).
//!
//! Pixels go straight into the compositor's shared memory segment. Updates are
//! requested by messages on a SysV queue, and a wait is a message naming a POSIX
//! semaphore which the compositor posts once everything queued before it is done.

use std::collections::VecDeque;
use std::ffi::CStr;
use std::fs::OpenOptions;
use std::path::{Path, PathBuf};

use log::{debug, info};
use memmap2::MmapOptions;

use crate::config::Config;
use crate::dimensions::{DISPLAYHEIGHT, DISPLAYWIDTH};
use crate::error::{Error, Result};
use crate::framebuffer::buffer::PixelBuffer;
use crate::framebuffer::core::Backend;
use crate::framebuffer::mxcfb::mxcfb_update_data;
use crate::framebuffer::screeninfo::Geometry;
use crate::framebuffer::swtfb_ipc::{
    CompositorUpdate, RawMessage, SwtfbMessage, WaitToken, MSG_TEXT_SIZE,
};

/// How many submitted markers are remembered for `wait`.
const TRACKED_MARKERS: usize = 64;

/// Panel layout the compositor exposes, whatever the segment's size.
pub fn geometry() -> Geometry {
    Geometry::packed(
        u32::from(DISPLAYWIDTH),
        u32::from(DISPLAYHEIGHT),
        std::mem::size_of::<u16>() as u32,
    )
}

/// The channel to the compositor.
pub trait SwtfbTransport {
    fn send(&mut self, message: &RawMessage) -> Result<()>;

    /// Creates the semaphore named in `request`, sends `request` and blocks until
    /// the semaphore is posted.
    fn send_and_wait(&mut self, semaphore: &CStr, request: &RawMessage) -> Result<()>;
}

pub struct SysvQueue {
    msqid: libc::c_int,
}

impl SysvQueue {
    pub fn open(key: i32) -> Result<SysvQueue> {
        let msqid = unsafe { libc::msgget(key as libc::key_t, libc::IPC_CREAT | 0o600) };
        if msqid < 0 {
            return Err(Error::MessageQueue {
                key,
                source: std::io::Error::last_os_error(),
            });
        }
        debug!("message queue {:#x} has id {}", key, msqid);
        Ok(SysvQueue { msqid })
    }
}

impl SwtfbTransport for SysvQueue {
    fn send(&mut self, message: &RawMessage) -> Result<()> {
        let result = unsafe {
            libc::msgsnd(
                self.msqid,
                message as *const RawMessage as *const libc::c_void,
                MSG_TEXT_SIZE,
                0,
            )
        };
        if result < 0 {
            return Err(Error::last_os("msgsnd"));
        }
        Ok(())
    }

    fn send_and_wait(&mut self, semaphore: &CStr, request: &RawMessage) -> Result<()> {
        let sem = unsafe {
            libc::sem_open(
                semaphore.as_ptr(),
                libc::O_CREAT,
                0o644 as libc::c_uint,
                0 as libc::c_uint,
            )
        };
        if sem == libc::SEM_FAILED {
            return Err(Error::last_os("sem_open"));
        }

        let result = self.send(request).and_then(|_| loop {
            if unsafe { libc::sem_wait(sem) } == 0 {
                break Ok(());
            }
            let err = std::io::Error::last_os_error();
            if err.raw_os_error() != Some(libc::EINTR) {
                break Err(Error::Backend {
                    op: "sem_wait",
                    source: err,
                });
            }
        });

        unsafe {
            libc::sem_close(sem);
            libc::sem_unlink(semaphore.as_ptr());
        }
        result
    }
}

pub struct SwtfbClient<T: SwtfbTransport = SysvQueue> {
    transport: T,
    path: PathBuf,
    buffer: PixelBuffer,
    token: WaitToken,
    do_wait: bool,
    submitted: VecDeque<u32>,
}

impl SwtfbClient<SysvQueue> {
    /// Maps the shared memory segment and opens the compositor's queue.
    pub fn open(config: &Config) -> Result<SwtfbClient<SysvQueue>> {
        let segment = OpenOptions::new()
            .read(true)
            .write(true)
            .open(&config.shm_path)?;
        let len = segment.metadata()?.len() as usize;
        let map = unsafe { MmapOptions::new().len(len).map_mut(&segment)? };
        let buffer = PixelBuffer::new(map, geometry())?;
        let transport = SysvQueue::open(config.msg_queue_key)?;
        info!(
            "attached to rm2fb segment {:?} ({} bytes)",
            config.shm_path, len
        );
        Ok(SwtfbClient::with_transport(
            transport,
            &config.shm_path,
            buffer,
            config.swtfb_wait,
        ))
    }
}

impl<T: SwtfbTransport> SwtfbClient<T> {
    pub fn with_transport(
        transport: T,
        path: impl AsRef<Path>,
        buffer: PixelBuffer,
        do_wait: bool,
    ) -> SwtfbClient<T> {
        SwtfbClient {
            transport,
            path: path.as_ref().to_path_buf(),
            buffer,
            token: WaitToken::for_process(std::process::id()),
            do_wait,
            submitted: VecDeque::with_capacity(TRACKED_MARKERS),
        }
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn send(&mut self, message: &SwtfbMessage) -> Result<()> {
        self.transport.send(&message.encode())
    }

    pub fn send_init(&mut self) -> Result<()> {
        self.send(&SwtfbMessage::Init)
    }

    pub fn send_mxcfb_update(&mut self, update: &mxcfb_update_data) -> Result<()> {
        self.send(&SwtfbMessage::Update(*update))?;
        if self.submitted.len() == TRACKED_MARKERS {
            self.submitted.pop_front();
        }
        self.submitted.push_back(update.update_marker);
        Ok(())
    }

    /// Asks the compositor to refresh in xochitl's coordinate space. No marker is involved.
    pub fn send_compositor_update(&mut self, update: &CompositorUpdate) -> Result<()> {
        self.send(&SwtfbMessage::CompositorUpdate(*update))
    }

    /// Blocks until the compositor has processed the update carrying `marker`.
    ///
    /// The queue is FIFO, so our semaphore is only posted after every message sent
    /// before it, the update for `marker` included. Markers that never went through
    /// this client cannot be waited on.
    pub fn wait_for_update_complete(&mut self, marker: u32) -> Result<()> {
        if !self.submitted.contains(&marker) {
            return Err(Error::InvalidArgument(format!(
                "marker {} was not submitted to the compositor",
                marker
            )));
        }
        if !self.do_wait {
            return Ok(());
        }
        let request = SwtfbMessage::Wait(self.token.clone()).encode();
        self.transport.send_and_wait(self.token.name(), &request)
    }
}

impl<T: SwtfbTransport> Backend for SwtfbClient<T> {
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
        self.send_mxcfb_update(update)
    }

    fn wait(&mut self, marker: u32) -> Result<()> {
        self.wait_for_update_complete(marker)
    }
}
