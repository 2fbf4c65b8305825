use std::path::Path;

use log::{debug, info};

use crate::config::Config;
use crate::device::Model;
use crate::error::{Error, Result};
use crate::framebuffer::buffer::PixelBuffer;
use crate::framebuffer::ioctl::IoctlDevice;
use crate::framebuffer::mxcfb::mxcfb_update_data;
use crate::framebuffer::screeninfo::Geometry;
use crate::framebuffer::swtfb_client::SwtfbClient;
use crate::framebuffer::FramebufferBase;

/// What every way of reaching the panel provides: a pixel buffer, a way to
/// submit an update and a way to wait for one.
pub trait Backend {
    fn path(&self) -> &Path;
    fn buffer(&self) -> &PixelBuffer;
    fn buffer_mut(&mut self) -> &mut PixelBuffer;
    fn send_update(&mut self, update: &mxcfb_update_data) -> Result<()>;
    fn wait(&mut self, marker: u32) -> Result<()>;
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum BackendKind {
    /// `/dev/fb0` and the mxcfb ioctls
    Ioctl,
    /// The rm2fb compositor
    Swtfb,
}

/// Which backend drives the panel of `model`.
///
/// A reMarkable 1 is always driven directly. A reMarkable 2 only has a usable panel
/// through rm2fb, so a missing segment there is fatal. Anything else goes through
/// rm2fb whenever its segment exists.
pub fn select_backend(model: Model, shm_present: bool, shm_path: &Path) -> Result<BackendKind> {
    match (model, shm_present) {
        (Model::Gen1, _) => Ok(BackendKind::Ioctl),
        (Model::Gen2, true) => Ok(BackendKind::Swtfb),
        (Model::Gen2, false) => Err(Error::MissingSharedMemory {
            path: shm_path.to_path_buf(),
            model,
        }),
        (Model::Unknown, true) => Ok(BackendKind::Swtfb),
        (Model::Unknown, false) => Ok(BackendKind::Ioctl),
    }
}

pub type Opener = Box<dyn FnMut(BackendKind, &Config) -> Result<Box<dyn Backend>>>;

fn open_backend(kind: BackendKind, config: &Config) -> Result<Box<dyn Backend>> {
    let backend: Box<dyn Backend> = match kind {
        BackendKind::Ioctl => Box::new(IoctlDevice::open(&config.framebuffer_path)?),
        BackendKind::Swtfb => Box::new(SwtfbClient::open(config)?),
    };
    Ok(backend)
}

/// The panel, through whichever backend the device calls for.
///
/// Resources are acquired lazily on first use (or by `open`) and let go by `release`
/// or on drop. The backend is re-selected on every call; if the selection changes,
/// as it can on an unknown model when the compositor starts or stops, the old
/// backend is released and the new one opened.
pub struct Framebuffer {
    model: Model,
    config: Config,
    active: Option<(BackendKind, Box<dyn Backend>)>,
    opener: Opener,
}

impl Default for Framebuffer {
    fn default() -> Self {
        Framebuffer::new()
    }
}

impl Framebuffer {
    /// Framebuffer of the device we are running on, configured from the environment.
    pub fn new() -> Framebuffer {
        Framebuffer::with_config(Model::current(), Config::from_env())
    }

    pub fn with_config(model: Model, config: Config) -> Framebuffer {
        Framebuffer::with_opener(model, config, Box::new(open_backend))
    }

    /// Like `with_config`, with backends produced by `opener`.
    pub fn with_opener(model: Model, config: Config, opener: Opener) -> Framebuffer {
        Framebuffer {
            model,
            config,
            active: None,
            opener,
        }
    }

    pub fn model(&self) -> Model {
        self.model
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// The backend a call made now would go through.
    pub fn backend_kind(&self) -> Result<BackendKind> {
        select_backend(self.model, self.config.shm_present(), &self.config.shm_path)
    }

    pub(crate) fn backend(&mut self) -> Result<&mut dyn Backend> {
        let kind = self.backend_kind()?;
        let backend = match self.active.take() {
            Some((active, backend)) if active == kind => backend,
            previous => {
                if let Some((previous, _)) = previous {
                    info!("switching framebuffer backend from {:?} to {:?}", previous, kind);
                }
                let backend = (self.opener)(kind, &self.config)?;
                info!("opened {:?} framebuffer at {:?}", kind, backend.path());
                backend
            }
        };
        let (_, backend) = self.active.insert((kind, backend));
        Ok(backend.as_mut())
    }
}

impl FramebufferBase for Framebuffer {
    fn open(&mut self) -> Result<BackendKind> {
        let kind = self.backend_kind()?;
        self.backend()?;
        Ok(kind)
    }

    fn release(&mut self) {
        if let Some((kind, backend)) = self.active.take() {
            debug!("releasing {:?} framebuffer at {:?}", kind, backend.path());
        }
    }

    fn is_open(&self) -> bool {
        self.active.is_some()
    }

    fn geometry(&mut self) -> Result<Geometry> {
        Ok(*self.backend()?.buffer().geometry())
    }

    fn size(&mut self) -> Result<usize> {
        Ok(self.backend()?.buffer().len())
    }

    fn path(&mut self) -> Result<&Path> {
        Ok(self.backend()?.path())
    }
}

impl Drop for Framebuffer {
    fn drop(&mut self) {
        self.release();
    }
}
