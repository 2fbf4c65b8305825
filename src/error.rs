use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::device::Model;

#[derive(Error, Debug)]
pub enum Error {
    /// The rm2fb segment is mandatory on a reMarkable 2. Not recoverable.
    #[error("{model} requires the rm2fb shared memory segment at {path:?}, but it does not exist")]
    MissingSharedMemory { path: PathBuf, model: Model },

    /// `msgget` refused to create or open the compositor queue. Not recoverable.
    #[error("failed to open message queue {key:#x}: {source}")]
    MessageQueue { key: i32, source: io::Error },

    /// An ioctl, msgsnd or semaphore call reported failure.
    #[error("{op} failed: {source}")]
    Backend {
        op: &'static str,
        #[source]
        source: io::Error,
    },

    #[error("{what} ({x}, {y}) + ({width}x{height}) is outside the {bound_width}x{bound_height} buffer")]
    OutOfBounds {
        what: &'static str,
        x: u32,
        y: u32,
        width: u32,
        height: u32,
        bound_width: u32,
        bound_height: u32,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error(transparent)]
    Io(#[from] io::Error),
}

impl Error {
    /// Wraps `errno` of the call that just failed.
    pub(crate) fn last_os(op: &'static str) -> Error {
        Error::Backend {
            op,
            source: io::Error::last_os_error(),
        }
    }

    /// The OS error code behind a backend or I/O failure, if any.
    pub fn os_code(&self) -> Option<i32> {
        match self {
            Error::Backend { source, .. } => source.raw_os_error(),
            Error::MessageQueue { source, .. } => source.raw_os_error(),
            Error::Io(source) => source.raw_os_error(),
            _ => None,
        }
    }

    /// Configuration errors leave the process unable to drive the panel at all.
    pub fn is_fatal(&self) -> bool {
        matches!(
            self,
            Error::MissingSharedMemory { .. } | Error::MessageQueue { .. }
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
