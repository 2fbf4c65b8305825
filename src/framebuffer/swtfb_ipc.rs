//! Wire format of the rm2fb compositor's message queue.
//!
//! Every message is a `long` type tag followed by a fixed 512 byte body holding one
//! of the payloads below, laid out exactly as the compositor's C structs:
//!
//! ```text
//! Init              (1)  nothing
//! Update            (2)  struct mxcfb_update_data           72 bytes
//! CompositorUpdate  (3)  int x1, y1, x2, y2, waveform, flags 24 bytes
//! Wait              (4)  char sem_name[512]
//! ```

use std::ffi::CString;

use crate::error::{Error, Result};
use crate::framebuffer::mxcfb::mxcfb_update_data;

pub const MSG_TEXT_SIZE: usize = 512;

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
#[repr(i32)]
pub enum MessageType {
    Init = 1,
    Update = 2,
    CompositorUpdate = 3,
    Wait = 4,
}

/// The buffer handed to `msgsnd`.
#[derive(Clone)]
#[repr(C)]
pub struct RawMessage {
    pub mtype: libc::c_long,
    pub mtext: [u8; MSG_TEXT_SIZE],
}

impl RawMessage {
    fn new(kind: MessageType, payload: &[u8]) -> RawMessage {
        let mut mtext = [0u8; MSG_TEXT_SIZE];
        mtext[..payload.len()].copy_from_slice(payload);
        RawMessage {
            mtype: kind as libc::c_long,
            mtext,
        }
    }

    pub fn message_type(&self) -> Option<MessageType> {
        match self.mtype {
            1 => Some(MessageType::Init),
            2 => Some(MessageType::Update),
            3 => Some(MessageType::CompositorUpdate),
            4 => Some(MessageType::Wait),
            _ => None,
        }
    }
}

impl std::fmt::Debug for RawMessage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RawMessage")
            .field("mtype", &self.mtype)
            .finish()
    }
}

/// Update in xochitl's own coordinates, corners inclusive.
#[derive(Debug, Copy, Clone, Default, PartialEq, Eq)]
pub struct CompositorUpdate {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
    pub waveform: i32,
    pub flags: i32,
}

impl CompositorUpdate {
    pub fn to_bytes(&self) -> [u8; 24] {
        let mut out = [0u8; 24];
        let fields = [
            self.x1,
            self.y1,
            self.x2,
            self.y2,
            self.waveform,
            self.flags,
        ];
        for (chunk, field) in out.chunks_exact_mut(4).zip(fields.iter()) {
            chunk.copy_from_slice(&field.to_ne_bytes());
        }
        out
    }
}

/// Name of the POSIX semaphore the compositor posts once it has drained the queue
/// up to our `Wait` message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WaitToken {
    name: CString,
}

impl WaitToken {
    pub fn new(name: &str) -> Result<WaitToken> {
        if name.len() >= MSG_TEXT_SIZE {
            return Err(Error::InvalidArgument(format!(
                "semaphore name of {} bytes does not fit a wait message",
                name.len()
            )));
        }
        let name = CString::new(name)
            .map_err(|_| Error::InvalidArgument("semaphore name contains a NUL byte".into()))?;
        Ok(WaitToken { name })
    }

    /// `/rm2fb.wait.<pid>`, unique to this process.
    pub fn for_process(pid: u32) -> WaitToken {
        WaitToken {
            name: CString::new(format!("/rm2fb.wait.{}", pid)).unwrap_or_default(),
        }
    }

    pub fn name(&self) -> &std::ffi::CStr {
        &self.name
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwtfbMessage {
    Init,
    Update(mxcfb_update_data),
    CompositorUpdate(CompositorUpdate),
    Wait(WaitToken),
}

impl SwtfbMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            SwtfbMessage::Init => MessageType::Init,
            SwtfbMessage::Update(_) => MessageType::Update,
            SwtfbMessage::CompositorUpdate(_) => MessageType::CompositorUpdate,
            SwtfbMessage::Wait(_) => MessageType::Wait,
        }
    }

    pub fn encode(&self) -> RawMessage {
        let kind = self.message_type();
        match self {
            SwtfbMessage::Init => RawMessage::new(kind, &[]),
            SwtfbMessage::Update(data) => RawMessage::new(kind, &data.to_bytes()),
            SwtfbMessage::CompositorUpdate(data) => RawMessage::new(kind, &data.to_bytes()),
            SwtfbMessage::Wait(token) => RawMessage::new(kind, token.name.as_bytes_with_nul()),
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::framebuffer::common::mxcfb_rect;

    #[test]
    fn raw_message_layout() {
        let long = std::mem::size_of::<libc::c_long>();
        assert_eq!(std::mem::size_of::<RawMessage>(), long + MSG_TEXT_SIZE);
    }

    #[test]
    fn update_payload_is_the_mxcfb_record() {
        let data = mxcfb_update_data {
            update_region: mxcfb_rect::new(1, 2, 3, 4),
            update_marker: 99,
            ..Default::default()
        };
        let raw = SwtfbMessage::Update(data).encode();
        assert_eq!(raw.mtype, 2);
        assert_eq!(raw.message_type(), Some(MessageType::Update));
        assert_eq!(&raw.mtext[..72], &data.to_bytes()[..]);
        assert!(raw.mtext[72..].iter().all(|&b| b == 0));
    }

    #[test]
    fn compositor_update_fields_in_order() {
        let raw = SwtfbMessage::CompositorUpdate(CompositorUpdate {
            x1: 1,
            y1: 2,
            x2: 3,
            y2: 4,
            waveform: 5,
            flags: 6,
        })
        .encode();
        assert_eq!(raw.mtype, 3);
        let words: Vec<i32> = raw.mtext[..24]
            .chunks(4)
            .map(|c| i32::from_ne_bytes([c[0], c[1], c[2], c[3]]))
            .collect();
        assert_eq!(words, vec![1, 2, 3, 4, 5, 6]);
    }

    #[test]
    fn wait_carries_nul_terminated_name() {
        let raw = SwtfbMessage::Wait(WaitToken::for_process(1234)).encode();
        assert_eq!(raw.mtype, 4);
        let name = b"/rm2fb.wait.1234\0";
        assert_eq!(&raw.mtext[..name.len()], &name[..]);
    }

    #[test]
    fn init_is_empty() {
        let raw = SwtfbMessage::Init.encode();
        assert_eq!(raw.mtype, 1);
        assert!(raw.mtext.iter().all(|&b| b == 0));
    }

    #[test]
    fn oversized_wait_name_is_rejected() {
        assert!(WaitToken::new(&"x".repeat(MSG_TEXT_SIZE)).is_err());
        assert!(WaitToken::new("bad\0name").is_err());
        assert!(WaitToken::new("/ok").is_ok());
    }
}
