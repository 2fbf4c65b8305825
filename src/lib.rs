//! Hardware layer for the reMarkable e-ink tablets.
//!
//! Exposes the panel as an addressable RGB565 pixel buffer with partial refresh
//! (through either the kernel `mxcfb` ioctl interface or the rm2fb compositor's
//! shared memory + SysV message queue), and reassembles the kernel evdev stream
//! into touch, stylus and keyboard events.

#[macro_use]
extern crate ioctl_gen;

pub extern crate cgmath;
pub extern crate evdev;

/// Device model detection and input placement rules
pub mod device;

/// Fixed panel dimensions
pub mod dimensions;

/// Paths and tunables, overridable through the environment
pub mod config;

pub mod error;

/// Named colors and RGB565 conversions
pub mod color;

/// Exact rectangle and region algebra used for damage tracking
pub mod geometry;

/// One of the core components, allowing output and refresh of the EInk display
pub mod framebuffer;

/// The other core component, turning raw evdev reports into touch, wacom and key events
pub mod input;

pub use crate::config::Config;
pub use crate::device::Model;
pub use crate::error::{Error, Result};
