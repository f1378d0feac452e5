//! Screen module: frame composition for a flicker-free terminal display.
//!
//! This module contains:
//! - [`OutputBuffer`]: accumulates ANSI bytes, flushed in one write
//! - [`Viewport`]: the visible window and its minimal-motion scroll clamp
//! - [`Screen`]: composes content rows, status bar, and message bar into
//!   one frame
//! - [`StatusMessage`]: transient message-bar text with a display lifetime

mod compositor;
mod output;
mod viewport;

pub use compositor::{Screen, StatusMessage, MESSAGE_LIFETIME};
pub use output::OutputBuffer;
pub use viewport::Viewport;
