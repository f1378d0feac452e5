//! Input module: raw bytes in, key events out.
//!
//! This module contains:
//! - [`KeyCode`] / [`KeyMods`] / [`KeyEvent`]: decoded key presses
//! - [`ByteReader`]: dedicated thread forwarding stdin bytes over a channel
//! - [`KeyDecoder`]: the escape-sequence state machine over a [`ByteSource`]
//!
//! # Architecture
//!
//! ```text
//! ┌──────────────┐    u8 (channel)    ┌────────────┐    KeyEvent
//! │ Reader Thread│ ─────────────────▶ │ KeyDecoder │ ─────────────▶ Editor
//! └──────────────┘                    └────────────┘
//! ```
//!
//! The channel receiver is the production [`ByteSource`]; its
//! `recv_timeout` is the bounded wait that lets the decoder treat a silent
//! line as "no more bytes" and resolve a lone 0x1B as the Escape key.

mod decoder;
mod keys;
mod reader;

pub use decoder::{ByteSource, Fetch, KeyDecoder, READ_TIMEOUT};
pub use keys::{KeyCode, KeyEvent, KeyMods};
pub use reader::ByteReader;
