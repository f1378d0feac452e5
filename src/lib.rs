//! # Quill
//!
//! A terminal-resident text editing engine.
//!
//! Quill keeps a document in memory as discrete rows, renders a scrollable
//! viewport of it into the terminal as one single-write frame, and decodes
//! the raw keyboard byte stream (including multi-byte escape sequences)
//! into editing operations.
//!
//! ## Core Concepts
//!
//! - **Logical/rendered duality**: each row owns raw bytes plus a derived
//!   tab-expanded render; cursor positions map between the two
//! - **Single-write frames**: every refresh is accumulated into one buffer
//!   and flushed with one `write()` to avoid tearing
//! - **Byte-level input**: a reader thread feeds raw bytes over a channel;
//!   the decoder resolves escape sequences under a bounded timeout
//!
//! ## Example
//!
//! ```rust,ignore
//! use quill::Document;
//!
//! let mut doc = Document::new();
//! doc.insert_row(0, b"hello".to_vec());
//! doc.insert_char(0, 5, b'!');
//! ```

#![warn(missing_docs)]
#![warn(clippy::pedantic)]
#![warn(clippy::nursery)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::must_use_candidate)]

pub mod document;
pub mod editor;
pub mod error;
pub mod input;
pub mod screen;
pub mod search;
pub mod terminal;

// Re-exports for convenience
pub use document::{Document, Row, TAB_STOP};
pub use editor::{Editor, QUIT_CONFIRM_PRESSES};
pub use error::{Error, Result};
pub use input::{ByteReader, ByteSource, Fetch, KeyCode, KeyDecoder, KeyEvent, KeyMods};
pub use screen::{OutputBuffer, Screen, StatusMessage, Viewport};
pub use search::SearchState;
