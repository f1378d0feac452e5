//! Crate error taxonomy.
//!
//! Only two classes are fatal: terminal control failures and the initial
//! file load (there is nothing to edit without it). A failed save is
//! surfaced on the message bar and editing continues; input timeouts and
//! malformed escape sequences never become error values at all.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Errors that cross a component boundary.
#[derive(Debug, Error)]
pub enum Error {
    /// Raw-mode control or frame output failed. Fatal: the terminal is
    /// restored and the process exits.
    #[error("terminal control failed: {0}")]
    Terminal(#[source] io::Error),

    /// The backing file could not be read at startup. Fatal.
    #[error("cannot open {}: {source}", .path.display())]
    Load {
        /// Path that failed to load.
        path: PathBuf,
        /// Underlying I/O failure.
        source: io::Error,
    },

    /// Writing the document back to disk failed. Recoverable: the
    /// controller reports it on the message bar and leaves the dirty
    /// counter untouched.
    #[error("save failed: {0}")]
    Save(#[source] io::Error),

    /// The stdin byte channel disconnected (reader thread exited). Fatal,
    /// since no further input can arrive.
    #[error("input stream closed")]
    InputClosed,
}

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, Error>;
