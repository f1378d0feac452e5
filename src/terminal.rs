//! Terminal control boundary: raw mode and window size.
//!
//! Raw mode is held by an RAII guard so the terminal is restored on every
//! exit path, including fatal errors. The size query prefers the direct
//! ioctl-backed lookup and falls back to the cursor-position probe (park
//! the cursor at the bottom-right corner, ask the terminal where it is).

use crate::error::{Error, Result};
use crossterm::terminal;
use std::io::{self, Read, Write};

/// RAII guard holding the terminal in raw input mode.
pub struct RawModeGuard {
    _private: (),
}

impl RawModeGuard {
    /// Switch the terminal into raw mode.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Terminal`] if the mode change fails.
    pub fn enable() -> Result<Self> {
        terminal::enable_raw_mode().map_err(Error::Terminal)?;
        Ok(Self { _private: () })
    }
}

impl Drop for RawModeGuard {
    fn drop(&mut self) {
        let _ = terminal::disable_raw_mode();
    }
}

/// Query the terminal dimensions as `(cols, rows)`.
///
/// # Errors
///
/// Returns [`Error::Terminal`] when both the direct query and the
/// cursor-position probe fail.
pub fn window_size() -> Result<(u16, u16)> {
    match terminal::size() {
        Ok((cols, rows)) if cols > 0 && rows > 0 => Ok((cols, rows)),
        _ => cursor_position_probe(),
    }
}

/// Fallback probe: push the cursor to the bottom-right corner, then read
/// back its reported position. Must run in raw mode with stdin otherwise
/// idle (i.e. before the reader thread starts).
fn cursor_position_probe() -> Result<(u16, u16)> {
    let mut stdout = io::stdout();
    stdout
        .write_all(b"\x1b[999C\x1b[999B\x1b[6n")
        .map_err(Error::Terminal)?;
    stdout.flush().map_err(Error::Terminal)?;

    // Response: ESC [ rows ; cols R
    let mut report = Vec::new();
    let mut byte = [0u8; 1];
    let mut stdin = io::stdin().lock();
    while report.len() < 32 {
        match stdin.read(&mut byte) {
            Ok(1) if byte[0] == b'R' => break,
            Ok(1) => report.push(byte[0]),
            _ => break,
        }
    }

    parse_cursor_report(&report).ok_or_else(|| {
        Error::Terminal(io::Error::new(
            io::ErrorKind::InvalidData,
            "malformed cursor position report",
        ))
    })
}

/// Parse `ESC [ rows ; cols` (the trailing `R` already consumed) into
/// `(cols, rows)`.
fn parse_cursor_report(report: &[u8]) -> Option<(u16, u16)> {
    let body = report.strip_prefix(b"\x1b[")?;
    let text = std::str::from_utf8(body).ok()?;
    let (rows, cols) = text.split_once(';')?;
    Some((cols.parse().ok()?, rows.parse().ok()?))
}
