//! Key decoder: resolves a raw byte stream into discrete key events.
//!
//! The decoder owns the one piece of genuine ambiguity in the input path:
//! a lone 0x1B is indistinguishable from the start of an escape sequence
//! until more bytes arrive (or fail to arrive within the read timeout).
//! Every unrecognized or truncated sequence degrades to a bare `Esc`
//! event; decoding never fails.

use super::keys::{KeyCode, KeyEvent};
use crate::error::{Error, Result};
use crossbeam_channel::{Receiver, RecvTimeoutError};
use std::time::Duration;

/// Bounded wait for one byte. Mirrors the tenth-of-a-second granularity
/// terminals conventionally use for escape disambiguation.
pub const READ_TIMEOUT: Duration = Duration::from_millis(100);

/// Outcome of a bounded byte fetch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Fetch {
    /// A byte arrived.
    Byte(u8),
    /// Nothing arrived within the timeout.
    TimedOut,
    /// The source is gone and no further bytes can arrive.
    Closed,
}

/// A blocking byte source with a per-read timeout.
pub trait ByteSource {
    /// Wait up to `timeout` for the next byte.
    fn fetch(&mut self, timeout: Duration) -> Fetch;
}

impl ByteSource for Receiver<u8> {
    fn fetch(&mut self, timeout: Duration) -> Fetch {
        match self.recv_timeout(timeout) {
            Ok(byte) => Fetch::Byte(byte),
            Err(RecvTimeoutError::Timeout) => Fetch::TimedOut,
            Err(RecvTimeoutError::Disconnected) => Fetch::Closed,
        }
    }
}

/// Decodes bytes from a [`ByteSource`] into [`KeyEvent`]s.
#[derive(Debug)]
pub struct KeyDecoder<S> {
    source: S,
    timeout: Duration,
}

impl<S: ByteSource> KeyDecoder<S> {
    /// Create a decoder with the default read timeout.
    pub const fn new(source: S) -> Self {
        Self {
            source,
            timeout: READ_TIMEOUT,
        }
    }

    /// Create a decoder with a custom read timeout.
    pub const fn with_timeout(source: S, timeout: Duration) -> Self {
        Self { source, timeout }
    }

    /// Block until the next key event.
    ///
    /// Timeouts on the first byte are retries, not errors; only a closed
    /// source surfaces as [`Error::InputClosed`].
    pub fn next_key(&mut self) -> Result<KeyEvent> {
        let byte = loop {
            match self.source.fetch(self.timeout) {
                Fetch::Byte(byte) => break byte,
                Fetch::TimedOut => {}
                Fetch::Closed => return Err(Error::InputClosed),
            }
        };
        self.decode(byte)
    }

    /// Decode one key event starting from its first byte.
    fn decode(&mut self, byte: u8) -> Result<KeyEvent> {
        Ok(match byte {
            0x1b => self.decode_escape()?,
            b'\r' => KeyEvent::plain(KeyCode::Enter),
            b'\t' => KeyEvent::plain(KeyCode::Tab),
            0x7f => KeyEvent::plain(KeyCode::Backspace),
            1..=26 => KeyEvent::ctrl(b'a' + byte - 1),
            _ => KeyEvent::plain(KeyCode::Char(byte)),
        })
    }

    /// Resolve the bytes following 0x1B.
    ///
    /// A truncated sequence (either continuation read timing out) is a
    /// genuine Escape keypress as far as anyone can tell, so that is what
    /// it becomes.
    fn decode_escape(&mut self) -> Result<KeyEvent> {
        let Some(seq0) = self.continuation()? else {
            return Ok(KeyEvent::plain(KeyCode::Esc));
        };
        let Some(seq1) = self.continuation()? else {
            return Ok(KeyEvent::plain(KeyCode::Esc));
        };

        let code = match (seq0, seq1) {
            (b'[', b'0'..=b'9') => match self.continuation()? {
                Some(b'~') => match seq1 {
                    b'1' | b'7' => KeyCode::Home,
                    b'3' => KeyCode::Delete,
                    b'4' | b'8' => KeyCode::End,
                    b'5' => KeyCode::PageUp,
                    b'6' => KeyCode::PageDown,
                    _ => KeyCode::Esc,
                },
                _ => KeyCode::Esc,
            },
            (b'[', b'A') => KeyCode::Up,
            (b'[', b'B') => KeyCode::Down,
            (b'[', b'C') => KeyCode::Right,
            (b'[', b'D') => KeyCode::Left,
            (b'[' | b'O', b'H') => KeyCode::Home,
            (b'[' | b'O', b'F') => KeyCode::End,
            _ => KeyCode::Esc,
        };
        Ok(KeyEvent::plain(code))
    }

    /// Fetch one continuation byte of an escape sequence.
    ///
    /// `None` means the timeout elapsed; the sequence is truncated.
    fn continuation(&mut self) -> Result<Option<u8>> {
        match self.source.fetch(self.timeout) {
            Fetch::Byte(byte) => Ok(Some(byte)),
            Fetch::TimedOut => Ok(None),
            Fetch::Closed => Err(Error::InputClosed),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::VecDeque;

    /// Scripted byte source: plays back fetch outcomes, then reports the
    /// stream closed.
    struct Script(VecDeque<Fetch>);

    impl Script {
        fn bytes(bytes: &[u8]) -> Self {
            Self(bytes.iter().map(|&b| Fetch::Byte(b)).collect())
        }

        fn push_timeout(mut self) -> Self {
            self.0.push_back(Fetch::TimedOut);
            self
        }
    }

    impl ByteSource for Script {
        fn fetch(&mut self, _timeout: Duration) -> Fetch {
            self.0.pop_front().unwrap_or(Fetch::Closed)
        }
    }

    fn decode_one(script: Script) -> KeyEvent {
        KeyDecoder::new(script).next_key().unwrap()
    }

    #[test]
    fn test_printable_byte() {
        assert_eq!(
            decode_one(Script::bytes(b"x")),
            KeyEvent::plain(KeyCode::Char(b'x'))
        );
    }

    #[test]
    fn test_control_bytes_map_to_ctrl_letters() {
        assert_eq!(decode_one(Script::bytes(&[17])), KeyEvent::ctrl(b'q'));
        assert_eq!(decode_one(Script::bytes(&[19])), KeyEvent::ctrl(b's'));
        assert_eq!(decode_one(Script::bytes(&[6])), KeyEvent::ctrl(b'f'));
        assert_eq!(decode_one(Script::bytes(&[8])), KeyEvent::ctrl(b'h'));
    }

    #[test]
    fn test_enter_tab_backspace() {
        assert_eq!(decode_one(Script::bytes(b"\r")).code, KeyCode::Enter);
        assert_eq!(decode_one(Script::bytes(b"\t")).code, KeyCode::Tab);
        assert_eq!(decode_one(Script::bytes(&[127])).code, KeyCode::Backspace);
    }

    #[test]
    fn test_arrow_sequences() {
        assert_eq!(decode_one(Script::bytes(b"\x1b[A")).code, KeyCode::Up);
        assert_eq!(decode_one(Script::bytes(b"\x1b[B")).code, KeyCode::Down);
        assert_eq!(decode_one(Script::bytes(b"\x1b[C")).code, KeyCode::Right);
        assert_eq!(decode_one(Script::bytes(b"\x1b[D")).code, KeyCode::Left);
    }

    #[test]
    fn test_home_end_variants() {
        assert_eq!(decode_one(Script::bytes(b"\x1b[H")).code, KeyCode::Home);
        assert_eq!(decode_one(Script::bytes(b"\x1b[F")).code, KeyCode::End);
        assert_eq!(decode_one(Script::bytes(b"\x1bOH")).code, KeyCode::Home);
        assert_eq!(decode_one(Script::bytes(b"\x1bOF")).code, KeyCode::End);
        assert_eq!(decode_one(Script::bytes(b"\x1b[1~")).code, KeyCode::Home);
        assert_eq!(decode_one(Script::bytes(b"\x1b[7~")).code, KeyCode::Home);
        assert_eq!(decode_one(Script::bytes(b"\x1b[4~")).code, KeyCode::End);
        assert_eq!(decode_one(Script::bytes(b"\x1b[8~")).code, KeyCode::End);
    }

    #[test]
    fn test_delete_and_page_sequences() {
        assert_eq!(decode_one(Script::bytes(b"\x1b[3~")).code, KeyCode::Delete);
        assert_eq!(decode_one(Script::bytes(b"\x1b[5~")).code, KeyCode::PageUp);
        assert_eq!(decode_one(Script::bytes(b"\x1b[6~")).code, KeyCode::PageDown);
    }

    #[test]
    fn test_lone_escape_degrades_to_esc() {
        let script = Script::bytes(&[0x1b]).push_timeout();
        assert_eq!(decode_one(script).code, KeyCode::Esc);
    }

    #[test]
    fn test_truncated_bracket_sequence_degrades_to_esc() {
        let script = Script::bytes(b"\x1b[").push_timeout();
        assert_eq!(decode_one(script).code, KeyCode::Esc);
    }

    #[test]
    fn test_digit_without_tilde_degrades_to_esc() {
        assert_eq!(decode_one(Script::bytes(b"\x1b[5x")).code, KeyCode::Esc);
        let truncated = Script::bytes(b"\x1b[5").push_timeout();
        assert_eq!(decode_one(truncated).code, KeyCode::Esc);
    }

    #[test]
    fn test_unknown_sequences_degrade_to_esc() {
        assert_eq!(decode_one(Script::bytes(b"\x1b[Z")).code, KeyCode::Esc);
        assert_eq!(decode_one(Script::bytes(b"\x1bOX")).code, KeyCode::Esc);
        assert_eq!(decode_one(Script::bytes(b"\x1bxy")).code, KeyCode::Esc);
        assert_eq!(decode_one(Script::bytes(b"\x1b[2~")).code, KeyCode::Esc);
    }

    #[test]
    fn test_first_byte_timeout_retries() {
        let mut script = Script::bytes(b"a");
        script.0.push_front(Fetch::TimedOut);
        script.0.push_front(Fetch::TimedOut);
        assert_eq!(decode_one(script).code, KeyCode::Char(b'a'));
    }

    #[test]
    fn test_closed_source_is_an_error() {
        let mut decoder = KeyDecoder::new(Script(VecDeque::new()));
        assert!(matches!(decoder.next_key(), Err(Error::InputClosed)));
    }
}
