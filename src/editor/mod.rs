//! Editor controller: the top-level state machine.
//!
//! The [`Editor`] owns every moving part — document, cursor, screen,
//! decoder, message state — and dispatches decoded key events to cursor
//! motion, row mutation, the save path, or an interactive search session.
//! One interaction cycle is: compose a frame, block for one key event,
//! dispatch it, loop. A frame therefore always reflects every mutation of
//! the dispatch that preceded it.

use crate::document::{Document, Row};
use crate::error::{Error, Result};
use crate::input::{ByteSource, KeyCode, KeyDecoder, KeyEvent, KeyMods};
use crate::screen::{Screen, StatusMessage};
use crate::search::SearchState;
use std::io::Write;

/// Consecutive Ctrl-Q presses required to quit with unsaved changes.
pub const QUIT_CONFIRM_PRESSES: u8 = 3;

/// Message-bar hint shown on startup.
const HELP_HINT: &str = "HELP: Ctrl-S = save | Ctrl-Q = quit | Ctrl-F = find";

/// The editor: cursor, document, screen, and the key dispatch loop.
///
/// Generic over the byte source and the frame writer so the whole
/// controller can be driven by scripted bytes in tests.
pub struct Editor<S, W> {
    doc: Document,
    screen: Screen,
    decoder: KeyDecoder<S>,
    writer: W,
    /// Logical cursor column (byte offset into the current row).
    cx: usize,
    /// Cursor row; may equal `row_count` (the append position).
    cy: usize,
    /// Rendered cursor column, derived from `cx` on every refresh.
    rx: usize,
    message: StatusMessage,
    quit_presses: u8,
    running: bool,
}

impl<S: ByteSource, W: Write> Editor<S, W> {
    /// Create an editor over an opened document.
    pub fn new(doc: Document, screen: Screen, decoder: KeyDecoder<S>, writer: W) -> Self {
        Self {
            doc,
            screen,
            decoder,
            writer,
            cx: 0,
            cy: 0,
            rx: 0,
            message: StatusMessage::new(HELP_HINT),
            quit_presses: QUIT_CONFIRM_PRESSES,
            running: true,
        }
    }

    /// Whether the editor loop is still running.
    pub const fn is_running(&self) -> bool {
        self.running
    }

    /// Current cursor position as `(cx, cy)`.
    pub const fn cursor(&self) -> (usize, usize) {
        (self.cx, self.cy)
    }

    /// Run the interaction loop until quit, then wipe the screen.
    ///
    /// # Errors
    ///
    /// Returns the first fatal error: terminal output failure or a closed
    /// input stream.
    pub fn run(&mut self) -> Result<()> {
        let outcome = self.event_loop();
        // Leave a clean display behind, on the error path too.
        let _ = self.screen.clear_for_exit(&mut self.writer);
        outcome
    }

    fn event_loop(&mut self) -> Result<()> {
        while self.running {
            self.refresh()?;
            let key = self.decoder.next_key()?;
            self.process_key(key)?;
        }
        Ok(())
    }

    /// Recompute `rx`, clamp the viewport to the cursor, and flush a frame.
    fn refresh(&mut self) -> Result<()> {
        self.rx = self
            .doc
            .row(self.cy)
            .map_or(0, |row| row.cx_to_rx(self.cx));
        self.screen.scroll_to(self.cy, self.rx);
        self.screen
            .refresh(&mut self.writer, &self.doc, self.cy, self.rx, &self.message)
            .map_err(Error::Terminal)
    }

    /// Dispatch one decoded key event.
    fn process_key(&mut self, key: KeyEvent) -> Result<()> {
        if key.is_ctrl(b'q') {
            if self.doc.is_dirty() {
                self.quit_presses -= 1;
                if self.quit_presses == 0 {
                    self.running = false;
                } else {
                    self.message = StatusMessage::new(format!(
                        "WARNING! File has unsaved changes. \
                         Press Ctrl-Q {} more times to quit.",
                        self.quit_presses
                    ));
                }
            } else {
                self.running = false;
            }
            return Ok(());
        }
        // Any key other than Ctrl-Q restarts the confirmation countdown.
        self.quit_presses = QUIT_CONFIRM_PRESSES;

        match key.code {
            KeyCode::Enter => self.insert_newline(),
            KeyCode::Backspace => self.backspace(),
            KeyCode::Delete => {
                self.move_cursor(KeyCode::Right);
                self.backspace();
            }
            KeyCode::Up | KeyCode::Down | KeyCode::Left | KeyCode::Right => {
                self.move_cursor(key.code);
            }
            KeyCode::Home => self.cx = 0,
            KeyCode::End => {
                if let Some(row) = self.doc.row(self.cy) {
                    self.cx = row.len();
                }
            }
            KeyCode::PageUp | KeyCode::PageDown => self.page_move(key.code),
            KeyCode::Tab => self.insert_char(b'\t'),
            KeyCode::Esc => {}
            KeyCode::Char(byte) => {
                if key.is_ctrl(b's') {
                    self.save()?;
                } else if key.is_ctrl(b'f') {
                    self.find()?;
                } else if key.is_ctrl(b'h') {
                    // Legacy backspace chord.
                    self.backspace();
                } else if !key.mods.contains(KeyMods::CTRL) {
                    self.insert_char(byte);
                }
            }
        }
        Ok(())
    }

    /// Arrow-key motion with end-of-line wrapping and column snap.
    fn move_cursor(&mut self, code: KeyCode) {
        match code {
            KeyCode::Left => {
                if self.cx > 0 {
                    self.cx -= 1;
                } else if self.cy > 0 {
                    self.cy -= 1;
                    self.cx = self.doc.row(self.cy).map_or(0, Row::len);
                }
            }
            KeyCode::Right => {
                if let Some(row) = self.doc.row(self.cy) {
                    if self.cx < row.len() {
                        self.cx += 1;
                    } else {
                        self.cy += 1;
                        self.cx = 0;
                    }
                }
            }
            KeyCode::Up => {
                if self.cy > 0 {
                    self.cy -= 1;
                }
            }
            KeyCode::Down => {
                if self.cy < self.doc.row_count() {
                    self.cy += 1;
                }
            }
            _ => {}
        }

        // Vertical motion can land past the end of a shorter row.
        let len = self.doc.row(self.cy).map_or(0, Row::len);
        if self.cx > len {
            self.cx = len;
        }
    }

    /// Page motion: jump to the viewport edge, then move a full page.
    fn page_move(&mut self, code: KeyCode) {
        let rows = self.screen.view().rows;
        match code {
            KeyCode::PageUp => self.cy = self.screen.view().row_offset,
            KeyCode::PageDown => {
                self.cy = self.screen.view().row_offset + rows.saturating_sub(1);
                if self.cy > self.doc.row_count() {
                    self.cy = self.doc.row_count();
                }
            }
            _ => {}
        }

        let step = if code == KeyCode::PageUp {
            KeyCode::Up
        } else {
            KeyCode::Down
        };
        for _ in 0..rows {
            self.move_cursor(step);
        }
    }

    /// Insert one byte at the cursor, appending a fresh row when the
    /// cursor sits past the last one.
    fn insert_char(&mut self, byte: u8) {
        if self.cy == self.doc.row_count() {
            self.doc.insert_row(self.cy, Vec::new());
        }
        self.doc.insert_char(self.cy, self.cx, byte);
        self.cx += 1;
    }

    /// Split the current row at the cursor (or open a fresh row above when
    /// the cursor is at column 0).
    fn insert_newline(&mut self) {
        if self.cx == 0 {
            self.doc.insert_row(self.cy, Vec::new());
        } else {
            self.doc.split_row(self.cy, self.cx);
        }
        self.cy += 1;
        self.cx = 0;
    }

    /// Delete the byte left of the cursor; at column 0 the row is merged
    /// onto its predecessor and the cursor lands at the seam.
    fn backspace(&mut self) {
        if self.cy == self.doc.row_count() {
            return;
        }
        if self.cx == 0 && self.cy == 0 {
            return;
        }

        if self.cx > 0 {
            self.doc.delete_char(self.cy, self.cx - 1);
            self.cx -= 1;
        } else {
            let merged = self
                .doc
                .row(self.cy)
                .map(|row| row.content().to_vec())
                .unwrap_or_default();
            self.cx = self.doc.row(self.cy - 1).map_or(0, Row::len);
            self.doc.append_to_row(self.cy - 1, &merged);
            self.doc.delete_row(self.cy);
            self.cy -= 1;
        }
    }

    /// Save the document, prompting for a filename first when it has none.
    fn save(&mut self) -> Result<()> {
        if self.doc.path().is_none() {
            let Some(name) = self.prompt("Save as: {} (ESC to cancel)", |_, _, _| {})? else {
                self.message = StatusMessage::new("Save aborted");
                return Ok(());
            };
            self.doc.set_path(name);
        }

        match self.doc.save() {
            Ok(bytes) => {
                self.message = StatusMessage::new(format!("{bytes} bytes written to disk"));
            }
            Err(err) => {
                self.message = StatusMessage::new(format!("Can't save! {err}"));
            }
        }
        Ok(())
    }

    /// Interactive search session: incremental matching on every
    /// keystroke, Esc restores the pre-search cursor and viewport.
    fn find(&mut self) -> Result<()> {
        let saved_cx = self.cx;
        let saved_cy = self.cy;
        let saved_view = *self.screen.view();
        let mut search = SearchState::new();

        let committed = self.prompt("Search: {} (Use ESC/Arrows/Enter)", |ed, query, key| {
            if matches!(key.code, KeyCode::Enter | KeyCode::Esc) {
                return;
            }
            if let Some(hit) = search.step(&ed.doc, query.as_bytes(), key) {
                ed.cy = hit.cy;
                ed.cx = hit.cx;
                // Past-the-end offset: the next scroll clamp lands the
                // match row at the top of the viewport.
                ed.screen.view_mut().row_offset = ed.doc.row_count();
            }
        })?;

        if committed.is_none() {
            self.cx = saved_cx;
            self.cy = saved_cy;
            *self.screen.view_mut() = saved_view;
        }
        Ok(())
    }

    /// Generic message-bar prompt. `template` carries a single `{}`
    /// substitution point for the in-progress input; `on_key` runs after
    /// every keystroke (the search session hook). Returns `None` on Esc.
    fn prompt<F>(&mut self, template: &str, mut on_key: F) -> Result<Option<String>>
    where
        F: FnMut(&mut Self, &str, &KeyEvent),
    {
        let mut input = String::new();
        loop {
            self.message = StatusMessage::new(template.replacen("{}", &input, 1));
            self.refresh()?;

            let key = self.decoder.next_key()?;
            match key.code {
                KeyCode::Backspace | KeyCode::Delete => {
                    input.pop();
                }
                _ if key.is_ctrl(b'h') => {
                    input.pop();
                }
                KeyCode::Esc => {
                    self.message = StatusMessage::new("");
                    on_key(self, &input, &key);
                    return Ok(None);
                }
                KeyCode::Enter if !input.is_empty() => {
                    self.message = StatusMessage::new("");
                    on_key(self, &input, &key);
                    return Ok(Some(input));
                }
                KeyCode::Char(byte) if !key.mods.contains(KeyMods::CTRL) && (32..127).contains(&byte) => {
                    input.push(char::from(byte));
                }
                _ => {}
            }
            on_key(self, &input, &key);
        }
    }
}
