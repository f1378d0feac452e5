//! Screen compositor: builds one terminal frame per refresh.
//!
//! Frame layout, top to bottom: the content viewport, a reverse-video
//! status line, and a one-line message bar. The whole frame (including
//! cursor hide/place/show directives) is accumulated in an
//! [`OutputBuffer`] and flushed with a single write.

use super::output::OutputBuffer;
use super::viewport::Viewport;
use crate::document::Document;
use std::io::{self, Write};
use std::time::{Duration, Instant};

/// How long a status message stays on the message bar.
pub const MESSAGE_LIFETIME: Duration = Duration::from_secs(5);

/// Maximum filename width on the status bar.
const STATUS_FILENAME_WIDTH: usize = 20;

/// A transient message for the message bar.
#[derive(Debug, Clone)]
pub struct StatusMessage {
    text: String,
    set_at: Instant,
}

impl StatusMessage {
    /// Create a message; its display lifetime starts now.
    pub fn new(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            set_at: Instant::now(),
        }
    }

    /// The message text.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Whether the message should still be drawn.
    pub fn is_visible(&self) -> bool {
        self.is_visible_at(Instant::now())
    }

    fn is_visible_at(&self, now: Instant) -> bool {
        !self.text.is_empty() && now.duration_since(self.set_at) < MESSAGE_LIFETIME
    }
}

impl Default for StatusMessage {
    fn default() -> Self {
        Self::new("")
    }
}

/// The screen compositor: owns the frame buffer and the viewport.
///
/// Two terminal lines below the viewport are reserved for the status bar
/// and the message bar.
pub struct Screen {
    out: OutputBuffer,
    view: Viewport,
}

impl Screen {
    /// Create a compositor for a terminal of `cols` x `rows` cells.
    pub fn new(cols: u16, rows: u16) -> Self {
        Self {
            out: OutputBuffer::new(),
            view: Viewport::new(cols as usize, rows.saturating_sub(2) as usize),
        }
    }

    /// The current viewport.
    pub const fn view(&self) -> &Viewport {
        &self.view
    }

    /// Mutable access to the viewport (search uses this to force a scroll
    /// recomputation).
    pub const fn view_mut(&mut self) -> &mut Viewport {
        &mut self.view
    }

    /// Clamp the viewport so the cursor cell is visible.
    pub const fn scroll_to(&mut self, cy: usize, rx: usize) {
        self.view.scroll_to(cy, rx);
    }

    /// Compose and flush one frame.
    ///
    /// `cy` is the cursor's document row, `rx` its rendered column; both
    /// must already be inside the viewport (see [`Self::scroll_to`]).
    ///
    /// # Errors
    ///
    /// Returns an error if the flush to `writer` fails.
    pub fn refresh<W: Write>(
        &mut self,
        writer: &mut W,
        doc: &Document,
        cy: usize,
        rx: usize,
        message: &StatusMessage,
    ) -> io::Result<()> {
        self.out.clear();
        self.out.cursor_hide();
        self.out.cursor_home();

        self.draw_rows(doc);
        self.draw_status_bar(doc, cy);
        self.draw_message_bar(message);

        #[allow(clippy::cast_possible_truncation)]
        self.out.cursor_move(
            (rx - self.view.col_offset) as u16,
            (cy - self.view.row_offset) as u16,
        );
        self.out.cursor_show();

        self.out.flush_to(writer)
    }

    /// Wipe the screen and home the cursor (used on exit and on fatal
    /// errors, so the shell prompt comes back on a clean display).
    ///
    /// # Errors
    ///
    /// Returns an error if the flush to `writer` fails.
    pub fn clear_for_exit<W: Write>(&mut self, writer: &mut W) -> io::Result<()> {
        self.out.clear();
        self.out.clear_screen();
        self.out.cursor_home();
        self.out.flush_to(writer)
    }

    /// Draw the content viewport: one terminal line per visible document
    /// row, `~` filler beyond the end, erase-to-EOL after every line.
    fn draw_rows(&mut self, doc: &Document) {
        for y in 0..self.view.rows {
            let file_row = y + self.view.row_offset;
            if let Some(row) = doc.row(file_row) {
                let rendered = row.rendered();
                let start = self.view.col_offset.min(rendered.len());
                let end = (self.view.col_offset + self.view.cols).min(rendered.len());
                self.out.write_raw(&rendered[start..end]);
            } else if doc.row_count() == 0 && y == self.view.rows / 3 {
                self.draw_welcome();
            } else {
                self.out.write_raw(b"~");
            }
            self.out.clear_line();
            self.out.write_raw(b"\r\n");
        }
    }

    /// Centered one-line banner shown while the document is empty.
    fn draw_welcome(&mut self) {
        let mut welcome = concat!("Quill editor -- version ", env!("CARGO_PKG_VERSION")).to_string();
        welcome.truncate(self.view.cols);
        let padding = (self.view.cols - welcome.len()) / 2;
        if padding > 0 {
            self.out.write_raw(b"~");
            for _ in 1..padding {
                self.out.write_raw(b" ");
            }
        }
        self.out.write_str(&welcome);
    }

    /// Reverse-video status line: filename, line count, modified flag,
    /// right-aligned cursor-row indicator.
    fn draw_status_bar(&mut self, doc: &Document, cy: usize) {
        self.out.reverse_video();

        let name = doc
            .path()
            .map_or_else(|| "[No Name]".to_string(), |p| p.display().to_string());
        let name: String = name.chars().take(STATUS_FILENAME_WIDTH).collect();
        let modified = if doc.is_dirty() { " (modified)" } else { "" };
        let left = format!("{name} - {} lines{modified}", doc.row_count());
        let right = format!("{}/{}", cy + 1, doc.row_count());

        let cols = self.view.cols;
        let mut len = left.len().min(cols);
        self.out.write_raw(&left.as_bytes()[..len]);
        while len < cols {
            if cols - len == right.len() {
                self.out.write_str(&right);
                break;
            }
            self.out.write_raw(b" ");
            len += 1;
        }

        self.out.reset_attrs();
        self.out.write_raw(b"\r\n");
    }

    /// Message bar: transient status text, dropped after its lifetime.
    fn draw_message_bar(&mut self, message: &StatusMessage) {
        self.out.clear_line();
        if message.is_visible() {
            let len = message.text().len().min(self.view.cols);
            self.out.write_raw(&message.text().as_bytes()[..len]);
        }
    }
}
