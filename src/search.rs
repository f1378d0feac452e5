//! Incremental search over the document.
//!
//! One [`SearchState`] lives for exactly one interactive session: it
//! carries the last matched row and the scan direction across keystrokes,
//! and the controller drops it when the prompt commits or aborts. The
//! match step scans rendered row text, so a query containing spaces can
//! hit the expansion of a tab.

use crate::document::Document;
use crate::input::{KeyCode, KeyEvent};

/// A search hit: the row and the logical column of the match start.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Match {
    /// Document row of the hit.
    pub cy: usize,
    /// Logical column (byte offset) of the hit.
    pub cx: usize,
}

/// Per-session search state.
#[derive(Debug, Default)]
pub struct SearchState {
    /// Row of the previous hit, if any.
    last_match: Option<usize>,
    /// Scan direction; forward unless the last key said otherwise.
    forward: bool,
}

impl SearchState {
    /// Fresh state: no match yet, scanning forward.
    pub const fn new() -> Self {
        Self {
            last_match: None,
            forward: true,
        }
    }

    /// Advance the search by one keystroke.
    ///
    /// Right/Down select the forward direction, Left/Up backward; any
    /// other key restarts the session state (the query just changed).
    /// Scans at most `row_count` rows from the last hit, wrapping in both
    /// directions. Returns `None` when a full wrap finds nothing; the
    /// caller leaves the cursor unmoved in that case.
    pub fn step(&mut self, doc: &Document, query: &[u8], key: &KeyEvent) -> Option<Match> {
        match key.code {
            KeyCode::Right | KeyCode::Down => self.forward = true,
            KeyCode::Left | KeyCode::Up => self.forward = false,
            _ => {
                self.last_match = None;
                self.forward = true;
            }
        }

        if query.is_empty() || doc.row_count() == 0 {
            return None;
        }

        // Until something has matched there is nothing to step backward
        // from; the first scan is always forward from the top.
        if self.last_match.is_none() {
            self.forward = true;
        }

        let count = doc.row_count();
        let dir: isize = if self.forward { 1 } else { -1 };
        let mut current = self.last_match.map_or(-1, |row| row as isize);

        for _ in 0..count {
            current += dir;
            if current == -1 {
                current = count as isize - 1;
            } else if current == count as isize {
                current = 0;
            }

            #[allow(clippy::cast_sign_loss)]
            let cy = current as usize;
            let row = doc.row(cy)?;
            if let Some(rx) = find_sub(row.rendered(), query) {
                self.last_match = Some(cy);
                return Some(Match {
                    cy,
                    cx: row.rx_to_cx(rx),
                });
            }
        }
        None
    }
}

/// First occurrence of `needle` in `haystack`.
fn find_sub(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    if needle.is_empty() || needle.len() > haystack.len() {
        return None;
    }
    haystack.windows(needle.len()).position(|w| w == needle)
}
