//! Document module: the ordered row store.
//!
//! This module contains:
//! - [`Row`]: one logical line with its derived tab-expanded render
//! - [`Document`]: the ordered sequence of rows, the dirty counter, and
//!   the load/save boundary
//!
//! Every content mutator re-derives the touched row's render and bumps the
//! dirty counter; load-time population is the one exception.

mod row;

pub use row::{Row, TAB_STOP};

use crate::error::{Error, Result};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// An in-memory document: ordered rows plus persistence bookkeeping.
#[derive(Debug, Default)]
pub struct Document {
    /// Rows in visual order, index 0 = first line.
    rows: Vec<Row>,
    /// Backing file, if any.
    path: Option<PathBuf>,
    /// Count of content mutations since the last save. 0 means clean.
    dirty: u64,
}

impl Document {
    /// Create an empty, unnamed document.
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a document from a file, one row per line with terminators
    /// stripped.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Load`] if the file cannot be read.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let bytes = fs::read(&path).map_err(|source| Error::Load {
            path: path.clone(),
            source,
        })?;
        let mut doc = Self::from_bytes(&bytes);
        doc.path = Some(path);
        Ok(doc)
    }

    /// Build a document from raw file bytes. Lines are split on `\n` with
    /// an optional preceding `\r` stripped; a trailing newline does not
    /// produce a phantom empty row.
    pub fn from_bytes(bytes: &[u8]) -> Self {
        let mut rows: Vec<Row> = bytes
            .split(|&b| b == b'\n')
            .map(|line| Row::new(line.strip_suffix(b"\r").unwrap_or(line).to_vec()))
            .collect();
        if bytes.is_empty() || bytes.ends_with(b"\n") {
            rows.pop();
        }
        Self {
            rows,
            path: None,
            dirty: 0,
        }
    }

    /// The backing file path, if one is set.
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the backing file path (save-as).
    pub fn set_path(&mut self, path: impl Into<PathBuf>) {
        self.path = Some(path.into());
    }

    /// Number of rows.
    #[inline]
    pub const fn row_count(&self) -> usize {
        self.rows.len()
    }

    /// Get a row by index.
    #[inline]
    pub fn row(&self, at: usize) -> Option<&Row> {
        self.rows.get(at)
    }

    /// Whether the document has mutations not yet persisted.
    #[inline]
    pub const fn is_dirty(&self) -> bool {
        self.dirty != 0
    }

    /// Number of content mutations since the last save.
    #[inline]
    pub const fn dirty_count(&self) -> u64 {
        self.dirty
    }

    /// Insert a new row holding `text` at index `at`, clamped to
    /// `[0, row_count]`. Subsequent rows shift down.
    pub fn insert_row(&mut self, at: usize, text: Vec<u8>) {
        let at = at.min(self.rows.len());
        self.rows.insert(at, Row::new(text));
        self.dirty += 1;
    }

    /// Remove the row at `at`. Out-of-range is a no-op. Subsequent rows
    /// shift up.
    pub fn delete_row(&mut self, at: usize) {
        if at >= self.rows.len() {
            return;
        }
        self.rows.remove(at);
        self.dirty += 1;
    }

    /// Insert `byte` into row `cy` at column `cx` (clamped to the row
    /// length). No-op if the row does not exist.
    pub fn insert_char(&mut self, cy: usize, cx: usize, byte: u8) {
        if let Some(row) = self.rows.get_mut(cy) {
            row.insert_byte(cx, byte);
            self.dirty += 1;
        }
    }

    /// Delete the byte at column `cx` of row `cy`. Out-of-range row or
    /// column is a no-op.
    pub fn delete_char(&mut self, cy: usize, cx: usize) {
        if let Some(row) = self.rows.get_mut(cy) {
            if row.delete_byte(cx) {
                self.dirty += 1;
            }
        }
    }

    /// Append bytes onto the end of row `cy`. Used when a backspace at
    /// column 0 merges a row into its predecessor.
    pub fn append_to_row(&mut self, cy: usize, bytes: &[u8]) {
        if let Some(row) = self.rows.get_mut(cy) {
            row.append_bytes(bytes);
            self.dirty += 1;
        }
    }

    /// Split row `cy` at column `cx`: the row keeps `[..cx]` and a new row
    /// holding `[cx..]` is inserted directly below.
    pub fn split_row(&mut self, cy: usize, cx: usize) {
        if cy >= self.rows.len() {
            return;
        }
        let tail = self.rows[cy].split_off(cx);
        self.rows.insert(cy + 1, Row::new(tail));
        self.dirty += 1;
    }

    /// Serialize the document: every row's content followed by a newline.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.rows.iter().map(|r| r.len() + 1).sum());
        for row in &self.rows {
            buf.extend_from_slice(row.content());
            buf.push(b'\n');
        }
        buf
    }

    /// Write the document to its backing file and reset the dirty counter.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Save`] if no path is set or the write fails; the
    /// dirty counter is left untouched in that case.
    pub fn save(&mut self) -> Result<usize> {
        let path = self.path.clone().ok_or_else(|| {
            Error::Save(io::Error::new(io::ErrorKind::NotFound, "no file name"))
        })?;
        let bytes = self.to_bytes();
        fs::write(path, &bytes).map_err(Error::Save)?;
        self.dirty = 0;
        Ok(bytes.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc_from(lines: &[&str]) -> Document {
        let mut doc = Document::new();
        for (i, line) in lines.iter().enumerate() {
            doc.insert_row(i, line.as_bytes().to_vec());
        }
        doc
    }

    #[test]
    fn test_from_bytes_strips_terminators() {
        let doc = Document::from_bytes(b"one\r\ntwo\nthree\n");
        assert_eq!(doc.row_count(), 3);
        assert_eq!(doc.row(0).unwrap().content(), b"one");
        assert_eq!(doc.row(1).unwrap().content(), b"two");
        assert_eq!(doc.row(2).unwrap().content(), b"three");
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_from_bytes_no_trailing_newline() {
        let doc = Document::from_bytes(b"one\ntwo");
        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.row(1).unwrap().content(), b"two");
    }

    #[test]
    fn test_from_bytes_empty() {
        let doc = Document::from_bytes(b"");
        assert_eq!(doc.row_count(), 0);
    }

    #[test]
    fn test_insert_row_shifts_down() {
        let mut doc = doc_from(&["a", "c"]);
        doc.insert_row(1, b"b".to_vec());
        assert_eq!(doc.row_count(), 3);
        assert_eq!(doc.row(1).unwrap().content(), b"b");
        assert_eq!(doc.row(2).unwrap().content(), b"c");
    }

    #[test]
    fn test_insert_row_clamps_index() {
        let mut doc = doc_from(&["a"]);
        doc.insert_row(99, b"z".to_vec());
        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.row(1).unwrap().content(), b"z");
    }

    #[test]
    fn test_delete_row_shifts_up() {
        let mut doc = doc_from(&["a", "b", "c"]);
        doc.delete_row(1);
        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.row(1).unwrap().content(), b"c");
    }

    #[test]
    fn test_delete_row_out_of_range_is_noop() {
        let mut doc = doc_from(&["a"]);
        let before = doc.dirty_count();
        doc.delete_row(5);
        assert_eq!(doc.row_count(), 1);
        assert_eq!(doc.dirty_count(), before);
    }

    #[test]
    fn test_split_row() {
        let mut doc = doc_from(&["hello world"]);
        doc.split_row(0, 5);
        assert_eq!(doc.row_count(), 2);
        assert_eq!(doc.row(0).unwrap().content(), b"hello");
        assert_eq!(doc.row(1).unwrap().content(), b" world");
    }

    #[test]
    fn test_dirty_counter_tracks_mutations() {
        let mut doc = Document::from_bytes(b"ab\n");
        assert_eq!(doc.dirty_count(), 0);

        doc.insert_char(0, 2, b'c');
        doc.delete_char(0, 0);
        doc.insert_row(1, Vec::new());
        assert_eq!(doc.dirty_count(), 3);

        // No-op deletes do not count.
        doc.delete_char(0, 99);
        assert_eq!(doc.dirty_count(), 3);
    }

    #[test]
    fn test_to_bytes_appends_newlines() {
        let doc = doc_from(&["a", "", "b"]);
        assert_eq!(doc.to_bytes(), b"a\n\nb\n");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("roundtrip.txt");
        std::fs::write(&path, b"alpha\nbeta\n").unwrap();

        let mut doc = Document::open(&path).unwrap();
        assert_eq!(doc.row_count(), 2);
        let written = doc.save().unwrap();
        assert_eq!(written, 11);
        assert_eq!(std::fs::read(&path).unwrap(), b"alpha\nbeta\n");
    }

    #[test]
    fn test_save_resets_dirty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("dirty.txt");

        let mut doc = Document::new();
        doc.set_path(&path);
        doc.insert_row(0, b"x".to_vec());
        assert!(doc.is_dirty());
        doc.save().unwrap();
        assert!(!doc.is_dirty());
    }

    #[test]
    fn test_save_without_path_fails_and_keeps_dirty() {
        let mut doc = Document::new();
        doc.insert_row(0, b"x".to_vec());
        assert!(doc.save().is_err());
        assert!(doc.is_dirty());
    }

    #[test]
    fn test_open_missing_file_fails() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.txt");
        assert!(matches!(Document::open(missing), Err(Error::Load { .. })));
    }
}
