//! quill binary: open a file (or an empty buffer) and run the editor.

use quill::terminal::{self, RawModeGuard};
use quill::{ByteReader, Document, Editor, KeyDecoder, Screen};
use std::env;
use std::io;
use std::process::ExitCode;

/// Capacity of the stdin byte channel; typed input never gets close to
/// this, it only buffers pasted bursts.
const INPUT_CHANNEL_CAPACITY: usize = 64;

fn main() -> ExitCode {
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            eprintln!("quill: {err}");
            ExitCode::FAILURE
        }
    }
}

fn run() -> quill::Result<()> {
    let doc = match env::args_os().nth(1) {
        Some(path) => Document::open(path)?,
        None => Document::new(),
    };

    // Raw mode before the size query: the fallback probe needs it.
    let _raw = RawModeGuard::enable()?;
    let (cols, rows) = terminal::window_size()?;

    let (sender, receiver) = crossbeam_channel::bounded(INPUT_CHANNEL_CAPACITY);
    let _reader = ByteReader::spawn(sender);

    let mut editor = Editor::new(
        doc,
        Screen::new(cols, rows),
        KeyDecoder::new(receiver),
        io::stdout(),
    );
    editor.run()
}
