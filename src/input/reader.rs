//! Byte reader: dedicated thread forwarding raw stdin bytes.
//!
//! The reader owns the only blocking stdin handle in the process. It runs
//! on its own named thread and moves each byte through a channel, so the
//! editing thread can wait with a timeout (`recv_timeout`) instead of
//! blocking indefinitely on `read`.

use crossbeam_channel::Sender;
use std::io::{self, ErrorKind, Read};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread::{self, JoinHandle};

/// Reader thread handle.
pub struct ByteReader {
    /// Handle to the reader thread.
    handle: Option<JoinHandle<()>>,
    /// Flag to signal shutdown.
    shutdown: Arc<AtomicBool>,
}

impl ByteReader {
    /// Spawn the reader thread.
    ///
    /// Each byte read from stdin is sent on `sender`; the thread exits on
    /// EOF, on a read error, or once the receiving side hangs up.
    pub fn spawn(sender: Sender<u8>) -> Self {
        let shutdown = Arc::new(AtomicBool::new(false));
        let shutdown_clone = shutdown.clone();

        let handle = thread::Builder::new()
            .name("quill-input".to_string())
            .spawn(move || {
                Self::run_loop(&sender, &shutdown_clone);
            })
            .expect("Failed to spawn input thread");

        Self {
            handle: Some(handle),
            shutdown,
        }
    }

    /// Signal the reader thread to shut down.
    ///
    /// Advisory only: a read already blocked on stdin cannot be
    /// interrupted and ends with the process (or with the next byte, at
    /// which point the closed channel stops the loop).
    pub fn shutdown(&self) {
        self.shutdown.store(true, Ordering::Relaxed);
    }

    /// Whether the reader thread is still attached.
    pub const fn is_attached(&self) -> bool {
        self.handle.is_some()
    }

    /// Main read loop: one byte per iteration.
    fn run_loop(sender: &Sender<u8>, shutdown: &Arc<AtomicBool>) {
        let mut stdin = io::stdin().lock();
        let mut buf = [0u8; 1];
        loop {
            if shutdown.load(Ordering::Relaxed) {
                break;
            }
            match stdin.read(&mut buf) {
                // EOF: the terminal is gone, let the channel disconnect.
                Ok(0) => break,
                Ok(_) => {
                    if sender.send(buf[0]).is_err() {
                        break;
                    }
                }
                Err(e) if e.kind() == ErrorKind::Interrupted => {}
                Err(_) => break,
            }
        }
    }
}

impl Drop for ByteReader {
    fn drop(&mut self) {
        self.shutdown();
        // The thread is not joined: it may be parked in a blocking stdin
        // read that only the process exit can end.
        drop(self.handle.take());
    }
}
