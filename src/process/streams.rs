//! Child process stdio pumps
//!
//! Blocking reads and writes on the child's pipes run on dedicated threads.
//! Readers decode bytes incrementally and hand text to a callback; the
//! writer drains a channel of input messages into the child's stdin.

use std::io::{self, BufWriter, ErrorKind, Read, Write};
use std::sync::mpsc::Receiver;
use std::thread::{self, JoinHandle};
use std::time::Duration;

const MAX_CONSECUTIVE_ERRORS: u32 = 5;
const MAX_WRITE_ATTEMPTS: u32 = 3;

/// Incremental UTF-8 decoder.
///
/// A multi-byte sequence split across two reads is held back until it is
/// complete; invalid bytes become U+FFFD.
#[derive(Debug, Default)]
pub struct Utf8Decoder {
    pending: Vec<u8>,
}

impl Utf8Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode as much of `bytes` (plus any held-back tail) as possible
    pub fn decode(&mut self, bytes: &[u8]) -> String {
        self.pending.extend_from_slice(bytes);
        let mut out = String::with_capacity(self.pending.len());

        loop {
            match std::str::from_utf8(&self.pending) {
                Ok(text) => {
                    out.push_str(text);
                    self.pending.clear();
                    break;
                }
                Err(e) => {
                    let valid = e.valid_up_to();
                    out.push_str(&String::from_utf8_lossy(&self.pending[..valid]));

                    match e.error_len() {
                        Some(invalid) => {
                            out.push(char::REPLACEMENT_CHARACTER);
                            self.pending.drain(..valid + invalid);
                        }
                        None => {
                            // Incomplete sequence at the end; wait for more
                            self.pending.drain(..valid);
                            break;
                        }
                    }
                }
            }
        }

        out
    }

    /// Flush a held-back incomplete sequence at end of stream
    pub fn finish(&mut self) -> String {
        let tail = String::from_utf8_lossy(&self.pending).into_owned();
        self.pending.clear();
        tail
    }

    /// Bytes waiting for the rest of a multi-byte sequence
    pub fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

/// One write request for the child's stdin
#[derive(Debug, Clone)]
pub struct InputMessage {
    pub data: Vec<u8>,
    /// Flush the buffered writer after this write
    pub flush: bool,
}

/// Start a thread reading `reader` to EOF.
///
/// `on_text` receives each decoded chunk and returns `false` to stop early
/// (its owner is gone). Anything captured by `on_text` is dropped when the
/// thread exits, which callers use as a completion signal.
pub fn spawn_reader<R, F>(
    name: &str,
    mut reader: R,
    buffer_size: usize,
    mut on_text: F,
) -> io::Result<JoinHandle<()>>
where
    R: Read + Send + 'static,
    F: FnMut(&str) -> bool + Send + 'static,
{
    let label = name.to_string();
    thread::Builder::new()
        .name(format!("shellwrap-{}", name))
        .spawn(move || {
            let mut buf = vec![0u8; buffer_size.max(1)];
            let mut decoder = Utf8Decoder::new();
            let mut consecutive_errors = 0;

            loop {
                match reader.read(&mut buf) {
                    Ok(0) => {
                        debug!("{} reached EOF", label);
                        break;
                    }
                    Ok(n) => {
                        consecutive_errors = 0;
                        let text = decoder.decode(&buf[..n]);
                        if !text.is_empty() && !on_text(&text) {
                            debug!("{}: owner dropped, stopping reader", label);
                            return;
                        }
                    }
                    Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                    Err(e) if e.kind() == ErrorKind::WouldBlock => {
                        thread::sleep(Duration::from_millis(10));
                    }
                    Err(e) => {
                        consecutive_errors += 1;
                        warn!(
                            "{} read error ({}): {} (attempt {}/{})",
                            label,
                            e.kind(),
                            e,
                            consecutive_errors,
                            MAX_CONSECUTIVE_ERRORS
                        );
                        if consecutive_errors >= MAX_CONSECUTIVE_ERRORS {
                            error!("{}: too many consecutive errors, stopping reader", label);
                            break;
                        }
                        thread::sleep(Duration::from_millis(50));
                    }
                }
            }

            let tail = decoder.finish();
            if !tail.is_empty() {
                on_text(&tail);
            }
            trace!("{} reader thread exiting", label);
        })
}

/// Start a thread writing queued input to `writer` until the channel closes
pub fn spawn_writer<W>(
    name: &str,
    writer: W,
    input: Receiver<InputMessage>,
) -> io::Result<JoinHandle<()>>
where
    W: Write + Send + 'static,
{
    let label = name.to_string();
    thread::Builder::new()
        .name(format!("shellwrap-{}", name))
        .spawn(move || {
            let mut writer = BufWriter::new(writer);

            while let Ok(message) = input.recv() {
                if let Err(e) = write_message(&mut writer, &message) {
                    if e.kind() == ErrorKind::BrokenPipe {
                        debug!("{}: child closed its input", label);
                    } else {
                        warn!("{} write error ({}): {}", label, e.kind(), e);
                    }
                    return;
                }
            }

            if let Err(e) = writer.flush() {
                debug!("{} final flush failed: {}", label, e);
            }
            trace!("{} writer thread exiting", label);
        })
}

fn write_message<W: Write>(writer: &mut W, message: &InputMessage) -> io::Result<()> {
    let mut attempts = 0;
    loop {
        match writer.write_all(&message.data) {
            Ok(()) => break,
            Err(e) if e.kind() == ErrorKind::Interrupted => continue,
            Err(e) if e.kind() == ErrorKind::WouldBlock && attempts < MAX_WRITE_ATTEMPTS => {
                attempts += 1;
                thread::sleep(Duration::from_millis(10));
            }
            Err(e) => return Err(e),
        }
    }

    if message.flush {
        writer.flush()?;
    }
    Ok(())
}
