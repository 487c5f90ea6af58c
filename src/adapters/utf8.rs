//! Boundary-safe UTF-8 reassembly.
//!
//! Transport chunks split at arbitrary byte offsets, which can land in
//! the middle of a multi-byte sequence (including the byte-order-mark).
//! The assembler holds incomplete trailing bytes back until the next
//! chunk completes them, so the decoder only ever sees whole characters.

/// Reassembles byte chunks into valid UTF-8 text.
///
/// At most three bytes (the longest incomplete sequence prefix) are ever
/// held between pushes. Invalid sequences are replaced with U+FFFD rather
/// than aborting the stream.
#[derive(Debug, Default)]
pub struct Utf8Assembler {
    pending: Vec<u8>,
}

impl Utf8Assembler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk, returning all complete text it unlocks.
    pub fn push(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        let mut out = String::with_capacity(bytes.len());
        let mut rest = bytes.as_slice();
        loop {
            match std::str::from_utf8(rest) {
                Ok(text) => {
                    out.push_str(text);
                    break;
                }
                Err(err) => {
                    let (valid, after) = rest.split_at(err.valid_up_to());
                    out.push_str(&String::from_utf8_lossy(valid));
                    match err.error_len() {
                        // A truly invalid sequence; substitute and move on.
                        Some(len) => {
                            out.push('\u{fffd}');
                            rest = &after[len..];
                        }
                        // Incomplete trailing sequence; wait for more bytes.
                        None => {
                            self.pending = after.to_vec();
                            break;
                        }
                    }
                }
            }
        }
        out
    }

    /// Flush any held-back bytes at end of stream.
    ///
    /// A nonempty result means the stream ended mid-sequence; the bytes
    /// come back lossily decoded.
    pub fn finish(&mut self) -> String {
        if self.pending.is_empty() {
            String::new()
        } else {
            String::from_utf8_lossy(&std::mem::take(&mut self.pending)).into_owned()
        }
    }
}
