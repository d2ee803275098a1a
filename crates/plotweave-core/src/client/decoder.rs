//! Incremental UTF-8 decoding of a byte stream
//!
//! Network chunks can split a multi-byte UTF-8 sequence; the trailing
//! incomplete bytes are held back and prepended to the next chunk.

/// Buffered UTF-8 decoder for streamed response bytes
#[derive(Debug, Default)]
pub struct Utf8StreamDecoder {
    pending: Vec<u8>,
}

impl Utf8StreamDecoder {
    /// Create a new decoder
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk of bytes, returning the decoded text.
    ///
    /// Returns an empty string when the chunk ends mid-sequence and nothing
    /// new is decodable yet. Truly invalid bytes are replaced rather than
    /// dropped so the stream keeps flowing.
    pub fn feed(&mut self, chunk: &[u8]) -> String {
        let mut bytes = std::mem::take(&mut self.pending);
        bytes.extend_from_slice(chunk);

        match std::str::from_utf8(&bytes) {
            Ok(text) => text.to_string(),
            Err(e) => {
                let valid_up_to = e.valid_up_to();
                if e.error_len().is_none() {
                    // Incomplete trailing sequence: hold it for the next chunk
                    self.pending = bytes[valid_up_to..].to_vec();
                    std::str::from_utf8(&bytes[..valid_up_to])
                        .unwrap_or_default()
                        .to_string()
                } else {
                    String::from_utf8_lossy(&bytes).into_owned()
                }
            }
        }
    }

    /// Bytes currently held back waiting for the rest of a sequence
    fn pending_len(&self) -> usize {
        self.pending.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ascii_passes_straight_through() {
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.feed(b"hello"), "hello");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn multibyte_split_across_chunks_is_reassembled() {
        // "你好" is six bytes; split inside the second character
        let bytes = "你好".as_bytes();
        let mut decoder = Utf8StreamDecoder::new();

        let first = decoder.feed(&bytes[..4]);
        assert_eq!(first, "你");
        assert_eq!(decoder.pending_len(), 1);

        let second = decoder.feed(&bytes[4..]);
        assert_eq!(second, "好");
        assert_eq!(decoder.pending_len(), 0);
    }

    #[test]
    fn chunk_ending_exactly_mid_sequence_yields_empty() {
        let bytes = "洞".as_bytes(); // three bytes
        let mut decoder = Utf8StreamDecoder::new();
        assert_eq!(decoder.feed(&bytes[..2]), "");
        assert_eq!(decoder.feed(&bytes[2..]), "洞");
    }

    #[test]
    fn invalid_bytes_are_replaced_not_dropped() {
        let mut decoder = Utf8StreamDecoder::new();
        let out = decoder.feed(&[b'a', 0xFF, b'b']);
        assert!(out.starts_with('a'));
        assert!(out.ends_with('b'));
        assert_eq!(decoder.pending_len(), 0);
    }
}
