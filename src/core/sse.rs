//! Line framing for the chat event stream.
//!
//! [`DecodeBuffer`] turns raw network chunks into complete text lines while
//! keeping partial lines and split UTF-8 sequences until more bytes arrive.
//! [`classify_line`] and [`parse_delta`] implement the small subset of the
//! server-sent events grammar the chat endpoint uses.

use memchr::memchr;
use serde_json::Value;

use crate::api::delta_content;

pub const DATA_PREFIX: &str = "data: ";
pub const DONE_SENTINEL: &str = "[DONE]";

/// Accumulates decoded text that has not yet been resolved into lines.
#[derive(Debug, Default)]
pub struct DecodeBuffer {
    text: String,
    pending: Vec<u8>,
}

impl DecodeBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `chunk` and append it to the buffer. A multi-byte sequence cut
    /// at the end of the chunk is held back until the next push.
    pub fn push(&mut self, chunk: &[u8]) {
        self.pending.extend_from_slice(chunk);
        decode_utf8(&mut self.pending, &mut self.text, false);
    }

    /// Flush held-back bytes at end of stream. An unfinished sequence decodes
    /// to U+FFFD.
    pub fn finish(&mut self) {
        decode_utf8(&mut self.pending, &mut self.text, true);
    }

    /// The next complete line, without its terminator, left in place.
    ///
    /// Not consuming a peeked line is how a frame gets pushed back: the next
    /// call sees exactly the same bytes again.
    pub fn peek_line(&self) -> Option<&str> {
        let newline = memchr(b'\n', self.text.as_bytes())?;
        let line = &self.text[..newline];
        Some(line.strip_suffix('\r').unwrap_or(line))
    }

    /// Drop the line returned by the last [`DecodeBuffer::peek_line`].
    pub fn consume_line(&mut self) {
        if let Some(newline) = memchr(b'\n', self.text.as_bytes()) {
            self.text.drain(..=newline);
        }
    }

    /// Everything still buffered, including an unterminated final line.
    pub fn take_remainder(&mut self) -> String {
        std::mem::take(&mut self.text)
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty() && self.pending.is_empty()
    }

    pub fn clear(&mut self) {
        self.text.clear();
        self.pending.clear();
    }
}

fn decode_utf8(pending: &mut Vec<u8>, out: &mut String, flush: bool) {
    let mut start = 0;

    while start < pending.len() {
        match std::str::from_utf8(&pending[start..]) {
            Ok(valid) => {
                out.push_str(valid);
                start = pending.len();
            }
            Err(err) => {
                let valid_end = start + err.valid_up_to();
                out.push_str(&String::from_utf8_lossy(&pending[start..valid_end]));
                match err.error_len() {
                    Some(invalid_len) => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        start = valid_end + invalid_len;
                    }
                    None if flush => {
                        out.push(char::REPLACEMENT_CHARACTER);
                        start = pending.len();
                    }
                    None => {
                        start = valid_end;
                        break;
                    }
                }
            }
        }
    }

    pending.drain(..start);
}

/// One line of the event stream, as far as the chat consumer cares.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Frame<'a> {
    /// Blank lines, `:` comments, other SSE fields and empty `data:` lines.
    Ignored,
    /// The `[DONE]` sentinel.
    Done,
    /// Trimmed payload of a `data: ` line.
    Data(&'a str),
}

pub fn classify_line(line: &str) -> Frame<'_> {
    if line.starts_with(':') || line.trim().is_empty() {
        return Frame::Ignored;
    }

    let Some(rest) = line.strip_prefix(DATA_PREFIX) else {
        return Frame::Ignored;
    };

    match rest.trim() {
        "" => Frame::Ignored,
        DONE_SENTINEL => Frame::Done,
        payload => Frame::Data(payload),
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DeltaParse {
    /// Valid JSON; carries the text fragment when the frame has one.
    Parsed(Option<String>),
    /// JSON ended before the value was complete.
    Incomplete,
    /// JSON that no amount of further input can repair.
    Malformed(String),
}

pub fn parse_delta(payload: &str) -> DeltaParse {
    match serde_json::from_str::<Value>(payload) {
        Ok(value) => DeltaParse::Parsed(delta_content(&value).map(str::to_owned)),
        Err(err) if err.is_eof() => DeltaParse::Incomplete,
        Err(err) => DeltaParse::Malformed(err.to_string()),
    }
}
