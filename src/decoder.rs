//! Chunk-level decode driver with carry-over of unframed bytes.

use log::debug;

use crate::command;
use crate::frame;
use crate::lexer;
use crate::message::Sink;

/// Stream decoder for one device.
///
/// The only state that survives a decode call is the leftover byte buffer;
/// everything else is rebuilt per call. Decode calls must run strictly
/// sequentially for a device, and each device owns its own `Decoder`.
#[derive(Debug, Default)]
pub struct Decoder {
    carry: Vec<u8>,
}

impl Decoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Bytes awaiting completion by the next chunk.
    pub fn leftover(&self) -> &[u8] {
        &self.carry
    }

    /// Decode one chunk of modem bytes, emitting one update per frame.
    ///
    /// The previous call's leftover is prepended first. Complete frames are
    /// validated and decoded in header order; invalid frames are reported
    /// after them. Orphan lines and an unterminated trailing line are
    /// carried into the next call.
    pub fn decode_chunk(&mut self, chunk: &[u8], sink: &mut dyn Sink) {
        let mut input = std::mem::take(&mut self.carry);
        input.extend_from_slice(chunk);

        let text = lexer::decode_text(&input);

        // A line that has not seen its terminator yet stays raw in the
        // carry buffer; lexing it early would fabricate a bogus frame out
        // of a partial read.
        let (head, tail) = match text.rfind("\r\n") {
            Some(pos) => text.split_at(pos + 2),
            None => ("", text.as_str()),
        };

        let lines = lexer::split_lines(head);
        let framed = frame::organize(&lines);
        let (valid, invalid) = frame::validate(framed.complete);

        for frame in &valid {
            sink.update(command::decode_frame(frame).filtered());
        }
        for frame in &invalid {
            sink.update(command::decode_invalid_frame(frame).filtered());
        }

        let mut carry = Vec::new();
        for line in &framed.incomplete {
            debug!("carrying incomplete line into next read: {line}");
            carry.extend_from_slice(line.as_bytes());
            carry.extend_from_slice(b"\r\n");
        }
        carry.extend_from_slice(tail.as_bytes());
        self.carry = carry;
    }
}
