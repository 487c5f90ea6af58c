//! SSE (Server-Sent Events) stream decoder.
//!
//! Incremental parser for the `text/event-stream` framing the backend
//! streams answers in. Chunks arrive at arbitrary byte boundaries, so the
//! decoder keeps a rolling buffer: a chunk may end mid-line, mid-CRLF, or
//! even mid-BOM, and the next `feed` picks up where the last one left off.
//!
//! Framing rules handled here:
//! - Lines end with `\n`, `\r\n`, or a bare `\r` (a CRLF split across
//!   chunks is collapsed, never surfaced as a spurious empty line)
//! - A single leading byte-order-mark on the first chunk is stripped
//! - `data:` lines accumulate with a newline separator until a blank line
//!   dispatches the record (exactly one trailing newline is stripped)
//! - `event:` sets the record's event name, last write wins
//! - `id:` sets the record's id unless the value contains a NUL byte
//! - `retry:` emits a reconnect interval immediately, without waiting for
//!   a record terminator
//! - A line with no colon is a field with an empty value; unknown fields
//!   (including comment lines, whose field name is empty) are ignored
//!
//! This is a hand-rolled parser rather than an eventsource crate because
//! the backend's framing quirks (name reset per record, abrupt closes)
//! need direct control over dispatch state.

/// A decoded unit from the event stream.
#[derive(Debug, Clone, PartialEq)]
pub enum StreamEvent {
    /// A complete record: accumulated data plus optional event name and id.
    Message {
        id: Option<String>,
        event: Option<String>,
        data: String,
    },
    /// A `retry:` field, emitted as soon as its line is parsed.
    ReconnectInterval { millis: u64 },
}

/// Stateful incremental SSE decoder.
///
/// One decoder per logical request; never shared across streams. Feed it
/// text chunks as they arrive and collect the events each feed completes.
///
/// # Example
///
/// ```ignore
/// use parlance::sse::{SseDecoder, StreamEvent};
///
/// let mut decoder = SseDecoder::new();
/// for event in decoder.feed("data: {\"text\":\"hi\"}\n\n") {
///     match event {
///         StreamEvent::Message { data, .. } => println!("{}", data),
///         StreamEvent::ReconnectInterval { millis } => println!("retry {}", millis),
///     }
/// }
/// ```
#[derive(Debug)]
pub struct SseDecoder {
    /// Unconsumed text carried across feeds.
    buffer: String,
    /// Accumulated `data:` lines, each followed by a newline.
    data: String,
    /// Current record's event name.
    event_name: Option<String>,
    /// Current record's id.
    event_id: Option<String>,
    /// Armed until the first non-empty chunk has been seen.
    strip_bom: bool,
    /// The previous feed ended on a bare `\r`; swallow one `\n` next pass.
    skip_leading_lf: bool,
}

impl Default for SseDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl SseDecoder {
    /// Create a new decoder for a fresh stream.
    pub fn new() -> Self {
        Self {
            buffer: String::new(),
            data: String::new(),
            event_name: None,
            event_id: None,
            strip_bom: true,
            skip_leading_lf: false,
        }
    }

    /// Feed a chunk and collect the events it completes.
    pub fn feed(&mut self, chunk: &str) -> Vec<StreamEvent> {
        let mut events = Vec::new();
        self.feed_with(chunk, &mut |event| events.push(event));
        events
    }

    /// Feed a chunk, invoking `emit` for each completed event in order.
    pub fn feed_with<F>(&mut self, chunk: &str, emit: &mut F)
    where
        F: FnMut(StreamEvent),
    {
        let mut chunk = chunk;
        if self.strip_bom && !chunk.is_empty() {
            chunk = chunk.strip_prefix('\u{feff}').unwrap_or(chunk);
            self.strip_bom = false;
        }
        self.buffer.push_str(chunk);

        loop {
            if self.skip_leading_lf {
                if self.buffer.is_empty() {
                    // Can't tell yet whether a \n follows the \r.
                    break;
                }
                if self.buffer.starts_with('\n') {
                    self.buffer.remove(0);
                }
                self.skip_leading_lf = false;
            }

            let Some(pos) = self.buffer.find(&['\r', '\n'][..]) else {
                break;
            };
            let terminator = self.buffer.as_bytes()[pos];
            let line: String = self.buffer.drain(..pos).collect();
            self.buffer.remove(0);
            if terminator == b'\r' {
                if self.buffer.starts_with('\n') {
                    self.buffer.remove(0);
                } else if self.buffer.is_empty() {
                    self.skip_leading_lf = true;
                }
            }
            self.process_line(&line, emit);
        }
    }

    /// Reset all state for stream reuse, re-arming BOM stripping.
    pub fn reset(&mut self) {
        self.buffer.clear();
        self.data.clear();
        self.event_name = None;
        self.event_id = None;
        self.strip_bom = true;
        self.skip_leading_lf = false;
    }

    fn process_line<F>(&mut self, line: &str, emit: &mut F)
    where
        F: FnMut(StreamEvent),
    {
        if line.is_empty() {
            // Record terminator: dispatch when data was accumulated.
            if !self.data.is_empty() {
                // Strip exactly the one trailing newline the last data
                // line appended.
                self.data.truncate(self.data.len() - 1);
                let data = std::mem::take(&mut self.data);
                emit(StreamEvent::Message {
                    id: self.event_id.take(),
                    event: self.event_name.clone(),
                    data,
                });
            }
            // The event name does not survive a record boundary.
            self.event_name = None;
            return;
        }

        let (field, value) = match line.find(':') {
            Some(idx) => {
                let value = &line[idx + 1..];
                (&line[..idx], value.strip_prefix(' ').unwrap_or(value))
            }
            None => (line, ""),
        };

        match field {
            "data" => {
                self.data.push_str(value);
                self.data.push('\n');
            }
            "event" => {
                self.event_name = Some(value.to_string());
            }
            "id" => {
                if !value.contains('\0') {
                    self.event_id = Some(value.to_string());
                }
            }
            "retry" => {
                if let Ok(millis) = value.trim().parse::<u64>() {
                    emit(StreamEvent::ReconnectInterval { millis });
                }
            }
            // Comment lines parse to an empty field name and land here
            // along with unrecognized fields.
            _ => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn message(data: &str) -> StreamEvent {
        StreamEvent::Message {
            id: None,
            event: None,
            data: data.to_string(),
        }
    }

    #[test]
    fn test_single_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("event: add\ndata: {\"x\":1}\n\n");
        assert_eq!(
            events,
            vec![StreamEvent::Message {
                id: None,
                event: Some("add".to_string()),
                data: "{\"x\":1}".to_string(),
            }]
        );
    }

    #[test]
    fn test_data_only_event() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data: hello\n\n");
        assert_eq!(events, vec![message("hello")]);
    }

    #[test]
    fn test_data_without_space_after_colon() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data:hello\n\n");
        assert_eq!(events, vec![message("hello")]);
    }

    #[test]
    fn test_multiline_data_joined_with_newlines() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data: first\ndata: second\n\n");
        assert_eq!(events, vec![message("first\nsecond")]);
    }

    #[test]
    fn test_no_emit_without_record_terminator() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("data: pending\n").is_empty());
        // The blank line completes it.
        assert_eq!(decoder.feed("\n"), vec![message("pending")]);
    }

    #[test]
    fn test_blank_line_without_data_emits_nothing() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("\n\n\n").is_empty());
        assert!(decoder.feed("event: ping\n\n").is_empty());
    }

    #[test]
    fn test_event_name_cleared_after_dispatch() {
        let mut decoder = SseDecoder::new();
        let first = decoder.feed("event: delta\ndata: a\n\n");
        assert_eq!(
            first[0],
            StreamEvent::Message {
                id: None,
                event: Some("delta".to_string()),
                data: "a".to_string(),
            }
        );

        // The next record has no event: line, so its name is empty again.
        let second = decoder.feed("data: b\n\n");
        assert_eq!(second, vec![message("b")]);
    }

    #[test]
    fn test_event_name_last_write_wins() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("event: one\nevent: two\ndata: x\n\n");
        assert_eq!(
            events[0],
            StreamEvent::Message {
                id: None,
                event: Some("two".to_string()),
                data: "x".to_string(),
            }
        );
    }

    #[test]
    fn test_id_attached_and_cleared_on_dispatch() {
        let mut decoder = SseDecoder::new();
        let first = decoder.feed("id: 7\ndata: a\n\n");
        assert_eq!(
            first[0],
            StreamEvent::Message {
                id: Some("7".to_string()),
                event: None,
                data: "a".to_string(),
            }
        );

        let second = decoder.feed("data: b\n\n");
        assert_eq!(second, vec![message("b")]);
    }

    #[test]
    fn test_id_with_nul_ignored() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("id: first\ndata: a\nid: bad\0id\ndata: b\n\n");
        // The NUL-bearing id is dropped; the earlier id survives.
        assert_eq!(
            events[0],
            StreamEvent::Message {
                id: Some("first".to_string()),
                event: None,
                data: "a\nb".to_string(),
            }
        );
    }

    #[test]
    fn test_retry_emits_immediately_without_blank_line() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("retry: 500\n");
        assert_eq!(events, vec![StreamEvent::ReconnectInterval { millis: 500 }]);
    }

    #[test]
    fn test_retry_non_numeric_ignored() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("retry: soon\n").is_empty());
    }

    #[test]
    fn test_retry_does_not_disturb_pending_record() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data: a\nretry: 250\ndata: b\n\n");
        assert_eq!(
            events,
            vec![
                StreamEvent::ReconnectInterval { millis: 250 },
                message("a\nb"),
            ]
        );
    }

    #[test]
    fn test_comment_lines_ignored() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed(": keepalive\ndata: x\n: another\n\n");
        assert_eq!(events, vec![message("x")]);
    }

    #[test]
    fn test_unknown_field_ignored() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("flavor: vanilla\ndata: x\n\n");
        assert_eq!(events, vec![message("x")]);
    }

    #[test]
    fn test_line_without_colon_is_field_with_empty_value() {
        let mut decoder = SseDecoder::new();
        // "data" alone accumulates an empty data line, which still counts
        // as field presence, so the record dispatches with empty data.
        let events = decoder.feed("data\n\n");
        assert_eq!(events, vec![message("")]);
    }

    #[test]
    fn test_chunk_split_mid_field() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("dat").is_empty());
        assert!(decoder.feed("a: hel").is_empty());
        let events = decoder.feed("lo\n\n");
        assert_eq!(events, vec![message("hello")]);
    }

    #[test]
    fn test_crlf_line_endings() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data: a\r\ndata: b\r\n\r\n");
        assert_eq!(events, vec![message("a\nb")]);
    }

    #[test]
    fn test_crlf_split_across_chunks() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("data: a\r").is_empty());
        // The \n completing the CRLF must not read as an empty line.
        let events = decoder.feed("\n\ndata: b\n\n");
        assert_eq!(events, vec![message("a"), message("b")]);
    }

    #[test]
    fn test_bare_cr_line_endings() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data: a\r\rdata: b\n\n");
        assert_eq!(events, vec![message("a"), message("b")]);
    }

    #[test]
    fn test_bom_stripped_on_first_chunk() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("\u{feff}data: x\n\n");
        assert_eq!(events, vec![message("x")]);
    }

    #[test]
    fn test_bom_not_stripped_after_first_chunk() {
        let mut decoder = SseDecoder::new();
        decoder.feed("data: a\n\n");
        // A later BOM corrupts its field name instead of vanishing.
        let events = decoder.feed("\u{feff}data: b\n\n");
        assert!(events.is_empty());
    }

    #[test]
    fn test_empty_chunk_keeps_bom_armed() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("").is_empty());
        let events = decoder.feed("\u{feff}data: x\n\n");
        assert_eq!(events, vec![message("x")]);
    }

    #[test]
    fn test_multiple_events_in_one_chunk() {
        let mut decoder = SseDecoder::new();
        let events = decoder.feed("data: one\n\ndata: two\n\ndata: [DONE]\n\n");
        assert_eq!(
            events,
            vec![message("one"), message("two"), message("[DONE]")]
        );
    }

    #[test]
    fn test_unterminated_final_line_not_parsed() {
        let mut decoder = SseDecoder::new();
        assert!(decoder.feed("data: dangling").is_empty());
    }

    #[test]
    fn test_reset_clears_state_and_rearms_bom() {
        let mut decoder = SseDecoder::new();
        decoder.feed("event: add\ndata: pending");
        decoder.reset();

        // Nothing left over from before the reset.
        assert!(decoder.feed("\n\n").is_empty());

        decoder.reset();
        let events = decoder.feed("\u{feff}data: fresh\n\n");
        assert_eq!(events, vec![message("fresh")]);
    }

    #[test]
    fn test_split_at_every_boundary_matches_whole_feed() {
        let stream = "\u{feff}retry: 1500\nevent: add\r\nid: 9\ndata: alpha\ndata: beta\r\n\r\n: comment\ndata: {\"parts\":[\"é✓\"]}\n\n";

        let mut whole = SseDecoder::new();
        let expected = whole.feed(stream);
        assert_eq!(expected.len(), 3);

        for (split, _) in stream.char_indices().skip(1) {
            let mut decoder = SseDecoder::new();
            let mut events = decoder.feed(&stream[..split]);
            events.extend(decoder.feed(&stream[split..]));
            assert_eq!(events, expected, "mismatch splitting at byte {}", split);
        }
    }
}
