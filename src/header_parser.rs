//! Incremental parser of an HTTP/1.x header block
//!
//! Data is fed in arbitrary pieces as it arrives from the network. Lines
//! are parsed as soon as they are complete and the parser never looks
//! past the blank line that terminates the header block, so the bytes that
//! follow it are handed back to the caller untouched.
//!
//! Malformed field lines don't stop the parser. They are recorded in
//! `errors()` and skipped, which gives a best-effort result the way
//! RFC7230 section 3.2.4 allows.
use std::borrow::Cow;
use std::cmp;
use std::fmt;
use std::slice::Iter as SliceIter;

use memchr::memchr;
use netbuf::Buf;

use headers::{self, is_ws};


quick_error! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// A header line that was ignored
    ///
    /// Each variant contains the 1-based number of the line in the message
    /// (start line included).
    pub enum HeaderError {
        /// Line starts with a colon
        EmptyName { line: usize } {
            description("empty header name")
            display("line {}: empty header name", line)
        }
        /// There is whitespace between the field name and the colon
        WhitespaceBeforeColon { line: usize } {
            description("whitespace between header name and colon")
            display("line {}: whitespace between header name and colon",
                    line)
        }
        /// Field line has no colon at all
        MissingColon { line: usize } {
            description("header line without a colon")
            display("line {}: header line without a colon", line)
        }
        /// A folded line that has nothing to continue
        OrphanContinuation { line: usize } {
            description("continuation line without a preceding header")
            display("line {}: continuation line without \
                     a preceding header", line)
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    StartLine,
    Headers,
    Done,
}

/// Range of bytes in the parser's buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct Span {
    start: usize,
    end: usize,
}

#[derive(Debug, Clone, Copy)]
struct Entry {
    name: Span,
    value: Span,
    folded: bool,
}

/// A complete line, spans are absolute offsets in the buffer
enum Line {
    Start(Span),
    /// Content of a folded line with the whitespace stripped
    Fold(Span),
    Field(Span, Span),
    Invalid(HeaderError),
}

/// Feed-based parser of request or response headers
///
/// All the slices returned borrow the parser, so they can't outlive the
/// next `feed()` or `reset()`. Copy the data out if you need it longer.
pub struct HttpHeaderParser {
    buf: Buf,
    state: State,
    /// Beginning of the line that is not complete yet
    line_start: usize,
    line_no: usize,
    start_line: Span,
    headers: Vec<Entry>,
    /// Header that a continuation line extends, if any
    fold_target: Option<usize>,
    errors: Vec<HeaderError>,
}

/// Iterator over headers in the order they were received
///
/// Duplicate headers are neither glued together nor sorted.
#[derive(Debug)]
pub struct HeaderIter<'a> {
    parser: &'a HttpHeaderParser,
    iter: SliceIter<'a, Entry>,
}

impl Span {
    fn empty() -> Span {
        Span { start: 0, end: 0 }
    }
    fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Splits a single line (terminator included) into parts
///
/// Returns `None` for the blank line that ends the header block.
fn classify(bytes: &[u8], offset: usize, line_no: usize, start_line: bool)
    -> Option<Line>
{
    let mut end = bytes.len();
    while end > 0 && matches!(bytes[end-1], b'\r' | b'\n') {
        end -= 1;
    }
    if end == 0 {
        return None;
    }
    while end > 0 && is_ws(bytes[end-1]) {
        end -= 1;
    }
    let span = |start, end| Span { start: offset + start, end: offset + end };
    if start_line {
        return Some(Line::Start(span(0, end)));
    }
    let line = &bytes[..end];
    if is_ws(bytes[0]) {
        let start = line.iter().position(|&x| !is_ws(x)).unwrap_or(end);
        return Some(Line::Fold(span(start, end)));
    }
    let colon = match memchr(b':', line) {
        Some(colon) => colon,
        None => {
            return Some(Line::Invalid(
                HeaderError::MissingColon { line: line_no }));
        }
    };
    if colon == 0 {
        return Some(Line::Invalid(HeaderError::EmptyName { line: line_no }));
    }
    if is_ws(line[colon-1]) {
        return Some(Line::Invalid(
            HeaderError::WhitespaceBeforeColon { line: line_no }));
    }
    let value_start = line[colon+1..].iter().position(|&x| !is_ws(x))
        .map(|x| colon + 1 + x).unwrap_or(end);
    Some(Line::Field(span(0, colon), span(value_start, end)))
}

fn unfold(raw: &[u8]) -> Vec<u8> {
    let mut result = Vec::with_capacity(raw.len());
    let mut skip_ws = false;
    for &ch in raw {
        match ch {
            b'\r' => continue,
            b'\n' => {
                while result.last().map_or(false, |&x| is_ws(x)) {
                    result.pop();
                }
                result.push(b' ');
                skip_ws = true;
            }
            x if skip_ws && is_ws(x) => continue,
            x => {
                skip_ws = false;
                result.push(x);
            }
        }
    }
    result
}

impl HttpHeaderParser {
    /// Create a parser
    ///
    /// With `has_start_line` the first line is taken as a request or
    /// status line. Otherwise parsing starts with header fields (that's
    /// what the headers of a multipart body part look like).
    pub fn new(has_start_line: bool) -> HttpHeaderParser {
        HttpHeaderParser {
            buf: Buf::new(),
            state: if has_start_line { State::StartLine }
                   else { State::Headers },
            line_start: 0,
            line_no: 0,
            start_line: Span::empty(),
            headers: Vec::new(),
            fold_target: None,
            errors: Vec::new(),
        }
    }

    /// Clear everything to parse the next message
    pub fn reset(&mut self, has_start_line: bool) {
        let len = self.buf.len();
        self.buf.consume(len);
        self.state = if has_start_line { State::StartLine }
                     else { State::Headers };
        self.line_start = 0;
        self.line_no = 0;
        self.start_line = Span::empty();
        self.headers.clear();
        self.fold_target = None;
        self.errors.clear();
    }

    /// Feed the next chunk of data
    ///
    /// Returns the part of `data` that follows the end of the header block
    /// once it's found, and an empty slice if more data is needed. When
    /// the parser is already done nothing is consumed and `data` is
    /// returned as is.
    pub fn feed<'a>(&mut self, data: &'a [u8]) -> &'a [u8] {
        if self.state == State::Done {
            return data;
        }
        let base = self.buf.len();
        self.buf.extend(data);
        loop {
            // everything buffered before this call has no line breaks left
            let from = cmp::max(self.line_start, base);
            let end = match memchr(b'\n', &self.buf[from..]) {
                Some(off) => from + off + 1,
                None => break,
            };
            let line = Span { start: self.line_start, end: end };
            self.line_start = end;
            self.line_no += 1;
            if self.parse_line(line) {
                self.state = State::Done;
                if end < self.buf.len() {
                    self.buf.remove_range(end..);
                }
                debug!("Header block of {} bytes complete, {} headers, \
                        {} errors", end, self.headers.len(),
                        self.errors.len());
                return &data[end - base..];
            }
        }
        trace!("Header parser needs more data, {} bytes buffered",
               self.buf.len());
        &[]
    }

    /// Returns true when the header block is complete
    fn parse_line(&mut self, line: Span) -> bool {
        let parsed = classify(&self.buf[line.start..line.end], line.start,
            self.line_no, self.state == State::StartLine);
        match parsed {
            None => return true,
            Some(Line::Start(span)) => {
                self.start_line = span;
                self.state = State::Headers;
            }
            Some(Line::Fold(span)) => self.continuation(span),
            Some(Line::Field(name, value)) => {
                self.headers.push(Entry {
                    name: name,
                    value: value,
                    folded: false,
                });
                self.fold_target = Some(self.headers.len() - 1);
            }
            Some(Line::Invalid(err)) => {
                debug!("Ignoring header line: {}", err);
                self.errors.push(err);
                self.fold_target = None;
            }
        }
        false
    }

    fn continuation(&mut self, content: Span) {
        let idx = match self.fold_target {
            Some(idx) => idx,
            None => {
                let err = HeaderError::OrphanContinuation {
                    line: self.line_no };
                debug!("Ignoring header line: {}", err);
                self.errors.push(err);
                return;
            }
        };
        if content.is_empty() {
            return;  // whitespace only, nothing to append
        }
        let entry = &mut self.headers[idx];
        if entry.value.is_empty() {
            entry.value = content;
        } else {
            entry.value.end = content.end;
            entry.folded = true;
        }
    }

    fn slice(&self, span: Span) -> &[u8] {
        &self.buf[span.start..span.end]
    }

    fn value(&self, entry: &Entry) -> Cow<'_, [u8]> {
        let raw = self.slice(entry.value);
        if entry.folded {
            Cow::Owned(unfold(raw))
        } else {
            Cow::Borrowed(raw)
        }
    }

    /// Returns true when the blank line ending the headers was received
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Returns true if any header line was malformed
    ///
    /// This doesn't stop parsing, see `errors()` for details.
    pub fn has_error(&self) -> bool {
        !self.errors.is_empty()
    }

    /// All the problems encountered so far, in the order of appearance
    pub fn errors(&self) -> &[HeaderError] {
        &self.errors
    }

    /// Request or status line, without the line terminator
    ///
    /// Empty if the parser was created without a start line or if the
    /// line was not received yet.
    pub fn start_line(&self) -> &[u8] {
        self.slice(self.start_line)
    }

    /// Value of the first header with exactly this name
    ///
    /// The comparison is case-sensitive. For a folded header a new value
    /// is built where each line break (with the whitespace around it) is
    /// replaced by a single space.
    pub fn header(&self, name: &str) -> Option<Cow<'_, [u8]>> {
        self.headers.iter()
            .find(|e| self.slice(e.name) == name.as_bytes())
            .map(|e| self.value(e))
    }

    /// Same as `header()` but converts value to a string lossily
    pub fn header_str(&self, name: &str) -> Option<Cow<'_, str>> {
        self.header(name).map(|val| match val {
            Cow::Borrowed(x) => String::from_utf8_lossy(x),
            Cow::Owned(x) => {
                Cow::Owned(String::from_utf8_lossy(&x).into_owned())
            }
        })
    }

    /// Iterate over all headers received
    pub fn headers(&self) -> HeaderIter<'_> {
        HeaderIter {
            parser: self,
            iter: self.headers.iter(),
        }
    }

    /// Number of headers parsed so far (duplicates included)
    pub fn len(&self) -> usize {
        self.headers.len()
    }

    /// Returns true if no headers were parsed
    pub fn is_empty(&self) -> bool {
        self.headers.is_empty()
    }

    /// Value of the first `Content-Type` header, any letter case
    pub fn content_type(&self) -> Option<Cow<'_, [u8]>> {
        self.headers()
            .find(|&(name, _)| headers::is_content_type(name))
            .map(|(_, value)| value)
    }

    /// Value of the first `Content-Length` header if it's a valid number
    pub fn content_length(&self) -> Option<u64> {
        self.headers()
            .find(|&(name, _)| headers::is_content_length(name))
            .and_then(|(_, value)| headers::content_length(&value))
    }
}

impl<'a> Iterator for HeaderIter<'a> {
    type Item = (&'a [u8], Cow<'a, [u8]>);
    fn next(&mut self) -> Option<(&'a [u8], Cow<'a, [u8]>)> {
        self.iter.next()
            .map(|e| (self.parser.slice(e.name), self.parser.value(e)))
    }
}

impl fmt::Debug for HttpHeaderParser {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HttpHeaderParser")
            .field("state", &self.state)
            .field("buffered", &self.buf.len())
            .field("headers", &self.headers.len())
            .field("errors", &self.errors)
            .finish()
    }
}
