//! Incremental scanner for a multipart boundary
//!
//! Looks for `\n--<boundary>` followed by the rest of the line (whatever
//! padding the server puts there, then `\n`). Match progress is kept
//! between calls, so the marker may be split across any number of chunks.
use std::fmt;

use memchr::memchr;
use netbuf::Buf;


/// When skipped data isn't saved, the buffer is compacted after this
/// number of scanned bytes
const MAX_UNSAVED: usize = 4096;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    Boundary,
    Padding,
    Done,
}

/// Feed-based scanner that skips data up to and including the boundary line
pub struct HttpMultipartScanner {
    buf: Buf,
    /// The boundary prefixed with `\n--`
    pattern: Vec<u8>,
    save_skipped: bool,
    state: State,
    /// Everything before this position in `buf` is already scanned
    pos: usize,
    /// Number of bytes of `pattern` matched so far
    matched: usize,
}

fn make_pattern(boundary: &[u8], pattern: &mut Vec<u8>) {
    pattern.clear();
    pattern.extend_from_slice(b"\n--");
    pattern.extend_from_slice(boundary);
}

impl HttpMultipartScanner {
    /// Create a scanner for the `boundary` (without the leading `--`)
    ///
    /// With `save_skipped` all the data consumed by the scanner is kept and
    /// can be fetched with `skipped()`.
    pub fn new<B: AsRef<[u8]>>(boundary: B, save_skipped: bool)
        -> HttpMultipartScanner
    {
        let mut pattern = Vec::new();
        make_pattern(boundary.as_ref(), &mut pattern);
        HttpMultipartScanner {
            buf: Buf::new(),
            pattern: pattern,
            save_skipped: save_skipped,
            state: State::Boundary,
            pos: 0,
            matched: 0,
        }
    }

    /// Prepare for the next boundary, possibly a different one
    pub fn reset<B: AsRef<[u8]>>(&mut self, boundary: B, save_skipped: bool) {
        let len = self.buf.len();
        self.buf.consume(len);
        make_pattern(boundary.as_ref(), &mut self.pattern);
        self.save_skipped = save_skipped;
        self.state = State::Boundary;
        self.pos = 0;
        self.matched = 0;
    }

    /// Feed the next chunk of data
    ///
    /// Returns the part of `data` after the boundary line once it's found,
    /// and an empty slice while more data is needed. When the scanner is
    /// already done nothing is consumed and `data` is returned as is.
    pub fn feed<'a>(&mut self, data: &'a [u8]) -> &'a [u8] {
        if self.state == State::Done {
            return data;
        }
        let base = self.buf.len();
        self.buf.extend(data);
        if let Some(end) = self.scan() {
            self.state = State::Done;
            if end < self.buf.len() {
                self.buf.remove_range(end..);
            }
            debug!("Multipart boundary found, {} bytes skipped", end);
            return &data[end - base..];
        }
        if !self.save_skipped && self.pos > MAX_UNSAVED {
            trace!("Discarding {} bytes scanned for boundary", self.pos);
            let pos = self.pos;
            self.buf.consume(pos);
            self.pos = 0;
        }
        &[]
    }

    /// Returns the end of the boundary line if it's found
    fn scan(&mut self) -> Option<usize> {
        if self.state == State::Boundary {
            for &ch in &self.buf[self.pos..] {
                self.pos += 1;
                if ch == self.pattern[self.matched] {
                    self.matched += 1;
                    if self.matched == self.pattern.len() {
                        self.state = State::Padding;
                        break;
                    }
                } else if ch == b'\n' {
                    // the only place `\n` occurs in the pattern is its start
                    self.matched = 1;
                } else {
                    self.matched = 0;
                }
            }
        }
        if self.state == State::Padding {
            match memchr(b'\n', &self.buf[self.pos..]) {
                Some(off) => {
                    self.pos += off + 1;
                    return Some(self.pos);
                }
                None => self.pos = self.buf.len(),
            }
        }
        None
    }

    /// Returns true when the boundary line is fully consumed
    pub fn is_done(&self) -> bool {
        self.state == State::Done
    }

    /// Data consumed so far, including the boundary line itself
    ///
    /// Always empty unless the scanner was created with `save_skipped`.
    pub fn skipped(&self) -> &[u8] {
        if self.save_skipped {
            &self.buf[..]
        } else {
            &[]
        }
    }
}

impl fmt::Debug for HttpMultipartScanner {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("HttpMultipartScanner")
            .field("boundary", &String::from_utf8_lossy(&self.pattern[3..]))
            .field("state", &self.state)
            .field("buffered", &self.buf.len())
            .finish()
    }
}
