//! Blocking counterparts of the header and boundary parsers
//!
//! These read directly from a stream and are meant for connection setup
//! and simple clients. Timeouts are whatever the underlying stream is
//! configured with, any error of the stream (including a timeout or
//! end of file in the middle of the data) fails the whole operation.
use std::io::{self, Read, BufRead};

use memchr::memchr;

use headers::{self, trim_left, trim_right};


/// Default limit of a single line read by `read_line`
pub const DEFAULT_MAX_LINE: usize = 1024;

/// The two headers kept by `parse_http_headers`
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EntityHeaders {
    /// Raw value of `Content-Type`, empty if absent
    pub content_type: Vec<u8>,
    /// Raw value of `Content-Length`, empty if absent
    pub content_length: Vec<u8>,
}

impl EntityHeaders {
    /// Parsed `Content-Length`, `None` if absent or invalid
    pub fn content_length(&self) -> Option<u64> {
        headers::content_length(&self.content_length)
    }
    /// The `boundary` parameter if content type is `multipart/*`
    pub fn boundary(&self) -> Option<&[u8]> {
        headers::multipart_boundary(&self.content_type)
    }
}

fn closed() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "connection closed")
}

/// Read a line (with the terminator) of at most `max` bytes into `buf`
///
/// A longer line is returned in pieces by subsequent calls. The end of
/// stream before the line terminator is an error.
pub fn read_line<R: BufRead>(stream: &mut R, buf: &mut Vec<u8>, max: usize)
    -> io::Result<()>
{
    buf.clear();
    let max = if max == 0 { DEFAULT_MAX_LINE } else { max };
    let bytes = stream.by_ref().take(max as u64).read_until(b'\n', buf)?;
    if bytes == 0 || (bytes < max && buf.last() != Some(&b'\n')) {
        return Err(closed());
    }
    Ok(())
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    ContentType,
    ContentLength,
    Other,
}

/// Read a header block up to and including the empty line
///
/// Only `Content-Type` and `Content-Length` are kept. Continuation lines
/// of these two are appended with their leading whitespace stripped, no
/// other unfolding is done.
pub fn parse_http_headers<R: BufRead>(stream: &mut R, max_line: usize)
    -> io::Result<EntityHeaders>
{
    let mut result = EntityHeaders::default();
    let mut line = Vec::with_capacity(64);
    let mut field = Field::Other;
    loop {
        read_line(stream, &mut line, max_line)?;
        let mut value = trim_right(&line);
        if value.is_empty() {
            trace!("Headers done, content type {:?}, length {:?}",
                String::from_utf8_lossy(&result.content_type),
                String::from_utf8_lossy(&result.content_length));
            return Ok(result);
        }

        // header fields start at the beginning of the line
        if !value[0].is_ascii_whitespace() {
            let (name, rest) = match memchr(b':', value) {
                Some(colon) => (&value[..colon], &value[colon+1..]),
                None => (value, &b""[..]),
            };
            let name = trim_right(name);
            field = if headers::is_content_type(name) {
                Field::ContentType
            } else if headers::is_content_length(name) {
                Field::ContentLength
            } else {
                Field::Other
            };
            value = rest;
        }

        let value = trim_left(value);
        match field {
            Field::ContentType => {
                result.content_type.extend_from_slice(value);
            }
            Field::ContentLength => {
                result.content_length.extend_from_slice(value);
            }
            Field::Other => {}
        }
    }
}

/// Skip the stream up to and including `--<boundary>`
///
/// On success the stream is positioned at the byte right after the
/// boundary (usually `\r\n`). When `save` is given all the bytes before
/// the boundary are appended to it. Otherwise leading line breaks are
/// discarded one byte at a time first, which is the common case of a
/// boundary that directly follows the previous part.
pub fn find_multipart_boundary<R: Read>(stream: &mut R, boundary: &[u8],
    mut save: Option<&mut Vec<u8>>)
    -> io::Result<()>
{
    let size = boundary.len() + 2;
    let mut search = vec![0u8; size];
    let mut filled = 0;

    if save.is_none() {
        loop {
            stream.read_exact(&mut search[..1])?;
            if search[0] != b'\r' && search[0] != b'\n' {
                break;
            }
        }
        filled = 1;
    }

    // Read a window of the boundary size, then fast-scan it for `-` and
    // only compare the whole boundary when the window starts with it
    loop {
        stream.read_exact(&mut search[filled..])?;
        if &search[..2] == b"--" && &search[2..] == boundary {
            trace!("Boundary {:?} found",
                   String::from_utf8_lossy(boundary));
            return Ok(());
        }

        let from = if search[0] == b'-' { 1 } else { 0 };
        match memchr(b'-', &search[from..]) {
            None => {
                if let Some(ref mut save) = save {
                    save.extend_from_slice(&search);
                }
                filled = 0;
            }
            Some(off) => {
                let pos = from + off;
                if let Some(ref mut save) = save {
                    save.extend_from_slice(&search[..pos]);
                }
                // move '-' and following to the start of the window
                search.drain(..pos);
                filled = search.len();
                search.resize(size, 0);
            }
        }
    }
}
