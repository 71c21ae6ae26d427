//! Percent-encoding as used in URL paths and query strings
//!
//! Both directions work on raw bytes. Nothing here assumes the input is
//! valid UTF-8, except `unescape_str` which is a convenience for the
//! URL parser.
use std::string::FromUtf8Error;


const HEX: &'static [u8] = b"0123456789ABCDEF";

quick_error! {
    #[derive(Debug, Clone, PartialEq, Eq)]
    /// Error of decoding a percent-encoded sequence
    pub enum UnescapeError {
        /// `%` is followed by less than two characters
        Truncated { position: usize } {
            description("truncated percent-escape")
            display("truncated percent-escape at byte {}", position)
        }
        /// One of the two characters after `%` is not a hex digit
        InvalidHex { position: usize } {
            description("invalid hex digit in percent-escape")
            display("invalid percent-escape at byte {}", position)
        }
        /// Decoded bytes are not valid UTF-8 (only from `unescape_str`)
        Utf8(err: FromUtf8Error) {
            description("unescaped value is not valid utf-8")
            display("unescaped value is not valid utf-8: {}", err)
            from()
        }
    }
}

fn hex_value(ch: u8) -> Option<u8> {
    match ch {
        b'0'..=b'9' => Some(ch - b'0'),
        b'a'..=b'f' => Some(ch - b'a' + 10),
        b'A'..=b'F' => Some(ch - b'A' + 10),
        _ => None,
    }
}

fn is_unreserved(ch: u8) -> bool {
    ch.is_ascii_alphanumeric() ||
        matches!(ch, b'-' | b'_' | b'.' | b'~')
}

/// Decode `%xx` escapes and `+` (as a space) into `buf`
///
/// The buffer is cleared first. On error it is cleared again, so partially
/// decoded data is never observable.
pub fn unescape_into(input: &[u8], buf: &mut Vec<u8>)
    -> Result<(), UnescapeError>
{
    buf.clear();
    buf.reserve(input.len());
    let mut idx = 0;
    while idx < input.len() {
        match input[idx] {
            b'%' => {
                if idx + 2 >= input.len() {
                    buf.clear();
                    return Err(UnescapeError::Truncated { position: idx });
                }
                match (hex_value(input[idx+1]), hex_value(input[idx+2])) {
                    (Some(hi), Some(lo)) => buf.push((hi << 4) | lo),
                    _ => {
                        buf.clear();
                        return Err(
                            UnescapeError::InvalidHex { position: idx });
                    }
                }
                idx += 3;
            }
            b'+' => {
                buf.push(b' ');
                idx += 1;
            }
            ch => {
                buf.push(ch);
                idx += 1;
            }
        }
    }
    Ok(())
}

/// Decode a percent-encoded byte string
pub fn unescape(input: &[u8]) -> Result<Vec<u8>, UnescapeError> {
    let mut buf = Vec::new();
    unescape_into(input, &mut buf)?;
    Ok(buf)
}

/// Decode a percent-encoded string, requiring the result to be UTF-8
pub fn unescape_str(input: &str) -> Result<String, UnescapeError> {
    Ok(String::from_utf8(unescape(input.as_bytes())?)?)
}

/// Percent-encode `input` appending to `buf`
///
/// Unreserved characters (`A-Z a-z 0-9 - _ . ~`) are passed through. When
/// `space_plus` is set a space is written as `+`, otherwise as `%20`.
pub fn escape_into(input: &[u8], buf: &mut String, space_plus: bool) {
    buf.reserve(input.len());
    for &ch in input {
        if is_unreserved(ch) {
            buf.push(ch as char);
        } else if space_plus && ch == b' ' {
            buf.push('+');
        } else {
            buf.push('%');
            buf.push(HEX[(ch >> 4) as usize] as char);
            buf.push(HEX[(ch & 0x0f) as usize] as char);
        }
    }
}

/// Percent-encode a byte string
pub fn escape(input: &[u8], space_plus: bool) -> String {
    let mut buf = String::with_capacity(input.len());
    escape_into(input, &mut buf, space_plus);
    buf
}
