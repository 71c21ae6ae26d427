//! Incremental HTTP parsing for streaming clients
//!
//! The building blocks of a client for `multipart/x-mixed-replace` (MJPEG
//! and alike) streams:
//!
//! * `uri` percent-encoding codec
//! * `HttpLocation` to split an `http://` url into parts
//! * `HttpHeaderParser`, a feed-based header parser with line folding
//! * `HttpMultipartScanner`, a feed-based boundary scanner
//! * `blocking` counterparts of both for a `Read` stream
//! * `client::HttpConnection`, a one-shot `GET` handshake
//!
//! Incremental parsers own a buffer and accept data in arbitrary chunks.
//! `feed` returns the part of the chunk that belongs to the next stage,
//! so parsers can be chained:
//!
//! ```rust
//! use httpfeed::{HttpMultipartScanner, HttpHeaderParser};
//!
//! let mut scanner = HttpMultipartScanner::new("frame", false);
//! let mut headers = HttpHeaderParser::new(false);
//! let rest = scanner.feed(b"\r\n--frame\r\nContent-Length: 3\r\n\r\nabc");
//! let body = headers.feed(rest);
//! assert_eq!(headers.content_length(), Some(3));
//! assert_eq!(body, b"abc");
//! ```

extern crate netbuf;
extern crate memchr;
#[macro_use(quick_error)] extern crate quick_error;
#[macro_use] extern crate matches;
#[macro_use] extern crate log;


pub mod uri;
pub mod blocking;
pub mod client;
mod headers;
mod location;
mod header_parser;
mod multipart;

pub use location::{HttpLocation, LocationError};
pub use header_parser::{HttpHeaderParser, HeaderError, HeaderIter};
pub use multipart::HttpMultipartScanner;
pub use blocking::EntityHeaders;
