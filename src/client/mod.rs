//! One-shot HTTP/1.1 GET handshake over a blocking stream
//!
//! This is what a streaming client does once per connection: send a `GET`,
//! check the status and read the headers. The body (usually a
//! `multipart/x-mixed-replace` stream) is then read either with the
//! blocking helpers of `HttpConnection` or by feeding raw chunks into
//! `HttpMultipartScanner` and `HttpHeaderParser`.
mod auth;
mod config;
mod connection;
mod encoder;
mod errors;
mod request;

pub use self::connection::HttpConnection;
pub use self::encoder::HeaderError;
pub use self::errors::Error;
pub use self::request::HttpRequest;

use std::time::Duration;

/// Fine-grained configuration of the HTTP connection
#[derive(Debug, Clone)]
pub struct Config {
    connect_timeout: Duration,
    read_timeout: Option<Duration>,
    write_timeout: Option<Duration>,
    max_line_length: usize,
}
