use std::sync::Arc;
use std::time::Duration;

use blocking::DEFAULT_MAX_LINE;
use client::{Config};

impl Config {
    /// Create a config with defaults
    pub fn new() -> Config {
        Config {
            connect_timeout: Duration::new(5, 0),
            read_timeout: Some(Duration::new(5, 0)),
            write_timeout: Some(Duration::new(5, 0)),
            max_line_length: DEFAULT_MAX_LINE,
        }
    }
    /// Timeout of establishing a TCP connection
    ///
    /// Default is 5 seconds. Only used by `HttpConnection::connect`.
    pub fn connect_timeout(&mut self, value: Duration) -> &mut Self {
        self.connect_timeout = value;
        self
    }
    /// Timeout of a single read from the socket
    ///
    /// Default is 5 seconds, `None` means block forever. Note this is set
    /// on the socket by `HttpConnection::connect`, if you construct the
    /// connection from your own stream it's your job to set the timeout.
    pub fn read_timeout(&mut self, value: Option<Duration>) -> &mut Self {
        self.read_timeout = value;
        self
    }
    /// Timeout of a single write to the socket
    ///
    /// Default is 5 seconds, `None` means block forever. Same caveat as
    /// for `read_timeout` applies.
    pub fn write_timeout(&mut self, value: Option<Duration>) -> &mut Self {
        self.write_timeout = value;
        self
    }
    /// Maximum number of bytes read as a single header line
    ///
    /// Longer lines are split into several. Default is 1024.
    pub fn max_line_length(&mut self, value: usize) -> &mut Self {
        self.max_line_length = value;
        self
    }
    /// Create a Arc'd config clone to pass to the constructor
    ///
    /// This is just a convenience method.
    pub fn done(&mut self) -> Arc<Config> {
        Arc::new(self.clone())
    }
}
