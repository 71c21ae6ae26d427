use std::io;

use client::encoder::HeaderError;


quick_error! {
    #[derive(Debug)]
    /// Handshake error
    pub enum Error {
        /// I/O error when sending the request
        Io(err: io::Error) {
            description("IO error")
            display("IO error: {}", err)
            from()
        }
        /// Request can't be serialized (CR or LF in a header)
        Header(err: HeaderError) {
            description("bad request header")
            display("bad request header: {}", err)
            from()
        }
        /// Connection closed or failed before the status line
        ResetBeforeResponse(err: io::Error) {
            description("disconnected before response")
            display("disconnected before response: {}", err)
        }
        /// Status line doesn't start with `HTTP`
        NotHttp {
            description("did not receive HTTP response")
            display("did not receive HTTP response")
        }
        /// Status code is not 200
        BadStatus(code: String, reason: String) {
            description("unexpected response status")
            display("received {} {} response", code, reason)
        }
        /// Connection closed or failed while reading response headers
        ResetOnResponseHeaders(err: io::Error) {
            description("disconnected during headers")
            display("disconnected during headers: {}", err)
        }
    }
}

impl Error {
    /// Returns true if the peer went away rather than sent a bad response
    pub fn is_disconnect(&self) -> bool {
        match *self {
            Error::Io(..) |
            Error::ResetBeforeResponse(..) |
            Error::ResetOnResponseHeaders(..) => true,
            Error::Header(..) |
            Error::NotHttp |
            Error::BadStatus(..) => false,
        }
    }
}
