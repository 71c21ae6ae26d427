use std::io::{self, Write};

use netbuf::Buf;

use client::HttpRequest;


quick_error! {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    /// Request can't be serialized
    pub enum HeaderError {
        InvalidHost {
            description("Host contains invalid characters")
            display("Host contains invalid characters")
        }
        InvalidHeaderValue {
            description("Header value contains invalid characters")
            display("Header value contains invalid characters")
        }
        InvalidPath {
            description("Path contains invalid characters")
            display("Path contains invalid characters")
        }
    }
}

fn invalid_header(value: &[u8]) -> bool {
    value.iter().any(|&x| x == b'\r' || x == b'\n')
}

fn invalid_path(value: &[u8]) -> bool {
    value.iter().any(|&x| x <= b' ' || x == 0x7F)
}

/// Write the whole request head into the buffer
///
/// Nothing is written if the request is invalid.
pub fn write_request(buf: &mut Buf, req: &HttpRequest)
    -> Result<(), HeaderError>
{
    if invalid_path(req.path.as_bytes()) {
        return Err(HeaderError::InvalidPath);
    }
    if req.host.is_empty() || invalid_header(req.host.as_bytes()) {
        return Err(HeaderError::InvalidHost);
    }
    if let Some(ref auth) = req.auth {
        if invalid_header(auth.as_bytes()) {
            return Err(HeaderError::InvalidHeaderValue);
        }
    }
    let start = buf.len();
    write_head(buf, req).map_err(|_| {
        buf.remove_range(start..);
        HeaderError::InvalidHeaderValue
    })
}

fn write_head(buf: &mut Buf, req: &HttpRequest) -> io::Result<()> {
    write!(buf, "GET /{} HTTP/1.1\r\n", req.path)?;
    write!(buf, "Host: {}\r\n", req.host)?;
    if let Some(ref auth) = req.auth {
        write!(buf, "Authorization: Basic {}\r\n", auth)?;
    }
    buf.write_all(b"\r\n")
}
