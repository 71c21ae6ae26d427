use std::io::{self, Read, Write, BufReader};
use std::net::{TcpStream, ToSocketAddrs};
use std::sync::Arc;

use netbuf::Buf;

use blocking::{self, EntityHeaders};
use client::encoder::write_request;
use client::{Config, Error, HttpRequest};
use headers::trim_right;


/// A client connection to a (multipart) HTTP stream
///
/// The connection is used in two phases: `handshake` sends the request and
/// reads the response head, then the body is read either part by part
/// using `next_part`, or directly from `reader()`.
#[derive(Debug)]
pub struct HttpConnection<S> {
    io: BufReader<S>,
    config: Arc<Config>,
    headers: EntityHeaders,
}

fn split_word(line: &[u8]) -> (&[u8], &[u8]) {
    match line.iter().position(|&x| x == b' ') {
        Some(idx) => (&line[..idx], &line[idx+1..]),
        None => (line, &b""[..]),
    }
}

impl<S: Read + Write> HttpConnection<S> {
    /// Wrap an already connected stream
    pub fn new(stream: S, config: &Arc<Config>) -> HttpConnection<S> {
        HttpConnection {
            io: BufReader::new(stream),
            config: config.clone(),
            headers: EntityHeaders::default(),
        }
    }

    /// Send the request and read the response head
    ///
    /// Only a `200` response is accepted. On success the stream is
    /// positioned at the first byte of the response body and the
    /// `Content-Type` and `Content-Length` of the response are stored.
    pub fn handshake(&mut self, req: &HttpRequest) -> Result<(), Error> {
        let mut buf = Buf::new();
        write_request(&mut buf, req)?;
        {
            let out = self.io.get_mut();
            out.write_all(&buf[..])?;
            out.flush()?;
        }
        trace!("Sent request for {:?} to {:?}", req.path, req.host);

        let mut line = Vec::with_capacity(64);
        blocking::read_line(&mut self.io, &mut line,
                            self.config.max_line_length)
            .map_err(Error::ResetBeforeResponse)?;

        let (version, rest) = split_word(trim_right(&line));
        let (code, reason) = split_word(rest);
        if !version.starts_with(b"HTTP") {
            return Err(Error::NotHttp);
        }
        if code != b"200" {
            return Err(Error::BadStatus(
                String::from_utf8_lossy(code).into_owned(),
                String::from_utf8_lossy(reason).into_owned()));
        }

        self.headers = blocking::parse_http_headers(
                &mut self.io, self.config.max_line_length)
            .map_err(Error::ResetOnResponseHeaders)?;
        info!("Connected to {}:{}/{}, content type {:?}",
            req.host, req.port, req.path,
            String::from_utf8_lossy(&self.headers.content_type));
        Ok(())
    }

    /// Raw `Content-Type` of the response (or of the last part read)
    ///
    /// Empty if the header is absent.
    pub fn content_type(&self) -> &[u8] {
        &self.headers.content_type
    }

    /// Parsed `Content-Length` of the response (or of the last part read)
    pub fn content_length(&self) -> Option<u64> {
        self.headers.content_length()
    }

    /// Both headers of the response (or of the last part read)
    pub fn headers(&self) -> &EntityHeaders {
        &self.headers
    }

    /// The `boundary` parameter if the response is `multipart/*`
    pub fn boundary(&self) -> Option<&[u8]> {
        self.headers.boundary()
    }

    /// Skip the body up to and including `--<boundary>`
    ///
    /// See `blocking::find_multipart_boundary` for details.
    pub fn find_boundary(&mut self, boundary: &[u8], save: Option<&mut Vec<u8>>)
        -> io::Result<()>
    {
        blocking::find_multipart_boundary(&mut self.io, boundary, save)
    }

    /// Skip to the next part of a multipart body and read its headers
    ///
    /// Returns `None` at the closing `--<boundary>--` delimiter. After
    /// this call `content_type()` and `content_length()` describe the part
    /// and `reader()` is positioned at the start of its body.
    pub fn next_part(&mut self, boundary: &[u8])
        -> io::Result<Option<EntityHeaders>>
    {
        self.find_boundary(boundary, None)?;
        let mut byte = [0u8; 1];
        self.io.read_exact(&mut byte)?;
        if byte[0] == b'-' {
            self.io.read_exact(&mut byte)?;
            if byte[0] == b'-' {
                debug!("Final boundary reached");
                return Ok(None);
            }
        }
        if byte[0] != b'\n' {
            // CR or transport padding up to the end of the boundary line
            let mut line = Vec::new();
            blocking::read_line(&mut self.io, &mut line,
                                self.config.max_line_length)?;
        }
        self.headers = blocking::parse_http_headers(
            &mut self.io, self.config.max_line_length)?;
        Ok(Some(self.headers.clone()))
    }

    /// Buffered reader of the response body
    pub fn reader(&mut self) -> &mut BufReader<S> {
        &mut self.io
    }

    /// Unwrap the stream, data buffered by the reader is lost
    pub fn into_inner(self) -> S {
        self.io.into_inner()
    }
}

impl HttpConnection<TcpStream> {
    /// Connect to the host of the request
    ///
    /// Addresses are tried in the order of resolution. The socket gets
    /// read and write timeouts from the config.
    pub fn connect(req: &HttpRequest, config: &Arc<Config>)
        -> io::Result<HttpConnection<TcpStream>>
    {
        let mut last_err = None;
        for addr in (&req.host[..], req.port).to_socket_addrs()? {
            match TcpStream::connect_timeout(&addr, config.connect_timeout) {
                Ok(sock) => {
                    sock.set_read_timeout(config.read_timeout)?;
                    sock.set_write_timeout(config.write_timeout)?;
                    debug!("Connected to {}", addr);
                    return Ok(HttpConnection::new(sock, config));
                }
                Err(e) => {
                    debug!("Error connecting to {}: {}", addr, e);
                    last_err = Some(e);
                }
            }
        }
        Err(last_err.unwrap_or_else(|| io::Error::new(
            io::ErrorKind::NotFound,
            format!("no addresses found for {:?}", req.host))))
    }
}

#[cfg(test)]
mod test {
    use std::io::{self, Read, Write, Cursor};
    use client::{Config, Error, HttpRequest, HttpConnection};

    /// Replays a canned response and records what's written
    struct Mock {
        input: Cursor<Vec<u8>>,
        output: Vec<u8>,
    }

    impl Read for Mock {
        fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
            self.input.read(buf)
        }
    }

    impl Write for Mock {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.output.write(buf)
        }
        fn flush(&mut self) -> io::Result<()> { Ok(()) }
    }

    fn connection(response: &[u8]) -> HttpConnection<Mock> {
        HttpConnection::new(Mock {
            input: Cursor::new(response.to_vec()),
            output: Vec::new(),
        }, &Config::new().done())
    }

    fn request() -> HttpRequest {
        HttpRequest {
            host: "cam".to_string(),
            port: 80,
            auth: None,
            path: "mjpg".to_string(),
        }
    }

    #[test]
    fn parts() {
        let mut conn = connection(b"HTTP/1.0 200 OK\r\n\
            Content-Type: multipart/x-mixed-replace; boundary=frame\r\n\
            \r\n\
            --frame\r\n\
            Content-Type: image/jpeg\r\n\
            Content-Length: 3\r\n\
            \r\n\
            abc\r\n\
            --frame  \r\n\
            Content-Type: image/png\r\n\
            \r\n\
            xy\r\n\
            --frame--\r\n");
        conn.handshake(&request()).unwrap();
        let boundary = conn.boundary().unwrap().to_vec();
        assert_eq!(boundary, b"frame");

        let part = conn.next_part(&boundary).unwrap().unwrap();
        assert_eq!(part.content_type, b"image/jpeg");
        assert_eq!(conn.content_length(), Some(3));
        let mut body = [0u8; 3];
        conn.reader().read_exact(&mut body).unwrap();
        assert_eq!(&body, b"abc");

        let part = conn.next_part(&boundary).unwrap().unwrap();
        assert_eq!(part.content_type, b"image/png");
        assert_eq!(part.content_length(), None);

        assert_eq!(conn.next_part(&boundary).unwrap(), None);
    }

    #[test]
    fn bare_lf_parts() {
        let mut conn = connection(b"HTTP/1.0 200 OK\n\
            Content-Type: multipart/mixed; boundary=frame\n\n\
            --frame\n\
            Content-Type: image/jpeg\n\
            Content-Length: 3\n\n\
            abc\n\
            --frame\r\n\
            Content-Type: text/plain\n\n\
            x\n\
            --frame--");
        conn.handshake(&request()).unwrap();
        let part = conn.next_part(b"frame").unwrap().unwrap();
        assert_eq!(part.content_type, b"image/jpeg");
        assert_eq!(part.content_length(), Some(3));
        let mut body = [0u8; 3];
        conn.reader().read_exact(&mut body).unwrap();
        assert_eq!(&body, b"abc");
        let part = conn.next_part(b"frame").unwrap().unwrap();
        assert_eq!(part.content_type, b"text/plain");
        assert_eq!(conn.next_part(b"frame").unwrap(), None);
    }

    #[test]
    fn reset_before_response() {
        let mut conn = connection(b"");
        assert_matches!(conn.handshake(&request()),
                        Err(Error::ResetBeforeResponse(..)));
    }

    #[test]
    fn not_http() {
        let mut conn = connection(b"SSH-2.0-OpenSSH\r\n");
        assert_matches!(conn.handshake(&request()), Err(Error::NotHttp));
    }

    #[test]
    fn bad_request() {
        let mut conn = connection(b"");
        let mut req = request();
        req.path = "a b".to_string();
        assert_matches!(conn.handshake(&req), Err(Error::Header(..)));
        assert_eq!(conn.into_inner().output, b"");
    }
}
