extern crate argparse;
extern crate httpfeed;
#[macro_use] extern crate log;
extern crate env_logger;

use std::env;
use std::io::Read;
use std::process::exit;
use std::time::Duration;

use argparse::{ArgumentParser, Parse, Store, StoreTrue};

use httpfeed::{HttpLocation, HttpHeaderParser, HttpMultipartScanner};
use httpfeed::client::{Config, HttpConnection, HttpRequest};


fn blocking_parts(conn: &mut HttpConnection<std::net::TcpStream>,
    boundary: &[u8], count: usize)
{
    for n in 0..count {
        match conn.next_part(boundary) {
            Ok(Some(part)) => {
                println!("part {}: {} ({:?} bytes)", n,
                    String::from_utf8_lossy(&part.content_type),
                    part.content_length());
            }
            Ok(None) => {
                info!("Stream finished");
                return;
            }
            Err(e) => {
                error!("Error reading part: {}", e);
                exit(1);
            }
        }
    }
}

fn incremental_parts(conn: &mut HttpConnection<std::net::TcpStream>,
    boundary: &[u8], count: usize)
{
    let mut chunk = [0u8; 4096];
    let mut scanner = HttpMultipartScanner::new(boundary, false);
    let mut parser = HttpHeaderParser::new(false);
    let mut parts = 0;
    // the body starts right with the first boundary, no line break before
    scanner.feed(b"\n");
    while parts < count {
        let bytes = match conn.reader().read(&mut chunk) {
            Ok(0) => {
                info!("Connection closed");
                return;
            }
            Ok(bytes) => bytes,
            Err(e) => {
                error!("Error reading stream: {}", e);
                exit(1);
            }
        };
        let mut data = &chunk[..bytes];
        while !data.is_empty() && parts < count {
            if !scanner.is_done() {
                data = scanner.feed(data);
                continue;
            }
            data = parser.feed(data);
            if parser.is_done() {
                if parser.has_error() {
                    warn!("Bad part headers: {:?}", parser.errors());
                }
                println!("part {}: {} ({:?} bytes)", parts,
                    parser.content_type()
                        .map(|x| String::from_utf8_lossy(&x).into_owned())
                        .unwrap_or_else(String::new),
                    parser.content_length());
                parts += 1;
                scanner.reset(boundary, false);
                parser.reset(false);
            }
        }
    }
}

fn main() {
    let mut url = String::new();
    let mut count = 10usize;
    let mut timeout = 5u64;
    let mut incremental = false;
    {
        let mut ap = ArgumentParser::new();
        ap.set_description("Connect to a multipart HTTP stream (MJPEG \
            camera or alike) and print headers of the parts");
        ap.refer(&mut url)
           .add_argument("url", Store, "Url of the stream")
           .required();
        ap.refer(&mut count)
           .add_option(&["-n", "--count"], Parse,
            "Number of parts to print (default 10)");
        ap.refer(&mut timeout)
           .add_option(&["-t", "--timeout"], Parse,
            "Connect and read timeout in seconds (default 5)");
        ap.refer(&mut incremental)
           .add_option(&["--incremental"], StoreTrue,
            "Use feed-based parsers instead of blocking reads");
        ap.parse_args_or_exit();
    }

    if env::var("RUST_LOG").is_err() {
        env::set_var("RUST_LOG", "info");
    }
    env_logger::init().expect("init logging");

    let loc = match HttpLocation::parse(&url) {
        Ok(loc) => loc,
        Err(e) => {
            error!("Bad url {:?}: {}", url, e);
            exit(2);
        }
    };
    let config = Config::new()
        .connect_timeout(Duration::new(timeout, 0))
        .read_timeout(Some(Duration::new(timeout, 0)))
        .done();
    let req = HttpRequest::new(&loc);
    let mut conn = match HttpConnection::connect(&req, &config) {
        Ok(conn) => conn,
        Err(e) => {
            error!("Can't connect to {}:{}: {}", req.host, req.port, e);
            exit(1);
        }
    };
    if let Err(e) = conn.handshake(&req) {
        error!("Handshake failed: {}", e);
        exit(1);
    }
    let boundary = match conn.boundary() {
        Some(boundary) => boundary.to_vec(),
        None => {
            error!("Not a multipart stream: {:?}",
                String::from_utf8_lossy(conn.content_type()));
            exit(1);
        }
    };
    if incremental {
        incremental_parts(&mut conn, &boundary, count);
    } else {
        blocking_parts(&mut conn, &boundary, count);
    }
}
