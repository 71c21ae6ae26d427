extern crate httpfeed;
#[macro_use] extern crate proptest;

use proptest::prelude::*;

use httpfeed::{HttpHeaderParser, HeaderError};


const MESSAGE: &'static [u8] = b"GET /video HTTP/1.1\r\n\
    Host: example.com\r\n\
    Content-Type: multipart/x-mixed-replace;\r\n\
    \t boundary=frame\r\n\
    X-Empty:\r\n\
    \r\n\
    body";

fn value(p: &HttpHeaderParser, name: &str) -> Option<String> {
    p.header_str(name).map(|x| x.into_owned())
}

fn check_message(p: &HttpHeaderParser) {
    assert!(p.is_done());
    assert!(!p.has_error());
    assert_eq!(p.start_line(), b"GET /video HTTP/1.1");
    assert_eq!(value(p, "Host"), Some("example.com".into()));
    assert_eq!(value(p, "Content-Type"),
        Some("multipart/x-mixed-replace; boundary=frame".into()));
    assert_eq!(value(p, "X-Empty"), Some("".into()));
    assert_eq!(value(p, "host"), None);
}

#[test]
fn whole() {
    let mut p = HttpHeaderParser::new(true);
    assert_eq!(p.feed(MESSAGE), b"body");
    check_message(&p);
}

#[test]
fn every_split_point() {
    for split in 0..MESSAGE.len()+1 {
        let mut p = HttpHeaderParser::new(true);
        let mut rest = Vec::new();
        rest.extend_from_slice(p.feed(&MESSAGE[..split]));
        rest.extend_from_slice(p.feed(&MESSAGE[split..]));
        assert_eq!(rest, b"body", "split at {}", split);
        check_message(&p);
    }
}

#[test]
fn byte_by_byte() {
    let mut p = HttpHeaderParser::new(true);
    let mut rest = Vec::new();
    for idx in 0..MESSAGE.len() {
        rest.extend_from_slice(p.feed(&MESSAGE[idx..idx+1]));
    }
    assert_eq!(rest, b"body");
    check_message(&p);
}

#[test]
fn iterate_in_order() {
    let mut p = HttpHeaderParser::new(false);
    p.feed(b"B: 1\r\nA: 2\r\nB: 3\r\n\r\n");
    let all: Vec<_> = p.headers()
        .map(|(k, v)| (k.to_vec(), v.into_owned()))
        .collect();
    assert_eq!(all, vec![
        (b"B".to_vec(), b"1".to_vec()),
        (b"A".to_vec(), b"2".to_vec()),
        (b"B".to_vec(), b"3".to_vec()),
    ]);
    assert_eq!(p.len(), 3);
    assert_eq!(value(&p, "B"), Some("1".into()));
}

#[test]
fn errors_do_not_stop_parsing() {
    let mut p = HttpHeaderParser::new(true);
    assert_eq!(p.feed(b"GET / HTTP/1.1\r\n\
        Field : Value\r\n\
        Good: yes\r\n\r\nrest"), b"rest");
    assert!(p.is_done());
    assert!(p.has_error());
    assert_eq!(p.errors(),
               &[HeaderError::WhitespaceBeforeColon { line: 2 }]);
    assert_eq!(value(&p, "Good"), Some("yes".into()));
    assert_eq!(value(&p, "Field"), None);
}

#[test]
fn reset_between_messages() {
    let mut p = HttpHeaderParser::new(false);
    p.feed(b"Field1: Value1\r\n\r\n");
    assert!(p.is_done());
    p.reset(false);
    assert!(!p.is_done());
    p.feed(b"Field2: Value2\r\n\r\n");
    assert_eq!(value(&p, "Field1"), None);
    assert_eq!(value(&p, "Field2"), Some("Value2".into()));
}

#[test]
fn chained_parts() {
    // Feeding the remainder of one message into the next parser
    let data = b"A: 1\r\n\r\nB: 2\r\n\r\ntail";
    let mut first = HttpHeaderParser::new(false);
    let mut second = HttpHeaderParser::new(false);
    let rest = first.feed(data);
    let rest = second.feed(rest);
    assert_eq!(rest, b"tail");
    assert_eq!(value(&first, "A"), Some("1".into()));
    assert_eq!(value(&first, "B"), None);
    assert_eq!(value(&second, "B"), Some("2".into()));
}

fn split_points(len: usize) -> BoxedStrategy<Vec<usize>> {
    prop::collection::vec(0..len+1, 0..8)
        .prop_map(|mut points| {
            points.sort();
            points
        })
        .boxed()
}

proptest! {
    #[test]
    fn any_chunking_is_the_same(points in split_points(MESSAGE.len())) {
        let mut p = HttpHeaderParser::new(true);
        let mut rest = Vec::new();
        let mut prev = 0;
        for &point in points.iter().chain(Some(&MESSAGE.len())) {
            rest.extend_from_slice(p.feed(&MESSAGE[prev..point]));
            prev = point;
        }
        prop_assert_eq!(&rest[..], &b"body"[..]);
        prop_assert!(p.is_done());
        prop_assert_eq!(value(&p, "Content-Type"),
            Some("multipart/x-mixed-replace; boundary=frame".to_string()));
    }

    #[test]
    fn never_panics(data in prop::collection::vec(any::<u8>(), 0..256),
                    start in any::<bool>())
    {
        let mut p = HttpHeaderParser::new(start);
        let rest = p.feed(&data).len();
        prop_assert!(rest <= data.len());
        if !p.is_done() {
            prop_assert_eq!(rest, 0);
        }
        for (name, _) in p.headers() {
            prop_assert!(!name.is_empty());
        }
    }
}
