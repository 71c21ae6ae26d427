// Byte-level helpers shared by the incremental and the blocking parsers


/// Horizontal whitespace, the only thing allowed to start a folded line
pub fn is_ws(ch: u8) -> bool {
    ch == b' ' || ch == b'\t'
}

pub fn trim_left(val: &[u8]) -> &[u8] {
    let start = val.iter().position(|&x| !x.is_ascii_whitespace())
        .unwrap_or(val.len());
    &val[start..]
}

pub fn trim_right(val: &[u8]) -> &[u8] {
    let end = val.iter().rposition(|&x| !x.is_ascii_whitespace())
        .map(|x| x + 1).unwrap_or(0);
    &val[..end]
}

pub fn trim(val: &[u8]) -> &[u8] {
    trim_left(trim_right(val))
}

pub fn is_content_length(val: &[u8]) -> bool {
    val.eq_ignore_ascii_case(b"Content-Length")
}

pub fn is_content_type(val: &[u8]) -> bool {
    val.eq_ignore_ascii_case(b"Content-Type")
}

/// Parses the value of a `Content-Length` header
pub fn content_length(val: &[u8]) -> Option<u64> {
    let val = trim(val);
    if val.is_empty() || !val.iter().all(|x| x.is_ascii_digit()) {
        return None;
    }
    let mut result: u64 = 0;
    for &ch in val {
        result = result.checked_mul(10)?
            .checked_add((ch - b'0') as u64)?;
    }
    Some(result)
}

/// Returns the `boundary` parameter of a `multipart/*` content type
///
/// Quotes around the boundary are stripped. Returns `None` for other
/// content types or if there is no boundary.
pub fn multipart_boundary(content_type: &[u8]) -> Option<&[u8]> {
    let mut parts = content_type.split(|&x| x == b';');
    let mime = trim(parts.next()?);
    if mime.len() < 10 || !mime[..10].eq_ignore_ascii_case(b"multipart/") {
        return None;
    }
    for param in parts {
        let param = trim(param);
        let eq = match param.iter().position(|&x| x == b'=') {
            Some(eq) => eq,
            None => continue,
        };
        if !trim(&param[..eq]).eq_ignore_ascii_case(b"boundary") {
            continue;
        }
        let value = trim(&param[eq+1..]);
        if value.len() >= 2 &&
            value[0] == b'"' && value[value.len()-1] == b'"'
        {
            return Some(&value[1..value.len()-1]);
        }
        return Some(value);
    }
    None
}
