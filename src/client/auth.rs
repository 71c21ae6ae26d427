const CHARS: &'static[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ\
                              abcdefghijklmnopqrstuvwxyz\
                              0123456789+/";

/// Standard base64 with `=` padding
pub fn base64(data: &[u8]) -> String {
    let mut buf = String::with_capacity((data.len() + 2) / 3 * 4);
    for chunk in data.chunks(3) {
        let n = (chunk[0] as usize) << 16 |
                (*chunk.get(1).unwrap_or(&0) as usize) << 8 |
                (*chunk.get(2).unwrap_or(&0) as usize);
        buf.push(CHARS[(n >> 18) & 63] as char);
        buf.push(CHARS[(n >> 12) & 63] as char);
        if chunk.len() > 1 {
            buf.push(CHARS[(n >> 6) & 63] as char);
        } else {
            buf.push('=');
        }
        if chunk.len() > 2 {
            buf.push(CHARS[n & 63] as char);
        } else {
            buf.push('=');
        }
    }
    buf
}

/// Value of the `Authorization: Basic` header (without the `Basic` word)
pub fn basic_auth(user: &str, password: &str) -> String {
    let mut pair = Vec::with_capacity(user.len() + password.len() + 1);
    pair.extend_from_slice(user.as_bytes());
    pair.push(b':');
    pair.extend_from_slice(password.as_bytes());
    base64(&pair)
}
