use client::auth::basic_auth;
use location::HttpLocation;
use uri::escape_into;


/// Everything needed to send a `GET` request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub host: String,
    pub port: u16,
    /// Base64-encoded `user:password`, if the location has a user
    pub auth: Option<String>,
    /// Escaped path and query, without the leading slash
    pub path: String,
}

/// Appends `?k=v&...`, with `unique` only the first of equal keys is sent
fn push_query(path: &mut String, groups: &[&[(String, String)]],
    unique: bool)
{
    let mut seen = Vec::<&str>::new();
    let mut first = true;
    for &(ref key, ref value) in groups.iter().flat_map(|g| g.iter()) {
        if unique {
            if seen.contains(&&key[..]) {
                continue;
            }
            seen.push(key);
        }
        path.push(if first { '?' } else { '&' });
        first = false;
        escape_into(key.as_bytes(), path, false);
        if !value.is_empty() {
            path.push('=');
            escape_into(value.as_bytes(), path, false);
        }
    }
}

impl HttpRequest {
    fn build(loc: &HttpLocation, path: String) -> HttpRequest {
        let auth = if loc.user.is_empty() {
            None
        } else {
            Some(basic_auth(&loc.user, &loc.password))
        };
        HttpRequest {
            host: loc.host.clone(),
            port: loc.port,
            auth: auth,
            path: path,
        }
    }

    /// Request for the path and query parameters of the location
    ///
    /// Parameters are sent as they are in the url, duplicates included.
    pub fn new(loc: &HttpLocation) -> HttpRequest {
        let mut path = loc.path.clone();
        push_query(&mut path, &[&loc.params[..]], false);
        HttpRequest::build(loc, path)
    }

    /// Request for the location with extra query parameters appended
    ///
    /// If a parameter name occurs multiple times (either in location or in
    /// `extra`) only the first one is sent.
    pub fn with_params(loc: &HttpLocation, extra: &[(String, String)])
        -> HttpRequest
    {
        let mut path = loc.path.clone();
        push_query(&mut path, &[&loc.params[..], extra], true);
        HttpRequest::build(loc, path)
    }

    /// Request for the host of the location but another path
    ///
    /// The `path` must be escaped already and it may include a query.
    /// Leading slash is optional. Parameters of the location are not sent.
    pub fn with_path(loc: &HttpLocation, path: &str) -> HttpRequest {
        let path = if path.starts_with('/') { &path[1..] } else { path };
        HttpRequest::build(loc, path.to_string())
    }

    /// Request for another path on the same host with query parameters
    pub fn with_path_params(loc: &HttpLocation, path: &str,
        params: &[(String, String)])
        -> HttpRequest
    {
        let path = if path.starts_with('/') { &path[1..] } else { path };
        let mut path = path.to_string();
        push_query(&mut path, &[params], false);
        HttpRequest::build(loc, path)
    }
}

#[cfg(test)]
mod test {
    use location::HttpLocation;
    use super::HttpRequest;

    fn loc(url: &str) -> HttpLocation {
        HttpLocation::parse(url).unwrap()
    }

    fn params(items: &[(&str, &str)]) -> Vec<(String, String)> {
        items.iter().map(|&(k, v)| (k.to_string(), v.to_string())).collect()
    }

    #[test]
    fn plain() {
        let req = HttpRequest::new(&loc("http://cam.local:8080/video"));
        assert_eq!(req.host, "cam.local");
        assert_eq!(req.port, 8080);
        assert_eq!(req.auth, None);
        assert_eq!(req.path, "video");
    }

    #[test]
    fn query_is_reescaped() {
        let req = HttpRequest::new(
            &loc("http://h/video?name=a+b&flag&x=%2F"));
        assert_eq!(req.path, "video?name=a%20b&flag&x=%2F");
    }

    #[test]
    fn duplicate_keys_kept() {
        let req = HttpRequest::new(&loc("http://cam/v?cam=1&cam=2"));
        assert_eq!(req.path, "v?cam=1&cam=2");
    }

    #[test]
    fn auth() {
        let req = HttpRequest::new(&loc("http://user:pass@h/"));
        assert_eq!(req.auth, Some("dXNlcjpwYXNz".to_string()));
        let req = HttpRequest::new(&loc("http://:pass@h/"));
        assert_eq!(req.auth, None);
    }

    #[test]
    fn extra_params() {
        let req = HttpRequest::with_params(&loc("http://h/v?a=1&b=2&a=3"),
            &params(&[("c", "3"), ("b", "x"), ("d", "")]));
        assert_eq!(req.path, "v?a=1&b=2&c=3&d");
    }

    #[test]
    fn explicit_path() {
        let l = loc("http://u:p@h:81/v?a=1");
        let req = HttpRequest::with_path(&l, "/snapshot.jpg?q=1");
        assert_eq!(req.path, "snapshot.jpg?q=1");
        assert_eq!(req.port, 81);
        assert!(req.auth.is_some());
        let req = HttpRequest::with_path_params(&l, "snap",
            &params(&[("q", "a b"), ("q", "c")]));
        assert_eq!(req.path, "snap?q=a%20b&q=c");
    }
}
