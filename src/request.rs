//! Incoming HTTP request type.

use std::fmt;

use bytes::Bytes;
use http::header::{HeaderMap, HeaderName, HeaderValue};
use http::{Extensions, Method, Uri};

use crate::error::Error;

/// An incoming HTTP request as seen by handlers and middleware.
///
/// A thin wrapper over `http::Request<Bytes>`: whatever transport produced
/// the request collects the body first, then hands it over with
/// [`Request::from`]. Middleware may rewrite headers or attach request-scoped
/// values through [`extensions_mut`](Request::extensions_mut) before calling
/// the next handler.
pub struct Request {
    inner: http::Request<Bytes>,
}

impl Request {
    pub fn method(&self) -> &Method { self.inner.method() }
    pub fn uri(&self) -> &Uri { self.inner.uri() }
    pub fn path(&self) -> &str { self.inner.uri().path() }
    pub fn headers(&self) -> &HeaderMap { self.inner.headers() }
    pub fn headers_mut(&mut self) -> &mut HeaderMap { self.inner.headers_mut() }
    pub fn body(&self) -> &[u8] { self.inner.body() }
    pub fn extensions(&self) -> &Extensions { self.inner.extensions() }
    pub fn extensions_mut(&mut self) -> &mut Extensions { self.inner.extensions_mut() }

    /// Case-insensitive header lookup. Returns `None` for values that are
    /// not visible ASCII.
    pub fn header(&self, name: &str) -> Option<&str> {
        self.inner.headers().get(name)?.to_str().ok()
    }

    /// Sets `name` to `value`, replacing any previous values.
    pub fn set_header(&mut self, name: &str, value: &str) -> Result<(), Error> {
        let name = HeaderName::from_bytes(name.as_bytes())?;
        let value = HeaderValue::from_str(value)?;
        self.inner.headers_mut().insert(name, value);
        Ok(())
    }

    pub fn into_inner(self) -> http::Request<Bytes> {
        self.inner
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.inner.fmt(f)
    }
}

impl From<http::Request<Bytes>> for Request {
    fn from(inner: http::Request<Bytes>) -> Self {
        Self { inner }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn get(uri: &str) -> Request {
        http::Request::get(uri).body(Bytes::new()).unwrap().into()
    }

    #[test]
    fn path_ignores_query() {
        let req = get("http://example.com/users/42?full=1");
        assert_eq!(req.path(), "/users/42");
        assert_eq!(req.method(), Method::GET);
    }

    #[test]
    fn header_lookup_is_case_insensitive() {
        let mut req = get("/");
        req.set_header("X-Trace", "abc").unwrap();
        assert_eq!(req.header("x-trace"), Some("abc"));
        assert_eq!(req.header("X-TRACE"), Some("abc"));
    }

    #[test]
    fn set_header_replaces() {
        let mut req = get("/");
        req.set_header("x-n", "1").unwrap();
        req.set_header("x-n", "12").unwrap();
        assert_eq!(req.headers().get_all("x-n").iter().count(), 1);
        assert_eq!(req.header("x-n"), Some("12"));
    }

    #[test]
    fn debug_shows_method_and_uri() {
        let out = format!("{:?}", get("/users/42"));
        assert!(out.contains("GET"), "{out}");
        assert!(out.contains("/users/42"), "{out}");
    }

    #[test]
    fn set_header_rejects_invalid_value() {
        let mut req = get("/");
        assert!(req.set_header("x-n", "line\nbreak").is_err());
        assert!(req.set_header("bad name", "v").is_err());
        assert!(req.headers().is_empty());
    }
}
