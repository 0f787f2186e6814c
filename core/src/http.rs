//! HTTP request and response descriptions as plain data.
//!
//! # Design
//! The `api` module builds `HttpRequest` values and classifies `HttpResponse`
//! values without touching the network. A `Transport` executes the round-trip
//! in between. Keeping both sides as owned data lets the request pipeline be
//! tested without a server.

/// HTTP method for a request. The NED API is read-only.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
}

impl HttpMethod {
    pub fn as_str(&self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
        }
    }
}

/// An HTTP request described as plain data.
///
/// `url` is absolute and carries no query string; `query` holds the ordered
/// parameters, which the transport encodes and appends.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub query: Vec<(String, String)>,
}

impl HttpRequest {
    /// Value of the first header with the given name, compared
    /// case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }

    /// Value of the first query parameter with the given name.
    pub fn query_param(&self, name: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.as_str())
    }
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

fn find_header<'a>(headers: &'a [(String, String)], name: &str) -> Option<&'a str> {
    headers
        .iter()
        .find(|(key, _)| key.eq_ignore_ascii_case(name))
        .map(|(_, value)| value.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn header_lookup_ignores_case() {
        let response = HttpResponse {
            status: 200,
            headers: vec![("Content-Type".to_string(), "application/ld+json".to_string())],
            body: String::new(),
        };
        assert_eq!(response.header("content-type"), Some("application/ld+json"));
        assert_eq!(response.header("x-missing"), None);
    }

    #[test]
    fn query_param_lookup_is_exact() {
        let request = HttpRequest {
            method: HttpMethod::Get,
            url: "https://api.ned.nl/v1/types".to_string(),
            headers: Vec::new(),
            query: vec![("itemsPerPage".to_string(), "100".to_string())],
        };
        assert_eq!(request.query_param("itemsPerPage"), Some("100"));
        assert_eq!(request.query_param("itemsperpage"), None);
    }
}
