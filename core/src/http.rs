//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! Requests and responses are plain data. `WbwClient` builds `HttpRequest`
//! values and parses `HttpResponse` values without touching the network; a
//! [`Transport`](crate::transport::Transport) executes the round-trip in
//! between. Header names are stored lowercase.

/// HTTP method for a request. The consumed API slice only reads and creates.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HttpMethod {
    Get,
    Post,
}

impl HttpMethod {
    pub fn as_str(self) -> &'static str {
        match self {
            HttpMethod::Get => "GET",
            HttpMethod::Post => "POST",
        }
    }
}

/// An HTTP request described as plain data.
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: HttpMethod,
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: Option<String>,
}

impl HttpRequest {
    /// First header value with the given name, compared case-insensitively.
    pub fn header(&self, name: &str) -> Option<&str> {
        find_header(&self.headers, name)
    }
}

/// An HTTP response described as plain data.
///
/// `headers` keeps repeated headers (several `set-cookie` lines) as separate
/// entries.
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

    /// Value of the cookie `name` set by this response, if any.
    ///
    /// Only the `name=value` pair of each `set-cookie` line is inspected;
    /// attributes such as `path` or `HttpOnly` are ignored.
    pub fn cookie(&self, name: &str) -> Option<&str> {
        self.headers
            .iter()
            .filter(|(key, _)| key.eq_ignore_ascii_case("set-cookie"))
            .filter_map(|(_, value)| value.split(';').next())
            .filter_map(|pair| pair.trim().split_once('='))
            .find(|(key, _)| *key == name)
            .map(|(_, value)| value)
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

    fn response_with(headers: &[(&str, &str)]) -> HttpResponse {
        HttpResponse {
            status: 201,
            headers: headers
                .iter()
                .map(|(k, v)| (k.to_string(), v.to_string()))
                .collect(),
            body: String::new(),
        }
    }

    #[test]
    fn cookie_is_found_among_several_set_cookie_lines() {
        let response = response_with(&[
            ("set-cookie", "locale=nl; path=/"),
            ("Set-Cookie", "_wbw_rails_session=abc123; path=/; HttpOnly"),
        ]);
        assert_eq!(response.cookie("_wbw_rails_session"), Some("abc123"));
        assert_eq!(response.cookie("locale"), Some("nl"));
    }

    #[test]
    fn cookie_attributes_are_not_mistaken_for_cookies() {
        let response = response_with(&[("set-cookie", "a=1; path=/")]);
        assert_eq!(response.cookie("path"), None);
    }

    #[test]
    fn missing_cookie_is_none() {
        let response = response_with(&[("content-type", "application/json")]);
        assert_eq!(response.cookie("_wbw_rails_session"), None);
    }

    #[test]
    fn header_lookup_ignores_case() {
        let response = response_with(&[("Content-Type", "application/json")]);
        assert_eq!(response.header("content-type"), Some("application/json"));
    }
}
