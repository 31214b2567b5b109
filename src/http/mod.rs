// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client layer
//!
//! A small reqwest wrapper with its own cookie jar. The router keeps its
//! credentials in a cookie rather than an `Authorization` header, so cookies
//! are handled here instead of by reqwest's store.

mod client;
mod cookie;
mod request;
mod response;

pub use client::{HttpClient, HttpClientConfig};
pub use cookie::{Cookie, CookieJar};
pub use request::Request;
pub use response::Response;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36";

/// Common HTTP headers
pub mod headers {
    pub const ACCEPT: &str = "accept";
    pub const COOKIE: &str = "cookie";
    pub const SET_COOKIE: &str = "set-cookie";
    pub const REFERER: &str = "referer";
}

/// Percent-quote a string the way the router's own scripts do.
///
/// Unreserved characters and `/` pass through, everything else (space
/// included) becomes `%XX` of its UTF-8 bytes.
pub fn quote(s: &str) -> String {
    let mut result = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            'a'..='z' | 'A'..='Z' | '0'..='9' | '-' | '_' | '.' | '~' | '/' => result.push(c),
            _ => {
                let mut buf = [0u8; 4];
                for byte in c.encode_utf8(&mut buf).bytes() {
                    result.push_str(&format!("%{:02X}", byte));
                }
            }
        }
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_quote_basic_token() {
        assert_eq!(quote("Basic YWRtaW46c2VjcmV0"), "Basic%20YWRtaW46c2VjcmV0");
        assert_eq!(quote("cGFzcw=="), "cGFzcw%3D%3D");
    }

    #[test]
    fn test_quote_non_ascii() {
        assert_eq!(quote("保 存"), "%E4%BF%9D%20%E5%AD%98");
        assert_eq!(quote("/a+b"), "/a%2Bb");
    }
}
