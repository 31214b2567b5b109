// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Error types for vserver
//!
//! Every router operation returns [`Result`]. Errors carry the page, array
//! name or status code that failed so a broken scrape can be traced back to
//! the router firmware that produced it.

use thiserror::Error;

/// Result type alias for vserver operations
pub type Result<T> = std::result::Result<T, Error>;

/// Main error type for vserver
#[derive(Error, Debug)]
pub enum Error {
    /// HTTP request failed
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// URL parsing failed
    #[error("Invalid URL: {0}")]
    Url(#[from] url::ParseError),

    /// Array literal or output serialization failed
    #[error("Serialization error: {0}")]
    Json(#[from] serde_json::Error),

    /// Extraction pattern failed to compile
    #[error("Pattern error: {0}")]
    Pattern(#[from] regex::Error),

    /// Router answered with something other than 200
    #[error("Unexpected status {status} from {url}")]
    Status { url: String, status: u16 },

    /// Login probe failed
    #[error("Authentication failed: {reason}")]
    Authentication {
        reason: String,
        url: Option<String>,
        status: Option<u16>,
    },

    /// A required script array is not on the page
    #[error("Unable to find {name} on page {page}")]
    MissingArray { name: String, page: u32 },

    /// A script array was found but its body is not a literal list
    #[error("Array {name} is not a literal list: {reason}")]
    MalformedArray { name: String, reason: String },

    /// Scraped values do not have the expected shape
    #[error("Unexpected page shape: {0}")]
    Shape(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// Generic error
    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Create a status error for a URL
    pub fn status(url: impl Into<String>, status: u16) -> Self {
        Error::Status {
            url: url.into(),
            status,
        }
    }

    /// Create an authentication error
    pub fn auth(reason: impl Into<String>) -> Self {
        Error::Authentication {
            reason: reason.into(),
            url: None,
            status: None,
        }
    }

    /// Create an authentication error with the probed URL and status
    pub fn auth_failed(url: impl Into<String>, status: u16) -> Self {
        Error::Authentication {
            reason: format!("router answered {}", status),
            url: Some(url.into()),
            status: Some(status),
        }
    }

    /// Create a missing array error
    pub fn missing_array(name: impl Into<String>, page: u32) -> Self {
        Error::MissingArray {
            name: name.into(),
            page,
        }
    }

    /// Create a shape error
    pub fn shape<S: Into<String>>(msg: S) -> Self {
        Error::Shape(msg.into())
    }

    /// Create a configuration error
    pub fn config<S: Into<String>>(msg: S) -> Self {
        Error::Config(msg.into())
    }

    /// Create a generic error
    pub fn other<S: Into<String>>(msg: S) -> Self {
        Error::Other(msg.into())
    }

    /// Check if the router's page did not match what the scraper expects
    pub fn is_scrape(&self) -> bool {
        matches!(
            self,
            Error::MissingArray { .. } | Error::MalformedArray { .. } | Error::Shape(_)
        )
    }

    /// Get HTTP status code if available
    pub fn status_code(&self) -> Option<u16> {
        match self {
            Error::Status { status, .. } => Some(*status),
            Error::Authentication { status, .. } => *status,
            _ => None,
        }
    }

    /// Get URL if available
    pub fn url(&self) -> Option<&str> {
        match self {
            Error::Status { url, .. } => Some(url),
            Error::Authentication { url: Some(u), .. } => Some(u),
            _ => None,
        }
    }
}
