// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # vserver - TP-Link virtual server management
//!
//! Manages port forwarding ("virtual server") rules on TP-Link WR886N style
//! routers through their web administration pages.
//!
//! ## Features
//!
//! - Cookie-based Basic auth, the way the router's login page does it
//! - Script array scraping: `var x = new Array(...)` literals parsed as JSON
//! - Paginated listing walk with shape checks on every row
//! - Add, edit, enable/disable and delete rules
//!
//! ## Example
//!
//! ```rust,no_run
//! use std::net::Ipv4Addr;
//! use vserver::{PortRange, Router, RouterConfig, RuleSpec};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let router = Router::connect(RouterConfig::new("192.168.0.1", "password")).await?;
//!
//!     let spec = RuleSpec::new(Ipv4Addr::new(192, 168, 0, 10), PortRange::single(22)?);
//!     router.add_rule(&spec).await?;
//!
//!     for rule in router.list_rules().await?.rules() {
//!         println!("{}", rule);
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod error;
pub mod http;
pub mod router;
pub mod rules;
pub mod scrape;

// Re-exports for convenience

// Errors
pub use error::{Error, Result};

// HTTP
pub use http::{Cookie, CookieJar, HttpClient, HttpClientConfig, Request, Response};

// Router
pub use router::{Router, RouterConfig, SaveTarget};

// Rules
pub use rules::{PortRange, Protocol, Rule, RuleSpec, RuleStatus, RuleTable};

// Scraping
pub use scrape::{extract_array, reshape, scan_arrays, ListingPage, PageMeta, ScriptArray};

/// vserver version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
