// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Router session implementation

use std::net::Ipv4Addr;

use url::Url;

use super::config::RouterConfig;
use super::params::{delete_params, listing_params, save_params, Params, SaveTarget};
use crate::error::{Error, Result};
use crate::http::{HttpClient, HttpClientConfig, Request, Response};
use crate::rules::{Rule, RuleSpec, RuleStatus, RuleTable};
use crate::scrape::ListingPage;

/// Authenticated session against one router.
///
/// Requests go out one at a time; every method awaits its response before
/// returning.
pub struct Router {
    config: RouterConfig,
    client: HttpClient,
}

impl Router {
    /// Build a session without contacting the router
    pub fn new(config: RouterConfig) -> Result<Self> {
        config.validate()?;

        let http_config = HttpClientConfig {
            user_agent: config.user_agent.clone(),
            timeout: config.timeout,
            ..Default::default()
        };
        let client = HttpClient::with_config(http_config)?;

        Ok(Self { config, client })
    }

    /// Build a session and log in
    pub async fn connect(config: RouterConfig) -> Result<Self> {
        let router = Self::new(config)?;
        router.login().await?;
        Ok(router)
    }

    /// Build a session from `TPLINK_HOST`/`TPLINK_PASSWORD` and log in
    pub async fn from_env() -> Result<Self> {
        Self::connect(RouterConfig::from_env()?).await
    }

    /// Get router configuration
    pub fn config(&self) -> &RouterConfig {
        &self.config
    }

    /// Get the underlying HTTP client
    pub fn client(&self) -> &HttpClient {
        &self.client
    }

    /// Store the auth cookie and probe the router root.
    ///
    /// Only reachability is checked. A wrong password surfaces later, when
    /// the userRpm pages stop carrying the expected arrays.
    pub async fn login(&self) -> Result<()> {
        let root = Url::parse(&self.config.root_url())?;
        self.client
            .set_cookie_auth(&root, &self.config.user, &self.config.password)?;

        tracing::info!(host = %self.config.host, user = %self.config.user, "Logging in");
        let response = self.client.get(root.as_str()).await?;
        if !response.is_ok() {
            tracing::warn!(status = response.status_code(), "Login probe rejected");
            return Err(Error::auth_failed(root.as_str(), response.status_code()));
        }

        self.client.set_referer(self.config.menu_url());
        Ok(())
    }

    async fn server_request(&self, params: Params) -> Result<Response> {
        let request = Request::get(self.config.server_url())?.query_pairs(params);
        let response = self.client.execute(request).await?;
        if !response.is_ok() {
            tracing::warn!(
                status = response.status_code(),
                url = %response.url,
                "Virtual server page request failed"
            );
        }
        response.require_ok()
    }

    /// Raw HTML of listing page `page`
    pub async fn page_source(&self, page: u32) -> Result<String> {
        let response = self.server_request(listing_params(page)).await?;
        Ok(response.text_lossy())
    }

    /// Fetch and parse listing page `page` (1-based)
    pub async fn fetch_listing_page(&self, page: u32) -> Result<ListingPage> {
        let html = self.page_source(page).await?;
        ListingPage::parse(&html, page)
    }

    /// Walk the listing from page 1 until the router reports no next page.
    ///
    /// Any failed page fails the whole listing.
    pub async fn list_rules(&self) -> Result<RuleTable> {
        let mut rules = Vec::new();

        for page in 1..=self.config.max_pages {
            tracing::info!(page, "Fetching virtual server page");
            let listing = self.fetch_listing_page(page).await?;
            tracing::info!(page, rules = listing.rules.len(), "Parsed virtual server page");

            let has_next = listing.meta.has_next();
            rules.extend(listing.rules);
            if !has_next {
                return Ok(RuleTable::new(rules));
            }
        }

        Err(Error::shape(format!(
            "router still reports a next page after {} pages",
            self.config.max_pages
        )))
    }

    /// Add a rule. Success only means the router answered 200.
    pub async fn add_rule(&self, spec: &RuleSpec) -> Result<()> {
        tracing::info!(ip = %spec.ip_addr, ports = %spec.ports, "Adding virtual server");
        self.server_request(save_params(spec, SaveTarget::New))
            .await
            .map(|_| ())
    }

    /// Overwrite the listed `rule` with `spec`
    pub async fn modify_rule(&self, rule: &Rule, spec: &RuleSpec) -> Result<()> {
        tracing::info!(index = rule.index, page = rule.page, "Modifying virtual server");
        let target = SaveTarget::Existing {
            index: rule.index,
            page: rule.page,
        };
        self.server_request(save_params(spec, target))
            .await
            .map(|_| ())
    }

    /// Enable or disable the listed `rule`, keeping its other fields
    pub async fn set_rule_status(&self, rule: &Rule, status: RuleStatus) -> Result<()> {
        let spec = rule.to_spec().status(status);
        self.modify_rule(rule, &spec).await
    }

    /// Delete the rule at `(index, page)`
    pub async fn delete_rule(&self, index: u32, page: u32) -> Result<()> {
        tracing::info!(index, page, "Deleting virtual server");
        self.server_request(delete_params(index, page))
            .await
            .map(|_| ())
    }

    /// Re-list and delete every rule targeting `ip`.
    ///
    /// Deletes run from the highest index down so the indices of rules not
    /// yet deleted stay valid. Returns the deleted rules.
    pub async fn delete_rules_for(&self, ip: Ipv4Addr) -> Result<Vec<Rule>> {
        let table = self.list_rules().await?;
        let mut doomed: Vec<Rule> = table.for_ip(ip).into_iter().cloned().collect();
        doomed.sort_by(|a, b| b.index.cmp(&a.index));

        for rule in &doomed {
            self.delete_rule(rule.index, rule.page).await?;
        }
        Ok(doomed)
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use super::*;

    #[test]
    fn test_router_creation() {
        let router = Router::new(RouterConfig::new("192.168.0.1", "secret")).unwrap();
        assert_eq!(router.config().user, "admin");
        assert!(router.client().cookie_jar().is_empty());
    }

    #[test]
    fn test_timeout_reaches_client() {
        let config = RouterConfig::new("192.168.0.1", "secret").timeout(Duration::from_secs(5));
        let router = Router::new(config).unwrap();
        assert_eq!(router.client().config().timeout, Duration::from_secs(5));
    }

    #[test]
    fn test_invalid_config_rejected() {
        assert!(Router::new(RouterConfig::new(" ", "secret")).is_err());
    }
}
