// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Query parameters for the virtual server page

use crate::http::quote;
use crate::rules::RuleSpec;

/// Label of the router's save button; the firmware only checks that `Save` is present
pub const SAVE_LABEL: &str = "保 存";

/// Ordered query parameters
pub type Params = Vec<(&'static str, String)>;

/// Whether a save creates a rule or overwrites a listed one
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveTarget {
    New,
    Existing { index: u32, page: u32 },
}

/// Parameters requesting one listing page
pub fn listing_params(page: u32) -> Params {
    vec![("Page", page.to_string())]
}

/// Parameters of an add or edit
pub fn save_params(spec: &RuleSpec, target: SaveTarget) -> Params {
    let (changed, page, sel_index) = match target {
        SaveTarget::New => (0, 0, 0),
        SaveTarget::Existing { index, page } => (1, page, index),
    };

    vec![
        ("ExPort", spec.ports.to_string()),
        (
            "InPort",
            spec.internal_port.map(|p| p.to_string()).unwrap_or_default(),
        ),
        ("Ip", spec.ip_addr.to_string()),
        ("Protocol", spec.protocol.code().to_string()),
        ("State", spec.status.code().to_string()),
        ("Commonport", "0".to_string()),
        ("Changed", changed.to_string()),
        ("Page", page.to_string()),
        ("SelIndex", sel_index.to_string()),
        ("curpage", "1".to_string()),
        ("Save", quote(SAVE_LABEL)),
    ]
}

/// Parameters deleting the rule at `(index, page)`
pub fn delete_params(index: u32, page: u32) -> Params {
    vec![("Del", index.to_string()), ("Page", page.to_string())]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::{PortRange, Protocol, RuleStatus};
    use std::net::Ipv4Addr;

    fn lookup<'a>(params: &'a Params, name: &str) -> &'a str {
        params
            .iter()
            .find(|(k, _)| *k == name)
            .map(|(_, v)| v.as_str())
            .unwrap()
    }

    #[test]
    fn test_new_single_port() {
        let spec = RuleSpec::new(Ipv4Addr::new(192, 168, 0, 254), PortRange::single(5).unwrap());
        let params = save_params(&spec, SaveTarget::New);

        assert_eq!(lookup(&params, "ExPort"), "5");
        assert_eq!(lookup(&params, "InPort"), "");
        assert_eq!(lookup(&params, "Ip"), "192.168.0.254");
        assert_eq!(lookup(&params, "Protocol"), "1");
        assert_eq!(lookup(&params, "State"), "1");
        assert_eq!(lookup(&params, "Changed"), "0");
        assert_eq!(lookup(&params, "Page"), "0");
        assert_eq!(lookup(&params, "SelIndex"), "0");
        assert_eq!(lookup(&params, "Save"), "%E4%BF%9D%20%E5%AD%98");
    }

    #[test]
    fn test_edit_ranged_rule() {
        let spec = RuleSpec::new(Ipv4Addr::new(10, 0, 0, 2), PortRange::new(8000, 8080).unwrap())
            .internal_port(80)
            .protocol(Protocol::Udp)
            .status(RuleStatus::Disabled);
        let params = save_params(&spec, SaveTarget::Existing { index: 9, page: 2 });

        assert_eq!(lookup(&params, "ExPort"), "8000-8080");
        assert_eq!(lookup(&params, "InPort"), "80");
        assert_eq!(lookup(&params, "Protocol"), "3");
        assert_eq!(lookup(&params, "State"), "0");
        assert_eq!(lookup(&params, "Changed"), "1");
        assert_eq!(lookup(&params, "Page"), "2");
        assert_eq!(lookup(&params, "SelIndex"), "9");
    }

    #[test]
    fn test_param_order() {
        let spec = RuleSpec::new(Ipv4Addr::new(10, 0, 0, 2), PortRange::single(22).unwrap());
        let names: Vec<_> = save_params(&spec, SaveTarget::New)
            .into_iter()
            .map(|(k, _)| k)
            .collect();
        assert_eq!(
            names,
            vec![
                "ExPort", "InPort", "Ip", "Protocol", "State", "Commonport", "Changed", "Page",
                "SelIndex", "curpage", "Save"
            ]
        );
    }

    #[test]
    fn test_delete_params() {
        assert_eq!(
            delete_params(4, 1),
            vec![("Del", "4".to_string()), ("Page", "1".to_string())]
        );
    }
}
