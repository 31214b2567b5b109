// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Virtual server rule model
//!
//! A [`Rule`] is one row of the router's listing. Its `(index, page)` pair is
//! assigned by the router when the listing is rendered and goes stale on the
//! next add or delete.

use std::fmt;
use std::net::Ipv4Addr;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Forwarded protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum Protocol {
    /// TCP and UDP
    #[default]
    All,
    Tcp,
    Udp,
}

impl Protocol {
    /// Wire code
    pub fn code(self) -> u8 {
        match self {
            Protocol::All => 1,
            Protocol::Tcp => 2,
            Protocol::Udp => 3,
        }
    }

    /// Parse a wire code
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(Protocol::All),
            2 => Ok(Protocol::Tcp),
            3 => Ok(Protocol::Udp),
            other => Err(Error::shape(format!("unknown protocol code {}", other))),
        }
    }

    /// Label used by the router UI
    pub fn as_str(self) -> &'static str {
        match self {
            Protocol::All => "ALL",
            Protocol::Tcp => "TCP",
            Protocol::Udp => "UDP",
        }
    }
}

impl fmt::Display for Protocol {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Protocol {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_ascii_lowercase().as_str() {
            "all" | "1" => Ok(Protocol::All),
            "tcp" | "2" => Ok(Protocol::Tcp),
            "udp" | "3" => Ok(Protocol::Udp),
            _ => Err(Error::other(format!("unknown protocol '{}'", s))),
        }
    }
}

/// Rule state
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum RuleStatus {
    #[default]
    Enabled,
    Disabled,
}

impl RuleStatus {
    /// Wire code
    pub fn code(self) -> u8 {
        match self {
            RuleStatus::Enabled => 1,
            RuleStatus::Disabled => 0,
        }
    }

    /// Parse a wire code
    pub fn from_code(code: i64) -> Result<Self> {
        match code {
            1 => Ok(RuleStatus::Enabled),
            0 => Ok(RuleStatus::Disabled),
            other => Err(Error::shape(format!("unknown rule status {}", other))),
        }
    }
}

impl fmt::Display for RuleStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RuleStatus::Enabled => f.write_str("enabled"),
            RuleStatus::Disabled => f.write_str("disabled"),
        }
    }
}

/// Inclusive external port range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct PortRange {
    pub start: u16,
    pub end: u16,
}

impl PortRange {
    /// Create a range, rejecting `start > end` and port 0
    pub fn new(start: u16, end: u16) -> Result<Self> {
        if start == 0 {
            return Err(Error::other("port 0 is not forwardable"));
        }
        if start > end {
            return Err(Error::other(format!(
                "port range {}-{} is reversed",
                start, end
            )));
        }
        Ok(Self { start, end })
    }

    /// A one-port range
    pub fn single(port: u16) -> Result<Self> {
        Self::new(port, port)
    }

    /// Whether the range covers exactly one port
    pub fn is_single(&self) -> bool {
        self.start == self.end
    }
}

/// `ExPort` encoding: the bare port for one port, `start-end` otherwise
impl fmt::Display for PortRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_single() {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}

impl FromStr for PortRange {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let parse = |p: &str| {
            p.trim()
                .parse::<u16>()
                .map_err(|_| Error::other(format!("invalid port '{}'", p.trim())))
        };

        match s.split_once('-') {
            Some((start, end)) => Self::new(parse(start)?, parse(end)?),
            None => Self::single(parse(s)?),
        }
    }
}

/// Parameters for creating or editing a rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleSpec {
    /// External port range
    pub ports: PortRange,
    /// Internal port; `None` forwards to the same range
    pub internal_port: Option<u16>,
    /// Target host
    pub ip_addr: Ipv4Addr,
    pub protocol: Protocol,
    pub status: RuleStatus,
}

impl RuleSpec {
    /// Forward `ports` to the same ports on `ip_addr`, all protocols, enabled
    pub fn new(ip_addr: Ipv4Addr, ports: PortRange) -> Self {
        Self {
            ports,
            internal_port: None,
            ip_addr,
            protocol: Protocol::default(),
            status: RuleStatus::default(),
        }
    }

    /// Set internal port
    pub fn internal_port(mut self, port: u16) -> Self {
        self.internal_port = Some(port);
        self
    }

    /// Set protocol
    pub fn protocol(mut self, protocol: Protocol) -> Self {
        self.protocol = protocol;
        self
    }

    /// Set status
    pub fn status(mut self, status: RuleStatus) -> Self {
        self.status = status;
        self
    }
}

/// One listed virtual server rule
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rule {
    /// Position across all pages, as used by `Del` and `SelIndex`
    pub index: u32,
    /// 1-based listing page
    pub page: u32,
    pub start_port: u16,
    pub end_port: u16,
    /// `None` when the router shows no internal port
    pub internal_port: Option<u16>,
    pub ip_addr: Ipv4Addr,
    pub protocol: Protocol,
    pub status: RuleStatus,
}

impl Rule {
    /// External range of this rule
    pub fn ports(&self) -> PortRange {
        PortRange {
            start: self.start_port,
            end: self.end_port,
        }
    }

    /// The `RuleSpec` that would recreate this rule
    pub fn to_spec(&self) -> RuleSpec {
        RuleSpec {
            ports: self.ports(),
            internal_port: self.internal_port,
            ip_addr: self.ip_addr,
            protocol: self.protocol,
            status: self.status,
        }
    }
}

impl fmt::Display for Rule {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "#{} (page {}) {} -> {}",
            self.index,
            self.page,
            self.ports(),
            self.ip_addr
        )?;
        if let Some(port) = self.internal_port {
            write!(f, ":{}", port)?;
        }
        write!(f, " {} {}", self.protocol, self.status)
    }
}

/// Result of walking every listing page
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RuleTable {
    rules: Vec<Rule>,
}

impl RuleTable {
    /// Create a table from rules in listing order
    pub fn new(rules: Vec<Rule>) -> Self {
        Self { rules }
    }

    /// Rules in listing order
    pub fn rules(&self) -> &[Rule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Rules targeting `ip`, in listing order
    pub fn for_ip(&self, ip: Ipv4Addr) -> Vec<&Rule> {
        self.rules.iter().filter(|r| r.ip_addr == ip).collect()
    }

    /// Find the rule at `(index, page)`
    pub fn find(&self, index: u32, page: u32) -> Option<&Rule> {
        self.rules
            .iter()
            .find(|r| r.index == index && r.page == page)
    }

    /// Rules grouped by target IP in first-seen order, each group sorted by port range
    pub fn grouped(&self) -> Vec<(Ipv4Addr, Vec<&Rule>)> {
        let mut groups: Vec<(Ipv4Addr, Vec<&Rule>)> = Vec::new();
        for rule in &self.rules {
            match groups.iter_mut().find(|(ip, _)| *ip == rule.ip_addr) {
                Some((_, group)) => group.push(rule),
                None => groups.push((rule.ip_addr, vec![rule])),
            }
        }
        for (_, group) in groups.iter_mut() {
            group.sort_by_key(|r| (r.start_port, r.end_port));
        }
        groups
    }
}

impl IntoIterator for RuleTable {
    type Item = Rule;
    type IntoIter = std::vec::IntoIter<Rule>;

    fn into_iter(self) -> Self::IntoIter {
        self.rules.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rule(index: u32, start: u16, end: u16, ip: [u8; 4]) -> Rule {
        Rule {
            index,
            page: 1,
            start_port: start,
            end_port: end,
            internal_port: None,
            ip_addr: Ipv4Addr::from(ip),
            protocol: Protocol::All,
            status: RuleStatus::Enabled,
        }
    }

    #[test]
    fn test_port_range_encoding() {
        assert_eq!(PortRange::single(80).unwrap().to_string(), "80");
        assert_eq!(PortRange::new(8000, 8080).unwrap().to_string(), "8000-8080");
    }

    #[test]
    fn test_port_range_parse() {
        assert_eq!("22".parse::<PortRange>().unwrap(), PortRange::single(22).unwrap());
        assert_eq!(
            "100-200".parse::<PortRange>().unwrap(),
            PortRange::new(100, 200).unwrap()
        );
        assert!("200-100".parse::<PortRange>().is_err());
        assert!("0".parse::<PortRange>().is_err());
        assert!("http".parse::<PortRange>().is_err());
    }

    #[test]
    fn test_protocol_codes() {
        assert_eq!(Protocol::All.code(), 1);
        assert_eq!(Protocol::Tcp.code(), 2);
        assert_eq!(Protocol::Udp.code(), 3);
        assert_eq!(Protocol::from_code(2).unwrap(), Protocol::Tcp);
        assert!(Protocol::from_code(4).is_err());
        assert_eq!("UDP".parse::<Protocol>().unwrap(), Protocol::Udp);
    }

    #[test]
    fn test_status_codes() {
        assert_eq!(RuleStatus::from_code(0).unwrap(), RuleStatus::Disabled);
        assert_eq!(RuleStatus::Enabled.code(), 1);
        assert!(RuleStatus::from_code(2).is_err());
    }

    #[test]
    fn test_grouped_keeps_first_seen_order() {
        let table = RuleTable::new(vec![
            rule(0, 9000, 9000, [192, 168, 0, 20]),
            rule(1, 443, 443, [192, 168, 0, 10]),
            rule(2, 80, 80, [192, 168, 0, 20]),
        ]);

        let groups = table.grouped();
        assert_eq!(groups.len(), 2);
        assert_eq!(groups[0].0, Ipv4Addr::new(192, 168, 0, 20));
        assert_eq!(groups[0].1[0].start_port, 80);
        assert_eq!(groups[0].1[1].start_port, 9000);
        assert_eq!(groups[1].0, Ipv4Addr::new(192, 168, 0, 10));
    }

    #[test]
    fn test_find_and_for_ip() {
        let table = RuleTable::new(vec![
            rule(0, 22, 22, [10, 0, 0, 1]),
            rule(1, 80, 80, [10, 0, 0, 2]),
        ]);

        assert_eq!(table.find(1, 1).map(|r| r.start_port), Some(80));
        assert!(table.find(1, 2).is_none());
        assert_eq!(table.for_ip(Ipv4Addr::new(10, 0, 0, 1)).len(), 1);
    }

    #[test]
    fn test_rule_display() {
        let mut r = rule(3, 8000, 8010, [192, 168, 0, 254]);
        r.internal_port = Some(80);
        r.protocol = Protocol::Tcp;
        assert_eq!(
            r.to_string(),
            "#3 (page 1) 8000-8010 -> 192.168.0.254:80 TCP enabled"
        );
    }
}
