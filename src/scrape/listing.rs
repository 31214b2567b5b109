// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Virtual server listing page parser

use std::net::Ipv4Addr;

use serde_json::Value;

use super::array::{reshape, value_as_int, value_as_text, ScriptArray};
use crate::error::{Error, Result};
use crate::rules::{Protocol, Rule, RuleStatus};

/// Flat row data, `stride` values per rule
pub const LIST_ARRAY: &str = "virServerListPara";
/// Pagination metadata
pub const PARA_ARRAY: &str = "virServerPara";
/// Protocol labels indexed by `code - 1`
pub const PROTOCOL_ARRAY: &str = "protocolList";

/// Values per row this parser reads: start, end, internal port, ip, protocol, status
pub const RULE_FIELDS: usize = 6;

/// `virServerPara` fields
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageMeta {
    /// Page the router says it rendered
    pub current_page: i64,
    /// Positive while another page follows
    pub next_page: i64,
    /// Rules on this page
    pub rows: usize,
    /// Values per rule in the row array
    pub stride: usize,
    /// Rules per full page
    pub page_size: usize,
}

impl PageMeta {
    /// Read the five leading fields of `virServerPara`
    pub fn from_array(para: &ScriptArray) -> Result<Self> {
        Ok(Self {
            current_page: para.int(0)?,
            next_page: para.int(1)?,
            rows: para.count(2)?,
            stride: para.count(3)?,
            page_size: para.count(4)?,
        })
    }

    /// Whether the walker should request another page
    pub fn has_next(&self) -> bool {
        self.next_page > 0
    }
}

/// One parsed listing page
#[derive(Debug, Clone)]
pub struct ListingPage {
    /// 1-based page number that was requested
    pub page: u32,
    pub meta: PageMeta,
    /// Rules in row order
    pub rules: Vec<Rule>,
    /// Protocol labels as shipped by the page
    pub protocols: Vec<String>,
}

impl ListingPage {
    /// Parse the HTML of listing page `page`.
    ///
    /// All three arrays must be present and `virServerPara` must report
    /// `page` as the current page. Rows are checked field by field; any
    /// mismatch fails the page.
    pub fn parse(html: &str, page: u32) -> Result<Self> {
        let list = ScriptArray::require(html, LIST_ARRAY, page)?;
        let para = ScriptArray::require(html, PARA_ARRAY, page)?;
        let protocol_list = ScriptArray::require(html, PROTOCOL_ARRAY, page)?;

        let meta = PageMeta::from_array(&para)?;
        if meta.current_page != i64::from(page) {
            return Err(Error::shape(format!(
                "requested page {} but {} reports page {}",
                page, PARA_ARRAY, meta.current_page
            )));
        }

        let protocols = protocol_list
            .values()
            .iter()
            .map_while(|v| v.as_str().map(str::to_string))
            .collect();

        let rules = if meta.rows == 0 {
            Vec::new()
        } else {
            parse_rows(&list, &meta, page)?
        };

        Ok(Self {
            page,
            meta,
            rules,
            protocols,
        })
    }

    /// Label the page uses for `protocol`, falling back to the built-in name
    pub fn protocol_label(&self, protocol: Protocol) -> &str {
        self.protocols
            .get(usize::from(protocol.code()) - 1)
            .map(String::as_str)
            .unwrap_or(protocol.as_str())
    }
}

fn parse_rows(list: &ScriptArray, meta: &PageMeta, page: u32) -> Result<Vec<Rule>> {
    if meta.stride < RULE_FIELDS {
        return Err(Error::shape(format!(
            "{} stride {} is shorter than a rule ({} fields)",
            LIST_ARRAY, meta.stride, RULE_FIELDS
        )));
    }

    let records = reshape(list.values(), meta.stride)?;
    if records.len() < meta.rows {
        return Err(Error::shape(format!(
            "page {} announces {} rules but {} holds {}",
            page,
            meta.rows,
            LIST_ARRAY,
            records.len()
        )));
    }

    let page_index = page
        .checked_sub(1)
        .ok_or_else(|| Error::shape("listing pages start at 1"))?;
    let overflow = || Error::shape(format!("rule index overflows on page {}", page));
    let base = (meta.page_size as u64)
        .checked_mul(u64::from(page_index))
        .ok_or_else(overflow)?;

    records
        .iter()
        .take(meta.rows)
        .enumerate()
        .map(|(row, record)| {
            let index = base
                .checked_add(row as u64)
                .and_then(|i| u32::try_from(i).ok())
                .ok_or_else(overflow)?;
            parse_rule(record, index, page)
        })
        .collect()
}

fn parse_rule(record: &[Value], index: u32, page: u32) -> Result<Rule> {
    let field = |i: usize, what: &str| -> Result<i64> {
        value_as_int(&record[i]).ok_or_else(|| {
            Error::shape(format!(
                "rule {} on page {}: {} is not a number: {}",
                index, page, what, record[i]
            ))
        })
    };
    let port = |i: usize, what: &str| -> Result<u16> {
        let n = field(i, what)?;
        u16::try_from(n).map_err(|_| {
            Error::shape(format!("rule {} on page {}: {} {} out of range", index, page, what, n))
        })
    };

    let internal_port = match value_as_text(&record[2]).as_deref().map(str::trim) {
        None | Some("") | Some("0") => None,
        Some(_) => Some(port(2, "internal port")?),
    };

    let ip_text = value_as_text(&record[3]).unwrap_or_default();
    let ip_addr: Ipv4Addr = ip_text.trim().parse().map_err(|_| {
        Error::shape(format!(
            "rule {} on page {}: invalid address {:?}",
            index, page, ip_text
        ))
    })?;

    Ok(Rule {
        index,
        page,
        start_port: port(0, "start port")?,
        end_port: port(1, "end port")?,
        internal_port,
        ip_addr,
        protocol: Protocol::from_code(field(4, "protocol")?)?,
        status: RuleStatus::from_code(field(5, "status")?)?,
    })
}
