// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Script data scraping
//!
//! Pulls the `new Array(...)` globals out of router pages and turns the
//! virtual server listing into [`crate::rules::Rule`] records.

mod array;
mod listing;

pub use array::{
    extract_array, reshape, scan_arrays, value_as_int, value_as_text, ArrayDecl, ScriptArray,
};
pub use listing::{
    ListingPage, PageMeta, LIST_ARRAY, PARA_ARRAY, PROTOCOL_ARRAY, RULE_FIELDS,
};
