// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! `new Array(...)` literal extraction
//!
//! Router pages ship their data as script globals:
//!
//! ```text
//! var virServerPara = new Array(
//! 1, 0, 2, 6, 8,
//! 0,0 );
//! ```
//!
//! The body between the parentheses is parsed as a JSON list, which covers
//! the numbers and double-quoted strings the firmware emits.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::Value;

use crate::error::{Error, Result};

lazy_static! {
    /// Any array declaration; used for page dumps
    static ref ARRAY_DECL: Regex =
        Regex::new(r"(?s)var +([A-Za-z_$][\w$]*) *= *new +Array *\((.*?)\)").unwrap();
}

/// Find `var NAME = new Array(...)` in `src` and parse its body.
///
/// Returns `Ok(None)` when no such declaration exists and
/// [`Error::MalformedArray`] when one exists but is not a literal list.
/// The first declaration wins.
pub fn extract_array(src: &str, name: &str) -> Result<Option<Vec<Value>>> {
    let pattern = format!(
        r"(?s)var +{} *= *new +Array *\((.*?)\)",
        regex::escape(name)
    );
    let re = Regex::new(&pattern)?;

    match re.captures(src) {
        Some(caps) => parse_body(name, &caps[1]).map(Some),
        None => Ok(None),
    }
}

fn parse_body(name: &str, body: &str) -> Result<Vec<Value>> {
    serde_json::from_str(&format!("[{}]", body)).map_err(|e| Error::MalformedArray {
        name: name.to_string(),
        reason: e.to_string(),
    })
}

/// One array declaration found by [`scan_arrays`]
#[derive(Debug, Clone)]
pub struct ArrayDecl {
    pub name: String,
    /// Text between the parentheses
    pub raw: String,
    /// Parsed body, `None` if it is not a literal list
    pub values: Option<Vec<Value>>,
}

/// List every array declaration on a page in source order
pub fn scan_arrays(src: &str) -> Vec<ArrayDecl> {
    ARRAY_DECL
        .captures_iter(src)
        .map(|caps| {
            let name = caps[1].to_string();
            let raw = caps[2].trim().to_string();
            let values = parse_body(&name, &raw).ok();
            ArrayDecl { name, raw, values }
        })
        .collect()
}

/// Slice a flat list into records of `stride` values.
///
/// Trailing values that do not fill a whole record are dropped; the router
/// pads its lists with sentinel zeros.
pub fn reshape(values: &[Value], stride: usize) -> Result<Vec<&[Value]>> {
    if stride == 0 {
        return Err(Error::shape("record stride is 0"));
    }
    Ok(values.chunks_exact(stride).collect())
}

/// Read a scraped value as an integer; numeric strings count
pub fn value_as_int(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().parse().ok(),
        _ => None,
    }
}

/// Read a scraped value as text; numbers are rendered
pub fn value_as_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// A named script array with checked positional access
#[derive(Debug, Clone, PartialEq)]
pub struct ScriptArray {
    name: String,
    values: Vec<Value>,
}

impl ScriptArray {
    /// Wrap already parsed values
    pub fn new(name: impl Into<String>, values: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            values,
        }
    }

    /// Extract `name` from `src`, `Ok(None)` if absent
    pub fn extract(src: &str, name: &str) -> Result<Option<Self>> {
        Ok(extract_array(src, name)?.map(|values| Self::new(name, values)))
    }

    /// Extract `name` from listing page `page`, failing if absent
    pub fn require(src: &str, name: &str, page: u32) -> Result<Self> {
        Self::extract(src, name)?.ok_or_else(|| Error::missing_array(name, page))
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn values(&self) -> &[Value] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Value at `index`
    pub fn get(&self, index: usize) -> Result<&Value> {
        self.values.get(index).ok_or_else(|| {
            Error::shape(format!(
                "{} has {} values, wanted index {}",
                self.name,
                self.values.len(),
                index
            ))
        })
    }

    /// Integer at `index`
    pub fn int(&self, index: usize) -> Result<i64> {
        let value = self.get(index)?;
        value_as_int(value).ok_or_else(|| {
            Error::shape(format!("{}[{}] is not an integer: {}", self.name, index, value))
        })
    }

    /// Non-negative integer at `index` that fits `usize`
    pub fn count(&self, index: usize) -> Result<usize> {
        let n = self.int(index)?;
        usize::try_from(n).map_err(|_| {
            Error::shape(format!("{}[{}] is negative: {}", self.name, index, n))
        })
    }

    /// Text at `index`
    pub fn text(&self, index: usize) -> Result<String> {
        let value = self.get(index)?;
        value_as_text(value).ok_or_else(|| {
            Error::shape(format!("{}[{}] is not text: {}", self.name, index, value))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_extract_simple() {
        let src = r#"<script>var fooArray = new Array(1,2,"a",3);</script>"#;
        let values = extract_array(src, "fooArray").unwrap().unwrap();
        assert_eq!(values, vec![json!(1), json!(2), json!("a"), json!(3)]);
    }

    #[test]
    fn test_extract_missing_is_none() {
        let src = r#"var fooArray = new Array(1,2);"#;
        assert!(extract_array(src, "barArray").unwrap().is_none());
    }

    #[test]
    fn test_extract_multiline() {
        let src = "var virServerPara = new Array(\n1, 0, 2, 6, 8,\n0,0 );\n";
        let values = extract_array(src, "virServerPara").unwrap().unwrap();
        assert_eq!(values.len(), 7);
        assert_eq!(values[3], json!(6));
    }

    #[test]
    fn test_extract_name_is_not_prefix_matched() {
        let src = r#"var virServerListPara = new Array(80); var virServerPara = new Array(1);"#;
        let values = extract_array(src, "virServerPara").unwrap().unwrap();
        assert_eq!(values, vec![json!(1)]);
    }

    #[test]
    fn test_extract_name_is_escaped() {
        let src = r#"var a = new Array(1); var a.b = new Array(2);"#;
        assert!(extract_array(src, "a.").unwrap().is_none());
    }

    #[test]
    fn test_extract_malformed() {
        let src = r#"var fooArray = new Array(1, 'single');"#;
        let err = extract_array(src, "fooArray").unwrap_err();
        assert!(matches!(err, Error::MalformedArray { .. }));
    }

    #[test]
    fn test_extract_empty() {
        let src = "var emptyArray = new Array();";
        assert_eq!(extract_array(src, "emptyArray").unwrap(), Some(vec![]));
    }

    #[test]
    fn test_scan_arrays() {
        let src = r#"
            var protocolList = new Array("ALL","TCP","UDP",0,0);
            var broken = new Array(a, b);
        "#;
        let decls = scan_arrays(src);
        assert_eq!(decls.len(), 2);
        assert_eq!(decls[0].name, "protocolList");
        assert_eq!(decls[0].values.as_ref().map(Vec::len), Some(5));
        assert_eq!(decls[1].name, "broken");
        assert!(decls[1].values.is_none());
        assert_eq!(decls[1].raw, "a, b");
    }

    #[test]
    fn test_reshape_exact() {
        let flat: Vec<Value> = (0..12).map(|i| json!(i)).collect();
        let records = reshape(&flat, 6).unwrap();
        assert_eq!(records.len(), 2);
        assert!(records.iter().all(|r| r.len() == 6));
        assert_eq!(records[1][0], json!(6));
    }

    #[test]
    fn test_reshape_drops_padding() {
        let flat: Vec<Value> = (0..8).map(|i| json!(i)).collect();
        assert_eq!(reshape(&flat, 6).unwrap().len(), 1);
    }

    #[test]
    fn test_reshape_zero_stride() {
        assert!(reshape(&[json!(1)], 0).is_err());
    }

    #[test]
    fn test_value_conversions() {
        assert_eq!(value_as_int(&json!("  80 ")), Some(80));
        assert_eq!(value_as_int(&json!(3.0)), Some(3));
        assert_eq!(value_as_int(&json!("x")), None);
        assert_eq!(value_as_text(&json!(5)).as_deref(), Some("5"));
        assert_eq!(value_as_text(&json!(null)), None);
    }

    #[test]
    fn test_script_array_accessors() {
        let arr = ScriptArray::new("virServerPara", vec![json!(1), json!(-1), json!("x")]);
        assert_eq!(arr.int(0).unwrap(), 1);
        assert!(arr.count(1).is_err());
        assert!(arr.int(2).is_err());
        assert!(arr.get(9).is_err());
        assert_eq!(arr.text(2).unwrap(), "x");
    }

    #[test]
    fn test_script_array_require() {
        let err = ScriptArray::require("", "protocolList", 3).unwrap_err();
        assert!(matches!(err, Error::MissingArray { page: 3, .. }));
    }
}
