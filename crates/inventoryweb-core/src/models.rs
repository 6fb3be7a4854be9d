//! Inventory payload returned by the endpoint
//!
//! The body is a JSON object keyed by account id. Each account carries its
//! EC2 instances and a month-to-date cost. The collector behind the endpoint
//! degrades per account instead of failing the whole response, so an account,
//! its EC2 list or its cost can each be replaced by an error value.

use crate::error::{CoreError, CoreResult};
use rust_decimal::Decimal;
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use serde_json::Value;
use std::str::FromStr;

/// Render any JSON scalar as cell text: null is empty, strings stay as-is,
/// everything else keeps its JSON spelling
fn text_from_value(value: Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(text) => text,
        other => other.to_string(),
    }
}

fn lenient_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<String, D::Error> {
    Value::deserialize(deserializer).map(text_from_value)
}

fn lenient_optional_text<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Option<String>, D::Error> {
    Ok(match Value::deserialize(deserializer)? {
        Value::Null => None,
        other => Some(text_from_value(other)),
    })
}

/// One compute instance row
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct InstanceRecord {
    #[serde(rename = "InstanceId", default, deserialize_with = "lenient_text")]
    pub instance_id: String,
    #[serde(rename = "InstanceType", default, deserialize_with = "lenient_text")]
    pub instance_type: String,
    #[serde(rename = "State", default, deserialize_with = "lenient_text")]
    pub state: String,
    #[serde(rename = "Region", default, deserialize_with = "lenient_text")]
    pub region: String,
}

impl InstanceRecord {
    /// Decode one element of the `EC2` list. Anything that is not an object
    /// becomes a row of empty cells.
    fn from_value(value: Value) -> Self {
        serde_json::from_value(value).unwrap_or_default()
    }
}

/// Value of the `EC2` field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Ec2Inventory {
    Instances(Vec<InstanceRecord>),
    Failed { error: String },
    /// Any other shape; rendered as no instances
    Unrecognized(Value),
}

impl From<Value> for Ec2Inventory {
    fn from(value: Value) -> Self {
        match value {
            Value::Array(items) => {
                Ec2Inventory::Instances(items.into_iter().map(InstanceRecord::from_value).collect())
            }
            Value::Object(map) => {
                let error = match map.get("error") {
                    Some(Value::String(error)) => Some(error.clone()),
                    _ => None,
                };
                match error {
                    Some(error) => Ec2Inventory::Failed { error },
                    None => Ec2Inventory::Unrecognized(Value::Object(map)),
                }
            }
            other => Ec2Inventory::Unrecognized(other),
        }
    }
}

impl<'de> Deserialize<'de> for Ec2Inventory {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

/// Value of the `CostUSD` field
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum CostValue {
    Number(serde_json::Number),
    Text(String),
    /// Booleans, arrays and objects; never an amount
    Other(Value),
}

impl From<Value> for CostValue {
    fn from(value: Value) -> Self {
        match value {
            Value::Number(n) => CostValue::Number(n),
            Value::String(text) => CostValue::Text(text),
            other => CostValue::Other(other),
        }
    }
}

impl<'de> Deserialize<'de> for CostValue {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        Value::deserialize(deserializer).map(Self::from)
    }
}

impl CostValue {
    /// Numeric amount, if the value has one
    pub fn amount(&self) -> Option<CostAmount> {
        match self {
            CostValue::Number(n) => CostAmount::from_literal(&n.to_string()),
            CostValue::Text(text) => parse_leading_amount(text),
            CostValue::Other(_) => None,
        }
    }
}

/// A parsed cost
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CostAmount {
    /// Within `Decimal` range, rounded exactly
    Exact(Decimal),
    /// Beyond `Decimal` range
    Approximate(f64),
}

impl CostAmount {
    fn from_literal(literal: &str) -> Option<Self> {
        Decimal::from_str(literal)
            .or_else(|_| Decimal::from_scientific(literal))
            .map(CostAmount::Exact)
            .ok()
            .or_else(|| {
                literal
                    .parse::<f64>()
                    .ok()
                    .filter(|value| value.is_finite())
                    .map(CostAmount::Approximate)
            })
    }
}

/// Per-account summary
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct AccountSummary {
    #[serde(rename = "EC2", default, skip_serializing_if = "Option::is_none")]
    pub ec2: Option<Ec2Inventory>,
    #[serde(rename = "CostUSD", default, skip_serializing_if = "Option::is_none")]
    pub cost_usd: Option<CostValue>,
    /// Set when the collector could not reach the account at all
    #[serde(default, deserialize_with = "lenient_optional_text", skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl AccountSummary {
    /// Instances in payload order; empty when absent or failed
    pub fn instances(&self) -> &[InstanceRecord] {
        match &self.ec2 {
            Some(Ec2Inventory::Instances(instances)) => instances,
            _ => &[],
        }
    }

    /// Error reported in place of the instance list
    pub fn ec2_error(&self) -> Option<&str> {
        match &self.ec2 {
            Some(Ec2Inventory::Failed { error }) => Some(error),
            _ => None,
        }
    }

    /// Cost as a number; `None` when missing or non-numeric
    pub fn cost_amount(&self) -> Option<CostAmount> {
        self.cost_usd.as_ref().and_then(CostValue::amount)
    }
}

/// One entry of the payload, kept in response order
#[derive(Debug, Clone, PartialEq)]
pub struct AccountEntry {
    pub account_id: String,
    pub summary: AccountSummary,
}

/// Decoded response body
#[derive(Debug, Clone, Default, PartialEq)]
pub struct InventoryPayload {
    accounts: Vec<AccountEntry>,
}

impl InventoryPayload {
    /// Decode a response body
    pub fn from_json(body: &str) -> CoreResult<Self> {
        let value: Value = serde_json::from_str(body)?;
        Self::from_value(value)
    }

    /// Decode an already parsed JSON document
    pub fn from_value(value: Value) -> CoreResult<Self> {
        let Value::Object(map) = value else {
            return Err(CoreError::InvalidPayload {
                message: "Expected a JSON object keyed by account id".to_string(),
            });
        };

        let mut accounts = Vec::with_capacity(map.len());
        for (account_id, entry) in map {
            if !entry.is_object() {
                return Err(CoreError::InvalidPayload {
                    message: format!("Account {}: expected an object", account_id),
                });
            }
            let summary: AccountSummary = serde_json::from_value(entry).map_err(|e| {
                CoreError::InvalidPayload {
                    message: format!("Account {}: {}", account_id, e),
                }
            })?;
            accounts.push(AccountEntry { account_id, summary });
        }

        Ok(Self { accounts })
    }

    pub fn accounts(&self) -> &[AccountEntry] {
        &self.accounts
    }

    pub fn len(&self) -> usize {
        self.accounts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.accounts.is_empty()
    }

    pub fn get(&self, account_id: &str) -> Option<&AccountSummary> {
        self.accounts
            .iter()
            .find(|entry| entry.account_id == account_id)
            .map(|entry| &entry.summary)
    }
}

impl Serialize for InventoryPayload {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.accounts.len()))?;
        for entry in &self.accounts {
            map.serialize_entry(&entry.account_id, &entry.summary)?;
        }
        map.end()
    }
}

/// Parse the longest numeric prefix of `text`
///
/// Accepts leading whitespace, an optional sign, digits with at most one
/// decimal point and an optional exponent. Anything after the number is
/// ignored, so `"12.5 USD"` is 12.5 and `"Cost Error: ..."` is `None`.
pub fn parse_leading_amount(text: &str) -> Option<CostAmount> {
    let s = text.trim_start();
    let bytes = s.as_bytes();
    let mut pos = 0;

    let negative = match bytes.first() {
        Some(b'-') => {
            pos += 1;
            true
        }
        Some(b'+') => {
            pos += 1;
            false
        }
        _ => false,
    };

    let int_start = pos;
    while pos < bytes.len() && bytes[pos].is_ascii_digit() {
        pos += 1;
    }
    let int_part = &s[int_start..pos];

    let mut frac_part = "";
    if pos < bytes.len() && bytes[pos] == b'.' {
        let frac_start = pos + 1;
        let mut frac_end = frac_start;
        while frac_end < bytes.len() && bytes[frac_end].is_ascii_digit() {
            frac_end += 1;
        }
        frac_part = &s[frac_start..frac_end];
        pos = frac_end;
    }

    if int_part.is_empty() && frac_part.is_empty() {
        return None;
    }

    let mut literal = String::new();
    if negative {
        literal.push('-');
    }
    literal.push_str(if int_part.is_empty() { "0" } else { int_part });
    if !frac_part.is_empty() {
        literal.push('.');
        literal.push_str(frac_part);
    }

    if pos < bytes.len() && (bytes[pos] == b'e' || bytes[pos] == b'E') {
        let mut exp_end = pos + 1;
        let exp_negative = exp_end < bytes.len() && bytes[exp_end] == b'-';
        if exp_end < bytes.len() && (bytes[exp_end] == b'+' || bytes[exp_end] == b'-') {
            exp_end += 1;
        }
        let digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > digits_start {
            literal.push('e');
            if exp_negative {
                literal.push('-');
            }
            literal.push_str(&s[digits_start..exp_end]);
        }
    }

    CostAmount::from_literal(&literal)
}
