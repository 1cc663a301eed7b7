use serde::{Deserialize, Serialize};
use serde_json::Value;

// ---------------------------------------------------------------------------
// Raw listing (scraper output)
// ---------------------------------------------------------------------------

/// One record as written by the external scraper. Every field is optional;
/// empty strings are stored as `None` so presence checks stay in one place.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawListing {
    pub title: Option<String>,
    pub location: Option<String>,
    pub price: Option<String>,
    pub category: Option<String>,
    pub url: Option<String>,
    pub description: Option<String>,
    pub full_description: Option<String>,
    /// (section key, stringified text) in source order.
    pub structured_content: Vec<(String, String)>,
    pub revenue: Option<String>,
    pub detailed_revenue: Option<String>,
    pub profit_status: Option<String>,
    pub detailed_profit: Option<String>,
    pub employee_count: Option<String>,
    pub financial_details: Vec<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
    pub broker_name: Option<String>,
    pub broker_company: Option<String>,
}

impl RawListing {
    /// Build from an arbitrary JSON value. Fields of an unexpected shape are
    /// treated as absent; a non-object value yields an empty listing.
    pub fn from_value(v: &Value) -> Self {
        let text = |key: &str| v.get(key).and_then(scalar_text);

        let structured_content = v
            .get("structured_content")
            .and_then(|s| s.as_object())
            .map(|map| {
                map.iter()
                    .filter_map(|(key, val)| stringify_block(val).map(|s| (key.clone(), s)))
                    .collect()
            })
            .unwrap_or_default();

        let financial_details = v
            .get("financial_details")
            .and_then(|f| f.as_array())
            .map(|items| items.iter().filter_map(scalar_text).collect())
            .unwrap_or_default();

        Self {
            title: text("title"),
            location: text("location"),
            price: text("price"),
            category: text("category"),
            url: text("url"),
            description: text("description"),
            full_description: text("full_description"),
            structured_content,
            revenue: text("revenue"),
            detailed_revenue: text("detailed_revenue"),
            profit_status: text("profit_status"),
            detailed_profit: text("detailed_profit"),
            employee_count: text("employee_count"),
            financial_details,
            phone: text("phone"),
            email: text("email"),
            broker_name: text("broker_name"),
            broker_company: text("broker_company"),
        }
    }
}

/// Strings pass through, numbers and bools are stringified, everything else is absent.
fn scalar_text(v: &Value) -> Option<String> {
    match v {
        Value::String(s) if !s.is_empty() => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Structured-content values may be nested. Falsy values are dropped,
/// non-string values are rendered as compact JSON.
fn stringify_block(v: &Value) -> Option<String> {
    match v {
        Value::Null | Value::Bool(false) => None,
        Value::String(s) if s.is_empty() => None,
        Value::String(s) => Some(s.clone()),
        Value::Array(a) if a.is_empty() => None,
        Value::Object(o) if o.is_empty() => None,
        other => Some(other.to_string()),
    }
}

// ---------------------------------------------------------------------------
// Normalized listing (API output)
// ---------------------------------------------------------------------------

/// A labeled group of human-readable facts. Field names on the wire match
/// what the client application already reads.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DetailSection {
    #[serde(rename = "infoSummary")]
    pub label: String,
    #[serde(rename = "infoItems")]
    pub items: Vec<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct NormalizedListing {
    pub title: String,
    pub company: String,
    pub location: String,
    pub price: String,
    pub category: String,
    pub industry: String,
    pub link: String,
    pub details: Vec<DetailSection>,
    pub business_name: String,
    pub contact_name: String,
    pub phone_number: String,
}
