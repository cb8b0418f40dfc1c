//! Per-field presentation info
//!
//! Type labels, descriptions of well-known product fields, and string format
//! detection on the sample value.

use crate::path::FieldPath;
use once_cell::sync::Lazy;
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::fmt;

static ISO_DATETIME_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^\d{4}-\d{2}-\d{2}T\d{2}:\d{2}:\d{2}(.\d+)?(Z|[+-]\d{2}:\d{2})?$").unwrap()
});

static ISO_DATE_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{4}-\d{2}-\d{2}$").unwrap());

static ISO_TIME_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^\d{2}:\d{2}:\d{2}(.\d+)?$").unwrap());

static EMAIL_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$").unwrap()
});

static UUID_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^[0-9a-f]{8}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{4}-[0-9a-f]{12}$").unwrap()
});

static IPV4_REGEX: Lazy<Regex> = Lazy::new(|| Regex::new(r"^(\d{1,3}\.){3}\d{1,3}$").unwrap());

static IPV6_REGEX: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"^(([0-9a-fA-F]{1,4}:){7}[0-9a-fA-F]{1,4}|([0-9a-fA-F]{1,4}:){1,7}:|([0-9a-fA-F]{1,4}:){1,6}:[0-9a-fA-F]{1,4})$").unwrap()
});

/// Recognised shape of a string sample value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "kebab-case")]
pub enum StringFormat {
    Uri,
    Date,
    DateTime,
    Time,
    Email,
    Uuid,
    Ipv4,
    Ipv6,
}

impl StringFormat {
    pub fn as_str(self) -> &'static str {
        match self {
            StringFormat::Uri => "uri",
            StringFormat::Date => "date",
            StringFormat::DateTime => "date-time",
            StringFormat::Time => "time",
            StringFormat::Email => "email",
            StringFormat::Uuid => "uuid",
            StringFormat::Ipv4 => "ipv4",
            StringFormat::Ipv6 => "ipv6",
        }
    }

    /// Detect the format of a string, cheapest checks first
    pub fn detect(value: &str) -> Option<StringFormat> {
        let len = value.len();
        if len == 0 {
            return None;
        }

        if len > 6
            && (value.starts_with("http://")
                || value.starts_with("https://")
                || value.starts_with("ftp://")
                || value.starts_with("file://"))
        {
            return Some(StringFormat::Uri);
        }

        let bytes = value.as_bytes();

        if len == 10 && bytes[4] == b'-' && bytes[7] == b'-' && ISO_DATE_REGEX.is_match(value) {
            return Some(StringFormat::Date);
        }

        if len > 5 && len < 255 && value.contains('@') && EMAIL_REGEX.is_match(value) {
            return Some(StringFormat::Email);
        }

        if len == 36 && bytes[8] == b'-' && UUID_REGEX.is_match(&value.to_lowercase()) {
            return Some(StringFormat::Uuid);
        }

        if len >= 19 && bytes[10] == b'T' && ISO_DATETIME_REGEX.is_match(value) {
            return Some(StringFormat::DateTime);
        }

        if len >= 8 && value.contains(':') && ISO_TIME_REGEX.is_match(value) {
            return Some(StringFormat::Time);
        }

        if len < 16 && value.contains('.') && is_ipv4(value) {
            return Some(StringFormat::Ipv4);
        }

        if value.contains(':') && IPV6_REGEX.is_match(value) {
            return Some(StringFormat::Ipv6);
        }

        None
    }
}

impl fmt::Display for StringFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

fn is_ipv4(s: &str) -> bool {
    IPV4_REGEX.is_match(s) && s.split('.').all(|part| part.parse::<u8>().is_ok())
}

/// JSON type name of a value as shown next to a field
pub fn type_label(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Description for well-known product fields and the synthetic array paths
pub fn describe_field(path: &FieldPath) -> Option<&'static str> {
    if path.is_all_items() {
        return Some("Select all items in this array");
    }
    if path.is_element_field() {
        return Some("Fields from the first item in this array");
    }
    if !path.is_top_level() {
        return None;
    }

    match path.root_key() {
        "id" => Some("Unique identifier for the product"),
        "name" => Some("Product name or title"),
        "description" => Some("Detailed product description"),
        "price" => Some("Product price in the store's currency"),
        "images" => Some("Array of product image URLs"),
        "variants" => Some("Product variations (e.g., size, color)"),
        "categories" => Some("Product categories or collections"),
        "tags" => Some("Product tags for filtering and search"),
        "metadata" => Some("Additional custom metadata"),
        _ => None,
    }
}

/// What the sample told us about one field
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldInfo {
    #[serde(rename = "type")]
    pub type_label: &'static str,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<&'static str>,

    #[serde(skip_serializing_if = "Option::is_none")]
    pub format: Option<StringFormat>,
}

impl FieldInfo {
    pub fn describe(path: &FieldPath, value: &Value) -> Self {
        let format = match value {
            Value::String(s) => StringFormat::detect(s),
            _ => None,
        };

        FieldInfo {
            type_label: type_label(value),
            description: describe_field(path),
            format,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_detect_format() {
        assert_eq!(StringFormat::detect("https://cdn.example.com/a.png"), Some(StringFormat::Uri));
        assert_eq!(StringFormat::detect("2021-01-01"), Some(StringFormat::Date));
        assert_eq!(StringFormat::detect("2021-01-01T10:00:00Z"), Some(StringFormat::DateTime));
        assert_eq!(StringFormat::detect("test@example.com"), Some(StringFormat::Email));
        assert_eq!(
            StringFormat::detect("550e8400-e29b-41d4-a716-446655440000"),
            Some(StringFormat::Uuid)
        );
        assert_eq!(StringFormat::detect("192.168.1.1"), Some(StringFormat::Ipv4));
        assert_eq!(StringFormat::detect("999.1.1.1"), None);
        assert_eq!(StringFormat::detect("Shoe"), None);
        assert_eq!(StringFormat::detect(""), None);
    }

    #[test]
    fn test_describe_well_known_fields() {
        let variants = FieldPath::root("variants");
        assert_eq!(describe_field(&FieldPath::root("id")), Some("Unique identifier for the product"));
        assert_eq!(describe_field(&variants.all_items()), Some("Select all items in this array"));
        assert_eq!(
            describe_field(&variants.element("id")),
            Some("Fields from the first item in this array")
        );
        assert_eq!(describe_field(&FieldPath::root("metadata").child("id")), None);
        assert_eq!(describe_field(&FieldPath::root("vendor")), None);
    }

    #[test]
    fn test_field_info() {
        let info = FieldInfo::describe(&FieldPath::root("created_at"), &json!("2024-03-01"));
        assert_eq!(info.type_label, "string");
        assert_eq!(info.format, Some(StringFormat::Date));
        assert_eq!(info.description, None);

        let info = FieldInfo::describe(&FieldPath::root("price"), &json!(19.99));
        assert_eq!(info.type_label, "number");
        assert_eq!(info.format, None);

        assert_eq!(type_label(&json!(null)), "null");
        assert_eq!(type_label(&json!([1])), "array");
    }
}
