//! Field groups for browsing a discovered record, and search filtering

use crate::error::UnknownFieldGroupError;
use crate::path::FieldPath;
use crate::schema::tree::FieldTree;
use serde::Serialize;
use std::fmt;
use std::str::FromStr;

/// Common e-commerce groupings of record fields
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FieldGroup {
    Basic,
    Media,
    Inventory,
    Variants,
    Metadata,
    /// Anything not claimed by another group
    Custom,
}

impl FieldGroup {
    pub const ALL: [FieldGroup; 6] = [
        FieldGroup::Basic,
        FieldGroup::Media,
        FieldGroup::Inventory,
        FieldGroup::Variants,
        FieldGroup::Metadata,
        FieldGroup::Custom,
    ];

    pub fn key(self) -> &'static str {
        match self {
            FieldGroup::Basic => "basic",
            FieldGroup::Media => "media",
            FieldGroup::Inventory => "inventory",
            FieldGroup::Variants => "variants",
            FieldGroup::Metadata => "metadata",
            FieldGroup::Custom => "custom",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            FieldGroup::Basic => "Basic Information",
            FieldGroup::Media => "Media & Assets",
            FieldGroup::Inventory => "Inventory",
            FieldGroup::Variants => "Variants & Options",
            FieldGroup::Metadata => "Metadata",
            FieldGroup::Custom => "Custom Fields",
        }
    }

    pub fn description(self) -> &'static str {
        match self {
            FieldGroup::Basic => "Essential product information",
            FieldGroup::Media => "Product media and downloadable assets",
            FieldGroup::Inventory => "Stock and inventory management",
            FieldGroup::Variants => "Product variations and customizable options",
            FieldGroup::Metadata => "Additional product categorization and metadata",
            FieldGroup::Custom => "Platform-specific custom fields",
        }
    }

    /// Record keys listed under this group
    pub fn members(self) -> &'static [&'static str] {
        match self {
            FieldGroup::Basic => &["id", "name", "description", "price", "sku"],
            FieldGroup::Media => &["images", "videos", "files"],
            FieldGroup::Inventory => &["stock", "quantity", "inventory", "warehouse"],
            FieldGroup::Variants => &["variants", "options", "attributes"],
            FieldGroup::Metadata => &["tags", "categories", "brand", "metadata"],
            FieldGroup::Custom => &[],
        }
    }

    /// Group a record key belongs to
    pub fn of(key: &str) -> FieldGroup {
        FieldGroup::ALL
            .into_iter()
            .find(|group| group.members().contains(&key))
            .unwrap_or(FieldGroup::Custom)
    }

    pub fn contains(self, key: &str) -> bool {
        FieldGroup::of(key) == self
    }
}

impl fmt::Display for FieldGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

impl FromStr for FieldGroup {
    type Err = UnknownFieldGroupError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        FieldGroup::ALL
            .into_iter()
            .find(|group| group.key().eq_ignore_ascii_case(s))
            .ok_or_else(|| UnknownFieldGroupError(s.to_string()))
    }
}

/// Record fields whose key contains `query` (case-insensitive) and that belong
/// to `group`, or to any group when `group` is `None`
pub fn filter_fields<'a>(tree: &'a FieldTree, query: &str, group: Option<FieldGroup>) -> Vec<&'a FieldPath> {
    let query = query.to_lowercase();
    tree.roots()
        .iter()
        .filter(|path| {
            let key = path.root_key();
            let matches_search = key.to_lowercase().contains(&query);
            let matches_group = group.map_or(true, |g| g.contains(key));
            matches_search && matches_group
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::schema::discover_schema;
    use serde_json::json;

    #[test]
    fn test_group_of() {
        assert_eq!(FieldGroup::of("price"), FieldGroup::Basic);
        assert_eq!(FieldGroup::of("images"), FieldGroup::Media);
        assert_eq!(FieldGroup::of("variants"), FieldGroup::Variants);
        assert_eq!(FieldGroup::of("vendor"), FieldGroup::Custom);
        assert!(FieldGroup::Custom.contains("vendor"));
        assert!(!FieldGroup::Custom.contains("id"));
    }

    #[test]
    fn test_parse_group() {
        assert_eq!("media".parse::<FieldGroup>().unwrap(), FieldGroup::Media);
        assert_eq!("Custom".parse::<FieldGroup>().unwrap(), FieldGroup::Custom);
        assert_eq!(
            "misc".parse::<FieldGroup>(),
            Err(UnknownFieldGroupError("misc".to_string()))
        );
    }

    #[test]
    fn test_filter_fields() {
        let tree = discover_schema(&json!({
            "id": 1,
            "name": "Shoe",
            "product_type": "shoes",
            "images": [],
            "variants": [{"sku": "S1"}],
            "vendor": "Kith"
        }))
        .unwrap();

        let keys = |found: Vec<&FieldPath>| found.iter().map(|p| p.to_string()).collect::<Vec<_>>();

        assert_eq!(keys(filter_fields(&tree, "", None)).len(), 6);
        assert_eq!(keys(filter_fields(&tree, "NAME", None)), vec!["name"]);
        assert_eq!(keys(filter_fields(&tree, "", Some(FieldGroup::Basic))), vec!["id", "name"]);
        assert_eq!(keys(filter_fields(&tree, "", Some(FieldGroup::Custom))), vec!["product_type", "vendor"]);
        assert_eq!(keys(filter_fields(&tree, "type", Some(FieldGroup::Basic))), Vec::<String>::new());
    }
}
