//! Migration profile: the configuration surface of the transformer.
//!
//! Everything the original migration hardcoded is an explicit knob here: the
//! source-to-target header rules, the destination column names the merge
//! reads and writes, the default shipping category and inventory label, and
//! the master-SKU prefix length. A profile can be loaded from a YAML file
//! where any subset of fields overrides the built-in Shopify-to-Spree
//! defaults.

use std::{fs::File, io::BufReader, path::Path};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

/// One header rewrite rule. `pattern` matches either by exact string
/// equality or as an unanchored regex against the source header; rules are
/// tried in declaration order and the first match wins.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct HeaderRule {
    pub pattern: String,
    pub target: String,
}

impl HeaderRule {
    fn new(pattern: &str, target: &str) -> Self {
        Self {
            pattern: pattern.to_string(),
            target: target.to_string(),
        }
    }
}

/// Names of the columns the merge stage resolves at runtime. All lookups go
/// by name against the current headers, so a destination schema drift is a
/// profile edit rather than a code change.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ColumnNames {
    pub published: String,
    pub handle: String,
    pub sku: String,
    pub price: String,
    pub shipping_category: String,
    pub variants: String,
    pub variant_sku: String,
    pub variant_price: String,
    pub stock_items: String,
    pub taxons: String,
}

impl Default for ColumnNames {
    fn default() -> Self {
        Self {
            published: "Published".to_string(),
            handle: "Handle".to_string(),
            sku: "SKU".to_string(),
            price: "Price".to_string(),
            shipping_category: "Shipping Category".to_string(),
            variants: "Variants".to_string(),
            variant_sku: "variant_sku".to_string(),
            variant_price: "variant_price".to_string(),
            stock_items: "stock_items".to_string(),
            taxons: "Taxons".to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct Profile {
    pub mappings: Vec<HeaderRule>,
    pub columns: ColumnNames,
    pub default_shipping_category: String,
    pub default_inventory_label: String,
    /// Number of leading characters of the master row's variant SKU used as
    /// the product-level SKU when variants exist. A shared SKU prefix is
    /// assumed to identify the product family; the upstream data offers
    /// nothing better.
    pub sku_prefix_len: usize,
}

impl Default for Profile {
    fn default() -> Self {
        Self {
            mappings: vec![
                HeaderRule::new("Body (HTML)", "Description"),
                HeaderRule::new("Title", "Name"),
                HeaderRule::new("Variant SKU", "variant_sku"),
                HeaderRule::new("Variant Price", "variant_price"),
                HeaderRule::new("Variant Inventory Qty", "stock_items"),
                HeaderRule::new("Image Src", "Images"),
                HeaderRule::new("Tags", "Taxons"),
            ],
            columns: ColumnNames::default(),
            default_shipping_category: "default".to_string(),
            default_inventory_label: "default".to_string(),
            sku_prefix_len: 5,
        }
    }
}

impl Profile {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path).with_context(|| format!("Opening profile file {path:?}"))?;
        let reader = BufReader::new(file);
        serde_yaml::from_reader(reader).with_context(|| format!("Parsing profile YAML {path:?}"))
    }

    /// Loads `path` when given, otherwise returns the built-in defaults.
    pub fn load_or_default(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load(path),
            None => Ok(Self::default()),
        }
    }
}
