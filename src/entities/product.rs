//! Product entity type - stock items filed under a category

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::explorer::Categorized;
use crate::core::identity::EntityId;

/// A stocked product
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Unique identifier
    pub id: EntityId,

    /// Display name
    pub name: String,

    /// Internal reference code
    pub reference: String,

    /// Category this product is filed under
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub category: Option<EntityId>,

    /// Detailed description
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,

    /// Stock keeping unit
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sku: Option<String>,

    /// Barcode (EAN/UPC)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub barcode: Option<String>,

    /// Unit purchase price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub purchase_price: Option<f64>,

    /// Unit selling price
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub selling_price: Option<f64>,

    /// Unit of measure (e.g., "piece", "box", "kg")
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,

    /// Quantity currently in stock
    #[serde(default)]
    pub quantity_in_stock: i64,

    /// Restock warning threshold
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub low_stock_threshold: Option<i64>,

    /// Preferred supplier
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub supplier: Option<EntityId>,

    /// Where the product is stored (aisle, shelf, bin)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub storage_location: Option<String>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Inactive products are hidden from listings by default
    #[serde(default = "default_active")]
    pub is_active: bool,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this product)
    pub author: String,
}

fn default_active() -> bool {
    true
}

impl Entity for Product {
    const PREFIX: &'static str = "PROD";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.name
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl Product {
    /// Create a new product with the given parameters
    pub fn new(
        name: String,
        reference: String,
        category: Option<EntityId>,
        author: String,
    ) -> Self {
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Prod),
            name,
            reference,
            category,
            description: None,
            sku: None,
            barcode: None,
            purchase_price: None,
            selling_price: None,
            unit: None,
            quantity_in_stock: 0,
            low_stock_threshold: None,
            supplier: None,
            storage_location: None,
            notes: None,
            is_active: true,
            created: Utc::now(),
            author,
        }
    }

    /// Whether the stock level sits at or below the restock threshold.
    ///
    /// A product without its own threshold falls back to the given default;
    /// with neither, it is never low.
    pub fn is_low_stock(&self, default_threshold: Option<i64>) -> bool {
        match self.low_stock_threshold.or(default_threshold) {
            Some(threshold) => self.quantity_in_stock <= threshold,
            None => false,
        }
    }

    /// Stock value at purchase price; products without a price count as zero
    pub fn inventory_value(&self) -> f64 {
        self.purchase_price.unwrap_or(0.0) * self.quantity_in_stock as f64
    }

    /// Leaf view for the category explorer
    pub fn leaf(&self) -> ProductLeaf {
        ProductLeaf {
            id: self.id.to_string(),
            name: self.name.clone(),
            reference: self.reference.clone(),
            category_id: self.category.as_ref().map(|c| c.to_string()),
        }
    }
}

/// The explorer-facing projection of a product: just enough to list it as a
/// file under its category folder.
#[derive(Debug, Clone)]
pub struct ProductLeaf {
    pub id: String,
    pub name: String,
    pub reference: String,
    pub category_id: Option<String>,
}

impl Categorized for ProductLeaf {
    fn category_id(&self) -> Option<&str> {
        self.category_id.as_deref()
    }
}
