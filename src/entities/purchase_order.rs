//! Purchase order entity type - orders placed with suppliers

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::EntityId;

/// Purchase order lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[derive(Default)]
pub enum PoStatus {
    #[default]
    Pending,
    Ordered,
    Received,
    Cancelled,
}

impl std::fmt::Display for PoStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PoStatus::Pending => write!(f, "pending"),
            PoStatus::Ordered => write!(f, "ordered"),
            PoStatus::Received => write!(f, "received"),
            PoStatus::Cancelled => write!(f, "cancelled"),
        }
    }
}

impl std::str::FromStr for PoStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "pending" => Ok(PoStatus::Pending),
            "ordered" => Ok(PoStatus::Ordered),
            "received" => Ok(PoStatus::Received),
            "cancelled" => Ok(PoStatus::Cancelled),
            _ => Err(format!(
                "Unknown status: {}. Use pending, ordered, received, or cancelled",
                s
            )),
        }
    }
}

/// One ordered line: so many of one product at a unit price
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderLine {
    /// Ordered product
    pub product: EntityId,

    /// Quantity ordered
    pub quantity: i64,

    /// Agreed unit price
    pub unit_price: f64,
}

impl OrderLine {
    /// Line total (quantity × unit price)
    pub fn total(&self) -> f64 {
        self.quantity as f64 * self.unit_price
    }
}

/// A purchase order with embedded line items
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PurchaseOrder {
    /// Unique identifier
    pub id: EntityId,

    /// Human-facing order number (e.g., "PO-2026-0042")
    pub po_number: String,

    /// Supplier the order is placed with
    pub supplier: EntityId,

    /// When the order was placed
    pub order_date: DateTime<Utc>,

    /// Expected delivery date
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub expected_delivery: Option<NaiveDate>,

    /// Where the order should be delivered
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<String>,

    /// Lifecycle status
    #[serde(default)]
    pub status: PoStatus,

    /// Ordered lines
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub lines: Vec<OrderLine>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this order)
    pub author: String,
}

impl Entity for PurchaseOrder {
    const PREFIX: &'static str = "PO";

    fn id(&self) -> &EntityId {
        &self.id
    }

    fn name(&self) -> &str {
        &self.po_number
    }

    fn created(&self) -> DateTime<Utc> {
        self.created
    }

    fn author(&self) -> &str {
        &self.author
    }
}

impl PurchaseOrder {
    /// Create a new pending purchase order
    pub fn new(po_number: String, supplier: EntityId, author: String) -> Self {
        let now = Utc::now();
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Po),
            po_number,
            supplier,
            order_date: now,
            expected_delivery: None,
            delivery_address: None,
            status: PoStatus::default(),
            lines: Vec::new(),
            notes: None,
            created: now,
            author,
        }
    }

    /// Order total computed from the lines
    pub fn total_amount(&self) -> f64 {
        self.lines.iter().map(OrderLine::total).sum()
    }

    /// Whether the order is still in flight
    pub fn is_open(&self) -> bool {
        matches!(self.status, PoStatus::Pending | PoStatus::Ordered)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::EntityPrefix;

    #[test]
    fn test_po_creation_defaults_pending() {
        let sup = EntityId::new(EntityPrefix::Sup);
        let po = PurchaseOrder::new("PO-2026-0001".to_string(), sup, "test".to_string());

        assert!(po.id.to_string().starts_with("PO-"));
        assert_eq!(po.status, PoStatus::Pending);
        assert!(po.is_open());
        assert_eq!(po.total_amount(), 0.0);
    }

    #[test]
    fn test_po_total_amount_sums_lines() {
        let sup = EntityId::new(EntityPrefix::Sup);
        let mut po = PurchaseOrder::new("PO-2026-0002".to_string(), sup, "test".to_string());
        po.lines.push(OrderLine {
            product: EntityId::new(EntityPrefix::Prod),
            quantity: 10,
            unit_price: 2.5,
        });
        po.lines.push(OrderLine {
            product: EntityId::new(EntityPrefix::Prod),
            quantity: 3,
            unit_price: 10.0,
        });

        assert_eq!(po.total_amount(), 55.0);
    }

    #[test]
    fn test_po_roundtrip() {
        let sup = EntityId::new(EntityPrefix::Sup);
        let mut po = PurchaseOrder::new("PO-2026-0003".to_string(), sup, "test".to_string());
        po.status = PoStatus::Ordered;
        po.lines.push(OrderLine {
            product: EntityId::new(EntityPrefix::Prod),
            quantity: 5,
            unit_price: 4.0,
        });

        let yaml = serde_yml::to_string(&po).unwrap();
        let parsed: PurchaseOrder = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(po.id, parsed.id);
        assert_eq!(parsed.status, PoStatus::Ordered);
        assert_eq!(parsed.total_amount(), 20.0);
    }

    #[test]
    fn test_status_serialization() {
        let sup = EntityId::new(EntityPrefix::Sup);
        let mut po = PurchaseOrder::new("PO-2026-0004".to_string(), sup, "test".to_string());
        po.status = PoStatus::Received;

        let yaml = serde_yml::to_string(&po).unwrap();
        assert!(yaml.contains("status: received"));
        assert!(!po.is_open());
    }

    #[test]
    fn test_status_parse() {
        assert_eq!("ordered".parse::<PoStatus>().unwrap(), PoStatus::Ordered);
        assert!("shipped".parse::<PoStatus>().is_err());
    }
}
