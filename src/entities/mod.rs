//! Entity type definitions
//!
//! Stocktake stores the following record types as plain-text YAML files:
//!
//! **Catalog:**
//! - [`Category`] - Hierarchical product classification (parent-linked tree)
//! - [`Product`] - Stock items filed under a category
//!
//! **Purchasing:**
//! - [`Supplier`] - Vendors products are sourced from
//! - [`PurchaseOrder`] - Orders placed with suppliers, with embedded lines

pub mod category;
pub mod product;
pub mod purchase_order;
pub mod supplier;

pub use category::Category;
pub use product::{Product, ProductLeaf};
pub use purchase_order::{OrderLine, PoStatus, PurchaseOrder};
pub use supplier::Supplier;
