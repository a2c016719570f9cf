//! Supplier entity type - vendors products are sourced from

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::core::entity::Entity;
use crate::core::identity::EntityId;

/// An approved supplier
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Supplier {
    /// Unique identifier
    pub id: EntityId,

    /// Company name
    pub name: String,

    /// Primary contact person
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub contact_person: Option<String>,

    /// Contact email
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,

    /// Contact phone number
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phone: Option<String>,

    /// Postal address
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,

    /// Free-form notes
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,

    /// Creation timestamp
    pub created: DateTime<Utc>,

    /// Author (who created this supplier)
    pub author: String,
}

impl Entity for Supplier {
    const PREFIX: &'static str = "SUP";

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

impl Supplier {
    /// Create a new supplier with the given name
    pub fn new(name: String, author: String) -> Self {
        Self {
            id: EntityId::new(crate::core::EntityPrefix::Sup),
            name,
            contact_person: None,
            email: None,
            phone: None,
            address: None,
            notes: None,
            created: Utc::now(),
            author,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_supplier_creation() {
        let sup = Supplier::new("Acme Wholesale".to_string(), "test".to_string());

        assert!(sup.id.to_string().starts_with("SUP-"));
        assert_eq!(sup.name, "Acme Wholesale");
        assert!(sup.email.is_none());
    }

    #[test]
    fn test_supplier_roundtrip() {
        let mut sup = Supplier::new("Acme Wholesale".to_string(), "test".to_string());
        sup.email = Some("sales@acme.example".to_string());
        sup.contact_person = Some("Jo Martin".to_string());

        let yaml = serde_yml::to_string(&sup).unwrap();
        let parsed: Supplier = serde_yml::from_str(&yaml).unwrap();

        assert_eq!(sup.id, parsed.id);
        assert_eq!(parsed.email.as_deref(), Some("sales@acme.example"));
        assert_eq!(parsed.contact_person.as_deref(), Some("Jo Martin"));
    }
}
