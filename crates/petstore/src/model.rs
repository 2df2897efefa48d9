//! Pet resource as exchanged with the store.

use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

/// Lifecycle status of a pet in the store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PetStatus {
    /// Listed for adoption.
    Available,
    /// Adoption in progress.
    Pending,
    /// Adopted.
    Sold,
}

impl PetStatus {
    /// Wire value used in bodies and the `status` query parameter.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Available => "available",
            Self::Pending => "pending",
            Self::Sold => "sold",
        }
    }
}

/// A pet. The id is optional on create; the store assigns one if absent.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pet {
    /// Store identifier.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    /// Display name.
    pub name: String,
    /// Current status.
    pub status: PetStatus,
}

impl Pet {
    /// Creates a pet without an id.
    pub fn new(name: impl Into<String>, status: PetStatus) -> Self {
        Self {
            id: None,
            name: name.into(),
            status,
        }
    }

    /// Sets the id.
    #[must_use]
    pub const fn with_id(mut self, id: i64) -> Self {
        self.id = Some(id);
        self
    }

    /// JSON form of the pet, usable as a request body or a match template.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut value = json!({
            "name": self.name,
            "status": self.status.as_str(),
        });
        if let (Some(id), Some(object)) = (self.id, value.as_object_mut()) {
            object.insert("id".to_string(), json!(id));
        }
        value
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_to_json_omits_missing_id() {
        let pet = Pet::new("InvalidPet", PetStatus::Available);
        assert_eq!(
            pet.to_json(),
            json!({"name": "InvalidPet", "status": "available"})
        );
    }

    #[test]
    fn test_to_json_includes_id() {
        let pet = Pet::new("TempPet", PetStatus::Pending).with_id(88888);
        assert_eq!(
            pet.to_json(),
            json!({"id": 88888, "name": "TempPet", "status": "pending"})
        );
    }

    #[test]
    fn test_deserialize_store_payload() {
        let pet: Pet = serde_json::from_value(json!({
            "id": 9999,
            "name": "TestPet",
            "status": "sold",
            "photoUrls": [],
        }))
        .unwrap();
        assert_eq!(pet, Pet::new("TestPet", PetStatus::Sold).with_id(9999));
    }
}
