//! Read-only reference data: domains, locales and services.

use serde::{Deserialize, Serialize};

use crate::collection::{Identified, PagedCollection, Resource};

/// Subject-matter domain a project can be filed under.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Domain {
    pub id: u64,
    pub name: String,
}

/// A language/country pair.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Locale {
    pub id: u64,
    pub name: String,
    pub language: String,
    pub country: String,
}

/// A translation service level.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Service {
    pub id: u64,
    pub name: String,
    #[serde(default)]
    pub description: String,
}

macro_rules! plain_resource {
    ($($ty:ty),+) => {$(
        impl Resource for $ty {
            type Record = $ty;

            fn make_item(_collection: &PagedCollection<Self>, record: Self::Record) -> Self {
                record
            }
        }

        impl Identified for $ty {
            fn id(&self) -> u64 {
                self.id
            }
        }
    )+};
}

plain_resource!(Domain, Locale, Service);

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_locale_mapping() {
        let locale: Locale = serde_json::from_value(json!({
            "id": 7,
            "name": "English (UK)",
            "language": "en",
            "country": "GB"
        }))
        .unwrap();
        assert_eq!(
            locale,
            Locale {
                id: 7,
                name: "English (UK)".into(),
                language: "en".into(),
                country: "GB".into(),
            }
        );
    }

    #[test]
    fn test_service_without_description() {
        let service: Service = serde_json::from_value(json!({"id": 1, "name": "Standard"})).unwrap();
        assert_eq!(service.description, "");
    }

    #[test]
    fn test_resource_id_from_object() {
        use crate::collection::ResourceId;

        let domain = Domain {
            id: 42,
            name: "Legal".into(),
        };
        assert_eq!(ResourceId::from(&domain), ResourceId(42));
        assert_eq!(ResourceId::from(42u64), ResourceId(42));
    }
}
