//! Additional project charges.

use serde::{Deserialize, Serialize};

use super::pricing::Money;
use crate::collection::{PagedCollection, Resource};

/// An extra line item on a project, such as a rush fee.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Deserialize, Serialize)]
pub struct Charge {
    pub title: String,
    pub value: Money,
}

impl Resource for Charge {
    type Record = Charge;

    fn make_item(_collection: &PagedCollection<Self>, record: Charge) -> Self {
        record
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_charge_mapping() {
        let charge: Charge =
            serde_json::from_value(serde_json::json!({"title": "Charge 1", "value": 111})).unwrap();
        assert_eq!(
            charge,
            Charge {
                title: "Charge 1".into(),
                value: Money::from_major(111),
            }
        );
    }
}
