use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use super::ItemId;

/// Item catalog keyed by id; iterates in ascending id order
pub type Catalog = BTreeMap<ItemId, Item>;

/// Something that can be rated, such as a movie
///
/// Identity is `id`. `name` is display metadata and never takes part in scoring.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Item {
    pub id: ItemId,
    pub name: String,
}

impl Item {
    pub fn new(id: ItemId, name: impl Into<String>) -> Self {
        Self {
            id,
            name: name.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_catalog_iterates_by_id() {
        let mut catalog = Catalog::new();
        catalog.insert(ItemId(30), Item::new(ItemId(30), "Heat"));
        catalog.insert(ItemId(1), Item::new(ItemId(1), "Toy Story"));
        catalog.insert(ItemId(7), Item::new(ItemId(7), "Sabrina"));

        let ids: Vec<ItemId> = catalog.keys().copied().collect();
        assert_eq!(ids, vec![ItemId(1), ItemId(7), ItemId(30)]);
    }

    #[test]
    fn test_item_serialization() {
        let item = Item::new(ItemId(1), "Toy Story (1995)");
        let json = serde_json::to_value(&item).unwrap();
        assert_eq!(json["id"], 1);
        assert_eq!(json["name"], "Toy Story (1995)");
    }
}
