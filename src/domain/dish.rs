use serde::{Deserialize, Serialize};

/// A menu item.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dish {
    pub id: u64,
    pub name: String,
    pub description: String,
    pub price: u64,
    pub image_url: String,
}
