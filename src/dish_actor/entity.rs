use crate::actor_framework::Entity;
use crate::domain::Dish;
use crate::error::ApiError;
use crate::validation::{Check, Payload, Rule};

const PRICE_MESSAGE: &str = "Dish must have a price that is an integer greater than 0";

const DISH_CREATE_RULES: &[Rule] = &[
    Rule::truthy("name", "Dish must include a name"),
    Rule::truthy("description", "Dish must include a description"),
    Rule::truthy("price", "Dish must include a price"),
    Rule::new("price", Check::Positive, PRICE_MESSAGE),
    Rule::new("price", Check::Integer, PRICE_MESSAGE),
    Rule::truthy("image_url", "Dish must include a image_url"),
];

const DISH_UPDATE_RULES: &[Rule] = &[
    Rule::truthy("name", "Dish must include a name"),
    Rule::truthy("description", "Dish must include a description"),
    Rule::truthy("price", "Dish must include a price"),
    Rule::new("price", Check::Positive, PRICE_MESSAGE),
    Rule::new("price", Check::Integer, PRICE_MESSAGE),
    Rule::truthy("image_url", "Dish must include a image_url"),
    Rule::new(
        "id",
        Check::MatchesRoute,
        "Dish id does not match route id.Dish: {id}, Route:{route}",
    ),
];

/// Dishes keep the default deletion guard: they are never removed.
impl Entity for Dish {
    const RESOURCE: &'static str = "Dish";

    fn id(&self) -> u64 {
        self.id
    }

    fn create_rules() -> &'static [Rule] {
        DISH_CREATE_RULES
    }

    fn update_rules() -> &'static [Rule] {
        DISH_UPDATE_RULES
    }

    /// Creates a new Dish from a validated payload.
    ///
    /// # Arguments
    /// * `id` - Identifier assigned by the owning actor
    /// * `payload` - Request data carrying name, description, price and image_url
    fn from_create(id: u64, payload: &Payload) -> Result<Self, ApiError> {
        let fields = DishFields::from_payload(payload)?;
        Ok(Self {
            id,
            name: fields.name,
            description: fields.description,
            price: fields.price,
            image_url: fields.image_url,
        })
    }

    /// Overwrites every editable field. The id is never taken from the payload.
    fn on_update(&mut self, payload: &Payload) -> Result<(), ApiError> {
        let fields = DishFields::from_payload(payload)?;
        self.name = fields.name;
        self.description = fields.description;
        self.price = fields.price;
        self.image_url = fields.image_url;
        Ok(())
    }
}

struct DishFields {
    name: String,
    description: String,
    price: u64,
    image_url: String,
}

impl DishFields {
    fn from_payload(payload: &Payload) -> Result<Self, ApiError> {
        let text = |field: &str| {
            payload
                .text(field)
                .ok_or_else(|| ApiError::Validation(format!("Dish must include a {field}")))
        };
        Ok(Self {
            name: text("name")?,
            description: text("description")?,
            price: payload
                .integer("price")
                .filter(|p| *p > 0)
                .ok_or_else(|| ApiError::Validation(PRICE_MESSAGE.to_string()))?,
            image_url: text("image_url")?,
        })
    }
}
