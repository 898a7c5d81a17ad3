use serde_json::Value;

use super::status::STATUS_MESSAGE;
use crate::actor_framework::Entity;
use crate::domain::{Order, OrderLineItem, OrderStatus};
use crate::error::ApiError;
use crate::validation::{as_integer, Check, Payload, Rule};

const QUANTITY_MESSAGE: &str = "Dish {index} must have a quantity that is an integer greater than 0";

const ORDER_CREATE_RULES: &[Rule] = &[
    Rule::truthy("deliverTo", "Order must include a deliverTo"),
    Rule::truthy("mobileNumber", "Order must include a mobileNumber"),
    Rule::truthy("dishes", "Order must include a dish"),
    Rule::new("dishes", Check::Array, "Order must include at least one dish"),
    Rule::new("dishes", Check::NonEmpty, "Order must include at least one1 dish"),
    Rule::new("dishes", Check::EachPositive("quantity"), QUANTITY_MESSAGE),
    Rule::new("dishes", Check::EachInteger("quantity"), QUANTITY_MESSAGE),
];

const ORDER_UPDATE_RULES: &[Rule] = &[
    Rule::new(
        "id",
        Check::MatchesRoute,
        "Order id does not match route id.Dish: {id}, Route:{route}",
    ),
    Rule::new("status", Check::OneOf(OrderStatus::NAMES), STATUS_MESSAGE),
    Rule::truthy("deliverTo", "Order must include a deliverTo"),
    Rule::truthy("mobileNumber", "Order must include a mobileNumber"),
    Rule::truthy("dishes", "Order must include a dish"),
    Rule::new("dishes", Check::Array, "Order must include at least one dish"),
    Rule::new("dishes", Check::NonEmpty, "Order must include at least one1 dish"),
    Rule::new("dishes", Check::EachPositive("quantity"), QUANTITY_MESSAGE),
    Rule::new("dishes", Check::EachInteger("quantity"), QUANTITY_MESSAGE),
];

impl Entity for Order {
    const RESOURCE: &'static str = "Order";

    fn id(&self) -> u64 {
        self.id
    }

    fn create_rules() -> &'static [Rule] {
        ORDER_CREATE_RULES
    }

    fn update_rules() -> &'static [Rule] {
        ORDER_UPDATE_RULES
    }

    /// Creates a new Order from a validated payload.
    ///
    /// # Notes
    /// A payload status naming a valid state is kept; otherwise the order
    /// starts out `pending`.
    fn from_create(id: u64, payload: &Payload) -> Result<Self, ApiError> {
        let status: OrderStatus = payload
            .get("status")
            .and_then(Value::as_str)
            .and_then(|s| s.parse().ok())
            .unwrap_or_default();
        Ok(Self {
            id,
            deliver_to: required_text(payload, "deliverTo")?,
            mobile_number: required_text(payload, "mobileNumber")?,
            status,
            dishes: line_items(payload)?,
        })
    }

    /// Replaces delivery details, status and line items. The id is kept.
    fn on_update(&mut self, payload: &Payload) -> Result<(), ApiError> {
        let status: OrderStatus = payload
            .get("status")
            .and_then(Value::as_str)
            .ok_or_else(|| ApiError::Validation(STATUS_MESSAGE.to_string()))?
            .parse()?;
        let deliver_to = required_text(payload, "deliverTo")?;
        let mobile_number = required_text(payload, "mobileNumber")?;
        let dishes = line_items(payload)?;

        self.deliver_to = deliver_to;
        self.mobile_number = mobile_number;
        self.status = status;
        self.dishes = dishes;
        Ok(())
    }

    fn on_delete(&self) -> Result<(), ApiError> {
        self.status.ensure_deletable()
    }
}

fn required_text(payload: &Payload, field: &str) -> Result<String, ApiError> {
    payload
        .text(field)
        .ok_or_else(|| ApiError::Validation(format!("Order must include a {field}")))
}

fn line_items(payload: &Payload) -> Result<Vec<OrderLineItem>, ApiError> {
    let items = payload
        .get("dishes")
        .and_then(Value::as_array)
        .filter(|items| !items.is_empty())
        .ok_or_else(|| ApiError::Validation("Order must include at least one dish".to_string()))?;

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            let quantity = item
                .get("quantity")
                .and_then(as_integer)
                .and_then(|q| u32::try_from(q).ok())
                .filter(|q| *q > 0)
                .ok_or_else(|| {
                    ApiError::Validation(QUANTITY_MESSAGE.replace("{index}", &index.to_string()))
                })?;
            Ok(OrderLineItem {
                dish_id: dish_reference(item),
                quantity,
            })
        })
        .collect()
}

/// Clients send either `dishId` or a whole dish object carrying `id`.
fn dish_reference(item: &Value) -> Option<u64> {
    let reference = item.get("dishId").or_else(|| item.get("id"))?;
    match reference {
        Value::String(s) => s.trim().parse().ok(),
        other => as_integer(other),
    }
}
