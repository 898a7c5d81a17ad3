//! Order status state machine.
//!
//! `pending → preparing → out-for-delivery → delivered`. Updates may jump to
//! any valid state; the only enforced constraint is that an order leaves the
//! collection (is deleted) only from `pending`.

use std::str::FromStr;

use crate::domain::OrderStatus;
use crate::error::ApiError;

pub const STATUS_MESSAGE: &str =
    "Order must have a status of pending, preparing, out-for-delivery, delivered";

impl OrderStatus {
    /// Wire names of every storable state, in lifecycle order.
    pub const NAMES: &'static [&'static str] =
        &["pending", "preparing", "out-for-delivery", "delivered"];

    pub fn can_delete(self) -> bool {
        self == OrderStatus::Pending
    }

    pub fn ensure_deletable(self) -> Result<(), ApiError> {
        if self.can_delete() {
            Ok(())
        } else {
            Err(ApiError::StateConflict(
                "An order cannot be deleted unless it is pending".to_string(),
            ))
        }
    }
}

/// Anything outside [`OrderStatus::NAMES`], including the `"invalid"`
/// sentinel, is rejected.
impl FromStr for OrderStatus {
    type Err = ApiError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(OrderStatus::Pending),
            "preparing" => Ok(OrderStatus::Preparing),
            "out-for-delivery" => Ok(OrderStatus::OutForDelivery),
            "delivered" => Ok(OrderStatus::Delivered),
            _ => Err(ApiError::Validation(STATUS_MESSAGE.to_string())),
        }
    }
}
