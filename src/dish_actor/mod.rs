//! Dish-specific domain logic: the menu item validator chain.

pub mod entity;
