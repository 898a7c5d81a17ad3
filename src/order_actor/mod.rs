//! Order-specific domain logic: validator chain and the status state machine.

pub mod entity;
pub mod status;
