//! System orchestration, configuration, startup, and shutdown logic.

pub mod config;
pub mod restaurant_system;
pub mod tracing;

pub use self::config::*;
pub use self::restaurant_system::*;
pub use self::tracing::*;
