//! System orchestration, configuration, startup, and shutdown logic.

mod config;
mod error;
mod order_system;
mod tracing;

pub use config::*;
pub use error::*;
pub use order_system::*;
pub use self::tracing::*;
