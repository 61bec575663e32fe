//! Order records and the errors of the order workflow.

pub mod entity;
pub mod error;

pub use error::*;
