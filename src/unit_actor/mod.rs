//! Inventory units. Plain storage: allocation rules live in [`crate::inventory`].

pub mod entity;
