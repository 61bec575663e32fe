//! Inventory allocation.
//!
//! Stock for a product is only ever read-then-mutated inside that product's
//! exclusive section. Workflows take all the sections they need up front
//! through [`Allocator::reserve`] and get back a [`Reservation`] that journals
//! each mutation so the whole batch can be rolled back.

mod allocator;
mod locks;

pub use allocator::{AllocationError, Allocator, Reservation};
pub use locks::{KeyedLocks, SectionGuard};
