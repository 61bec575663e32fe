//! Type-safe identifiers for every table.
//!
//! Ids serialize as bare integers so the order snapshot stays `{"productId": 3, ...}`,
//! and display with a table prefix (`product_3`) in logs and error messages.

use serde::{Deserialize, Serialize};
use std::fmt::Display;

macro_rules! typed_id {
    ($(#[$meta:meta])* $name:ident => $prefix:literal) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl From<u32> for $name {
            fn from(id: u32) -> Self {
                Self(id)
            }
        }

        impl Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                write!(f, concat!($prefix, "_{}"), self.0)
            }
        }
    };
}

typed_id!(
    /// Identifier of a catalog product.
    ProductId => "product"
);
typed_id!(
    /// Identifier of one physical inventory unit.
    UnitId => "unit"
);
typed_id!(
    /// Identifier of a placed order.
    OrderId => "order"
);
typed_id!(
    /// Identifier of a registered user.
    UserId => "user"
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_display_with_prefix_and_serialize_bare() {
        assert_eq!(ProductId(7).to_string(), "product_7");
        assert_eq!(OrderId::from(3).to_string(), "order_3");
        assert_eq!(serde_json::to_string(&UnitId(12)).unwrap(), "12");
        assert_eq!(serde_json::from_str::<UserId>("5").unwrap(), UserId(5));
    }
}
