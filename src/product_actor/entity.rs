use crate::actor_framework::Entity;
use crate::domain::{Product, ProductCreate, ProductId};
use super::actions::{ProductAction, ProductActionResult};

impl Entity for Product {
    const KIND: &'static str = "product";

    type Id = ProductId;
    type CreatePayload = ProductCreate;
    type Patch = ();
    type Action = ProductAction;
    type ActionResult = ProductActionResult;

    fn id(&self) -> &ProductId { &self.id }

    /// Creates a new Product with an empty stock counter.
    fn from_create(id: ProductId, params: ProductCreate) -> Result<Self, String> {
        if params.name.trim().is_empty() {
            return Err("Product name must not be empty".to_string());
        }
        if !params.price.is_finite() || params.price < 0.0 {
            return Err(format!("Invalid price: {}", params.price));
        }
        Ok(Self::new(id, params.name, params.price, 0))
    }

    /// Catalog records are fixed once created; stock moves through actions.
    fn on_update(&mut self, _patch: ()) -> Result<(), String> {
        Err(format!("{} cannot be patched", self.id))
    }

    fn handle_action(&mut self, action: ProductAction) -> Result<ProductActionResult, String> {
        match action {
            ProductAction::CheckStock => {
                Ok(ProductActionResult::StockLevel(self.quantity))
            }
            ProductAction::Decrement(amount) => {
                if self.quantity >= amount {
                    self.quantity -= amount;
                    Ok(ProductActionResult::StockLevel(self.quantity))
                } else {
                    Err(format!("Insufficient stock: {} available, {} requested", self.quantity, amount))
                }
            }
            ProductAction::Increment(amount) => {
                self.quantity = self.quantity.checked_add(amount)
                    .ok_or_else(|| format!("Stock overflow: {} + {}", self.quantity, amount))?;
                Ok(ProductActionResult::StockLevel(self.quantity))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decrement_never_goes_negative() {
        let mut product = Product::new(1, "Lamp", 12.0, 2);

        let err = product.handle_action(ProductAction::Decrement(3)).unwrap_err();
        assert!(err.contains("2 available"));
        assert_eq!(product.quantity, 2);

        let level = product.handle_action(ProductAction::Decrement(2)).unwrap();
        assert_eq!(level, ProductActionResult::StockLevel(0));
    }

    #[test]
    fn increment_rejects_overflow() {
        let mut product = Product::new(1, "Lamp", 12.0, u32::MAX);
        assert!(product.handle_action(ProductAction::Increment(1)).is_err());
        assert_eq!(product.quantity, u32::MAX);
    }

    #[test]
    fn create_validates_catalog_fields() {
        let bad = ProductCreate { name: " ".into(), price: 1.0 };
        assert!(Product::from_create(ProductId(1), bad).is_err());

        let bad_price = ProductCreate { name: "Lamp".into(), price: f64::NAN };
        assert!(Product::from_create(ProductId(1), bad_price).is_err());

        let product = Product::from_create(ProductId(1), ProductCreate { name: "Lamp".into(), price: 3.5 }).unwrap();
        assert_eq!(product.quantity, 0);
    }

    #[test]
    fn catalog_records_cannot_be_patched() {
        let mut product = Product::new(1, "Lamp", 12.0, 2);
        let before = product.clone();
        let err = product.on_update(()).unwrap_err();
        assert!(err.contains("cannot be patched"));
        assert_eq!(product, before);
    }
}
