/// Custom actions for Product entities.
///
/// Stock moves only through these actions so the counter can never go
/// negative, whatever the caller does.
#[derive(Debug, Clone)]
pub enum ProductAction {
    /// Checks the current stock level without modifying it.
    CheckStock,
    /// Conditionally removes `u32` items from stock.
    ///
    /// # Errors
    /// Fails without touching the counter if fewer items are in stock.
    Decrement(u32),
    /// Adds `u32` items to stock.
    Increment(u32),
}

/// Results from ProductActions. Every action answers with the stock level
/// after it ran.
#[derive(Debug, Clone, PartialEq)]
pub enum ProductActionResult {
    StockLevel(u32),
}
